#![doc = include_str!("../README.md")]

// private mods (will be partly re-exported)
mod error;
mod event;
mod offset;
mod scheduler;
mod source;
mod tracker;
mod utils;

// public, flat re-exports
pub use error::Error;

pub use event::{CueEvent, PlaybackEvent};

pub use offset::{CueOffset, CueOffsets, CueThreshold};

pub use scheduler::{
    queue::{PanicHandler, TaskQueue, TaskSender},
    Scheduler, Task,
};

pub use source::{manual::ManualPlaybackSource, ListenerId, PlaybackListener, PlaybackSource};

pub use tracker::{CueStatus, CueTracker, CueTrackerId, CueTrackerOptions};

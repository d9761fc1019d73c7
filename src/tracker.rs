//! Cue points of a single playback source.

mod cues;
mod options;
mod subscription;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    error::Error,
    event::{CueEvent, PlaybackEvent},
    offset::{CueOffset, CueOffsets},
    scheduler::Scheduler,
    source::{PlaybackListener, PlaybackSource},
    utils::unique_usize_id,
};

use cues::{CueHandler, CueList};
use subscription::PlaybackSubscription;

// -------------------------------------------------------------------------------------------------

pub use cues::CueStatus;
pub use options::CueTrackerOptions;

// -------------------------------------------------------------------------------------------------

/// Unique id of a [`CueTracker`], used in log messages.
pub type CueTrackerId = usize;

// -------------------------------------------------------------------------------------------------

/// Fires callbacks, once, when the playback of a [`PlaybackSource`] reaches configured offsets.
///
/// Offsets are either absolute times in seconds or percentages of the source's duration. On each
/// subscribed [`PlaybackEvent`](crate::PlaybackEvent), the tracker checks all enabled cues which
/// did not yet fire. Cues whose offset got reached are marked as triggered, then their handlers
/// are passed to the tracker's [`Scheduler`]. Handlers thus never run from within the source's
/// event dispatching, and may safely call back into the tracker.
///
/// Offsets are not validated by [`add`](Self::add): malformed offsets simply never fire.
/// Percentage offsets never fire while the source's duration is unknown.
///
/// Dropping the tracker [disposes](Self::dispose) it. Note that handlers are owned by the
/// tracker's listener, which the source keeps alive: a handler which captures a strong
/// `Arc<CueTracker>` thus keeps the tracker alive as well, until it gets disposed explicitly.
/// Capture a [`Weak`](std::sync::Weak) reference in handlers instead.
///
/// ```rust
/// use std::sync::Arc;
/// use cuepoint::{CueTracker, ManualPlaybackSource, PlaybackEvent, TaskQueue};
///
/// let source = Arc::new(ManualPlaybackSource::new());
/// let queue = TaskQueue::new();
/// let tracker = CueTracker::new(Arc::clone(&source), queue.sender()).unwrap();
///
/// tracker.add([5.0, 10.0], |event| println!("reached {}", event.offset));
/// tracker.add("50%", |_| println!("half way through"));
///
/// source.set_duration(30.0);
/// source.set_current_time(15.0);
/// source.dispatch(PlaybackEvent::TimeUpdate);
/// assert_eq!(queue.run_pending(), 3);
/// ```
pub struct CueTracker {
    tracker_id: CueTrackerId,
    cues: Arc<CueList>,
    subscription: Mutex<PlaybackSubscription>,
}

impl CueTracker {
    /// Create a new tracker which evaluates its cues on the source's "playing" and "timeupdate"
    /// events, and invokes triggered handlers via the given scheduler.
    pub fn new<S, D>(source: Arc<S>, scheduler: D) -> Result<Self, Error>
    where
        S: PlaybackSource + 'static,
        D: Scheduler + 'static,
    {
        Self::with_options(source, scheduler, CueTrackerOptions::default())
    }

    /// Create a new tracker with custom options.
    pub fn with_options<S, D>(
        source: Arc<S>,
        scheduler: D,
        options: CueTrackerOptions,
    ) -> Result<Self, Error>
    where
        S: PlaybackSource + 'static,
        D: Scheduler + 'static,
    {
        options.validate()?;

        let tracker_id = unique_usize_id();
        let cues = Arc::new(CueList::new(tracker_id));
        let source: Arc<dyn PlaybackSource> = source;

        // the listener must not keep the source alive: the source owns the listener
        let listener: PlaybackListener = {
            let cues = Arc::clone(&cues);
            let source = Arc::downgrade(&source);
            Arc::new(move |_event: PlaybackEvent| {
                if let Some(source) = source.upgrade() {
                    cues.evaluate(&*source, &scheduler);
                }
            })
        };
        let subscription = PlaybackSubscription::new(source, &options.events, listener)?;

        log::debug!(
            "Created cue tracker #{tracker_id}, listening to {:?}",
            options.events
        );
        Ok(Self {
            tracker_id,
            cues,
            subscription: Mutex::new(subscription),
        })
    }

    /// The tracker's unique id.
    pub fn id(&self) -> CueTrackerId {
        self.tracker_id
    }

    /// Add one cue point for each of the given offsets, all calling the given handler.
    ///
    /// `offsets` can be a single value (seconds as number or [`Duration`](std::time::Duration),
    /// a percentage string such as `"50%"`), a `Vec` or array of values, or a list created via
    /// [`cue_offsets!`](crate::cue_offsets). Duplicate offsets are tracked independently.
    pub fn add<O, F>(&self, offsets: O, handler: F)
    where
        O: Into<CueOffsets>,
        F: Fn(CueEvent) + Send + Sync + 'static,
    {
        self.warn_if_disposed();
        let handler: CueHandler = Arc::new(handler);
        self.cues.add(offsets.into(), handler);
    }

    /// Same as [`add`](Self::add), but validates the offsets first: all offsets must be finite,
    /// non-negative numbers of seconds or percentages. When any offset is invalid, no cue is added
    /// and `Error::InvalidOffset` is returned.
    pub fn try_add<O, F>(&self, offsets: O, handler: F) -> Result<(), Error>
    where
        O: Into<CueOffsets>,
        F: Fn(CueEvent) + Send + Sync + 'static,
    {
        let offsets = offsets.into();
        offsets.validate()?;
        self.warn_if_disposed();
        self.cues.add(offsets, Arc::new(handler));
        Ok(())
    }

    /// Remove all cue points whose offset strictly equals one of the given offsets.
    /// A number never equals a string: removing `"5"` won't remove a cue added as `5`.
    pub fn remove<O: Into<CueOffsets>>(&self, offsets: O) {
        self.cues.remove(&offsets.into());
    }

    /// Remove all cue points. Unlike [`dispose`](Self::dispose), the tracker keeps listening
    /// to the source, so new cues can be added.
    pub fn remove_all(&self) {
        self.cues.clear();
    }

    /// Offsets of all cue points in the order they got added, including duplicates.
    pub fn offsets(&self) -> Vec<CueOffset> {
        self.cues.offsets()
    }

    /// State of all cue points in the order they got added.
    pub fn cues(&self) -> Vec<CueStatus> {
        self.cues.statuses()
    }

    /// Number of cue points.
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// True when there are no cue points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Prevent all current cue points from firing. Their triggered state is kept.
    pub fn disable(&self) {
        self.cues.set_enabled(false);
    }

    /// Allow all current cue points to fire again. Already triggered cues stay triggered.
    pub fn enable(&self) {
        self.cues.set_enabled(true);
    }

    /// Re-arm all current cue points, so they fire again once their offset is reached.
    pub fn reset(&self) {
        self.cues.reset();
    }

    /// Remove all cue points and stop listening to the source. Handlers which got scheduled
    /// already still run. Calling this more than once is fine.
    pub fn dispose(&self) {
        self.cues.clear();
        let mut subscription = self.subscription();
        if subscription.is_active() {
            subscription.release();
            log::debug!("Disposed cue tracker #{}", self.tracker_id);
        }
    }

    /// True when the tracker got disposed.
    pub fn is_disposed(&self) -> bool {
        !self.subscription().is_active()
    }

    fn warn_if_disposed(&self) {
        if self.is_disposed() {
            log::warn!(
                "Cue tracker #{}: adding cues to a disposed tracker. They will never trigger",
                self.tracker_id
            );
        }
    }

    fn subscription(&self) -> MutexGuard<'_, PlaybackSubscription> {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

// -------------------------------------------------------------------------------------------------

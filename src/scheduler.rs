//! Deferred execution of cue handlers.

pub mod queue;

use crate::error::Error;

// -------------------------------------------------------------------------------------------------

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

// -------------------------------------------------------------------------------------------------

/// Runs tasks at some later point in time: never from within the `schedule` call itself.
///
/// [`CueTracker`](crate::CueTracker)s use a scheduler to invoke handlers of triggered cues after
/// the evaluation of all cues finished. Implement this to run handlers in your own event loop,
/// or use a [`TaskQueue`](queue::TaskQueue).
pub trait Scheduler: Send + Sync {
    /// Queue the given task. Returns `Error::SendError` when the task can't be queued.
    fn schedule(&self, task: Task) -> Result<(), Error>;
}

pub mod manual;

use std::sync::Arc;

use crate::{error::Error, event::PlaybackEvent};

// -------------------------------------------------------------------------------------------------

/// Identifies a subscribed [`PlaybackListener`] within a [`PlaybackSource`].
pub type ListenerId = usize;

/// Callback which gets invoked by a [`PlaybackSource`] for subscribed [`PlaybackEvent`]s.
pub type PlaybackListener = Arc<dyn Fn(PlaybackEvent) + Send + Sync>;

// -------------------------------------------------------------------------------------------------

/// A media element, which plays back some media and reports its playback progress via
/// [`PlaybackEvent`]s.
///
/// Sources are shared with [`CueTracker`](crate::CueTracker)s, so they must be `Send` and `Sync`.
/// Listeners get invoked from within the source's event dispatching. A source thus must not hold
/// any internal locks while calling listeners, as listeners will query the source's
/// [`current_time`](Self::current_time) and [`duration`](Self::duration).
pub trait PlaybackSource: Send + Sync {
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;
    /// Total length of the media in seconds, or NaN when the length is not yet known.
    fn duration(&self) -> f64;

    /// Register a listener for the given event. Returns an id to unsubscribe the listener again.
    fn subscribe(
        &self,
        event: PlaybackEvent,
        listener: PlaybackListener,
    ) -> Result<ListenerId, Error>;
    /// Remove a previously subscribed listener. Unknown listener ids are silently ignored.
    fn unsubscribe(&self, event: PlaybackEvent, listener_id: ListenerId);
}

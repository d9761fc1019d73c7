use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    error::Error,
    event::PlaybackEvent,
    source::{ListenerId, PlaybackListener, PlaybackSource},
    utils::unique_usize_id,
};

// -------------------------------------------------------------------------------------------------

struct ManualPlaybackState {
    current_time: f64,
    duration: f64,
    listeners: Vec<(PlaybackEvent, ListenerId, PlaybackListener)>,
}

// -------------------------------------------------------------------------------------------------

/// A [`PlaybackSource`] which gets driven by hand: the playback position and duration are set
/// explicitly and events are emitted via [`dispatch`](Self::dispatch).
///
/// Useful to bridge players which report their position in some other way, e.g. via a status
/// event channel, and to test cue handling without a real media element.
pub struct ManualPlaybackSource {
    state: Mutex<ManualPlaybackState>,
}

impl Default for ManualPlaybackSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualPlaybackSource {
    /// Create a new source at playback position 0 with an unknown (NaN) duration.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ManualPlaybackState {
                current_time: 0.0,
                duration: f64::NAN,
                listeners: Vec::new(),
            }),
        }
    }

    /// Set the current playback position in seconds.
    pub fn set_current_time(&self, current_time: f64) {
        self.state().current_time = current_time;
    }

    /// Set the total length of the media in seconds. Use NaN to mark it as unknown.
    pub fn set_duration(&self, duration: f64) {
        self.state().duration = duration;
    }

    /// Number of listeners which are currently subscribed to the given event.
    pub fn listener_count(&self, event: PlaybackEvent) -> usize {
        self.state()
            .listeners
            .iter()
            .filter(|(listener_event, _, _)| *listener_event == event)
            .count()
    }

    /// Synchronously invoke all listeners of the given event, in subscription order.
    pub fn dispatch(&self, event: PlaybackEvent) {
        // collect listeners first: listeners call back into the source
        let listeners = self
            .state()
            .listeners
            .iter()
            .filter(|(listener_event, _, _)| *listener_event == event)
            .map(|(_, _, listener)| listener.clone())
            .collect::<Vec<_>>();
        for listener in listeners {
            listener(event);
        }
    }

    fn state(&self) -> MutexGuard<'_, ManualPlaybackState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlaybackSource for ManualPlaybackSource {
    fn current_time(&self) -> f64 {
        self.state().current_time
    }

    fn duration(&self) -> f64 {
        self.state().duration
    }

    fn subscribe(
        &self,
        event: PlaybackEvent,
        listener: PlaybackListener,
    ) -> Result<ListenerId, Error> {
        let listener_id = unique_usize_id();
        self.state().listeners.push((event, listener_id, listener));
        Ok(listener_id)
    }

    fn unsubscribe(&self, event: PlaybackEvent, listener_id: ListenerId) {
        self.state()
            .listeners
            .retain(|(listener_event, id, _)| !(*listener_event == event && *id == listener_id));
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn position_and_duration() {
        let source = ManualPlaybackSource::new();
        assert_eq!(source.current_time(), 0.0);
        assert!(source.duration().is_nan());

        source.set_current_time(4.25);
        source.set_duration(15.0);
        assert_eq!(source.current_time(), 4.25);
        assert_eq!(source.duration(), 15.0);
    }

    #[test]
    fn dispatch_to_subscribed_listeners() {
        let source = Arc::new(ManualPlaybackSource::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let listener: PlaybackListener = {
            let calls = Arc::clone(&calls);
            let source = Arc::downgrade(&source);
            Arc::new(move |_event| {
                // listeners may query the source while it dispatches
                if let Some(source) = source.upgrade() {
                    assert_eq!(source.current_time(), 2.0);
                }
                calls.fetch_add(1, Ordering::Relaxed);
            })
        };

        let listener_id = source
            .subscribe(PlaybackEvent::TimeUpdate, listener)
            .unwrap();
        assert_eq!(source.listener_count(PlaybackEvent::TimeUpdate), 1);
        assert_eq!(source.listener_count(PlaybackEvent::Playing), 0);

        source.set_current_time(2.0);
        source.dispatch(PlaybackEvent::Playing);
        assert_eq!(calls.load(Ordering::Relaxed), 0);
        source.dispatch(PlaybackEvent::TimeUpdate);
        assert_eq!(calls.load(Ordering::Relaxed), 1);

        // wrong event kind: no-op
        source.unsubscribe(PlaybackEvent::Playing, listener_id);
        assert_eq!(source.listener_count(PlaybackEvent::TimeUpdate), 1);

        source.unsubscribe(PlaybackEvent::TimeUpdate, listener_id);
        assert_eq!(source.listener_count(PlaybackEvent::TimeUpdate), 0);
        source.dispatch(PlaybackEvent::TimeUpdate);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }
}

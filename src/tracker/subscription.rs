use std::sync::Arc;

use crate::{
    error::Error,
    event::PlaybackEvent,
    source::{ListenerId, PlaybackListener, PlaybackSource},
};

// -------------------------------------------------------------------------------------------------

/// A listener's subscription to a set of playback events of a source.
///
/// Subscribing happens on construction; unsubscribing on [`release`](Self::release) or drop,
/// whatever happens first, and exactly once.
pub(crate) struct PlaybackSubscription {
    source: Option<Arc<dyn PlaybackSource>>,
    listeners: Vec<(PlaybackEvent, ListenerId)>,
}

impl PlaybackSubscription {
    /// Subscribe the listener to all given events. When one of the subscriptions fails, the
    /// already acquired ones are released again.
    pub fn new(
        source: Arc<dyn PlaybackSource>,
        events: &[PlaybackEvent],
        listener: PlaybackListener,
    ) -> Result<Self, Error> {
        let mut subscription = Self {
            source: Some(Arc::clone(&source)),
            listeners: Vec::with_capacity(events.len()),
        };
        for &event in events {
            let listener_id = source.subscribe(event, Arc::clone(&listener))?;
            subscription.listeners.push((event, listener_id));
        }
        Ok(subscription)
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    /// Unsubscribe from all events and drop the source. Does nothing when already released.
    pub fn release(&mut self) {
        if let Some(source) = self.source.take() {
            for (event, listener_id) in self.listeners.drain(..) {
                source.unsubscribe(event, listener_id);
            }
        }
    }
}

impl Drop for PlaybackSubscription {
    fn drop(&mut self) {
        self.release();
    }
}

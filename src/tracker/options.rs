use strum::IntoEnumIterator;

use crate::{error::Error, event::PlaybackEvent};

// -------------------------------------------------------------------------------------------------

/// Options to configure a [`CueTracker`](crate::CueTracker).
#[derive(Debug, Clone, PartialEq)]
pub struct CueTrackerOptions {
    /// Playback events which make the tracker evaluate its cues.
    /// By default [`PlaybackEvent::Playing`] and [`PlaybackEvent::TimeUpdate`].
    pub events: Vec<PlaybackEvent>,
}

impl Default for CueTrackerOptions {
    fn default() -> Self {
        Self {
            events: PlaybackEvent::iter().collect(),
        }
    }
}

impl CueTrackerOptions {
    /// Listen to the given playback events only.
    pub fn events<E: IntoIterator<Item = PlaybackEvent>>(mut self, events: E) -> Self {
        self.events = events.into_iter().collect();
        self
    }

    /// Validate all parameters. Returns Error::ParameterError on errors.
    pub fn validate(&self) -> Result<(), Error> {
        if self.events.is_empty() {
            return Err(Error::ParameterError(
                "tracker options 'events' must not be empty".to_string(),
            ));
        }
        for (index, event) in self.events.iter().enumerate() {
            if self.events[..index].contains(event) {
                return Err(Error::ParameterError(format!(
                    "tracker options 'events' contains '{event}' more than once"
                )));
            }
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------

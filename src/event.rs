use crate::offset::CueOffset;

// -------------------------------------------------------------------------------------------------

/// Playback events, emitted by a [`PlaybackSource`](crate::PlaybackSource), which make a
/// [`CueTracker`](crate::CueTracker) evaluate its cues.
///
/// Event names follow the media element naming, so `PlaybackEvent::TimeUpdate.to_string()` is
/// `"timeupdate"` and `"playing".parse()` yields `PlaybackEvent::Playing`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
    strum::VariantNames,
)]
pub enum PlaybackEvent {
    /// Playback started or resumed.
    #[strum(serialize = "playing")]
    Playing,
    /// The playback position changed while playing.
    #[strum(serialize = "timeupdate")]
    TimeUpdate,
}

// -------------------------------------------------------------------------------------------------

/// Payload of a triggered cue's handler.
#[derive(Debug, Clone, PartialEq)]
pub struct CueEvent {
    /// The cue's offset, exactly as it got added.
    pub offset: CueOffset,
}

// -------------------------------------------------------------------------------------------------

use std::{error, fmt};

// -------------------------------------------------------------------------------------------------

/// Provides an enumeration of all possible errors reported by cuepoint.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    InvalidOffset(String),
    ParameterError(String),
    SubscriptionError(String),
    SendError(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOffset(offset) => write!(f, "Invalid cue offset: '{offset}'"),
            Self::ParameterError(str) => write!(f, "Invalid parameter: {str}"),
            Self::SubscriptionError(str) => {
                write!(f, "Failed to subscribe to playback events: {str}")
            }
            Self::SendError(str) => write!(f, "Failed to schedule task: {str}"),
        }
    }
}

impl<T> From<crossbeam_channel::TrySendError<T>> for Error {
    fn from(err: crossbeam_channel::TrySendError<T>) -> Self {
        Error::SendError(err.to_string())
    }
}

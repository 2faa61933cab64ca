//! Alert mechanism error types.
//!
//! Every error here is recoverable: the dispatcher absorbs them by moving on
//! to the next mechanism in the chain.

use thiserror::Error;

/// Errors reported by a single alert mechanism.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlertError {
    /// The program or API the mechanism needs is not present.
    #[error("mechanism '{0}' is not available: {1}")]
    MechanismUnavailable(String, String),

    /// An audio player was invoked but reported failure.
    #[error("audio playback with '{0}' failed: {1}")]
    PlaybackFailed(String, String),

    /// A notifier was invoked but reported failure.
    #[error("notification via '{0}' failed: {1}")]
    NotificationFailed(String, String),
}

impl AlertError {
    /// Returns true if the mechanism could not be invoked at all.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::MechanismUnavailable(_, _))
    }

    /// Returns true if the mechanism was invoked and signalled failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::PlaybackFailed(_, _) | Self::NotificationFailed(_, _))
    }

    /// Returns true if dispatch can continue with another mechanism.
    ///
    /// All alert errors are recoverable; a timer never fails because an
    /// alert could not be delivered.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }

    /// Returns the name of the mechanism that produced this error.
    #[must_use]
    pub fn mechanism(&self) -> &str {
        match self {
            Self::MechanismUnavailable(name, _)
            | Self::PlaybackFailed(name, _)
            | Self::NotificationFailed(name, _) => name,
        }
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::MechanismUnavailable(_, _) => "install the program or put it on PATH",
            Self::PlaybackFailed(_, _) => "check that the audio file is a supported format",
            Self::NotificationFailed(_, _) => "check that a notification daemon is running",
        }
    }
}

use crate::SessionState;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recording, playback and persistence errors with source location tracking.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Operation is not valid from the session's current state.
    #[error("Cannot {action} while {from} {location}")]
    InvalidTransition {
        /// State the session was in when the operation was attempted.
        from: SessionState,
        /// Operation that was attempted.
        action: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Volume outside the `[0.0, 1.0]` range.
    #[error("Volume {value} is outside 0.0..=1.0 {location}")]
    OutOfRange {
        /// Rejected volume value.
        value: f32,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio capture device or file operation failed.
    #[error("Capture failed: {reason} {location}")]
    CaptureFailure {
        /// Description of the capture error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Audio playback device or decode operation failed.
    #[error("Playback failed: {reason} {location}")]
    PlaybackFailure {
        /// Description of the playback error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Recording store read or write failed.
    #[error("Persistence failed: {reason} {location}")]
    PersistenceFailure {
        /// Description of the store error.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;

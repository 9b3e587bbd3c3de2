mod file;
mod memory;
mod recording;

pub use {file::FileStore, memory::MemoryStore, recording::Recording};

use crate::{CoreResult, SessionError};

use std::panic::Location;

use error_location::ErrorLocation;
use uuid::Uuid;

/// Persistence collaborator holding saved recordings.
///
/// Recordings are immutable once saved: the only mutations are `save` and
/// `delete`. Implementations list recordings in insertion order.
pub trait RecordingStore {
    /// Persist a new recording and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the duration is negative or not
    /// finite, or the backing storage cannot be written.
    fn save(&self, name: &str, audio_data: Vec<u8>, duration_secs: f64)
    -> CoreResult<Recording>;

    /// All saved recordings, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the backing storage cannot be read.
    fn list_all(&self) -> CoreResult<Vec<Recording>>;

    /// Remove the recording with `id`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if no such recording exists or the
    /// backing storage cannot be written.
    fn delete(&self, id: Uuid) -> CoreResult<()>;
}

#[track_caller]
pub(crate) fn validate_duration(duration_secs: f64) -> CoreResult<()> {
    if !duration_secs.is_finite() || duration_secs < 0.0 {
        return Err(SessionError::PersistenceFailure {
            reason: format!("Invalid duration: {}", duration_secs),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(())
}

#[track_caller]
pub(crate) fn not_found(id: Uuid) -> SessionError {
    SessionError::PersistenceFailure {
        reason: format!("Recording {} not found", id),
        location: ErrorLocation::from(Location::caller()),
    }
}

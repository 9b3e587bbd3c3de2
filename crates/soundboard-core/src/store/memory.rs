use crate::{
    CoreResult, Recording, RecordingStore,
    store::{not_found, validate_duration},
};

use std::sync::{Mutex, MutexGuard};

use tracing::{error, info, instrument};
use uuid::Uuid;

/// [`RecordingStore`] that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    recordings: Mutex<Vec<Recording>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn recordings(&self) -> MutexGuard<'_, Vec<Recording>> {
        self.recordings.lock().unwrap_or_else(|e| {
            error!("Recording list lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}

impl RecordingStore for MemoryStore {
    #[track_caller]
    #[instrument(skip(self, audio_data), fields(audio_len = audio_data.len()))]
    fn save(
        &self,
        name: &str,
        audio_data: Vec<u8>,
        duration_secs: f64,
    ) -> CoreResult<Recording> {
        validate_duration(duration_secs)?;

        let recording = Recording::new(Uuid::new_v4(), name.to_string(), audio_data, duration_secs);
        self.recordings().push(recording.clone());

        info!(id = %recording.id(), "Recording saved");

        Ok(recording)
    }

    fn list_all(&self) -> CoreResult<Vec<Recording>> {
        Ok(self.recordings().clone())
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn delete(&self, id: Uuid) -> CoreResult<()> {
        let mut recordings = self.recordings();
        let index = recordings
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| not_found(id))?;
        recordings.remove(index);

        info!(id = %id, "Recording deleted");

        Ok(())
    }
}

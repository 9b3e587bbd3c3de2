//! Directory-backed recording store.
//!
//! Layout: `index.toml` lists every recording's id, name and duration in
//! insertion order; each recording's audio lives next to it in an opaque
//! `<id>.audio` blob. The index is replaced atomically on every change.

use crate::{
    CoreResult, Recording, RecordingStore, SessionError,
    store::{not_found, validate_duration},
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    sync::Mutex,
};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const INDEX_FILE: &str = "index.toml";
const AUDIO_EXTENSION: &str = "audio";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Index {
    #[serde(default)]
    recordings: Vec<IndexEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    id: Uuid,
    name: String,
    duration_secs: f64,
}

/// [`RecordingStore`] persisted to a directory on disk.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    /// Serialises index read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the directory cannot be created.
    #[track_caller]
    #[instrument(skip(root))]
    pub fn open(root: impl Into<PathBuf>) -> CoreResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).map_err(|e| SessionError::PersistenceFailure {
            reason: format!("Failed to create store directory {:?}: {}", root, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(root = ?root, "FileStore opened");

        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the index and audio blobs.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    fn audio_path(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{}.{}", id, AUDIO_EXTENSION))
    }

    #[track_caller]
    fn read_index(&self) -> CoreResult<Index> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(Index::default());
        }

        let contents =
            fs::read_to_string(&path).map_err(|e| SessionError::PersistenceFailure {
                reason: format!("Failed to read index: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        toml::from_str(&contents).map_err(|e| SessionError::PersistenceFailure {
            reason: format!("Failed to parse index: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Replace the index via temp file + rename so a crash mid-write
    /// leaves the previous index intact.
    #[track_caller]
    fn write_index(&self, index: &Index) -> CoreResult<()> {
        let path = self.index_path();

        let contents = toml::to_string_pretty(index).map_err(|e| SessionError::PersistenceFailure {
            reason: format!("Failed to serialize index: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file =
            fs::File::create(&temp_path).map_err(|e| SessionError::PersistenceFailure {
                reason: format!("Failed to create temp index file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| SessionError::PersistenceFailure {
                reason: format!("Failed to write temp index file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file
            .sync_all()
            .map_err(|e| SessionError::PersistenceFailure {
                reason: format!("Failed to sync temp index file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        fs::rename(&temp_path, &path).map_err(|e| SessionError::PersistenceFailure {
            reason: format!("Failed to rename temp index to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        debug!(entries = index.recordings.len(), "Index written");

        Ok(())
    }
}

impl RecordingStore for FileStore {
    #[track_caller]
    #[instrument(skip(self, audio_data), fields(audio_len = audio_data.len()))]
    fn save(
        &self,
        name: &str,
        audio_data: Vec<u8>,
        duration_secs: f64,
    ) -> CoreResult<Recording> {
        validate_duration(duration_secs)?;

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut index = self.read_index()?;

        let id = Uuid::new_v4();
        let audio_path = self.audio_path(id);

        fs::write(&audio_path, &audio_data).map_err(|e| SessionError::PersistenceFailure {
            reason: format!("Failed to write audio {:?}: {}", audio_path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        index.recordings.push(IndexEntry {
            id,
            name: name.to_string(),
            duration_secs,
        });

        if let Err(e) = self.write_index(&index) {
            if let Err(cleanup) = fs::remove_file(&audio_path) {
                warn!(path = ?audio_path, error = %cleanup, "Failed to remove orphaned audio");
            }
            return Err(e);
        }

        info!(id = %id, "Recording saved");

        Ok(Recording::new(id, name.to_string(), audio_data, duration_secs))
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn list_all(&self) -> CoreResult<Vec<Recording>> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let index = self.read_index()?;
        let mut recordings = Vec::with_capacity(index.recordings.len());

        for entry in index.recordings {
            let audio_path = self.audio_path(entry.id);
            let audio_data = fs::read(&audio_path).map_err(|e| SessionError::PersistenceFailure {
                reason: format!("Failed to read audio {:?}: {}", audio_path, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            recordings.push(Recording::new(
                entry.id,
                entry.name,
                audio_data,
                entry.duration_secs,
            ));
        }

        debug!(count = recordings.len(), "Recordings listed");

        Ok(recordings)
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn delete(&self, id: Uuid) -> CoreResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut index = self.read_index()?;
        let position = index
            .recordings
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| not_found(id))?;
        index.recordings.remove(position);

        self.write_index(&index)?;

        // Only indexed blobs are ever listed.
        let audio_path = self.audio_path(id);
        if let Err(e) = fs::remove_file(&audio_path) {
            warn!(path = ?audio_path, error = %e, "Failed to remove audio blob");
        }

        info!(id = %id, "Recording deleted");

        Ok(())
    }
}

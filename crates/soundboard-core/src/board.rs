use crate::{
    AudioCapture, AudioPlayback, CaptureHandle, CapturedClip, CoreResult, PlaybackSource,
    Recording, RecordingSession, RecordingStore, SessionError, SessionState, VolumeCheck,
    clip_duration_seconds,
};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
};

use error_location::ErrorLocation;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Wires a [`RecordingSession`] to capture, playback and a shared store.
///
/// Every user action is an explicit method returning a result; nothing here
/// is bound to a UI toolkit. The caller owns the one-second timer and calls
/// [`tick`](Self::tick) while [`is_recording`](Self::is_recording) is true.
///
/// # Resource scoping
///
/// The capture device is held only between a successful `start_recording`
/// and the matching `stop_recording`. The session's start check runs before
/// the device is opened, and nothing fallible runs after it opens.
pub struct SoundBoard<C, P, S> {
    session: RecordingSession,
    capture: C,
    playback: P,
    store: Arc<S>,
    clip_path: PathBuf,
    active_capture: Option<CaptureHandle>,
    last_clip: Option<CapturedClip>,
}

impl<C, P, S> SoundBoard<C, P, S>
where
    C: AudioCapture,
    P: AudioPlayback,
    S: RecordingStore,
{
    /// Create a board that captures into `clip_path` and saves into `store`.
    pub fn new(capture: C, playback: P, store: Arc<S>, clip_path: impl Into<PathBuf>) -> Self {
        Self {
            session: RecordingSession::new(),
            capture,
            playback,
            store,
            clip_path: clip_path.into(),
            active_capture: None,
            last_clip: None,
        }
    }

    /// The underlying session tracker.
    pub fn session(&self) -> &RecordingSession {
        &self.session
    }

    /// Shared handle to the recording store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// File each new capture is written to.
    pub fn clip_path(&self) -> &Path {
        &self.clip_path
    }

    /// The finished capture waiting to be played or saved, if any.
    pub fn last_clip(&self) -> Option<&CapturedClip> {
        self.last_clip.as_ref()
    }

    /// Whether a capture is in progress.
    pub fn is_recording(&self) -> bool {
        self.session.is_recording()
    }

    /// Stop when recording, start otherwise. Returns the new state.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`start_recording`](Self::start_recording) or
    /// [`stop_recording`](Self::stop_recording).
    #[track_caller]
    pub fn toggle_recording(&mut self) -> CoreResult<SessionState> {
        if self.session.is_recording() {
            self.stop_recording()?;
        } else {
            self.start_recording()?;
        }
        Ok(self.session.state())
    }

    /// Open the capture device, then move the session to `Recording`.
    ///
    /// Discards any finished clip that was not saved.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if already recording, or `CaptureFailure`
    /// if the device cannot be opened.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn start_recording(&mut self) -> CoreResult<()> {
        self.session.ensure_can_start()?;

        let handle = self.capture.start_capture(&self.clip_path)?;
        self.session.begin_take();

        self.active_capture = Some(handle);
        self.last_clip = None;

        info!(take_id = ?self.session.take_id(), "Recording started");

        Ok(())
    }

    /// Move the session to `Stopped`, then stop the capture.
    ///
    /// Returns once the capture has completed. On success the clip becomes
    /// available to [`play_last`](Self::play_last) and
    /// [`save_last`](Self::save_last).
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless recording, or `CaptureFailure` if
    /// the capture did not complete. The session is stopped either way.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn stop_recording(&mut self) -> CoreResult<CapturedClip> {
        let elapsed_secs = self.session.stop()?;

        let handle = self
            .active_capture
            .take()
            .ok_or_else(|| SessionError::CaptureFailure {
                reason: "No capture in progress".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let clip = self.capture.stop_capture(handle)?;

        info!(
            take_id = ?self.session.take_id(),
            elapsed_secs,
            path = ?clip.path,
            "Recording finished"
        );

        self.last_clip = Some(clip.clone());

        Ok(clip)
    }

    /// Advance the elapsed counter and return it as `MM:SS`.
    pub fn tick(&mut self) -> String {
        self.session.tick();
        self.session.format_elapsed()
    }

    /// Validate and apply a playback volume.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for values outside `[0.0, 1.0]`.
    #[track_caller]
    pub fn set_volume(&mut self, volume: f32) -> CoreResult<VolumeCheck> {
        let check = self.session.set_volume(volume)?;
        self.playback.set_volume(volume);
        Ok(check)
    }

    /// Play the last finished capture at the session volume.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while recording, `PlaybackFailure` if
    /// there is no finished capture or the device fails.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn play_last(&mut self) -> CoreResult<()> {
        self.ensure_not_recording("play the last capture")?;

        let clip = self
            .last_clip
            .as_ref()
            .ok_or_else(|| SessionError::PlaybackFailure {
                reason: "No finished capture to play".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.playback
            .play(PlaybackSource::File(clip.path.clone()), self.session.volume())
    }

    /// Persist the last finished capture under `name` and consume it.
    ///
    /// The duration is probed from the clip. If probing fails the recording
    /// is still saved, with a duration of zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` while recording, `PersistenceFailure` if
    /// there is no finished capture or the store rejects it.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_last(&mut self, name: &str) -> CoreResult<Recording> {
        self.ensure_not_recording("save the last capture")?;

        let clip = self
            .last_clip
            .as_ref()
            .ok_or_else(|| SessionError::PersistenceFailure {
                reason: "No finished capture to save".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let audio_data = fs::read(&clip.path).map_err(|e| SessionError::PersistenceFailure {
            reason: format!("Failed to read capture {:?}: {}", clip.path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let duration_secs = match clip_duration_seconds(&clip.path) {
            Ok(secs) => secs,
            Err(e) => {
                warn!(error = ?e, "Could not determine clip duration, saving as 0");
                0.0
            }
        };

        let recording = self.store.save(name, audio_data, duration_secs)?;
        self.last_clip = None;

        info!(
            id = %recording.id(),
            duration_secs = recording.duration_secs(),
            "Capture saved"
        );

        Ok(recording)
    }

    /// All saved recordings, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the store cannot be read.
    pub fn recordings(&self) -> CoreResult<Vec<Recording>> {
        self.store.list_all()
    }

    /// Play a saved recording at the session volume.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackFailure` if the audio cannot be decoded or played.
    #[instrument(skip(self, recording), fields(id = %recording.id()))]
    pub fn play_recording(&mut self, recording: &Recording) -> CoreResult<()> {
        self.playback.play(
            PlaybackSource::Bytes(recording.audio_data().to_vec()),
            self.session.volume(),
        )
    }

    /// Delete a saved recording and return the refreshed list.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the recording does not exist or the
    /// store cannot be updated.
    #[instrument(skip(self))]
    pub fn delete_recording(&mut self, id: Uuid) -> CoreResult<Vec<Recording>> {
        self.store.delete(id)?;
        self.store.list_all()
    }

    /// Stop any playback in progress.
    pub fn stop_playback(&mut self) {
        self.playback.stop();
    }

    #[track_caller]
    fn ensure_not_recording(&self, action: &'static str) -> CoreResult<()> {
        if self.session.is_recording() {
            return Err(SessionError::InvalidTransition {
                from: self.session.state(),
                action,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

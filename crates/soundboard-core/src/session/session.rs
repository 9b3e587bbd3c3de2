use crate::{
    CoreResult, SessionError, SessionState, VolumeCheck, session::DEFAULT_VOLUME,
    session::format_elapsed,
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, info};
use uuid::Uuid;

/// Tracks one record/stop cycle: state, elapsed seconds and playback volume.
///
/// The session knows nothing about audio devices. Callers drive it with
/// explicit calls: `start`/`stop` on user action, `tick` once per second from
/// a timer while recording.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    state: SessionState,
    elapsed_secs: u64,
    volume: f32,
    /// Regenerated on every `start()` for log correlation.
    take_id: Option<Uuid>,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSession {
    /// Create an idle session at the default volume.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            elapsed_secs: 0,
            volume: DEFAULT_VOLUME,
            take_id: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Shorthand for `state() == Recording`.
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Seconds counted by `tick()` since the last `start()`.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// Last accepted volume.
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Identifier of the current or most recent take.
    pub fn take_id(&self) -> Option<Uuid> {
        self.take_id
    }

    /// Check that `start()` would succeed, without changing anything.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if already recording.
    #[track_caller]
    pub fn ensure_can_start(&self) -> CoreResult<()> {
        if !self.state.can_start() {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                action: "start recording",
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    /// Begin a new take. Resets elapsed time to zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if already recording.
    #[track_caller]
    pub fn start(&mut self) -> CoreResult<()> {
        self.ensure_can_start()?;
        self.begin_take();
        Ok(())
    }

    /// Enter `Recording` with a fresh take. Callers check
    /// [`ensure_can_start`](Self::ensure_can_start) first.
    pub(crate) fn begin_take(&mut self) {
        let take_id = Uuid::new_v4();
        self.state = SessionState::Recording;
        self.elapsed_secs = 0;
        self.take_id = Some(take_id);

        info!(take_id = %take_id, "Session recording");
    }

    /// Finish the current take and freeze elapsed time.
    ///
    /// Returns the frozen elapsed seconds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless recording.
    #[track_caller]
    pub fn stop(&mut self) -> CoreResult<u64> {
        if !self.state.can_stop() {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                action: "stop recording",
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.state = SessionState::Stopped;

        info!(
            take_id = ?self.take_id,
            elapsed_secs = self.elapsed_secs,
            "Session stopped"
        );

        Ok(self.elapsed_secs)
    }

    /// Advance elapsed time by one second while recording.
    ///
    /// Outside `Recording` this is a no-op, so a timer that fires late after
    /// `stop()` cannot move a frozen counter.
    pub fn tick(&mut self) -> u64 {
        if self.is_recording() {
            self.elapsed_secs += 1;
            debug!(elapsed_secs = self.elapsed_secs, "Session tick");
        }
        self.elapsed_secs
    }

    /// Elapsed time as `MM:SS`.
    pub fn format_elapsed(&self) -> String {
        format_elapsed(self.elapsed_secs)
    }

    /// Validate and store a playback volume.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for values outside `[0.0, 1.0]`; the previous
    /// volume is kept.
    #[track_caller]
    pub fn set_volume(&mut self, volume: f32) -> CoreResult<VolumeCheck> {
        let check = VolumeCheck::classify(volume)?;
        self.volume = volume;

        debug!(volume, check = ?check, "Volume set");

        Ok(check)
    }
}

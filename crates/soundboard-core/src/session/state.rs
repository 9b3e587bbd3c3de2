use std::fmt;

/// Lifecycle state of a [`RecordingSession`](crate::RecordingSession).
///
/// `Idle --start--> Recording --stop--> Stopped --start--> Recording`.
/// There is no terminal state; a stopped session can record again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing captured yet.
    #[default]
    Idle,
    /// Currently capturing audio. Elapsed time advances.
    Recording,
    /// Capture finished. Elapsed time is frozen.
    Stopped,
}

impl SessionState {
    /// Whether `start()` is allowed from this state.
    pub fn can_start(self) -> bool {
        !matches!(self, SessionState::Recording)
    }

    /// Whether `stop()` is allowed from this state.
    pub fn can_stop(self) -> bool {
        matches!(self, SessionState::Recording)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Idle => "idle",
            SessionState::Recording => "recording",
            SessionState::Stopped => "stopped",
        };
        f.write_str(label)
    }
}

mod elapsed;
#[allow(clippy::module_inception)]
mod session;
mod state;
mod volume;

pub use {
    elapsed::format_elapsed,
    session::RecordingSession,
    state::SessionState,
    volume::{DEFAULT_VOLUME, VolumeCheck},
};

use crate::{CoreResult, SessionError};

use std::{panic::Location, path::Path};

use error_location::ErrorLocation;
use hound::WavReader;
use tracing::debug;

/// Length of a captured clip in seconds: frames divided by sample rate.
///
/// # Errors
///
/// Returns `CaptureFailure` if the file cannot be read as WAV or reports a
/// zero sample rate.
#[track_caller]
pub fn clip_duration_seconds(path: &Path) -> CoreResult<f64> {
    let reader = WavReader::open(path).map_err(|e| SessionError::CaptureFailure {
        reason: format!("Failed to open {:?}: {}", path, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(SessionError::CaptureFailure {
            reason: format!("{:?} reports a sample rate of 0", path),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    // duration() counts frames, independent of the channel count
    let frames = reader.duration();
    let seconds = f64::from(frames) / f64::from(spec.sample_rate);

    debug!(path = ?path, frames, sample_rate = spec.sample_rate, seconds, "Clip duration probed");

    Ok(seconds)
}

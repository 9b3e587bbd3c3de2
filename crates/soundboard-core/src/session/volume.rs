use crate::{CoreResult, SessionError};

use std::panic::Location;

use error_location::ErrorLocation;

/// Playback volume a new session starts with.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Values strictly below this are reported as [`VolumeCheck::TooLow`].
pub(crate) const LOW_VOLUME_THRESHOLD: f32 = 0.1;

/// Values strictly above this are reported as [`VolumeCheck::TooHigh`].
pub(crate) const HIGH_VOLUME_THRESHOLD: f32 = 0.9;

/// Classification of an accepted volume value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeCheck {
    /// Below 0.1, likely inaudible.
    TooLow,
    /// Within the comfortable range.
    Ok,
    /// Above 0.9, likely uncomfortably loud.
    TooHigh,
}

impl VolumeCheck {
    /// Classify `value`, rejecting anything outside `[0.0, 1.0]` (NaN included).
    #[track_caller]
    pub fn classify(value: f32) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(SessionError::OutOfRange {
                value,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let check = if value < LOW_VOLUME_THRESHOLD {
            VolumeCheck::TooLow
        } else if value > HIGH_VOLUME_THRESHOLD {
            VolumeCheck::TooHigh
        } else {
            VolumeCheck::Ok
        };

        Ok(check)
    }

    /// User-facing warning for this classification, if any.
    pub fn warning(self) -> Option<&'static str> {
        match self {
            VolumeCheck::TooLow => Some("Volume is very low"),
            VolumeCheck::TooHigh => Some("Volume is very high"),
            VolumeCheck::Ok => None,
        }
    }
}

use crate::config::default_volume;

use serde::{Deserialize, Serialize};

/// Playback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Volume applied at startup, `0.0` to `1.0`.
    #[serde(default = "default_volume")]
    pub default_volume: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
        }
    }
}

use crate::config::default_clip_file_name;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the in-progress take is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// File name of the capture, overwritten by every new take.
    #[serde(default = "default_clip_file_name")]
    pub file_name: String,
    /// Directory holding the capture file. Empty or omitted means the
    /// platform data directory.
    #[serde(default)]
    pub directory: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            file_name: default_clip_file_name(),
            directory: PathBuf::new(),
        }
    }
}

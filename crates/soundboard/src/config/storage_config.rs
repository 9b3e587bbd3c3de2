use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Saved recordings location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the recording store. Empty or omitted means
    /// `<data dir>/recordings`.
    #[serde(default)]
    pub directory: PathBuf,
}

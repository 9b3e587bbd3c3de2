mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod playback_config;
mod storage_config;

pub(crate) use {
    capture_config::CaptureConfig, config::Config, playback_config::PlaybackConfig,
    storage_config::StorageConfig,
};

pub(crate) const DEFAULT_CLIP_FILE_NAME: &str = "audio.wav";
pub(crate) const RECORDINGS_DIR_NAME: &str = "recordings";

pub(crate) fn default_clip_file_name() -> String {
    DEFAULT_CLIP_FILE_NAME.to_string()
}

pub(crate) fn default_volume() -> f32 {
    soundboard_core::DEFAULT_VOLUME
}

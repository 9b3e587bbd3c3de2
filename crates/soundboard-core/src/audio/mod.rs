mod capture;
mod duration;
mod playback;

#[cfg(test)]
pub(crate) use {
    capture::{MAX_CAPTURE_SAMPLES, append_capped, write_wav},
    playback::{decode_wav, fill_output},
};

pub use {
    capture::{AudioCapture, CaptureHandle, CapturedClip, CpalCapture},
    duration::clip_duration_seconds,
    playback::{AudioPlayback, CpalPlayback, PlaybackSource},
};

use crate::{CoreResult, DEFAULT_VOLUME, SessionError};

use std::{
    io::{Cursor, Read},
    panic::Location,
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU32, Ordering},
    },
};

use cpal::{
    BufferSize, Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavReader};
use tracing::{debug, error, info, instrument};

/// Audio handed to [`AudioPlayback::play`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackSource {
    /// A clip on disk, e.g. the capture that just finished.
    File(PathBuf),
    /// An in-memory blob, e.g. a saved recording's audio data.
    Bytes(Vec<u8>),
}

/// Speaker playback collaborator.
pub trait AudioPlayback {
    /// Start playing `source` at `volume`, replacing any clip still playing.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackFailure` if the audio cannot be decoded or the
    /// output device cannot be opened.
    fn play(&mut self, source: PlaybackSource, volume: f32) -> CoreResult<()>;

    /// Change the volume of the clip currently playing, if any.
    fn set_volume(&mut self, volume: f32);

    /// Stop playback and release the output device.
    fn stop(&mut self);
}

/// Interleaved float samples decoded from a WAV container.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DecodedClip {
    pub(crate) samples: Vec<f32>,
    pub(crate) channels: u16,
    pub(crate) sample_rate: u32,
}

/// [`AudioPlayback`] backed by the default cpal output device.
pub struct CpalPlayback {
    device: Device,
    stream: Option<Stream>,
    /// `f32` gain stored as bits so the audio callback can read it lock-free.
    volume: Arc<AtomicU32>,
    /// Set by the audio callback once the last sample has been written.
    finished: Arc<AtomicBool>,
}

impl CpalPlayback {
    /// Open the default output device.
    ///
    /// # Errors
    ///
    /// Returns `PlaybackFailure` if no output device is available.
    #[track_caller]
    #[instrument]
    pub fn new() -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or(SessionError::PlaybackFailure {
                reason: "No output device found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(device_id = ?device.id(), "CpalPlayback initialized");

        Ok(Self {
            device,
            stream: None,
            volume: Arc::new(AtomicU32::new(DEFAULT_VOLUME.to_bits())),
            finished: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Whether a clip is still being played.
    ///
    /// False once the last sample has been written, even before the stream
    /// is released.
    pub fn is_playing(&self) -> bool {
        self.stream.is_some() && !self.finished.load(Ordering::Acquire)
    }

    /// Drop the output stream if its clip has played to the end.
    ///
    /// Returns whether a stream was released. `set_volume` calls this, and
    /// `play` and `stop` release the stream unconditionally.
    pub fn release_if_finished(&mut self) -> bool {
        if self.stream.is_some() && self.finished.load(Ordering::Acquire) {
            self.stream = None;
            debug!("Finished playback released");
            return true;
        }
        false
    }
}

impl AudioPlayback for CpalPlayback {
    #[track_caller]
    #[instrument(skip(self, source))]
    fn play(&mut self, source: PlaybackSource, volume: f32) -> CoreResult<()> {
        let clip = decode_wav(source)?;

        // Release the previous clip before opening a new stream.
        self.stop();
        self.volume.store(volume.to_bits(), Ordering::Release);
        self.finished.store(false, Ordering::Release);

        let config = StreamConfig {
            channels: clip.channels,
            sample_rate: clip.sample_rate,
            buffer_size: BufferSize::Default,
        };

        let sample_count = clip.samples.len();
        let samples = clip.samples;
        let gain = Arc::clone(&self.volume);
        let finished = Arc::clone(&self.finished);
        let mut position = 0usize;

        let stream = self
            .device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let gain = f32::from_bits(gain.load(Ordering::Acquire));
                    if fill_output(data, &samples, &mut position, gain) {
                        finished.store(true, Ordering::Release);
                    }
                },
                |err| {
                    error!("Output stream error: {}", err);
                },
                None,
            )
            .map_err(|e| SessionError::PlaybackFailure {
                reason: format!("Failed to build output stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| SessionError::PlaybackFailure {
            reason: format!("Failed to start output stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.stream = Some(stream);

        info!(
            sample_count,
            sample_rate = clip.sample_rate,
            channels = clip.channels,
            volume,
            "Playback started"
        );

        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.release_if_finished();
        self.volume.store(volume.to_bits(), Ordering::Release);
        debug!(volume, "Playback volume changed");
    }

    fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            debug!("Playback stopped");
        }
    }
}

/// Write `samples` from `position` into `out` at `gain`, padding with
/// silence past the end. Returns true once every sample has been written.
pub(crate) fn fill_output(out: &mut [f32], samples: &[f32], position: &mut usize, gain: f32) -> bool {
    for slot in out.iter_mut() {
        *slot = samples.get(*position).map_or(0.0, |s| s * gain);
        *position = position.saturating_add(1);
    }
    *position >= samples.len()
}

/// Decode a WAV clip from disk or memory into interleaved float samples.
#[track_caller]
pub(crate) fn decode_wav(source: PlaybackSource) -> CoreResult<DecodedClip> {
    match source {
        PlaybackSource::File(path) => {
            let reader = WavReader::open(&path).map_err(|e| SessionError::PlaybackFailure {
                reason: format!("Failed to open {:?}: {}", path, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            read_samples(reader)
        }
        PlaybackSource::Bytes(bytes) => {
            let reader =
                WavReader::new(Cursor::new(bytes)).map_err(|e| SessionError::PlaybackFailure {
                    reason: format!("Failed to parse audio data: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            read_samples(reader)
        }
    }
}

#[track_caller]
fn read_samples<R: Read>(reader: WavReader<R>) -> CoreResult<DecodedClip> {
    let spec = reader.spec();

    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>(),
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<Vec<_>, _>>()
        }
    }
    .map_err(|e| SessionError::PlaybackFailure {
        reason: format!("Failed to read audio samples: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(DecodedClip {
        samples,
        channels: spec.channels,
        sample_rate: spec.sample_rate,
    })
}

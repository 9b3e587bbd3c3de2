use crate::{CoreResult, SessionError};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        {Arc, Mutex},
    },
};

use cpal::{
    Device, Stream, StreamConfig,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Token for a capture in progress. Returned by
/// [`AudioCapture::start_capture`] and handed back to `stop_capture`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureHandle {
    id: Uuid,
    path: PathBuf,
}

impl CaptureHandle {
    /// Create a handle for a capture writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
        }
    }

    /// Unique id of this capture.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// File the capture is written to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A finished capture stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedClip {
    /// Location of the encoded audio.
    pub path: PathBuf,
}

/// Microphone capture collaborator.
///
/// Completion is reported synchronously: `stop_capture` returns only after
/// the device has stopped and the clip is on disk.
pub trait AudioCapture {
    /// Start capturing into `path`.
    ///
    /// # Errors
    ///
    /// Returns `CaptureFailure` if the device cannot be opened or a capture
    /// is already running.
    fn start_capture(&mut self, path: &Path) -> CoreResult<CaptureHandle>;

    /// Stop the capture identified by `handle` and release the device.
    ///
    /// # Errors
    ///
    /// Returns `CaptureFailure` if `handle` is not the running capture, no
    /// audio arrived, or the clip cannot be written.
    fn stop_capture(&mut self, handle: CaptureHandle) -> CoreResult<CapturedClip>;
}

/// Maximum samples buffered for one capture.
///
/// Once reached, the capture keeps its first samples and drops every later
/// buffer, so a take that runs past the limit is cut at the limit rather
/// than losing its start.
///
/// 48,000 Hz * 60 s * 5 min = 14.4M samples, ~58MB of `f32`. Multi-channel
/// input fills it proportionally faster.
pub(crate) const MAX_CAPTURE_SAMPLES: usize = 48_000 * 60 * 5;

struct ActiveCapture {
    handle: CaptureHandle,
    stream: Stream,
}

/// [`AudioCapture`] backed by the default cpal input device.
///
/// Samples are buffered in memory while recording and written to a 32-bit
/// float WAV file when the capture stops.
pub struct CpalCapture {
    device: Device,
    config: StreamConfig,
    active: Option<ActiveCapture>,
    samples: Arc<Mutex<Vec<f32>>>,
    /// Set before the stream is dropped so a late callback cannot append
    /// to a buffer that is being drained.
    shutdown: Arc<AtomicBool>,
}

impl CpalCapture {
    /// Open the default input device.
    ///
    /// # Errors
    ///
    /// Returns `CaptureFailure` if no input device or config is available.
    #[track_caller]
    #[instrument]
    pub fn new() -> CoreResult<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or(SessionError::CaptureFailure {
                reason: "No microphone found".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let config = device
            .default_input_config()
            .map_err(|e| SessionError::CaptureFailure {
                reason: format!("Failed to get input config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(
            device_id = ?device.id(),
            sample_rate = config.sample_rate(),
            channels = config.channels(),
            "CpalCapture initialized"
        );

        Ok(Self {
            device,
            config: config.into(),
            active: None,
            samples: Arc::new(Mutex::new(Vec::new())),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Whether a capture is currently running.
    pub fn is_capturing(&self) -> bool {
        self.active.is_some()
    }
}

impl AudioCapture for CpalCapture {
    #[track_caller]
    #[instrument(skip(self))]
    fn start_capture(&mut self, path: &Path) -> CoreResult<CaptureHandle> {
        if self.active.is_some() {
            return Err(SessionError::CaptureFailure {
                reason: "A capture is already running".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SessionError::CaptureFailure {
                reason: format!("Failed to create capture directory {:?}: {}", parent, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        }

        self.shutdown.store(false, Ordering::Release);
        self.samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();

        let samples = Arc::clone(&self.samples);
        let shutdown = Arc::clone(&self.shutdown);

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    let mut buf = samples.lock().unwrap_or_else(|e| {
                        error!("Sample buffer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    append_capped(&mut buf, data, MAX_CAPTURE_SAMPLES);
                },
                |err| {
                    error!("Input stream error: {}", err);
                },
                None,
            )
            .map_err(|e| SessionError::CaptureFailure {
                reason: format!("Failed to build input stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| SessionError::CaptureFailure {
            reason: format!("Failed to start input stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let handle = CaptureHandle::new(path);
        self.active = Some(ActiveCapture {
            handle: handle.clone(),
            stream,
        });

        info!(capture_id = %handle.id(), path = ?path, "Capture started");

        Ok(handle)
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn stop_capture(&mut self, handle: CaptureHandle) -> CoreResult<CapturedClip> {
        let active = match self.active.take() {
            Some(active) if active.handle == handle => active,
            other => {
                self.active = other;
                return Err(SessionError::CaptureFailure {
                    reason: format!("Capture {} is not running", handle.id()),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        self.shutdown.store(true, Ordering::Release);
        drop(active.stream);
        // Let any in-flight callback observe the shutdown flag.
        std::thread::sleep(std::time::Duration::from_millis(5));

        let samples = std::mem::take(&mut *self.samples.lock().unwrap_or_else(|e| e.into_inner()));

        debug!(sample_count = samples.len(), "Captured audio samples");

        if samples.len() >= MAX_CAPTURE_SAMPLES {
            warn!(
                max_samples = MAX_CAPTURE_SAMPLES,
                "Capture hit the sample limit, audio after it was dropped"
            );
        }

        if samples.is_empty() {
            return Err(SessionError::CaptureFailure {
                reason: "No audio captured".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        write_wav(
            handle.path(),
            &samples,
            self.config.channels,
            self.config.sample_rate,
        )?;

        info!(capture_id = %handle.id(), path = ?handle.path(), "Capture stopped");

        Ok(CapturedClip {
            path: handle.path().to_path_buf(),
        })
    }
}

/// Append as much of `data` as fits under `max` samples.
///
/// Returns the number of samples dropped.
pub(crate) fn append_capped(buf: &mut Vec<f32>, data: &[f32], max: usize) -> usize {
    let room = max.saturating_sub(buf.len());
    let take = data.len().min(room);
    buf.extend_from_slice(&data[..take]);
    data.len() - take
}

/// Write interleaved float samples to a WAV file.
#[track_caller]
pub(crate) fn write_wav(
    path: &Path,
    samples: &[f32],
    channels: u16,
    sample_rate: u32,
) -> CoreResult<()> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| SessionError::CaptureFailure {
        reason: format!("Failed to create WAV file {:?}: {}", path, e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| SessionError::CaptureFailure {
                reason: format!("Failed to write sample: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
    }

    writer.finalize().map_err(|e| SessionError::CaptureFailure {
        reason: format!("Failed to finalize WAV file: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(())
}

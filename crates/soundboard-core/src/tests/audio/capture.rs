use crate::{
    AudioCapture, CaptureHandle, CpalCapture, SessionError,
    audio::{MAX_CAPTURE_SAMPLES, append_capped, write_wav},
};

use std::path::Path;

use hound::{SampleFormat, WavReader};
use tempfile::TempDir;

/// WHAT: Each capture handle gets its own id
/// WHY: stop_capture matches handles by id
#[test]
fn given_same_path_when_creating_handles_then_ids_differ() {
    // Given/When: Two handles for the same path
    let a = CaptureHandle::new("audio.wav");
    let b = CaptureHandle::new("audio.wav");

    // Then: Same path, distinct ids
    assert_eq!(a.path(), b.path());
    assert_ne!(a.id(), b.id());
    assert_eq!(a.path(), Path::new("audio.wav"));
}

/// WHAT: Captured samples are written as 32-bit float WAV
/// WHY: Playback and the duration probe read this format back
#[test]
#[allow(clippy::unwrap_used)]
fn given_samples_when_writing_wav_then_header_and_samples_match() {
    // Given: A stereo buffer of 4 frames
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("clip.wav");
    let samples = [0.0, 0.25, -0.25, 0.5, -0.5, 0.75, 1.0, -1.0];

    // When: Writing it
    write_wav(&path, &samples, 2, 48_000).unwrap();

    // Then: Reader sees the same header and samples
    let reader = WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 48_000);
    assert_eq!(spec.bits_per_sample, 32);
    assert_eq!(spec.sample_format, SampleFormat::Float);
    assert_eq!(reader.duration(), 4);
    let read: Vec<f32> = reader.into_samples::<f32>().map(|s| s.unwrap()).collect();
    assert_eq!(read, samples);
}

/// WHAT: Writing into a missing directory fails with CaptureFailure
/// WHY: Write errors must surface as capture errors
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_directory_when_writing_wav_then_capture_failure() {
    // Given: A path under a directory that does not exist
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing").join("clip.wav");

    // When: Writing
    let result = write_wav(&path, &[0.0], 1, 44_100);

    // Then: CaptureFailure
    assert!(matches!(result, Err(SessionError::CaptureFailure { .. })));
}

/// WHAT: Buffers append whole while under the cap
/// WHY: Normal takes must not lose samples
#[test]
fn given_room_left_when_appending_then_all_samples_kept() {
    // Given: A buffer with room for the data
    let mut buf = vec![0.1; 4];

    // When: Appending three samples under a cap of ten
    let dropped = append_capped(&mut buf, &[0.2, 0.3, 0.4], 10);

    // Then: Nothing dropped
    assert_eq!(dropped, 0);
    assert_eq!(buf, vec![0.1, 0.1, 0.1, 0.1, 0.2, 0.3, 0.4]);
}

/// WHAT: Past the cap, the start of the take is kept and the rest dropped
/// WHY: A forgotten recording must not grow memory without bound
#[test]
fn given_buffer_near_cap_when_appending_then_truncated_at_cap() {
    // Given: A buffer two samples short of the cap
    let mut buf = vec![0.0; 8];

    // When: Appending five, then five more
    let first = append_capped(&mut buf, &[1.0, 2.0, 3.0, 4.0, 5.0], 10);
    let second = append_capped(&mut buf, &[6.0; 5], 10);

    // Then: Filled to the cap with the earliest new samples
    assert_eq!(first, 3);
    assert_eq!(second, 5);
    assert_eq!(buf.len(), 10);
    assert_eq!(&buf[8..], &[1.0, 2.0]);
}

/// WHAT: The capture cap covers five minutes of 48 kHz mono
/// WHY: Documented memory bound for the capture buffer
#[test]
fn given_capture_cap_when_inspected_then_five_minutes_at_48k() {
    assert_eq!(MAX_CAPTURE_SAMPLES, 14_400_000);
}

/// WHAT: Real capture records a short clip to disk
/// WHY: End-to-end check of the cpal input path
#[test]
#[ignore = "requires audio input hardware"]
#[allow(clippy::unwrap_used)]
fn given_input_device_when_capturing_then_clip_written() {
    // Given: The default input device
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("capture.wav");
    let mut capture = CpalCapture::new().unwrap();

    // When: Capturing for half a second
    let handle = capture.start_capture(&path).unwrap();
    assert!(capture.is_capturing());
    std::thread::sleep(std::time::Duration::from_millis(500));
    let clip = capture.stop_capture(handle).unwrap();

    // Then: Device released, clip on disk
    assert!(!capture.is_capturing());
    assert_eq!(clip.path, path);
    assert!(path.exists());
}

/// WHAT: A second start while capturing is refused
/// WHY: One capture at a time
#[test]
#[ignore = "requires audio input hardware"]
#[allow(clippy::unwrap_used)]
fn given_running_capture_when_starting_again_then_capture_failure() {
    // Given: A running capture
    let temp = TempDir::new().unwrap();
    let mut capture = CpalCapture::new().unwrap();
    let handle = capture.start_capture(&temp.path().join("a.wav")).unwrap();

    // When: Starting another
    let result = capture.start_capture(&temp.path().join("b.wav"));

    // Then: Refused, first capture still running
    assert!(matches!(result, Err(SessionError::CaptureFailure { .. })));
    assert!(capture.is_capturing());
    let _ = capture.stop_capture(handle);
}

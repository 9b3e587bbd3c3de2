use crate::{
    AudioPlayback, CpalPlayback, PlaybackSource, SessionError,
    audio::{decode_wav, fill_output},
    tests::write_test_wav,
};

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use tempfile::TempDir;

/// WHAT: File sources decode to the samples that were written
/// WHY: Playing the last capture reads it from disk
#[test]
#[allow(clippy::unwrap_used)]
fn given_wav_file_when_decoding_then_samples_and_format() {
    // Given: A 10-frame stereo clip at 22.05 kHz
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("clip.wav");
    write_test_wav(&path, 10, 2, 22_050);

    // When: Decoding from the file
    let clip = decode_wav(PlaybackSource::File(path)).unwrap();

    // Then: Format preserved, 20 interleaved samples
    assert_eq!(clip.channels, 2);
    assert_eq!(clip.sample_rate, 22_050);
    assert_eq!(clip.samples.len(), 20);
    assert!((clip.samples[1] - 0.001).abs() < 1e-6);
}

/// WHAT: Byte sources decode the same as files
/// WHY: Saved recordings are played from their audio data
#[test]
#[allow(clippy::unwrap_used)]
fn given_wav_bytes_when_decoding_then_same_as_file() {
    // Given: A clip on disk and its raw bytes
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("clip.wav");
    write_test_wav(&path, 8, 1, 8_000);
    let bytes = std::fs::read(&path).unwrap();

    // When: Decoding both ways
    let from_file = decode_wav(PlaybackSource::File(path)).unwrap();
    let from_bytes = decode_wav(PlaybackSource::Bytes(bytes)).unwrap();

    // Then: Identical
    assert_eq!(from_file, from_bytes);
}

/// WHAT: 16-bit integer WAV is scaled into [-1.0, 1.0)
/// WHY: Recordings may come from encoders other than ours
#[test]
#[allow(clippy::unwrap_used)]
fn given_int16_wav_when_decoding_then_scaled_to_unit_range() {
    // Given: A 16-bit mono clip with full-scale extremes
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8_000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for sample in [i16::MIN, 0, 16_384] {
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }

    // When: Decoding
    let clip = decode_wav(PlaybackSource::Bytes(cursor.into_inner())).unwrap();

    // Then: -1.0, 0.0, 0.5
    assert_eq!(clip.samples, vec![-1.0, 0.0, 0.5]);
}

/// WHAT: Non-WAV bytes fail with PlaybackFailure
/// WHY: Corrupt recordings must not reach the device
#[test]
fn given_garbage_bytes_when_decoding_then_playback_failure() {
    // Given: Bytes that are not a WAV container
    let bytes = b"not audio at all".to_vec();

    // When: Decoding
    let result = decode_wav(PlaybackSource::Bytes(bytes));

    // Then: PlaybackFailure
    assert!(matches!(result, Err(SessionError::PlaybackFailure { .. })));
}

/// WHAT: Missing files fail with PlaybackFailure
/// WHY: The last capture may have been removed externally
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_file_when_decoding_then_playback_failure() {
    // Given: A path that does not exist
    let temp = TempDir::new().unwrap();

    // When/Then: PlaybackFailure
    assert!(matches!(
        decode_wav(PlaybackSource::File(temp.path().join("gone.wav"))),
        Err(SessionError::PlaybackFailure { .. })
    ));
}

/// WHAT: Output buffers carry gain-scaled samples until the clip runs out
/// WHY: The device callback must not report completion early
#[test]
fn given_clip_longer_than_buffer_when_filling_then_not_finished() {
    // Given: Four samples and a two-slot output buffer
    let samples = [0.2, 0.4, 0.6, 0.8];
    let mut position = 0;
    let mut out = [9.0; 2];

    // When: Filling once at half gain
    let finished = fill_output(&mut out, &samples, &mut position, 0.5);

    // Then: Scaled samples, not finished
    assert!(!finished);
    assert_eq!(out, [0.1, 0.2]);
    assert_eq!(position, 2);
}

/// WHAT: Past the last sample the buffer is silence and completion is reported
/// WHY: Playback releases its stream once the clip has ended
#[test]
fn given_clip_ending_mid_buffer_when_filling_then_silence_and_finished() {
    // Given: Three samples and a four-slot output buffer
    let samples = [1.0, -1.0, 0.5];
    let mut position = 0;
    let mut out = [9.0; 4];

    // When: Filling at full gain, then again
    let first = fill_output(&mut out, &samples, &mut position, 1.0);
    let tail = out;
    let second = fill_output(&mut out, &samples, &mut position, 1.0);

    // Then: Padded with zeros, finished both times
    assert!(first);
    assert_eq!(tail, [1.0, -1.0, 0.5, 0.0]);
    assert!(second);
    assert_eq!(out, [0.0; 4]);
}

/// WHAT: Playback reports not playing after the clip ends and can be released
/// WHY: The output device is held only while audio is playing
#[test]
#[ignore = "requires audio output hardware"]
#[allow(clippy::unwrap_used)]
fn given_short_clip_when_it_ends_then_not_playing_and_released() {
    // Given: A 50 ms clip playing on the default device
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("blip.wav");
    write_test_wav(&path, 2_205, 1, 44_100);
    let mut playback = CpalPlayback::new().unwrap();
    playback.play(PlaybackSource::File(path), 0.2).unwrap();

    // When: Waiting well past its end
    std::thread::sleep(std::time::Duration::from_millis(500));

    // Then: Finished and released
    assert!(!playback.is_playing());
    assert!(playback.release_if_finished());
    assert!(!playback.release_if_finished());
}

/// WHAT: Real playback starts and stops on the output device
/// WHY: End-to-end check of the cpal output path
#[test]
#[ignore = "requires audio output hardware"]
#[allow(clippy::unwrap_used)]
fn given_output_device_when_playing_then_stream_active_until_stopped() {
    // Given: A short clip and the default output device
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("beep.wav");
    write_test_wav(&path, 4_410, 1, 44_100);
    let mut playback = CpalPlayback::new().unwrap();

    // When: Playing, then stopping
    playback.play(PlaybackSource::File(path), 0.2).unwrap();
    assert!(playback.is_playing());
    playback.set_volume(0.1);
    playback.stop();

    // Then: Stream released
    assert!(!playback.is_playing());
}

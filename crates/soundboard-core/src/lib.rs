//! SoundBoard Core Library
//!
//! Record short clips, name and store them, list and play them back.
//! The [`RecordingSession`] state machine is independent of any audio device;
//! [`SoundBoard`] wires it to capture, playback and a [`RecordingStore`].
//!
//! # Example
//!
//! ```no_run
//! use soundboard_core::{CoreResult, CpalCapture, CpalPlayback, FileStore, SoundBoard};
//!
//! use std::{sync::Arc, thread::sleep, time::Duration};
//!
//! fn main() -> CoreResult<()> {
//!     let store = Arc::new(FileStore::open("recordings")?);
//!     let mut board = SoundBoard::new(CpalCapture::new()?, CpalPlayback::new()?, store, "audio.wav");
//!
//!     board.start_recording()?;
//!     for _ in 0..3 {
//!         sleep(Duration::from_secs(1));
//!         println!("{}", board.tick());
//!     }
//!     board.stop_recording()?;
//!
//!     let recording = board.save_last("First take")?;
//!     println!("Saved {}", recording.label());
//!     Ok(())
//! }
//! ```

mod audio;
mod board;
mod error;
mod session;
mod store;

pub use {
    audio::{
        AudioCapture, AudioPlayback, CaptureHandle, CapturedClip, CpalCapture, CpalPlayback,
        PlaybackSource, clip_duration_seconds,
    },
    board::SoundBoard,
    error::{Result as CoreResult, SessionError},
    session::{DEFAULT_VOLUME, RecordingSession, SessionState, VolumeCheck, format_elapsed},
    store::{FileStore, MemoryStore, Recording, RecordingStore},
};

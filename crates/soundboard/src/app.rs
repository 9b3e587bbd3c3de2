use crate::{AppCommand, AppError, AppResult};

use std::{io::Write, panic::Location, time::Duration};

use error_location::ErrorLocation;
use soundboard_core::{
    AudioCapture, AudioPlayback, Recording, RecordingStore, SessionState, SoundBoard,
};
use tokio::{
    sync::mpsc,
    time::{MissedTickBehavior, interval},
};
use tracing::{error, info, instrument, warn};

/// Interval between elapsed-time updates while recording.
pub(crate) const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Whether the event loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Exit,
}

/// Main application state.
///
/// Owns the [`SoundBoard`] and drives it from console commands and a
/// one-second ticker. User-facing output goes to `out`.
pub struct App<C, P, S, W> {
    pub(crate) board: SoundBoard<C, P, S>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) out: W,
    /// Recordings as last printed; list positions index into this.
    pub(crate) listing: Vec<Recording>,
}

impl<C, P, S, W> App<C, P, S, W>
where
    C: AudioCapture,
    P: AudioPlayback,
    S: RecordingStore,
    W: Write,
{
    /// Create an app around a board and a command receiver.
    pub fn new(board: SoundBoard<C, P, S>, command_rx: mpsc::Receiver<AppCommand>, out: W) -> Self {
        Self {
            board,
            command_rx,
            out,
            listing: Vec::new(),
        }
    }

    /// Run the main application event loop.
    ///
    /// Returns after `Shutdown` or when every command sender is dropped.
    /// A recording still in progress is stopped on the way out.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("SoundBoard starting");

        let result = self.event_loop().await;

        self.shutdown();
        info!("SoundBoard shut down successfully");

        result
    }

    async fn event_loop(&mut self) -> AppResult<()> {
        writeln!(self.out, "{}", crate::console::HELP)?;

        let mut ticker = interval(TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    let Some(command) = command else {
                        info!("Command channel closed, shutting down");
                        break;
                    };
                    let was_recording = self.board.is_recording();
                    match self.handle_command(command) {
                        Ok(Flow::Exit) => {
                            info!("Shutdown requested");
                            break;
                        }
                        Ok(Flow::Continue) => {}
                        Err(e) => {
                            error!(error = ?e, "Command failed");
                            writeln!(self.out, "Error: {}", e)?;
                        }
                    }
                    if !was_recording && self.board.is_recording() {
                        ticker.reset();
                    }
                }

                _ = ticker.tick(), if self.board.is_recording() => {
                    let elapsed = self.board.tick();
                    info!(elapsed = %elapsed, "Recording");
                    writeln!(self.out, "{}", elapsed)?;
                }
            }
        }

        Ok(())
    }

    /// Apply one command to the board.
    ///
    /// # Errors
    ///
    /// Returns `Session` for board failures, `InvalidCommand` for list
    /// positions outside the last list, or `IoError` if output fails.
    #[instrument(skip(self))]
    pub(crate) fn handle_command(&mut self, command: AppCommand) -> AppResult<Flow> {
        match command {
            AppCommand::ToggleRecording => match self.board.toggle_recording()? {
                SessionState::Recording => {
                    writeln!(self.out, "Recording... {}", self.board.session().format_elapsed())?;
                }
                state => {
                    writeln!(
                        self.out,
                        "{} at {}",
                        state,
                        self.board.session().format_elapsed()
                    )?;
                }
            },
            AppCommand::PlayLast => {
                self.board.play_last()?;
                writeln!(self.out, "Playing last take")?;
            }
            AppCommand::SetVolume(volume) => {
                let check = self.board.set_volume(volume)?;
                if let Some(message) = check.warning() {
                    warn!(volume, "{}", message);
                    writeln!(self.out, "{}", message)?;
                }
                writeln!(self.out, "Volume {:.2}", volume)?;
            }
            AppCommand::Save(name) => {
                let recording = self.board.save_last(&name)?;
                writeln!(self.out, "Saved {}", recording.label())?;
            }
            AppCommand::List => {
                self.listing = self.board.recordings()?;
                self.print_listing()?;
            }
            AppCommand::PlaySaved(position) => {
                let recording = self.select(position)?.clone();
                self.board.play_recording(&recording)?;
                writeln!(self.out, "Playing {}", recording.label())?;
            }
            AppCommand::Delete(position) => {
                let id = self.select(position)?.id();
                self.listing = self.board.delete_recording(id)?;
                self.print_listing()?;
            }
            AppCommand::Shutdown => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }

    #[track_caller]
    fn select(&self, position: usize) -> AppResult<&Recording> {
        position
            .checked_sub(1)
            .and_then(|index| self.listing.get(index))
            .ok_or_else(|| AppError::InvalidCommand {
                reason: format!(
                    "no recording #{} in the last list ({} shown); run 'list' first",
                    position,
                    self.listing.len()
                ),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    fn print_listing(&mut self) -> AppResult<()> {
        if self.listing.is_empty() {
            writeln!(self.out, "No saved recordings")?;
            return Ok(());
        }
        for (index, recording) in self.listing.iter().enumerate() {
            writeln!(self.out, "{:>3}. {}", index + 1, recording.label())?;
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.board.is_recording() {
            match self.board.stop_recording() {
                Ok(clip) => info!(path = ?clip.path, "Recording stopped on shutdown"),
                Err(e) => warn!(error = ?e, "Failed to stop recording on shutdown"),
            }
        }
        self.board.stop_playback();
    }
}

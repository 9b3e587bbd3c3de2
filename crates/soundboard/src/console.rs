//! Line-oriented console input.
//!
//! Reads commands from stdin on a blocking thread and forwards them to the
//! application over an async channel. One command per line:
//!
//! ```text
//! record          start or stop recording
//! play            play the last take
//! play <n>        play saved recording <n> from the last list
//! volume <v>      set playback volume, 0.0 to 1.0
//! save [name]     save the last take
//! list            list saved recordings
//! delete <n>      delete saved recording <n> from the last list
//! quit            exit
//! ```

use crate::{AppCommand, AppError, AppResult};

use std::{
    io::{self, BufRead},
    panic::Location,
};

use error_location::ErrorLocation;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

/// Usage line logged after an unparseable command.
pub(crate) const HELP: &str = "Commands: record | play [n] | volume <0.0-1.0> | save [name] | list | delete <n> | quit";

/// Parse one console line.
///
/// Returns `Ok(None)` for blank lines.
///
/// # Errors
///
/// Returns `InvalidCommand` for unknown verbs or malformed arguments.
#[track_caller]
pub(crate) fn parse_command(line: &str) -> AppResult<Option<AppCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "record" | "r" => AppCommand::ToggleRecording,
        "play" | "p" if rest.is_empty() => AppCommand::PlayLast,
        "play" | "p" => AppCommand::PlaySaved(parse_position(rest)?),
        "volume" | "v" => {
            let volume = rest.parse::<f32>().map_err(|e| AppError::InvalidCommand {
                reason: format!("'{}' is not a volume: {}", rest, e),
                location: ErrorLocation::from(Location::caller()),
            })?;
            AppCommand::SetVolume(volume)
        }
        "save" | "s" => AppCommand::Save(rest.to_string()),
        "list" | "ls" => AppCommand::List,
        "delete" | "rm" => AppCommand::Delete(parse_position(rest)?),
        "quit" | "exit" | "q" => AppCommand::Shutdown,
        other => {
            return Err(AppError::InvalidCommand {
                reason: format!("unknown command '{}'", other),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    Ok(Some(command))
}

#[track_caller]
fn parse_position(arg: &str) -> AppResult<usize> {
    match arg.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err(AppError::InvalidCommand {
            reason: format!("'{}' is not a list position (1, 2, ...)", arg),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

/// Forward parsed lines from `reader` until `quit`, end of input or a
/// closed channel.
///
/// Lines that are not UTF-8 or do not parse are logged and skipped. End of
/// input and read errors are both reported as `Shutdown`.
///
/// Blocks; call from a blocking thread.
///
/// # Errors
///
/// Returns `ChannelSendFailed` if the application stopped listening.
#[track_caller]
pub(crate) fn forward_lines<R: BufRead>(
    mut reader: R,
    command_tx: &mpsc::Sender<AppCommand>,
) -> AppResult<()> {
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(error = %e, "Console read failed");
                break;
            }
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Skipping console line that is not UTF-8");
                continue;
            }
        };

        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                warn!(error = %e, "{}", HELP);
                continue;
            }
        };

        debug!(command = ?command, "Console command");

        let is_shutdown = command == AppCommand::Shutdown;
        send(command_tx, command)?;
        if is_shutdown {
            return Ok(());
        }
    }

    info!("Console input closed");
    send(command_tx, AppCommand::Shutdown)
}

#[track_caller]
fn send(command_tx: &mpsc::Sender<AppCommand>, command: AppCommand) -> AppResult<()> {
    command_tx
        .blocking_send(command)
        .map_err(|e| AppError::ChannelSendFailed {
            message: format!("Failed to send {:?}: {}", e.0, e),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Spawn the stdin forwarder on the runtime's blocking pool.
///
/// The task ends after `quit`, at end of input, or on the first line read
/// after the receiver is dropped.
pub(crate) fn spawn_stdin_forwarder(command_tx: mpsc::Sender<AppCommand>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        if let Err(e) = forward_lines(stdin.lock(), &command_tx) {
            debug!(error = ?e, "Console forwarder stopped");
        }
    })
}

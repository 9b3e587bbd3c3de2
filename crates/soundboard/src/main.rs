//! SoundBoard: record, name, list and play back short audio clips from the
//! console.

mod app;
mod app_command;
mod config;
mod console;
mod error;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use std::{io, sync::Arc, time::Duration};

use soundboard_core::{CpalCapture, CpalPlayback, FileStore, SoundBoard};
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "soundboard=info,soundboard_core=info";

/// Grace period for the stdin forwarder after the app loop exits.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

/// Application entry point.
fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Config validation failed: {:?}", e);
        std::process::exit(1);
    }

    // cpal streams are !Send on some hosts, so the board stays on one thread.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(run(config));

    // A forwarder blocked in stdin read cannot be joined.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    if let Err(e) = result {
        error!(error = ?e, "App error");
        std::process::exit(1);
    }
}

#[instrument(skip(config))]
async fn run(config: Config) -> AppResult<()> {
    let capture = CpalCapture::new()?;
    let playback = CpalPlayback::new()?;
    let store = Arc::new(FileStore::open(&config.storage.directory)?);

    let mut board = SoundBoard::new(capture, playback, store, config.clip_path());
    if let Some(message) = board.set_volume(config.playback.default_volume)?.warning() {
        warn!(volume = config.playback.default_volume, "{}", message);
    }

    info!(
        clip_path = ?board.clip_path(),
        store = ?config.storage.directory,
        volume = config.playback.default_volume,
        "SoundBoard ready"
    );

    let (command_tx, command_rx) = mpsc::channel(32);
    let _forwarder = console::spawn_stdin_forwarder(command_tx);

    App::new(board, command_rx, io::stdout()).run().await
}

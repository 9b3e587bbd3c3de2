/// Commands sent from the console reader to the main application.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Start recording when idle or stopped, stop when recording.
    ToggleRecording,
    /// Play the take that just finished.
    PlayLast,
    /// Change the playback volume.
    SetVolume(f32),
    /// Save the finished take under a name (may be empty).
    Save(String),
    /// Print the saved recordings.
    List,
    /// Play a saved recording by its 1-based position in the last list.
    PlaySaved(usize),
    /// Delete a saved recording by its 1-based position in the last list.
    Delete(usize),
    /// Request application shutdown.
    Shutdown,
}

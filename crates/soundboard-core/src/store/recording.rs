use uuid::Uuid;

/// Label shown for recordings saved without a name.
const UNTITLED: &str = "Untitled";

/// A saved recording. Immutable once created by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    id: Uuid,
    name: String,
    audio_data: Vec<u8>,
    duration_secs: f64,
}

impl Recording {
    pub(crate) fn new(id: Uuid, name: String, audio_data: Vec<u8>, duration_secs: f64) -> Self {
        Self {
            id,
            name,
            audio_data,
            duration_secs,
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// User-supplied label; may be empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque encoded audio.
    pub fn audio_data(&self) -> &[u8] {
        &self.audio_data
    }

    /// Length in seconds, computed once at save time.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// List label, e.g. `"Birdsong - 3.25 seconds"`.
    pub fn label(&self) -> String {
        let name = if self.name.is_empty() {
            UNTITLED
        } else {
            &self.name
        };
        format!("{} - {:.2} seconds", name, self.duration_secs)
    }
}

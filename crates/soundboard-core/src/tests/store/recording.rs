use crate::{MemoryStore, RecordingStore};

/// WHAT: Labels show the name and the duration with two decimals
/// WHY: The list row format from the recordings screen
#[test]
#[allow(clippy::unwrap_used)]
fn given_named_recording_when_labelling_then_name_and_seconds() {
    // Given: A saved named recording
    let store = MemoryStore::new();
    let recording = store.save("Birdsong", vec![1, 2, 3], 3.254).unwrap();

    // When: Building the label
    let label = recording.label();

    // Then: Two-decimal seconds
    assert_eq!(label, "Birdsong - 3.25 seconds");
}

/// WHAT: Empty names are labelled Untitled
/// WHY: Names are optional when saving
#[test]
#[allow(clippy::unwrap_used)]
fn given_unnamed_recording_when_labelling_then_untitled() {
    // Given: A recording saved with an empty name
    let store = MemoryStore::new();
    let recording = store.save("", vec![0], 0.0).unwrap();

    // When/Then: Placeholder name is used
    assert_eq!(recording.name(), "");
    assert_eq!(recording.label(), "Untitled - 0.00 seconds");
}

use crate::{RecordingSession, SessionError, SessionState};

/// WHAT: A new session is Idle with nothing counted
/// WHY: Idle is the only valid initial state
#[test]
fn given_new_session_when_inspected_then_idle_at_zero() {
    // Given/When: A freshly created session
    let session = RecordingSession::new();

    // Then: Idle, zero elapsed, default volume, no take yet
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.elapsed_secs(), 0);
    assert!((session.volume() - 0.5).abs() < f32::EPSILON);
    assert!(session.take_id().is_none());
}

/// WHAT: start() from Idle enters Recording with zero elapsed
/// WHY: Every take must begin counting from zero
#[test]
#[allow(clippy::unwrap_used)]
fn given_idle_session_when_starting_then_recording_at_zero() {
    // Given: An idle session
    let mut session = RecordingSession::new();

    // When: Starting
    session.start().unwrap();

    // Then: Recording, elapsed reset, take id assigned
    assert_eq!(session.state(), SessionState::Recording);
    assert_eq!(session.elapsed_secs(), 0);
    assert!(session.take_id().is_some());
}

/// WHAT: N ticks while recording yield N elapsed seconds
/// WHY: The timer is the only source of elapsed time
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_session_when_ticking_n_times_then_elapsed_is_n() {
    // Given: A recording session
    let mut session = RecordingSession::new();
    session.start().unwrap();

    // When: Ticking 42 times
    let mut last = 0;
    for _ in 0..42 {
        last = session.tick();
    }

    // Then: Counter and last returned value both read 42
    assert_eq!(session.elapsed_secs(), 42);
    assert_eq!(last, 42);
}

/// WHAT: start, 10 ticks, stop leaves 10 seconds frozen
/// WHY: Elapsed time must only change while recording
#[test]
#[allow(clippy::unwrap_used)]
fn given_stopped_session_when_ticking_then_elapsed_frozen() {
    // Given: A take of 10 seconds that has been stopped
    let mut session = RecordingSession::new();
    session.start().unwrap();
    for _ in 0..10 {
        session.tick();
    }
    let frozen = session.stop().unwrap();

    // When: A late timer keeps firing
    for _ in 0..5 {
        session.tick();
    }

    // Then: Elapsed stays at 10
    assert_eq!(frozen, 10);
    assert_eq!(session.state(), SessionState::Stopped);
    assert_eq!(session.elapsed_secs(), 10);
    assert_eq!(session.format_elapsed(), "00:10");
}

/// WHAT: Restarting a stopped session resets elapsed and issues a new take id
/// WHY: The session is reusable with no terminal state
#[test]
#[allow(clippy::unwrap_used)]
fn given_stopped_session_when_starting_again_then_elapsed_resets() {
    // Given: A stopped session with elapsed time
    let mut session = RecordingSession::new();
    session.start().unwrap();
    session.tick();
    session.tick();
    session.stop().unwrap();
    let first_take = session.take_id();

    // When: Starting again
    session.start().unwrap();

    // Then: Recording from zero under a new take id
    assert_eq!(session.state(), SessionState::Recording);
    assert_eq!(session.elapsed_secs(), 0);
    assert_ne!(session.take_id(), first_take);
}

/// WHAT: Ticks before the first start do nothing
/// WHY: An idle session has no take to time
#[test]
fn given_idle_session_when_ticking_then_elapsed_unchanged() {
    // Given: An idle session
    let mut session = RecordingSession::new();

    // When: Ticking
    let value = session.tick();

    // Then: Still zero and still idle
    assert_eq!(value, 0);
    assert_eq!(session.state(), SessionState::Idle);
}

/// WHAT: stop() from Idle is rejected
/// WHY: There is no take to stop
#[test]
fn given_idle_session_when_stopping_then_invalid_transition() {
    // Given: An idle session
    let mut session = RecordingSession::new();

    // When: Stopping
    let result = session.stop();

    // Then: InvalidTransition from Idle, state untouched
    assert!(matches!(
        result,
        Err(SessionError::InvalidTransition {
            from: SessionState::Idle,
            ..
        })
    ));
    assert_eq!(session.state(), SessionState::Idle);
}

/// WHAT: stop() twice is rejected the second time
/// WHY: Stopped only leaves via start()
#[test]
#[allow(clippy::unwrap_used)]
fn given_stopped_session_when_stopping_again_then_invalid_transition() {
    // Given: A stopped session
    let mut session = RecordingSession::new();
    session.start().unwrap();
    session.stop().unwrap();

    // When: Stopping again
    let result = session.stop();

    // Then: InvalidTransition from Stopped
    assert!(matches!(
        result,
        Err(SessionError::InvalidTransition {
            from: SessionState::Stopped,
            ..
        })
    ));
}

/// WHAT: start() while recording is rejected and keeps the running count
/// WHY: A second start must not silently reset an in-progress take
#[test]
#[allow(clippy::unwrap_used)]
fn given_recording_session_when_starting_again_then_invalid_transition() {
    // Given: A recording session 3 seconds in
    let mut session = RecordingSession::new();
    session.start().unwrap();
    for _ in 0..3 {
        session.tick();
    }
    let take = session.take_id();

    // When: Starting again
    let result = session.start();

    // Then: Rejected, count and take unchanged
    assert!(matches!(
        result,
        Err(SessionError::InvalidTransition {
            from: SessionState::Recording,
            ..
        })
    ));
    assert_eq!(session.elapsed_secs(), 3);
    assert_eq!(session.take_id(), take);
}

/// WHAT: Transition errors name the attempted action and state
/// WHY: The application logs these messages verbatim
#[test]
fn given_invalid_transition_when_displayed_then_mentions_action_and_state() {
    // Given: A rejected stop from Idle
    let mut session = RecordingSession::new();

    // When: Formatting the error
    let message = match session.stop() {
        Err(e) => e.to_string(),
        Ok(_) => String::new(),
    };

    // Then: Message reads naturally
    assert!(message.starts_with("Cannot stop recording while idle"));
}

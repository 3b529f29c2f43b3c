//! Tests for workflow mode: linear progression with delayed auto-advance

use docker_tutor::config::TutorConfig;
use docker_tutor::guided::{HintPolicy, StepSequence, WorkflowSession};
use docker_tutor::{Outcome, Step};
use std::time::Duration;
use tokio::time::sleep;

fn steps(commands: &[&str]) -> StepSequence {
    StepSequence::new(
        commands
            .iter()
            .map(|cmd| Step::new(*cmd, format!("output of {cmd}")).unwrap())
            .collect(),
    )
    .unwrap()
}

fn three_step_session() -> WorkflowSession {
    WorkflowSession::new(
        steps(&["docker pull nginx", "docker run -d nginx", "docker ps"]),
        &TutorConfig::default(),
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_linear_advancement_and_completion() {
    let session = three_step_session();
    assert_eq!(session.current().unwrap().expected_input, "docker pull nginx");

    let result = session.submit("docker pull nginx").unwrap();
    assert_eq!(result.outcome, Outcome::Correct);
    assert!(result.advance_scheduled);
    assert!(!result.completed);
    assert_eq!(session.position(), 0);

    // The learner reads the output for the full delay before the prompt changes
    sleep(Duration::from_millis(999)).await;
    assert_eq!(session.position(), 0);
    sleep(Duration::from_millis(2)).await;
    assert_eq!(session.position(), 1);
    assert_eq!(session.current().unwrap().expected_input, "docker run -d nginx");

    session.submit("docker run -d nginx").unwrap();
    sleep(Duration::from_millis(1001)).await;
    assert_eq!(session.position(), 2);
    assert!(!session.is_complete());

    let last = session.submit("docker ps").unwrap();
    assert!(last.completed);
    assert!(!last.advance_scheduled);
    assert!(session.is_complete());

    // Completion is terminal: nothing moves past the last step
    sleep(Duration::from_millis(5000)).await;
    assert_eq!(session.position(), 2);
    assert_eq!(session.current().unwrap().expected_input, "docker ps");
    assert!(session.is_complete());
}

#[tokio::test(start_paused = true)]
async fn test_incorrect_submission_only_logs() {
    let session = three_step_session();

    let result = session.submit("docker pul nginx").unwrap();
    assert_eq!(result.outcome, Outcome::Incorrect);
    assert!(!result.advance_scheduled);
    // Workflow mode reveals the whole command by default
    assert!(result.feedback.contains("docker pull nginx"));

    sleep(Duration::from_millis(3000)).await;
    assert_eq!(session.position(), 0);
    assert_eq!(session.entries().len(), 1);
    assert!(!session.is_complete());
}

#[tokio::test(start_paused = true)]
async fn test_empty_input_is_a_noop() {
    let session = three_step_session();
    session.submit("docker pull nginx").unwrap();
    let before = session.snapshot();

    assert!(session.submit("").is_none());
    assert!(session.submit("   \t  ").is_none());

    let after = session.snapshot();
    assert_eq!(after.position, before.position);
    assert_eq!(after.entries.len(), before.entries.len());
    assert_eq!(after.is_complete, before.is_complete);
}

#[tokio::test(start_paused = true)]
async fn test_transcript_is_append_only() {
    let session = three_step_session();
    let inputs = ["docker pul nginx", "docker pull nginx", "  docker pull nginx  "];

    let mut seen = Vec::new();
    for (n, input) in inputs.iter().enumerate() {
        session.submit(input).unwrap();
        let entries = session.entries();
        assert_eq!(entries.len(), n + 1);
        // Earlier entries never change
        assert_eq!(&entries[..seen.len()], seen.as_slice());
        seen = entries;
    }

    assert_eq!(seen[0].outcome, Outcome::Incorrect);
    assert_eq!(seen[1].outcome, Outcome::Correct);
    // Input is logged as typed, but judged trimmed
    assert_eq!(seen[2].input, "  docker pull nginx  ");
    assert_eq!(seen[2].outcome, Outcome::Correct);
}

#[tokio::test(start_paused = true)]
async fn test_reset_restores_initial_state_and_cancels_advance() {
    let session = three_step_session();
    session.submit("docker pull nginx").unwrap();
    sleep(Duration::from_millis(1001)).await;
    session.submit("docker run -d nginx").unwrap();
    assert!(session.snapshot().pending_advance);

    // Reset inside the delay window
    sleep(Duration::from_millis(500)).await;
    session.reset();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.position, 0);
    assert!(snapshot.entries.is_empty());
    assert!(!snapshot.is_complete);
    assert!(!snapshot.pending_advance);

    // The advance scheduled before the reset must never fire
    sleep(Duration::from_millis(3000)).await;
    assert_eq!(session.position(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_reset_after_completion() {
    let session = WorkflowSession::new(steps(&["docker ps"]), &TutorConfig::default()).unwrap();
    assert!(session.submit("docker ps").unwrap().completed);
    assert!(session.is_complete());

    session.reset();
    assert!(!session.is_complete());
    assert_eq!(session.position(), 0);
    assert!(session.entries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_resubmitting_after_completion_appends_duplicates() {
    let session = WorkflowSession::new(steps(&["docker ps"]), &TutorConfig::default()).unwrap();
    session.submit("docker ps").unwrap();
    let again = session.submit("docker ps").unwrap();

    assert!(again.completed);
    assert_eq!(session.entries().len(), 2);
    assert!(session.is_complete());

    // A wrong answer after completion is logged but does not undo completion
    session.submit("docker pss").unwrap();
    assert!(session.is_complete());
    assert_eq!(session.entries().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_delayed_advance() {
    let session = three_step_session();
    let mut updates = session.subscribe();

    session.submit("docker pull nginx").unwrap();
    updates.changed().await.unwrap();
    {
        let snapshot = updates.borrow_and_update();
        assert_eq!(snapshot.position, 0);
        assert_eq!(snapshot.entries.len(), 1);
        assert!(snapshot.pending_advance);
    }

    updates.changed().await.unwrap();
    let snapshot = updates.borrow_and_update().clone();
    assert_eq!(snapshot.position, 1);
    assert!(!snapshot.pending_advance);
}

#[tokio::test(start_paused = true)]
async fn test_replace_steps_cancels_pending_advance() {
    let session = three_step_session();
    session.submit("docker pull nginx").unwrap();

    session.replace_steps(steps(&["docker compose up -d", "docker compose down"]));
    sleep(Duration::from_millis(2000)).await;

    assert_eq!(session.position(), 0);
    assert!(session.entries().is_empty());
    assert_eq!(session.current().unwrap().expected_input, "docker compose up -d");
}

#[tokio::test(start_paused = true)]
async fn test_custom_delay_and_hint_policy() {
    let config = TutorConfig {
        auto_advance_delay: Duration::from_millis(250),
        workflow_hint: HintPolicy::Hidden,
        ..Default::default()
    };
    let session = WorkflowSession::new(steps(&["docker pull redis", "docker run redis"]), &config)
        .unwrap();

    let wrong = session.submit("docker pull").unwrap();
    assert!(!wrong.feedback.contains("redis"));

    session.submit("docker pull redis").unwrap();
    sleep(Duration::from_millis(251)).await;
    assert_eq!(session.position(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_advance_message_is_returned_once() {
    let sequence = StepSequence::new(vec![
        Step::new("docker pull nginx", "pulled")
            .unwrap()
            .with_advance_message("Now run it."),
        Step::new("docker run nginx", "running").unwrap(),
    ])
    .unwrap();
    let session = WorkflowSession::new(sequence, &TutorConfig::default()).unwrap();

    let wrong = session.submit("docker pul nginx").unwrap();
    assert!(wrong.advance_message.is_none());

    let right = session.submit("docker pull nginx").unwrap();
    assert_eq!(right.advance_message.as_deref(), Some("Now run it."));
    // The banner is not part of the persisted transcript
    assert_eq!(session.entries()[1].display_output, "pulled");
}

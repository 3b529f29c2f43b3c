//! Workflow mode: one fixed path of steps with delayed auto-advance.
//!
//! A correct answer is shown for `auto_advance_delay` before the next step
//! becomes current, so the learner can read the output. The delayed advance is
//! a [`ScheduledTask`] owned by the session state: reset, a new sequence, or
//! dropping the session cancels it. A generation counter additionally guards
//! against an advance that already woke up when the state moved on.

use super::hints::{HintPolicy, failure_text};
use super::sequence::StepSequence;
use super::transcript::TranscriptLog;
use super::validation::{classify, is_blank};
use crate::config::TutorConfig;
use crate::errors::TutorError;
use crate::scheduler::ScheduledTask;
use crate::types::{Mode, SessionSnapshot, Step, SubmissionResult, TranscriptEntry};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, info, warn};

struct WorkflowState {
    sequence: StepSequence,
    transcript: TranscriptLog,
    completed: bool,
    generation: u64,
    pending_advance: Option<ScheduledTask>,
}

impl WorkflowState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: Mode::Workflow,
            position: self.sequence.position(),
            step_count: self.sequence.len(),
            entries: self.transcript.snapshot(),
            is_complete: self.completed,
            pending_advance: self.pending_advance.is_some(),
        }
    }

    /// Drop any pending advance and invalidate ones that already woke.
    fn invalidate_pending(&mut self) {
        self.generation += 1;
        if let Some(task) = self.pending_advance.take() {
            debug!("Cancelling pending workflow advance");
            task.cancel();
        }
    }
}

struct Shared {
    state: Mutex<WorkflowState>,
    updates: watch::Sender<SessionSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, WorkflowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, snapshot: SessionSnapshot) {
        self.updates.send_replace(snapshot);
    }

    fn apply_advance(&self, generation: u64) {
        let mut state = self.lock();
        if state.generation != generation {
            debug!(
                "Ignoring stale advance (generation {} != {})",
                generation, state.generation
            );
            return;
        }
        if let Some(task) = state.pending_advance.take() {
            task.detach();
        }
        if state.sequence.is_last() || !state.sequence.advance() {
            warn!("Advance fired with no step left to move to");
            return;
        }
        debug!("Advanced workflow to step {}", state.sequence.position());
        let snapshot = state.snapshot();
        drop(state);
        self.publish(snapshot);
    }
}

/// A linear, auto-advancing guided exercise.
pub struct WorkflowSession {
    shared: Arc<Shared>,
    hint: HintPolicy,
    auto_advance_delay: Duration,
    runtime: Handle,
}

impl WorkflowSession {
    /// Must be called from within a tokio runtime; the delayed advance is
    /// spawned on it.
    pub fn new(steps: StepSequence, config: &TutorConfig) -> Result<Self, TutorError> {
        let runtime = Handle::try_current().map_err(|_| TutorError::NoRuntime)?;
        Ok(Self::with_runtime(steps, config, runtime))
    }

    pub fn with_runtime(steps: StepSequence, config: &TutorConfig, runtime: Handle) -> Self {
        let mut sequence = steps;
        sequence.reset();
        let state = WorkflowState {
            sequence,
            transcript: TranscriptLog::new(),
            completed: false,
            generation: 0,
            pending_advance: None,
        };
        let (updates, _) = watch::channel(state.snapshot());
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                updates,
            }),
            hint: config.workflow_hint.clone(),
            auto_advance_delay: config.auto_advance_delay,
            runtime,
        }
    }

    pub fn current(&self) -> Result<Step, TutorError> {
        self.shared.lock().sequence.current().cloned()
    }

    pub fn position(&self) -> usize {
        self.shared.lock().sequence.position()
    }

    pub fn step_count(&self) -> usize {
        self.shared.lock().sequence.len()
    }

    pub fn is_complete(&self) -> bool {
        self.shared.lock().completed
    }

    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.shared.lock().transcript.entries().to_vec()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.lock().snapshot()
    }

    /// Receives a snapshot after every change, including delayed advances.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Judge one submitted line. Blank input is ignored and returns `None`.
    pub fn submit(&self, raw: &str) -> Option<SubmissionResult> {
        if is_blank(raw) {
            debug!("Ignoring blank submission");
            return None;
        }

        let mut state = self.shared.lock();
        let step_index = state.sequence.position();
        let step = match state.sequence.current() {
            Ok(step) => step.clone(),
            Err(e) => {
                warn!("Submission with no current step: {}", e);
                return None;
            }
        };

        let outcome = classify(raw, &step.expected_input);
        let (feedback, advance_message) = if outcome.is_correct() {
            (step.success_output.clone(), step.advance_message.clone())
        } else {
            (failure_text(&step, &self.hint), None)
        };

        state.transcript.append(TranscriptEntry {
            step_index,
            input: raw.to_string(),
            outcome,
            display_output: feedback.clone(),
        });

        let mut advance_scheduled = false;
        if outcome.is_correct() {
            if state.sequence.is_last() {
                if !state.completed {
                    info!("Workflow complete after {} attempts", state.transcript.len());
                }
                state.completed = true;
            } else if state.pending_advance.is_none() {
                let generation = state.generation;
                let shared: Weak<Shared> = Arc::downgrade(&self.shared);
                state.pending_advance = Some(ScheduledTask::after(
                    &self.runtime,
                    self.auto_advance_delay,
                    move || {
                        if let Some(shared) = shared.upgrade() {
                            shared.apply_advance(generation);
                        }
                    },
                ));
                advance_scheduled = true;
                debug!(
                    "Scheduled advance from step {} in {:?}",
                    step_index, self.auto_advance_delay
                );
            }
        } else {
            debug!("Incorrect submission for step {}", step_index);
        }

        let completed = state.completed;
        let snapshot = state.snapshot();
        drop(state);
        self.shared.publish(snapshot);

        Some(SubmissionResult {
            step_index,
            outcome,
            feedback,
            advance_message,
            advance_scheduled,
            completed,
        })
    }

    /// Back to the first step with an empty transcript. Cancels a pending
    /// advance.
    pub fn reset(&self) {
        let mut state = self.shared.lock();
        state.invalidate_pending();
        state.sequence.reset();
        state.transcript.clear();
        state.completed = false;
        let snapshot = state.snapshot();
        drop(state);
        info!("Workflow reset");
        self.shared.publish(snapshot);
    }

    /// Swap in a different workflow. Same effect as a reset on the new steps.
    pub fn replace_steps(&self, steps: StepSequence) {
        let mut state = self.shared.lock();
        state.invalidate_pending();
        state.sequence = steps;
        state.sequence.reset();
        state.transcript.clear();
        state.completed = false;
        let snapshot = state.snapshot();
        drop(state);
        self.shared.publish(snapshot);
    }
}

impl Drop for WorkflowSession {
    fn drop(&mut self) {
        self.shared.lock().invalidate_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;

    fn session(commands: &[&str]) -> WorkflowSession {
        let steps = commands
            .iter()
            .map(|cmd| Step::new(*cmd, format!("ok: {cmd}")).unwrap())
            .collect();
        WorkflowSession::new(StepSequence::new(steps).unwrap(), &TutorConfig::default()).unwrap()
    }

    #[test]
    fn test_new_requires_runtime() {
        let steps = StepSequence::new(vec![Step::new("docker ps", "ok").unwrap()]).unwrap();
        assert!(matches!(
            WorkflowSession::new(steps, &TutorConfig::default()),
            Err(TutorError::NoRuntime)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_correct_answer_schedules_single_advance() {
        let session = session(&["docker pull nginx", "docker run nginx", "docker ps"]);

        let first = session.submit("docker pull nginx").unwrap();
        assert!(first.advance_scheduled);
        // A repeat inside the delay window is logged but does not double-advance
        let repeat = session.submit("docker pull nginx").unwrap();
        assert_eq!(repeat.outcome, Outcome::Correct);
        assert!(!repeat.advance_scheduled);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(session.position(), 1);
        assert_eq!(session.entries().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_session_cancels_advance() {
        let session = session(&["docker pull nginx", "docker run nginx"]);
        let mut updates = session.subscribe();
        session.submit("docker pull nginx");
        updates.mark_unchanged();
        drop(session);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert!(updates.has_changed().is_err());
    }
}

//! Learn mode: free navigation over a category of commands.
//!
//! Nothing advances on its own here and the session never completes. Switching
//! category always clears the transcript so attempts are never judged against
//! the wrong category's steps.

use super::hints::{HintPolicy, failure_text};
use super::sequence::StepSequence;
use super::transcript::TranscriptLog;
use super::validation::{classify, is_blank};
use crate::config::TutorConfig;
use crate::errors::TutorError;
use crate::types::{Mode, SessionSnapshot, Step, SubmissionResult, TranscriptEntry};
use tokio::sync::watch;
use tracing::debug;

pub struct LearnSession {
    sequence: StepSequence,
    transcript: TranscriptLog,
    hint: HintPolicy,
    updates: watch::Sender<SessionSnapshot>,
}

impl LearnSession {
    pub fn new(steps: StepSequence, config: &TutorConfig) -> Self {
        let mut sequence = steps;
        sequence.reset();
        let transcript = TranscriptLog::new();
        let (updates, _) = watch::channel(Self::build_snapshot(&sequence, &transcript));
        Self {
            sequence,
            transcript,
            hint: config.learn_hint.clone(),
            updates,
        }
    }

    fn build_snapshot(sequence: &StepSequence, transcript: &TranscriptLog) -> SessionSnapshot {
        SessionSnapshot {
            mode: Mode::Learn,
            position: sequence.position(),
            step_count: sequence.len(),
            entries: transcript.snapshot(),
            is_complete: false,
            pending_advance: false,
        }
    }

    fn publish(&self) {
        self.updates
            .send_replace(Self::build_snapshot(&self.sequence, &self.transcript));
    }

    pub fn current(&self) -> Result<&Step, TutorError> {
        self.sequence.current()
    }

    pub fn steps(&self) -> &[Step] {
        self.sequence.steps()
    }

    pub fn position(&self) -> usize {
        self.sequence.position()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        self.transcript.entries()
    }

    /// Learn mode has no terminal state.
    pub fn is_complete(&self) -> bool {
        false
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        Self::build_snapshot(&self.sequence, &self.transcript)
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    /// Judge one submitted line. Blank input is ignored and returns `None`.
    pub fn submit(&mut self, raw: &str) -> Option<SubmissionResult> {
        if is_blank(raw) {
            return None;
        }

        let step_index = self.sequence.position();
        let step = self.sequence.current().ok()?;
        let outcome = classify(raw, &step.expected_input);
        let (feedback, advance_message) = if outcome.is_correct() {
            (step.success_output.clone(), step.advance_message.clone())
        } else {
            (failure_text(step, &self.hint), None)
        };
        debug!("Learn submission for step {}: {:?}", step_index, outcome);

        self.transcript.append(TranscriptEntry {
            step_index,
            input: raw.to_string(),
            outcome,
            display_output: feedback.clone(),
        });
        self.publish();

        Some(SubmissionResult {
            step_index,
            outcome,
            feedback,
            advance_message,
            advance_scheduled: false,
            completed: false,
        })
    }

    /// Pick any command in the current category. The transcript is kept.
    pub fn select_step(&mut self, index: usize) -> Result<(), TutorError> {
        self.sequence.seek(index)?;
        self.publish();
        Ok(())
    }

    pub fn next_step(&mut self) -> bool {
        let next = self.sequence.position() + 1;
        if next >= self.sequence.len() {
            return false;
        }
        self.select_step(next).is_ok()
    }

    pub fn previous_step(&mut self) -> bool {
        match self.sequence.position().checked_sub(1) {
            Some(prev) => self.select_step(prev).is_ok(),
            None => false,
        }
    }

    /// Replace the active category. Position and transcript start over.
    pub fn select_category(&mut self, steps: StepSequence) {
        self.sequence = steps;
        self.sequence.reset();
        self.transcript.clear();
        self.publish();
    }

    pub fn reset(&mut self) {
        self.sequence.reset();
        self.transcript.clear();
        self.publish();
    }
}

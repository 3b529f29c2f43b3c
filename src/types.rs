use crate::errors::TutorError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One unit of guided interaction: the command to type plus its feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// The exact text the learner must submit
    pub expected_input: String,
    /// Output shown under the echoed command on a correct match
    pub success_output: String,
    /// Static failure text; when absent the session's hint policy is used
    #[serde(default)]
    pub failure_output: Option<String>,
    /// Shown once after a correct match, before moving on
    #[serde(default)]
    pub advance_message: Option<String>,
}

impl Step {
    pub fn new(
        expected_input: impl Into<String>,
        success_output: impl Into<String>,
    ) -> Result<Self, TutorError> {
        let step = Self {
            title: String::new(),
            description: String::new(),
            expected_input: expected_input.into(),
            success_output: success_output.into(),
            failure_output: None,
            advance_message: None,
        };
        step.validate()?;
        Ok(step)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_failure_output(mut self, text: impl Into<String>) -> Self {
        self.failure_output = Some(text.into());
        self
    }

    pub fn with_advance_message(mut self, text: impl Into<String>) -> Self {
        self.advance_message = Some(text.into());
        self
    }

    /// Expected input must be non-empty and carry no surrounding whitespace,
    /// since submissions are trimmed before comparison.
    pub fn validate(&self) -> Result<(), TutorError> {
        if self.expected_input.trim().is_empty() {
            return Err(TutorError::InvalidStep(
                "expected input must not be empty".to_string(),
            ));
        }
        if self.expected_input.trim() != self.expected_input {
            return Err(TutorError::InvalidStep(format!(
                "expected input '{}' has leading or trailing whitespace",
                self.expected_input
            )));
        }
        Ok(())
    }

    /// Heading used when the step is presented as a prompt
    pub fn label(&self) -> &str {
        if self.title.is_empty() {
            &self.expected_input
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    pub fn is_correct(self) -> bool {
        matches!(self, Outcome::Correct)
    }
}

/// One logged attempt in a session transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Position of the step the attempt was judged against
    pub step_index: usize,
    /// Input as typed, before trimming
    pub input: String,
    pub outcome: Outcome,
    /// Text shown under the echoed input
    pub display_output: String,
}

/// What happened to a single non-empty submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub step_index: usize,
    pub outcome: Outcome,
    /// Feedback text actually used for the transcript entry
    pub feedback: String,
    /// One-shot banner text for a correct answer, if the step has one
    pub advance_message: Option<String>,
    /// A delayed advance to the next step was scheduled by this submission
    pub advance_scheduled: bool,
    /// The sequence is complete after this submission
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Free navigation, no auto-advance, never completes
    Learn,
    /// Linear path with delayed auto-advance and a terminal completion state
    Workflow,
}

/// Read-only view of a session, published after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub position: usize,
    pub step_count: usize,
    pub entries: Arc<[TranscriptEntry]>,
    pub is_complete: bool,
    pub pending_advance: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_rejects_empty_expected_input() {
        assert!(matches!(
            Step::new("", "ok"),
            Err(TutorError::InvalidStep(_))
        ));
        assert!(matches!(
            Step::new("   ", "ok"),
            Err(TutorError::InvalidStep(_))
        ));
    }

    #[test]
    fn test_step_rejects_padded_expected_input() {
        assert!(Step::new(" docker ps", "ok").is_err());
        assert!(Step::new("docker ps\n", "ok").is_err());
    }

    #[test]
    fn test_step_label_falls_back_to_command() {
        let step = Step::new("docker ps", "CONTAINER ID").unwrap();
        assert_eq!(step.label(), "docker ps");

        let titled = step.with_title("List containers");
        assert_eq!(titled.label(), "List containers");
    }

    #[test]
    fn test_step_deserializes_with_defaults() {
        let step: Step = serde_json::from_str(
            r#"{"expected_input": "docker images", "success_output": "REPOSITORY"}"#,
        )
        .unwrap();
        assert_eq!(step.expected_input, "docker images");
        assert!(step.failure_output.is_none());
        assert!(step.advance_message.is_none());
        assert!(step.title.is_empty());
    }
}

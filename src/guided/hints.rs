//! Failure feedback: how much of the expected command a wrong answer reveals.

use crate::types::Step;
use serde::{Deserialize, Serialize};

const NOT_RECOGNIZED: &str = "Command not recognized.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HintPolicy {
    /// Reveal the whole expected command
    Full,
    /// Reveal the first `max_chars` characters followed by an ellipsis
    Prefix { max_chars: usize },
    /// Reveal nothing
    Hidden,
}

impl HintPolicy {
    pub fn render(&self, expected: &str) -> String {
        match self {
            HintPolicy::Full => format!("{NOT_RECOGNIZED} Try: {expected}"),
            HintPolicy::Prefix { max_chars } => {
                let prefix: String = expected.chars().take(*max_chars).collect();
                format!("{NOT_RECOGNIZED} Hint: {prefix}...")
            }
            HintPolicy::Hidden => format!("{NOT_RECOGNIZED} Check the command and try again."),
        }
    }
}

/// Text shown for a wrong answer: the step's own text wins over the policy.
pub fn failure_text(step: &Step, policy: &HintPolicy) -> String {
    match &step.failure_output {
        Some(text) => text.clone(),
        None => policy.render(&step.expected_input),
    }
}

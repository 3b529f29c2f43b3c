//! Guided step/terminal interaction engine
//!
//! Learners type commands into a simulated terminal. Each submission is
//! classified against the current step, logged to the session transcript, and
//! may move the session forward.

pub mod hints;
pub mod learn;
pub mod sequence;
pub mod transcript;
pub mod validation;
pub mod workflow;

pub use hints::HintPolicy;
pub use learn::LearnSession;
pub use sequence::StepSequence;
pub use transcript::TranscriptLog;
pub use validation::classify;
pub use workflow::WorkflowSession;

//! Lesson content types

use crate::errors::TutorError;
use crate::guided::StepSequence;
use crate::simulation::ActorGroup;
use crate::types::Step;
use serde::{Deserialize, Serialize};

/// A group of commands the learner can browse freely in learn mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandCategory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub commands: Vec<Step>,
}

impl CommandCategory {
    pub fn sequence(&self) -> Result<StepSequence, TutorError> {
        StepSequence::new(self.commands.clone())
    }
}

/// A fixed path of steps for workflow mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<Step>,
}

impl Workflow {
    pub fn sequence(&self) -> Result<StepSequence, TutorError> {
        StepSequence::new(self.steps.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationPreset {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub groups: Vec<ActorGroup>,
}

/// Contents of one lesson file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonBundle {
    #[serde(default)]
    pub categories: Vec<CommandCategory>,
    #[serde(default)]
    pub workflows: Vec<Workflow>,
    #[serde(default)]
    pub simulations: Vec<SimulationPreset>,
}

impl LessonBundle {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.workflows.is_empty() && self.simulations.is_empty()
    }
}

//! # Lesson Catalog
//!
//! Command categories, workflows and simulation presets. The embedded lessons
//! are always loaded first; bundles from later sources replace entries with
//! the same id and append new ones.

pub mod source;
pub mod types;

pub use source::{DirectoryLessons, EmbeddedLessons, LessonSource};
pub use types::*;

use crate::config::TutorConfig;
use crate::errors::TutorError;
use regex::Regex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct LessonCatalog {
    categories: Vec<CommandCategory>,
    workflows: Vec<Workflow>,
    simulations: Vec<SimulationPreset>,
}

impl LessonCatalog {
    /// Catalog with only the built-in lessons.
    pub async fn embedded() -> Result<Self, TutorError> {
        let sources: Vec<Box<dyn LessonSource>> = vec![Box::new(EmbeddedLessons)];
        Self::load(&sources).await
    }

    /// Built-in lessons plus the configured lesson directory, if any.
    pub async fn from_config(config: &TutorConfig) -> Result<Self, TutorError> {
        let mut sources: Vec<Box<dyn LessonSource>> = vec![Box::new(EmbeddedLessons)];
        if let Some(dir) = &config.lessons_directory {
            sources.push(Box::new(DirectoryLessons::new(dir.clone())));
        }
        Self::load(&sources).await
    }

    pub async fn load(sources: &[Box<dyn LessonSource>]) -> Result<Self, TutorError> {
        let id_pattern = Regex::new(r"^[a-z0-9][a-z0-9_-]*$")
            .map_err(|e| TutorError::Internal(format!("invalid id pattern: {e}")))?;
        let mut catalog = Self::default();

        for source in sources {
            let bundles = source.load().await?;
            debug!("Source '{}' provided {} bundles", source.name(), bundles.len());
            for bundle in bundles {
                match validate_bundle(&bundle, &id_pattern) {
                    Ok(()) => catalog.merge(bundle),
                    Err(e) => warn!("Skipping lessons from '{}': {}", source.name(), e),
                }
            }
        }

        info!(
            "Loaded {} categories, {} workflows, {} simulations",
            catalog.categories.len(),
            catalog.workflows.len(),
            catalog.simulations.len()
        );
        Ok(catalog)
    }

    fn merge(&mut self, bundle: LessonBundle) {
        for category in bundle.categories {
            upsert(&mut self.categories, category, |c| &c.id);
        }
        for workflow in bundle.workflows {
            upsert(&mut self.workflows, workflow, |w| &w.id);
        }
        for preset in bundle.simulations {
            upsert(&mut self.simulations, preset, |p| &p.id);
        }
    }

    pub fn categories(&self) -> &[CommandCategory] {
        &self.categories
    }

    pub fn workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    pub fn simulations(&self) -> &[SimulationPreset] {
        &self.simulations
    }

    pub fn category(&self, id: &str) -> Result<&CommandCategory, TutorError> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| TutorError::UnknownCategory(id.to_string()))
    }

    pub fn workflow(&self, id: &str) -> Result<&Workflow, TutorError> {
        self.workflows
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| TutorError::UnknownWorkflow(id.to_string()))
    }

    pub fn simulation(&self, id: &str) -> Result<&SimulationPreset, TutorError> {
        self.simulations
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| TutorError::UnknownPreset(id.to_string()))
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> &String) {
    match items.iter().position(|existing| id(existing) == id(&item)) {
        Some(index) => {
            debug!("Overriding lesson '{}'", id(&item));
            items[index] = item;
        }
        None => items.push(item),
    }
}

fn validate_id(kind: &str, id: &str, pattern: &Regex) -> Result<(), TutorError> {
    if pattern.is_match(id) {
        Ok(())
    } else {
        Err(TutorError::InvalidLesson(format!(
            "{kind} id '{id}' must be lowercase letters, digits, '-' or '_'"
        )))
    }
}

fn validate_bundle(bundle: &LessonBundle, id_pattern: &Regex) -> Result<(), TutorError> {
    for category in &bundle.categories {
        validate_id("category", &category.id, id_pattern)?;
        if category.commands.is_empty() {
            return Err(TutorError::InvalidLesson(format!(
                "category '{}' has no commands",
                category.id
            )));
        }
        for step in &category.commands {
            step.validate()?;
        }
    }
    for workflow in &bundle.workflows {
        validate_id("workflow", &workflow.id, id_pattern)?;
        if workflow.steps.is_empty() {
            return Err(TutorError::InvalidLesson(format!(
                "workflow '{}' has no steps",
                workflow.id
            )));
        }
        for step in &workflow.steps {
            step.validate()?;
        }
    }
    for preset in &bundle.simulations {
        validate_id("simulation", &preset.id, id_pattern)?;
        for group in &preset.groups {
            group.validate()?;
        }
    }
    Ok(())
}

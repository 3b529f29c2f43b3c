//! Where lesson bundles come from: the embedded defaults or a directory of
//! YAML/JSON files.

use super::types::LessonBundle;
use crate::errors::TutorError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

#[async_trait]
pub trait LessonSource: Send + Sync {
    /// Human readable origin, used in logs
    fn name(&self) -> String;

    async fn load(&self) -> Result<Vec<LessonBundle>, TutorError>;
}

/// Lessons compiled into the binary.
pub struct EmbeddedLessons;

impl EmbeddedLessons {
    fn parse_all() -> Result<Vec<LessonBundle>, TutorError> {
        [
            include_str!("../data/commands.json"),
            include_str!("../data/workflows.json"),
            include_str!("../data/simulations.json"),
        ]
        .into_iter()
        .map(|data| serde_json::from_str(data).map_err(TutorError::from))
        .collect()
    }
}

#[async_trait]
impl LessonSource for EmbeddedLessons {
    fn name(&self) -> String {
        "embedded".to_string()
    }

    async fn load(&self) -> Result<Vec<LessonBundle>, TutorError> {
        Self::parse_all()
    }
}

/// Every `.yaml`, `.yml` and `.json` file below a directory, in file name
/// order. Files that cannot be read or parsed are skipped with a warning.
pub struct DirectoryLessons {
    root: PathBuf,
}

impl DirectoryLessons {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl LessonSource for DirectoryLessons {
    fn name(&self) -> String {
        self.root.display().to_string()
    }

    async fn load(&self) -> Result<Vec<LessonBundle>, TutorError> {
        if !self.root.exists() {
            debug!("Lesson directory {:?} does not exist", self.root);
            return Ok(Vec::new());
        }

        let mut bundles = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {:?}: {}", self.root, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_lesson_file(entry.path()) {
                continue;
            }
            let path = entry.path();
            let content = match tokio::fs::read_to_string(path).await {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read lesson file {:?}: {}", path, e);
                    continue;
                }
            };
            match parse_bundle(path, &content) {
                Ok(bundle) => {
                    debug!("Loaded lesson file {:?}", path.file_name());
                    bundles.push(bundle);
                }
                Err(e) => warn!("Failed to load lessons from {:?}: {}", path, e),
            }
        }
        Ok(bundles)
    }
}

fn is_lesson_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

/// Parse a lesson file by extension.
pub fn parse_bundle(path: &Path, content: &str) -> Result<LessonBundle, TutorError> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml" | "yml") => Ok(serde_yaml::from_str(content)?),
        Some("json") => Ok(serde_json::from_str(content)?),
        _ => Err(TutorError::UnsupportedFormat(path.to_path_buf())),
    }
}

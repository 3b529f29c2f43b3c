//! # Error Types
//!
//! Error handling for the tutorial engine.
//!
//! A learner typing the wrong command is not an error: that is reported as
//! [`Outcome::Incorrect`](crate::types::Outcome). The variants here cover
//! programmer errors, bad lesson content and I/O while loading lessons.

use std::fmt;
use std::path::PathBuf;

/// Error types that can occur while building or driving tutorial sessions.
#[derive(Debug)]
pub enum TutorError {
    /// Reading the current step of a sequence whose cursor is past the end
    OutOfRange { position: usize, len: usize },
    /// A simulation run was started while another one is still in flight
    ConcurrentRun,
    /// A step sequence was built without any steps
    EmptySequence,
    /// A step failed construction-time validation
    InvalidStep(String),
    /// A simulation group cannot be run as configured
    InvalidTimeline(String),
    /// Lesson content failed validation
    InvalidLesson(String),
    /// Requested command category is not in the catalog
    UnknownCategory(String),
    /// Requested workflow is not in the catalog
    UnknownWorkflow(String),
    /// Requested simulation preset is not in the catalog
    UnknownPreset(String),
    /// Scheduling needs a tokio runtime and none is running
    NoRuntime,
    /// Internal error with custom message
    Internal(String),
    /// I/O error reading lesson files
    Io(std::io::Error),
    /// Error walking a lesson directory
    WalkDir(walkdir::Error),
    /// Error parsing JSON lesson data
    SerdeJson(serde_json::Error),
    /// Error parsing YAML lesson data
    SerdeYaml(serde_yaml::Error),
    /// Lesson file has an extension we do not read
    UnsupportedFormat(PathBuf),
}

impl fmt::Display for TutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TutorError::OutOfRange { position, len } => {
                write!(f, "Step position {position} is out of range for {len} steps")
            }
            TutorError::ConcurrentRun => write!(f, "A simulation run is already in progress"),
            TutorError::EmptySequence => write!(f, "A step sequence needs at least one step"),
            TutorError::InvalidStep(msg) => write!(f, "Invalid step: {msg}"),
            TutorError::InvalidTimeline(msg) => write!(f, "Invalid simulation timeline: {msg}"),
            TutorError::InvalidLesson(msg) => write!(f, "Invalid lesson content: {msg}"),
            TutorError::UnknownCategory(id) => write!(f, "Unknown command category: {id}"),
            TutorError::UnknownWorkflow(id) => write!(f, "Unknown workflow: {id}"),
            TutorError::UnknownPreset(id) => write!(f, "Unknown simulation preset: {id}"),
            TutorError::NoRuntime => write!(f, "No tokio runtime available for scheduling"),
            TutorError::Internal(msg) => write!(f, "Internal error: {msg}"),
            TutorError::Io(err) => write!(f, "IO error: {err}"),
            TutorError::WalkDir(err) => write!(f, "Directory traversal error: {err}"),
            TutorError::SerdeJson(err) => write!(f, "JSON parsing error: {err}"),
            TutorError::SerdeYaml(err) => write!(f, "YAML parsing error: {err}"),
            TutorError::UnsupportedFormat(path) => {
                write!(f, "Unsupported lesson file: {}", path.display())
            }
        }
    }
}

impl std::error::Error for TutorError {}

impl From<std::io::Error> for TutorError {
    fn from(err: std::io::Error) -> Self {
        TutorError::Io(err)
    }
}

impl From<walkdir::Error> for TutorError {
    fn from(err: walkdir::Error) -> Self {
        TutorError::WalkDir(err)
    }
}

impl From<serde_json::Error> for TutorError {
    fn from(err: serde_json::Error) -> Self {
        TutorError::SerdeJson(err)
    }
}

impl From<serde_yaml::Error> for TutorError {
    fn from(err: serde_yaml::Error) -> Self {
        TutorError::SerdeYaml(err)
    }
}

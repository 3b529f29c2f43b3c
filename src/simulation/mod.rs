//! Staged multi-actor progress animation, independent of user input

pub mod timeline;
pub mod types;

pub use timeline::SimulationTimeline;
pub use types::*;

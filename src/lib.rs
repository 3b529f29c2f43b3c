pub mod catalog;
pub mod config;
pub mod errors;
pub mod guided;
pub mod repl;
pub mod scheduler;
pub mod simulation;
pub mod types;

// Re-export commonly used types
pub use errors::TutorError;
pub use types::*;

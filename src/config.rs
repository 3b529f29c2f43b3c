use crate::guided::HintPolicy;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TutorConfig {
    /// Delay between a correct workflow answer and the switch to the next step
    pub auto_advance_delay: Duration,
    /// Interval of the elapsed-time ticker during simulation runs
    pub tick_interval: Duration,
    /// How much of the expected command a wrong answer reveals in learn mode
    pub learn_hint: HintPolicy,
    /// How much of the expected command a wrong answer reveals in workflow mode
    pub workflow_hint: HintPolicy,
    /// Extra lesson files (YAML or JSON) merged over the embedded catalog
    pub lessons_directory: Option<PathBuf>,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            auto_advance_delay: Duration::from_millis(1000),
            tick_interval: Duration::from_millis(100),
            learn_hint: HintPolicy::Prefix { max_chars: 40 },
            workflow_hint: HintPolicy::Full,
            lessons_directory: None,
        }
    }
}

impl TutorConfig {
    /// Default location for user lesson files: `~/.docker-tutor/lessons`
    pub fn default_lessons_directory() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".docker-tutor")
            .join("lessons")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TutorConfig::default();
        assert_eq!(config.auto_advance_delay, Duration::from_millis(1000));
        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.learn_hint, HintPolicy::Prefix { max_chars: 40 });
        assert_eq!(config.workflow_hint, HintPolicy::Full);
        assert!(config.lessons_directory.is_none());
    }

    #[test]
    fn test_default_lessons_directory() {
        let dir = TutorConfig::default_lessons_directory();
        assert!(dir.ends_with(".docker-tutor/lessons"));
    }
}

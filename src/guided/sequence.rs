use crate::errors::TutorError;
use crate::types::Step;
use std::sync::Arc;

/// Ordered, immutable steps plus the cursor into them.
///
/// `position` ranges over `0..=len`; `position == len` means the sequence is
/// exhausted and [`StepSequence::current`] fails with `OutOfRange`.
#[derive(Debug, Clone)]
pub struct StepSequence {
    steps: Arc<[Step]>,
    position: usize,
}

impl StepSequence {
    pub fn new(steps: Vec<Step>) -> Result<Self, TutorError> {
        if steps.is_empty() {
            return Err(TutorError::EmptySequence);
        }
        for step in &steps {
            step.validate()?;
        }
        Ok(Self {
            steps: Arc::from(steps),
            position: 0,
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Result<&Step, TutorError> {
        self.steps.get(self.position).ok_or(TutorError::OutOfRange {
            position: self.position,
            len: self.steps.len(),
        })
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 == self.steps.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.steps.len()
    }

    /// Move the cursor forward by one; stops at `len`.
    pub fn advance(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.position += 1;
        true
    }

    /// Jump to an arbitrary step.
    pub fn seek(&mut self, index: usize) -> Result<(), TutorError> {
        if index >= self.steps.len() {
            return Err(TutorError::OutOfRange {
                position: index,
                len: self.steps.len(),
            });
        }
        self.position = index;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(commands: &[&str]) -> Vec<Step> {
        commands
            .iter()
            .map(|cmd| Step::new(*cmd, format!("ran {cmd}")).unwrap())
            .collect()
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        assert!(matches!(
            StepSequence::new(Vec::new()),
            Err(TutorError::EmptySequence)
        ));
    }

    #[test]
    fn test_invalid_step_is_rejected() {
        let mut list = steps(&["docker ps"]);
        list.push(Step {
            title: String::new(),
            description: String::new(),
            expected_input: String::new(),
            success_output: String::new(),
            failure_output: None,
            advance_message: None,
        });
        assert!(matches!(
            StepSequence::new(list),
            Err(TutorError::InvalidStep(_))
        ));
    }

    #[test]
    fn test_advance_until_exhausted() {
        let mut seq = StepSequence::new(steps(&["docker pull nginx", "docker run nginx"])).unwrap();
        assert_eq!(seq.current().unwrap().expected_input, "docker pull nginx");
        assert!(!seq.is_last());

        assert!(seq.advance());
        assert!(seq.is_last());
        assert_eq!(seq.current().unwrap().expected_input, "docker run nginx");

        assert!(seq.advance());
        assert!(seq.is_exhausted());
        assert!(matches!(
            seq.current(),
            Err(TutorError::OutOfRange { position: 2, len: 2 })
        ));
        assert!(!seq.advance());
        assert_eq!(seq.position(), 2);
    }

    #[test]
    fn test_seek_bounds() {
        let mut seq = StepSequence::new(steps(&["a", "b", "c"])).unwrap();
        seq.seek(2).unwrap();
        assert_eq!(seq.position(), 2);
        assert!(seq.seek(3).is_err());
        assert_eq!(seq.position(), 2);

        seq.reset();
        assert_eq!(seq.position(), 0);
    }
}

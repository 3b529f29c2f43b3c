use crate::types::TranscriptEntry;
use std::sync::Arc;

/// Append-only scrollback of a session's attempts.
///
/// Entries are never edited in place; the only way to remove anything is
/// [`TranscriptLog::clear`]. Capacity is unbounded.
#[derive(Debug, Clone, Default)]
pub struct TranscriptLog {
    entries: Vec<TranscriptEntry>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn correct_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.is_correct())
            .count()
    }

    /// Frozen copy for publishing to renderers
    pub fn snapshot(&self) -> Arc<[TranscriptEntry]> {
        Arc::from(self.entries.as_slice())
    }
}

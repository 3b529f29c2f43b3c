//! Simulation timeline types

use crate::errors::TutorError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on actors per group; lesson files are user supplied.
pub const MAX_ACTORS_PER_GROUP: usize = 100;
/// Upper bound on a single stage delay (one minute).
pub const MAX_STAGE_DELAY_MS: u64 = 60_000;

/// A set of identical actors that boot through the same stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorGroup {
    /// Group heading, e.g. "Virtual machines"
    pub label: String,
    /// Per-actor name prefix, e.g. "VM" gives "VM 1", "VM 2", ...
    pub actor_label: String,
    pub count: usize,
    pub stages: Vec<String>,
    pub per_stage_delay_ms: u64,
}

impl ActorGroup {
    pub fn per_stage_delay(&self) -> Duration {
        Duration::from_millis(self.per_stage_delay_ms)
    }

    /// Time for one actor to go from 0 to 100 percent.
    pub fn actor_duration(&self) -> Duration {
        self.per_stage_delay()
            .saturating_mul(u32::try_from(self.stages.len()).unwrap_or(u32::MAX))
    }

    pub fn validate(&self) -> Result<(), TutorError> {
        if self.stages.is_empty() {
            return Err(TutorError::InvalidTimeline(format!(
                "group '{}' has no stages",
                self.label
            )));
        }
        if self.count > MAX_ACTORS_PER_GROUP {
            return Err(TutorError::InvalidTimeline(format!(
                "group '{}' has {} actors, at most {} allowed",
                self.label, self.count, MAX_ACTORS_PER_GROUP
            )));
        }
        if self.per_stage_delay_ms > MAX_STAGE_DELAY_MS {
            return Err(TutorError::InvalidTimeline(format!(
                "group '{}' stage delay {}ms exceeds {}ms",
                self.label, self.per_stage_delay_ms, MAX_STAGE_DELAY_MS
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorState {
    pub name: String,
    pub stage_index: usize,
    pub stage_label: String,
    /// 0..=100
    pub progress_percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub label: String,
    pub actors: Vec<ActorState>,
    pub finished: bool,
}

/// Immutable view of a run, emitted on every change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimelineSnapshot {
    pub groups: Vec<GroupSnapshot>,
    pub elapsed: Duration,
}

impl TimelineSnapshot {
    pub fn actor_count(&self) -> usize {
        self.groups.iter().map(|g| g.actors.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateKind {
    ActorAppended { group: usize, actor: usize },
    StageAdvanced { group: usize, actor: usize, stage: usize },
    Tick,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct TimelineUpdate {
    pub kind: UpdateKind,
    pub snapshot: Arc<TimelineSnapshot>,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(Arc<TimelineSnapshot>),
    Cancelled(Arc<TimelineSnapshot>),
}

impl RunOutcome {
    pub fn snapshot(&self) -> &TimelineSnapshot {
        match self {
            RunOutcome::Completed(snapshot) | RunOutcome::Cancelled(snapshot) => snapshot,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled(_))
    }
}

/// Progress after completing `stage` (zero based) out of `stage_count`.
pub fn stage_progress(stage: usize, stage_count: usize) -> u8 {
    if stage_count == 0 {
        return 100;
    }
    let done = (stage + 1).min(stage_count);
    (done * 100 / stage_count) as u8
}

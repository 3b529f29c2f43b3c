//! # Simulation Timeline
//!
//! Drives the non-interactive "VM vs container" boot comparison. A run walks
//! the groups in order; inside a group actors are appended one at a time and
//! each goes through every stage before the next actor is appended. Every
//! change is published as an immutable [`TimelineSnapshot`].
//!
//! The run is one async task. The elapsed ticker and the stage sleeps are
//! multiplexed with `select!`, so the ticker cannot outlive the run.

use super::types::*;
use crate::errors::TutorError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

pub struct SimulationTimeline {
    tick_interval: Duration,
    running: AtomicBool,
    cancel: Mutex<Option<watch::Sender<bool>>>,
}

/// Releases the running flag on every exit path, including the run future
/// being dropped mid-flight.
struct RunGuard<'a> {
    timeline: &'a SimulationTimeline,
}

impl<'a> RunGuard<'a> {
    /// The flag and the cancel sender change under the slot lock, so a
    /// `cancel()` that sees the run as started always finds its sender.
    fn acquire(
        timeline: &'a SimulationTimeline,
        cancel: watch::Sender<bool>,
    ) -> Result<Self, TutorError> {
        let mut slot = timeline.cancel_slot();
        timeline
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| TutorError::ConcurrentRun)?;
        *slot = Some(cancel);
        Ok(Self { timeline })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        let mut slot = self.timeline.cancel_slot();
        slot.take();
        self.timeline.running.store(false, Ordering::Release);
    }
}

/// Mutable state of one run; only ever read through snapshots.
struct RunState {
    groups: Vec<GroupSnapshot>,
    started: Instant,
}

impl RunState {
    fn snapshot(&self) -> Arc<TimelineSnapshot> {
        Arc::new(TimelineSnapshot {
            groups: self.groups.clone(),
            elapsed: self.started.elapsed(),
        })
    }

    fn update(&self, kind: UpdateKind) -> TimelineUpdate {
        TimelineUpdate {
            kind,
            snapshot: self.snapshot(),
        }
    }
}

impl SimulationTimeline {
    /// A zero interval is raised to 1ms; tokio intervals must be non-zero.
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval: tick_interval.max(Duration::from_millis(1)),
            running: AtomicBool::new(false),
            cancel: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the in-flight run at its next suspension point. No-op when idle.
    pub fn cancel(&self) {
        if let Some(sender) = self.cancel_slot().as_ref() {
            info!("Cancelling simulation run");
            sender.send_replace(true);
        }
    }

    fn cancel_slot(&self) -> MutexGuard<'_, Option<watch::Sender<bool>>> {
        self.cancel.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run all groups to completion, reporting every change to `on_update`.
    ///
    /// Fails with [`TutorError::ConcurrentRun`] if a run is already in flight.
    pub async fn run<F>(
        &self,
        groups: &[ActorGroup],
        mut on_update: F,
    ) -> Result<RunOutcome, TutorError>
    where
        F: FnMut(TimelineUpdate),
    {
        for group in groups {
            group.validate()?;
        }
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let _guard = RunGuard::acquire(self, cancel_tx)?;

        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        let mut state = RunState {
            groups: groups
                .iter()
                .map(|g| GroupSnapshot {
                    label: g.label.clone(),
                    actors: Vec::new(),
                    finished: false,
                })
                .collect(),
            started: Instant::now(),
        };
        info!("Starting simulation run with {} groups", groups.len());

        for (g, group) in groups.iter().enumerate() {
            for a in 0..group.count {
                state.groups[g].actors.push(ActorState {
                    name: format!("{} {}", group.actor_label, a + 1),
                    stage_index: 0,
                    stage_label: group.stages[0].clone(),
                    progress_percent: 0,
                });
                on_update(state.update(UpdateKind::ActorAppended { group: g, actor: a }));

                for (s, label) in group.stages.iter().enumerate() {
                    let deadline = Instant::now() + group.per_stage_delay();
                    loop {
                        tokio::select! {
                            biased;
                            Ok(()) = cancel_rx.changed() => {
                                if *cancel_rx.borrow_and_update() {
                                    debug!("Simulation cancelled during {} stage {}", group.label, s);
                                    let update = state.update(UpdateKind::Cancelled);
                                    let snapshot = update.snapshot.clone();
                                    on_update(update);
                                    return Ok(RunOutcome::Cancelled(snapshot));
                                }
                            }
                            _ = tokio::time::sleep_until(deadline) => break,
                            _ = ticker.tick() => on_update(state.update(UpdateKind::Tick)),
                        }
                    }

                    let actor = &mut state.groups[g].actors[a];
                    actor.stage_index = s;
                    actor.stage_label = label.clone();
                    actor.progress_percent = stage_progress(s, group.stages.len());
                    on_update(state.update(UpdateKind::StageAdvanced {
                        group: g,
                        actor: a,
                        stage: s,
                    }));
                }
            }
            state.groups[g].finished = true;
            debug!("Group '{}' finished", group.label);
        }

        let update = state.update(UpdateKind::Finished);
        let snapshot = update.snapshot.clone();
        on_update(update);
        info!("Simulation run finished in {:?}", snapshot.elapsed);
        Ok(RunOutcome::Completed(snapshot))
    }
}

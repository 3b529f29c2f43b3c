//! # Terminal Front End
//!
//! Line-oriented driver for the sessions and the simulation timeline. Each
//! line read from the input is one "Enter" submission; lines starting with
//! `:` are REPL commands instead of terminal input.

use crate::catalog::{LessonCatalog, SimulationPreset, Workflow};
use crate::config::TutorConfig;
use crate::errors::TutorError;
use crate::guided::{LearnSession, WorkflowSession};
use crate::simulation::{RunOutcome, SimulationTimeline, TimelineUpdate, UpdateKind};
use crate::types::{Step, SubmissionResult};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tokio::sync::mpsc;
use tracing::debug;

const PROMPT: &str = "$ ";
const BAR_WIDTH: usize = 20;

const LEARN_HELP: &str = "\
Commands:
  :next             move to the next command
  :prev             move to the previous command
  :step N           jump to command N
  :list             show the commands in this category
  :category ID      switch category (clears the history)
  :reset            start this category over
  :quit             leave
";

const WORKFLOW_HELP: &str = "\
Commands:
  :reset            start the workflow over
  :quit             leave
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Next,
    Previous,
    Step(usize),
    List,
    Category(String),
    Reset,
    Help,
    Quit,
    Unknown(String),
}

/// Parse a `:command` line. Anything else is terminal input and yields `None`.
pub fn parse_command(line: &str) -> Option<ReplCommand> {
    let rest = line.trim().strip_prefix(':')?;
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    let command = match (name, arg) {
        ("next" | "n", None) => ReplCommand::Next,
        ("prev" | "p", None) => ReplCommand::Previous,
        ("step", Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => ReplCommand::Step(n),
            _ => ReplCommand::Unknown(rest.to_string()),
        },
        ("list" | "ls", None) => ReplCommand::List,
        ("category" | "cat", Some(id)) => ReplCommand::Category(id.to_string()),
        ("reset", None) => ReplCommand::Reset,
        ("help" | "h", None) => ReplCommand::Help,
        ("quit" | "q" | "exit", None) => ReplCommand::Quit,
        _ => ReplCommand::Unknown(rest.to_string()),
    };
    Some(command)
}

/// Text printed for one judged submission.
pub fn render_submission(result: &SubmissionResult) -> String {
    let mut text = String::new();
    if result.outcome.is_correct() {
        if !result.feedback.is_empty() {
            text.push_str(&result.feedback);
            text.push('\n');
        }
        if let Some(message) = &result.advance_message {
            text.push_str(&format!("→ {message}\n"));
        }
    } else {
        text.push_str(&format!("✗ {}\n", result.feedback));
    }
    text
}

fn render_step(step: &Step, index: usize, total: usize) -> String {
    let mut text = format!("\n[{}/{}] {}\n", index + 1, total, step.label());
    if !step.description.is_empty() {
        text.push_str(&step.description);
        text.push('\n');
    }
    text
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent) * BAR_WIDTH / 100;
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn render_update(update: &TimelineUpdate) -> Option<String> {
    let snapshot = &update.snapshot;
    match update.kind {
        UpdateKind::ActorAppended { group, actor } => {
            let group = &snapshot.groups[group];
            Some(format!("{}: starting {}\n", group.label, group.actors[actor].name))
        }
        UpdateKind::StageAdvanced { group, actor, .. } => {
            let actor = &snapshot.groups[group].actors[actor];
            Some(format!(
                "  {:<12} [{}] {:>3}% {}\n",
                actor.name,
                progress_bar(actor.progress_percent),
                actor.progress_percent,
                actor.stage_label
            ))
        }
        UpdateKind::Tick => None,
        UpdateKind::Finished => Some(format!(
            "Finished in {:.1}s\n",
            snapshot.elapsed.as_secs_f64()
        )),
        UpdateKind::Cancelled => Some(format!(
            "Cancelled after {:.1}s\n",
            snapshot.elapsed.as_secs_f64()
        )),
    }
}

/// Summary of everything the catalog offers, for the `list` subcommand.
pub fn describe_catalog(catalog: &LessonCatalog) -> String {
    let mut text = String::from("Command categories (learn mode):\n");
    for category in catalog.categories() {
        text.push_str(&format!(
            "  {:<18} {} ({} commands)\n",
            category.id,
            category.title,
            category.commands.len()
        ));
    }
    text.push_str("\nWorkflows:\n");
    for workflow in catalog.workflows() {
        text.push_str(&format!(
            "  {:<18} {} ({} steps)\n",
            workflow.id,
            workflow.title,
            workflow.steps.len()
        ));
    }
    text.push_str("\nSimulations:\n");
    for preset in catalog.simulations() {
        text.push_str(&format!("  {:<18} {}\n", preset.id, preset.title));
    }
    text
}

pub struct Repl<R, W> {
    lines: Lines<R>,
    out: W,
}

impl<R, W> Repl<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            lines: input.lines(),
            out: output,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    async fn write(&mut self, text: &str) -> Result<(), TutorError> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }

    /// Free navigation over one command category until `:quit` or end of input.
    pub async fn run_learn(
        &mut self,
        catalog: &LessonCatalog,
        config: &TutorConfig,
        category_id: &str,
    ) -> Result<(), TutorError> {
        let mut category = catalog.category(category_id)?;
        let mut session = LearnSession::new(category.sequence()?, config);
        self.write(&format!("== {} ==\n{}\n", category.title, category.description))
            .await?;
        self.show_learn_step(&session).await?;

        loop {
            self.write(PROMPT).await?;
            let Some(line) = self.lines.next_line().await? else {
                break;
            };

            if let Some(command) = parse_command(&line) {
                match command {
                    ReplCommand::Quit => break,
                    ReplCommand::Help => self.write(LEARN_HELP).await?,
                    ReplCommand::Next => {
                        if session.next_step() {
                            self.show_learn_step(&session).await?;
                        } else {
                            self.write("Already at the last command.\n").await?;
                        }
                    }
                    ReplCommand::Previous => {
                        if session.previous_step() {
                            self.show_learn_step(&session).await?;
                        } else {
                            self.write("Already at the first command.\n").await?;
                        }
                    }
                    ReplCommand::Step(n) => match session.select_step(n - 1) {
                        Ok(()) => self.show_learn_step(&session).await?,
                        Err(e) => self.write(&format!("{e}\n")).await?,
                    },
                    ReplCommand::List => {
                        let mut text = String::new();
                        for (i, step) in session.steps().iter().enumerate() {
                            let marker = if i == session.position() { '>' } else { ' ' };
                            text.push_str(&format!("{marker} {:>2}. {}\n", i + 1, step.label()));
                        }
                        self.write(&text).await?;
                    }
                    ReplCommand::Category(id) => match catalog.category(&id) {
                        Ok(next) => {
                            category = next;
                            session.select_category(category.sequence()?);
                            self.write(&format!(
                                "== {} ==\n{}\n",
                                category.title, category.description
                            ))
                            .await?;
                            self.show_learn_step(&session).await?;
                        }
                        Err(e) => self.write(&format!("{e}\n")).await?,
                    },
                    ReplCommand::Reset => {
                        session.reset();
                        self.show_learn_step(&session).await?;
                    }
                    ReplCommand::Unknown(text) => {
                        self.write(&format!("Unknown command ':{text}'. Try :help\n"))
                            .await?
                    }
                }
                continue;
            }

            if let Some(result) = session.submit(&line) {
                self.write(&render_submission(&result)).await?;
            }
        }

        debug!(
            "Learn session ended with {} transcript entries",
            session.entries().len()
        );
        Ok(())
    }

    async fn show_learn_step(&mut self, session: &LearnSession) -> Result<(), TutorError> {
        let step = session.current()?;
        let text = render_step(step, session.position(), session.steps().len());
        self.write(&text).await
    }

    /// Linear workflow until `:quit` or end of input. The next step is shown
    /// as soon as the session advances on its own.
    pub async fn run_workflow(
        &mut self,
        workflow: &Workflow,
        config: &TutorConfig,
    ) -> Result<(), TutorError> {
        let session = WorkflowSession::new(workflow.sequence()?, config)?;
        let mut updates = session.subscribe();
        let mut shown_position = session.position();

        self.write(&format!("== {} ==\n{}\n", workflow.title, workflow.description))
            .await?;
        self.show_workflow_step(&session).await?;
        self.write(PROMPT).await?;

        loop {
            tokio::select! {
                line = self.lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match parse_command(&line) {
                        Some(ReplCommand::Quit) => break,
                        Some(ReplCommand::Help) => self.write(WORKFLOW_HELP).await?,
                        Some(ReplCommand::Reset) => {
                            session.reset();
                            shown_position = session.position();
                            self.show_workflow_step(&session).await?;
                        }
                        Some(other) => {
                            debug!("Command {:?} is not available in workflow mode", other);
                            self.write("Not available in workflow mode. Try :help\n").await?;
                        }
                        None => {
                            if let Some(result) = session.submit(&line) {
                                self.write(&render_submission(&result)).await?;
                                if result.completed {
                                    self.write(&format!(
                                        "\n🎉 {} complete! Type :reset to go again or :quit to leave.\n",
                                        workflow.title
                                    ))
                                    .await?;
                                }
                            }
                        }
                    }
                    self.write(PROMPT).await?;
                }
                Ok(()) = updates.changed() => {
                    let position = updates.borrow_and_update().position;
                    if position != shown_position {
                        shown_position = position;
                        self.write("\n").await?;
                        self.show_workflow_step(&session).await?;
                        self.write(PROMPT).await?;
                    }
                }
            }
        }

        debug!(
            "Workflow session ended at step {} (complete: {})",
            session.position(),
            session.is_complete()
        );
        Ok(())
    }

    async fn show_workflow_step(&mut self, session: &WorkflowSession) -> Result<(), TutorError> {
        let step = session.current()?;
        let text = render_step(&step, session.position(), session.step_count());
        self.write(&text).await
    }

    /// Play a simulation preset, printing appends and stage changes.
    pub async fn run_simulation(
        &mut self,
        preset: &SimulationPreset,
        timeline: &SimulationTimeline,
    ) -> Result<RunOutcome, TutorError> {
        self.write(&format!("== {} ==\n{}\n\n", preset.title, preset.description))
            .await?;

        let (tx, mut rx) = mpsc::unbounded_channel::<TimelineUpdate>();
        let run = timeline.run(&preset.groups, move |update| {
            tx.send(update).ok();
        });
        let render = async {
            while let Some(update) = rx.recv().await {
                if let Some(text) = render_update(&update) {
                    self.write(&text).await?;
                }
            }
            Ok::<(), TutorError>(())
        };

        let (outcome, rendered) = tokio::join!(run, render);
        rendered?;
        let outcome = outcome?;

        if !outcome.is_cancelled() {
            let mut summary = String::from("\nTime for one instance to be ready:\n");
            for group in &preset.groups {
                summary.push_str(&format!(
                    "  {:<18} {:.1}s\n",
                    group.label,
                    group.actor_duration().as_secs_f64()
                ));
            }
            self.write(&summary).await?;
        }
        Ok(outcome)
    }
}

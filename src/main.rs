use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tracing_subscriber::{self, filter::EnvFilter};

use docker_tutor::{
    catalog::LessonCatalog,
    config::TutorConfig,
    guided::HintPolicy,
    repl::{Repl, describe_catalog},
    simulation::SimulationTimeline,
};

/// Docker Tutor - learn Docker by typing the commands
#[derive(Parser, Debug)]
#[command(name = "docker-tutor")]
#[command(about = "Interactive terminal tutorial for Docker commands and concepts")]
#[command(version)]
struct Args {
    /// Delay before a workflow moves to the next step (in milliseconds)
    #[arg(
        long = "auto-advance-ms",
        default_value = "1000",
        help = "Delay before a workflow moves to the next step, in milliseconds"
    )]
    auto_advance_ms: u64,

    /// Elapsed-time tick during simulations (in milliseconds)
    #[arg(
        long = "tick-ms",
        default_value = "100",
        help = "Elapsed-time tick interval during simulations, in milliseconds"
    )]
    tick_ms: u64,

    /// How many characters of the expected command a learn-mode hint reveals
    #[arg(
        long = "hint-chars",
        default_value = "40",
        help = "Characters of the expected command revealed by learn-mode hints"
    )]
    hint_chars: usize,

    /// Reveal the whole expected command in learn mode too
    #[arg(long = "full-hints")]
    full_hints: bool,

    /// Directory with extra lesson files
    #[arg(
        long = "lessons-dir",
        help = "Directory with extra YAML/JSON lessons (default: ~/.docker-tutor/lessons)",
        value_name = "PATH"
    )]
    lessons_directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List categories, workflows and simulations
    List,
    /// Practice commands from one category in any order
    Learn {
        #[arg(long, default_value = "basics")]
        category: String,
    },
    /// Follow a guided workflow step by step
    Workflow {
        #[arg(long, default_value = "first-container")]
        name: String,
    },
    /// Watch a boot-time simulation
    Simulate {
        #[arg(long, default_value = "vm-vs-container")]
        preset: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never mix with the terminal session
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::debug!("Starting docker-tutor with args: {:?}", args);

    let config = create_config_from_args(&args);
    let catalog = LessonCatalog::from_config(&config).await?;
    let mut repl = Repl::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());

    match args.command {
        Command::List => print!("{}", describe_catalog(&catalog)),
        Command::Learn { category } => repl.run_learn(&catalog, &config, &category).await?,
        Command::Workflow { name } => {
            let workflow = catalog.workflow(&name)?;
            repl.run_workflow(workflow, &config).await?;
        }
        Command::Simulate { preset } => {
            let preset = catalog.simulation(&preset)?;
            let timeline = Arc::new(SimulationTimeline::new(config.tick_interval));

            let ctrl_c_timeline = timeline.clone();
            let ctrl_c = tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrl_c_timeline.cancel();
                }
            });

            let outcome = repl.run_simulation(preset, &timeline).await?;
            ctrl_c.abort();
            tracing::info!("Simulation cancelled: {}", outcome.is_cancelled());
        }
    }

    Ok(())
}

/// Create a TutorConfig from command line arguments
fn create_config_from_args(args: &Args) -> TutorConfig {
    let learn_hint = if args.full_hints {
        HintPolicy::Full
    } else {
        HintPolicy::Prefix {
            max_chars: args.hint_chars,
        }
    };

    let lessons_directory = args
        .lessons_directory
        .clone()
        .unwrap_or_else(TutorConfig::default_lessons_directory);

    TutorConfig {
        auto_advance_delay: Duration::from_millis(args.auto_advance_ms),
        tick_interval: Duration::from_millis(args.tick_ms),
        learn_hint,
        lessons_directory: Some(lessons_directory),
        ..Default::default()
    }
}

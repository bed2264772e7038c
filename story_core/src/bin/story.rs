use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use story_core::{load_story, EngineConfig, Session, SetupError, StdConsole};

/// Exit code for a story that could not be set up, used with `--strict`.
const SETUP_FAILURE: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "story", version)]
#[command(about = "Play a branching story from a YAML, JSON or TOML map file")]
struct Args {
    /// Story map to load
    #[arg(default_value = "data/map.yaml")]
    map: PathBuf,

    /// TOML file overriding rewards, prices and hazard items
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exit with a non-zero code when the story cannot be loaded
    #[arg(long)]
    strict: bool,

    /// Log engine decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "story_core=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn setup_failed(strict: bool) -> ExitCode {
    if strict {
        ExitCode::from(SETUP_FAILURE)
    } else {
        ExitCode::SUCCESS
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                println!("Failed to load config: {err}");
                return Ok(setup_failed(args.strict));
            }
        },
        None => EngineConfig::default(),
    };

    let graph = match load_story(&args.map) {
        Ok(graph) => graph,
        Err(SetupError::NotFound(path)) => {
            println!(
                "{} not found. Create the map file at {}",
                path.display(),
                path.display()
            );
            return Ok(setup_failed(args.strict));
        }
        Err(err) => {
            println!("Failed to load map: {err}");
            return Ok(setup_failed(args.strict));
        }
    };

    let mut console = StdConsole::stdio();
    let ending = Session::new(graph, config)
        .run(&mut console)
        .context("story session aborted")?;
    tracing::debug!(?ending, "story finished");
    Ok(ExitCode::SUCCESS)
}

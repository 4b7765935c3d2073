#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that solves and replays Descent levels.

mod config;
mod levels;

use std::path::PathBuf;

use anyhow::Result as AnyResult;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Breadth-first solver for tile dungeon levels.
#[derive(Debug, Parser)]
#[command(name = "descent", version)]
struct Cli {
    /// Configuration file; defaults apply when it does not exist.
    #[arg(long, global = true, default_value = "descent.toml")]
    config: PathBuf,
    /// Directory holding one sub-directory per level.
    #[arg(long, global = true)]
    levels_dir: Option<PathBuf>,
    /// Directory receiving solution transcripts.
    #[arg(long, global = true)]
    solutions_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve the named levels, or every level when none is named.
    Solve {
        /// Level directory names.
        levels: Vec<String>,
    },
    /// Replay a comma separated action list and print every step.
    Replay {
        /// Level directory name.
        level: String,
        /// Actions such as `UP, ABSORB_GROUND, RIGHT`.
        actions: String,
    },
}

/// Entry point for the Descent command-line interface.
fn main() -> AnyResult<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?.with_overrides(cli.levels_dir, cli.solutions_dir);
    init_tracing(&config.log_filter);

    match cli.command {
        Command::Solve { levels } => solve(&config, &levels),
        Command::Replay { level, actions } => {
            let actions = levels::parse_actions(&actions)?;
            let path = levels::named_level(&config.levels_dir, &level);
            let transcript = levels::replay_level(&path, &actions)?;
            print!("{transcript}");
            Ok(())
        }
    }
}

fn solve(config: &Config, names: &[String]) -> AnyResult<()> {
    let files = if names.is_empty() {
        levels::all_levels(&config.levels_dir)?
    } else {
        names
            .iter()
            .map(|name| levels::named_level(&config.levels_dir, name))
            .collect()
    };

    info!(levels = files.len(), "solving_levels");
    for file in files {
        let _ = levels::solve_level(&file, config)?;
    }
    Ok(())
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

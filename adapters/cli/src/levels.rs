//! Level discovery, solving and transcript output.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result as AnyResult};
use descent_core::{Action, Status};
use descent_import::load_level;
use descent_rendering::Transcript;
use descent_system_solver::{Discovery, SolveOutcome, Solver};
use descent_world::{query, Level, WorldState};
use tracing::{info, warn};

use crate::config::Config;

/// File name of a level export inside its directory.
const LEVEL_FILE: &str = "data.json";

/// Export path of a named level.
pub(crate) fn named_level(levels_dir: &Path, name: &str) -> PathBuf {
    levels_dir.join(name).join(LEVEL_FILE)
}

/// First `.json` file of every level directory, in sorted directory order.
pub(crate) fn all_levels(levels_dir: &Path) -> AnyResult<Vec<PathBuf>> {
    let directories = sorted_entries(levels_dir)?
        .into_iter()
        .filter(|path| path.is_dir())
        .collect::<Vec<_>>();

    let mut files = Vec::with_capacity(directories.len());
    for directory in directories {
        let export = sorted_entries(&directory)?
            .into_iter()
            .find(|path| path.extension().is_some_and(|extension| extension == "json"));
        match export {
            Some(export) => files.push(export),
            None => warn!(directory = %directory.display(), "level_directory_without_export"),
        }
    }
    Ok(files)
}

fn sorted_entries(directory: &Path) -> AnyResult<Vec<PathBuf>> {
    let entries = fs::read_dir(directory)
        .with_context(|| format!("failed to list {}", directory.display()))?;
    let mut paths = entries
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to list {}", directory.display()))?;
    paths.sort();
    Ok(paths)
}

/// File-name suffix of the transcript written for a discovery.
pub(crate) const fn suffix(status: Status) -> Option<&'static str> {
    match status {
        Status::Win => Some(""),
        Status::Rupee => Some("_rupee"),
        Status::Chest => Some("_chest"),
        Status::Exit => Some("_exit"),
        Status::Lose => None,
    }
}

/// Solves the export at `path`, writing a transcript for every discovery.
pub(crate) fn solve_level(path: &Path, config: &Config) -> AnyResult<SolveOutcome> {
    let (level, initial) =
        load_level(path).with_context(|| format!("failed to import {}", path.display()))?;
    info!(level = level.identifier(), path = %path.display(), "solving_level");

    fs::create_dir_all(&config.solutions_dir).with_context(|| {
        format!(
            "failed to create solutions directory {}",
            config.solutions_dir.display()
        )
    })?;

    let mut solver = Solver::new(&level, initial.clone()).with_config(config.solver_config());
    let mut failure = None;
    let outcome = solver.run(|discovery| {
        if failure.is_none() {
            failure = write_discovery(&level, &initial, &discovery, &config.solutions_dir).err();
        }
    });
    if let Some(error) = failure {
        return Err(error);
    }

    match outcome {
        SolveOutcome::Solved => {
            info!(level = level.identifier(), stats = %solver.stats(), "level_solved");
        }
        SolveOutcome::Exhausted => {
            warn!(level = level.identifier(), stats = %solver.stats(), "no solution found");
        }
    }
    Ok(outcome)
}

fn write_discovery(
    level: &Level,
    initial: &WorldState,
    discovery: &Discovery,
    solutions_dir: &Path,
) -> AnyResult<()> {
    let Some(suffix) = suffix(discovery.status) else {
        return Ok(());
    };
    let transcript = Transcript::replay(level, initial, &discovery.actions)
        .with_context(|| format!("failed to replay the {} path", discovery.status))?;
    let path = solutions_dir.join(format!("{}{suffix}.txt", level.identifier()));
    transcript.save(&path)?;
    info!(
        status = %discovery.status,
        path = %path.display(),
        rupees_remaining = query::rupees_remaining(&discovery.state),
        closed_chests = query::closed_chests(&discovery.state),
        "transcript_written"
    );
    Ok(())
}

/// Parses a comma separated list of action tokens.
pub(crate) fn parse_actions(list: &str) -> AnyResult<Vec<Action>> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<Action>().map_err(anyhow::Error::from))
        .collect()
}

/// Replays `actions` on the named level and renders the transcript.
pub(crate) fn replay_level(path: &Path, actions: &[Action]) -> AnyResult<Transcript> {
    let (level, initial) =
        load_level(path).with_context(|| format!("failed to import {}", path.display()))?;
    let transcript = Transcript::replay(&level, &initial, actions)
        .with_context(|| format!("failed to replay actions on {}", level.identifier()))?;
    let last = transcript.final_state();
    info!(
        level = level.identifier(),
        status = %transcript.status(),
        player = %query::player_position(&level, last),
        rupees_remaining = query::rupees_remaining(last),
        closed_chests = query::closed_chests(last),
        "replay_finished"
    );
    Ok(transcript)
}

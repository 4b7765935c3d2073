#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text presentation of levels, action lists and solution transcripts.

use std::{fmt, fs, path::Path};

use anyhow::{Context, Result as AnyResult};
use descent_core::{Action, Direction, Ground, IllegalAction, Occupant, Position, Status};
use descent_world::{classify, query, simulate, Level, WorldState};

/// Glyph drawn for a cell of the grid.
#[must_use]
pub fn glyph(level: &Level, state: &WorldState, position: Position) -> char {
    let Some(tile) = query::tile_at(level, state, position) else {
        return '#';
    };
    if tile.player {
        return '@';
    }
    match tile.occupant {
        Occupant::Boulder => return 'B',
        Occupant::ChestClosed => return 'C',
        Occupant::ChestOpen => return 'c',
        Occupant::BasicEnemy(Direction::Up) => return '⇑',
        Occupant::BasicEnemy(Direction::Down) => return '⇓',
        Occupant::BasicEnemy(Direction::Left) => return '⇐',
        Occupant::BasicEnemy(Direction::Right) => return '⇒',
        Occupant::Seeker => return 'S',
        Occupant::Empty => {}
    }
    match tile.ground {
        Ground::Passable => ' ',
        Ground::Hole => '□',
        Ground::Downstairs => '↓',
        Ground::Glass => '■',
    }
}

/// Draws the whole grid, one line per row.
#[must_use]
pub fn render_state(level: &Level, state: &WorldState) -> String {
    let mut out = String::new();
    for row in 0..level.height() {
        for column in 0..level.width() {
            out.push(glyph(level, state, Position::new(column, row)));
        }
        out.push('\n');
    }
    out
}

/// Two views of an action list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionSummary {
    /// Every token separated by `, `.
    pub raw: String,
    /// Consecutive repeats collapsed into `TOKEN x N`, one run per entry.
    pub runs: Vec<String>,
}

/// Summarizes an action list for humans.
#[must_use]
pub fn summarize(actions: &[Action]) -> ActionSummary {
    let raw = actions
        .iter()
        .map(|action| action.token())
        .collect::<Vec<_>>()
        .join(", ");

    let mut runs = Vec::new();
    let mut current: Option<(Action, usize)> = None;
    for &action in actions {
        if let Some((last, count)) = current.as_mut() {
            if *last == action {
                *count += 1;
                continue;
            }
        }
        if let Some(run) = current.replace((action, 1)) {
            runs.push(format_run(run));
        }
    }
    if let Some(run) = current {
        runs.push(format_run(run));
    }

    ActionSummary { raw, runs }
}

fn format_run((action, count): (Action, usize)) -> String {
    if count == 1 {
        action.token().to_owned()
    } else {
        format!("{action} x {count}")
    }
}

/// Step-by-step rendering of an action list replayed from the initial state.
#[derive(Clone, Debug)]
pub struct Transcript {
    text: String,
    status: Status,
    final_state: WorldState,
}

impl Transcript {
    /// Replays `actions` from `initial`, rendering the grid after every step.
    pub fn replay(
        level: &Level,
        initial: &WorldState,
        actions: &[Action],
    ) -> Result<Self, IllegalAction> {
        let summary = summarize(actions);
        let mut text = String::new();
        text.push_str(&summary.raw);
        text.push_str("\n\n");
        text.push_str(&summary.runs.join("\n"));
        text.push_str("\n\n");
        text.push_str(&render_state(level, initial));
        text.push('\n');

        let mut state = initial.clone();
        for &action in actions {
            state = simulate(level, &state, action)?;
            text.push_str(action.token());
            text.push('\n');
            text.push_str(&render_state(level, &state));
            text.push('\n');
        }

        let status = classify(level, &state);
        text.push_str(&status.to_string());
        text.push('\n');

        Ok(Self {
            text,
            status,
            final_state: state,
        })
    }

    /// Rendered transcript.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Classification of the last replayed state.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Last replayed state.
    #[must_use]
    pub const fn final_state(&self) -> &WorldState {
        &self.final_state
    }

    /// Writes the transcript to `path`, replacing any previous content.
    pub fn save(&self, path: &Path) -> AnyResult<()> {
        fs::write(path, &self.text)
            .with_context(|| format!("failed to write transcript to {}", path.display()))
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world model and rules engine for Descent.
//!
//! A [`Level`] holds the immutable tile layout; a [`WorldState`] is one
//! immutable snapshot of everything that changes while playing. The engine
//! maps a snapshot and an action to the next snapshot ([`simulate`]) and
//! enumerates all legal successors ([`expand`]); [`classify`] decides what a
//! snapshot means for the goal of the level.

mod builder;
mod engine;
mod level;
mod state;
mod tick;

pub use builder::{LevelBuilder, LevelError};
pub use engine::{expand, simulate};
pub use level::Level;
pub use state::WorldState;

use descent_core::{Ground, Occupant, Status};

/// Classifies a snapshot from its content alone.
///
/// Anything but standing on the downstairs is [`Status::Lose`]. On the
/// downstairs the outcome depends on which objectives remain: nothing left is
/// a win, missing rupees alone is [`Status::Rupee`], a closed chest alone is
/// [`Status::Chest`], and both outstanding is [`Status::Exit`].
#[must_use]
pub fn classify(level: &Level, state: &WorldState) -> Status {
    match state.ground()[state.player()] {
        Ground::Downstairs => {}
        Ground::Passable | Ground::Hole | Ground::Glass => return Status::Lose,
    }

    let chest_closed = level.has_chest() && state.up().contains(&Occupant::ChestClosed);
    let rupee_missing = state.rupees_found().contains(&false);

    match (chest_closed, rupee_missing) {
        (false, false) => Status::Win,
        (false, true) => Status::Rupee,
        (true, false) => Status::Chest,
        (true, true) => Status::Exit,
    }
}

/// Query functions that provide read-only views of a snapshot.
pub mod query {
    use descent_core::{Ground, Occupant, Position};

    use super::{Level, WorldState};

    /// Grid position of the player.
    #[must_use]
    pub fn player_position(level: &Level, state: &WorldState) -> Position {
        level.position(state.player())
    }

    /// Number of rupees not collected yet.
    #[must_use]
    pub fn rupees_remaining(state: &WorldState) -> usize {
        state.rupees_found().iter().filter(|found| !**found).count()
    }

    /// Number of chests still closed.
    #[must_use]
    pub fn closed_chests(state: &WorldState) -> usize {
        state
            .up()
            .iter()
            .filter(|occupant| **occupant == Occupant::ChestClosed)
            .count()
    }

    /// Content of the cell at `position`, `None` for walls.
    #[must_use]
    pub fn tile_at(level: &Level, state: &WorldState, position: Position) -> Option<TileView> {
        let index = level.position_index(position)?;
        let rupee = level
            .rupee_slot(index)
            .map_or(false, |slot| !state.rupees_found()[slot]);
        Some(TileView {
            ground: state.ground()[index],
            occupant: state.up()[index],
            player: index == state.player(),
            rupee,
        })
    }

    /// Immutable description of a single tile used for presentation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TileView {
        /// Terrain of the tile.
        pub ground: Ground,
        /// Occupant standing on the tile.
        pub occupant: Occupant,
        /// Whether the player stands on the tile.
        pub player: bool,
        /// Whether an uncollected rupee lies on the tile.
        pub rupee: bool,
    }
}

#[cfg(test)]
mod tests {
    use descent_core::{Action, Position};

    use super::*;

    fn sketch(rows: &[&str]) -> (Level, WorldState) {
        LevelBuilder::from_rows("classify", rows)
            .expect("sketch parses")
            .build()
            .expect("sketch builds")
    }

    #[test]
    fn standing_anywhere_but_the_exit_loses() {
        let (level, state) = sketch(&["@D"]);
        assert_eq!(classify(&level, &state), Status::Lose);
    }

    #[test]
    fn reaching_the_exit_with_nothing_left_wins() {
        let (level, state) = sketch(&["@D"]);
        let next = simulate(&level, &state, Action::Right).expect("walk onto the exit");
        assert_eq!(classify(&level, &next), Status::Win);
    }

    #[test]
    fn missing_rupee_alone_is_a_rupee_milestone() {
        let (level, state) = sketch(&["$@D"]);
        let next = simulate(&level, &state, Action::Right).expect("walk onto the exit");
        assert_eq!(classify(&level, &next), Status::Rupee);
    }

    #[test]
    fn closed_chest_alone_is_a_chest_milestone() {
        let (level, state) = sketch(&["C.", "@D"]);
        let next = simulate(&level, &state, Action::Right).expect("walk onto the exit");
        assert_eq!(classify(&level, &next), Status::Chest);
    }

    #[test]
    fn both_objectives_missing_is_an_exit_milestone() {
        let (level, state) = sketch(&["C$", "@D"]);
        let next = simulate(&level, &state, Action::Right).expect("walk onto the exit");
        assert_eq!(classify(&level, &next), Status::Exit);
    }

    #[test]
    fn tile_view_reports_walls_and_rupees() {
        let (level, state) = sketch(&["#$@"]);
        assert_eq!(query::tile_at(&level, &state, Position::new(0, 0)), None);
        let rupee = query::tile_at(&level, &state, Position::new(1, 0)).expect("rupee tile");
        assert!(rupee.rupee);
        assert!(!rupee.player);
        let player = query::tile_at(&level, &state, Position::new(2, 0)).expect("player tile");
        assert!(player.player);
        assert_eq!(query::rupees_remaining(&state), 1);
        assert_eq!(query::closed_chests(&state), 0);
        assert_eq!(query::player_position(&level, &state), Position::new(2, 0));
    }
}

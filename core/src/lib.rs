#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core vocabulary shared across the Descent puzzle solver.
//!
//! This crate defines the values that connect the importer, the
//! authoritative world engine, the breadth-first solver and the presentation
//! adapters. Levels are grids of addressable tiles; every tile carries one
//! [`Ground`] value and at most one [`Occupant`]. The player drives the world
//! exclusively through [`Action`] tokens, and the engine answers with either a
//! new world snapshot or an [`IllegalAction`].

use std::{fmt, ops::Add, str::FromStr};

use serde::{Deserialize, Serialize};

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Positions order row-major: first by row, then by column. Levels rely on
/// this ordering to binary search their sorted tile arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: i32,
    column: i32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based column index of the position.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the position.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, delta: Position) -> Position {
        Position::new(self.column + delta.column, self.row + delta.row)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cardinal directions used for facing, movement and enemy patrols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing row indices.
    Down,
    /// Toward decreasing column indices.
    Left,
    /// Toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in the fixed priority order used by successor expansion.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step that moves one tile along the direction.
    #[must_use]
    pub const fn delta(self) -> Position {
        match self {
            Self::Up => Position::new(0, -1),
            Self::Down => Position::new(0, 1),
            Self::Left => Position::new(-1, 0),
            Self::Right => Position::new(1, 0),
        }
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Movement action that walks toward this direction.
    #[must_use]
    pub const fn action(self) -> Action {
        match self {
            Self::Up => Action::Up,
            Self::Down => Action::Down,
            Self::Left => Action::Left,
            Self::Right => Action::Right,
        }
    }
}

/// Player commands understood by the world engine.
///
/// The serialized form and [`fmt::Display`] use the canonical upper-case
/// tokens (`UP`, `ABSORB_GROUND`, ...) which are also accepted by
/// [`FromStr`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Walk or turn toward the top of the grid.
    Up,
    /// Walk or turn toward the bottom of the grid.
    Down,
    /// Walk or turn toward the left edge of the grid.
    Left,
    /// Walk or turn toward the right edge of the grid.
    Right,
    /// Pick up the ground of the faced tile, leaving a hole behind.
    AbsorbGround,
    /// Drop the carried ground into the faced hole.
    CreateGround,
    /// Open the closed chest directly above the player.
    OpenChest,
}

impl Action {
    /// Every action token in its canonical order.
    pub const ALL: [Action; 7] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::AbsorbGround,
        Action::CreateGround,
        Action::OpenChest,
    ];

    /// Direction walked by a movement action, `None` for context actions.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::AbsorbGround | Self::CreateGround | Self::OpenChest => None,
        }
    }

    /// Canonical token naming the action.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::AbsorbGround => "ABSORB_GROUND",
            Self::CreateGround => "CREATE_GROUND",
            Self::OpenChest => "OPEN_CHEST",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Action::ALL
            .into_iter()
            .find(|action| action.token() == trimmed)
            .ok_or_else(|| ParseActionError {
                token: trimmed.to_owned(),
            })
    }
}

/// Terrain carried by a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ground {
    /// Solid floor.
    Passable,
    /// Missing floor; nothing may stand on it.
    Hole,
    /// The level exit.
    Downstairs,
    /// Fragile floor that breaks into a hole once walked off.
    Glass,
}

/// Dynamic content standing on top of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    /// Nothing stands on the tile.
    Empty,
    /// Pushable rock.
    Boulder,
    /// Chest that still has to be opened.
    ChestClosed,
    /// Chest that was opened.
    ChestOpen,
    /// Patrolling enemy that walks along its facing and turns around when blocked.
    BasicEnemy(Direction),
    /// Enemy that charges the player once it has a clear line of sight.
    Seeker,
}

impl Occupant {
    /// Reports whether the tile carries nothing.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Reports whether the occupant is an enemy of either kind.
    #[must_use]
    pub const fn is_enemy(self) -> bool {
        matches!(self, Self::BasicEnemy(_) | Self::Seeker)
    }
}

/// Single inventory slot of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Holding {
    /// Nothing is carried.
    #[default]
    Empty,
    /// Carrying absorbed passable ground.
    Ground,
    /// Carrying absorbed glass.
    Glass,
    /// Carrying the absorbed exit.
    Downstairs,
}

impl Holding {
    /// Slot content after absorbing the provided ground, `None` for holes.
    #[must_use]
    pub const fn absorbing(ground: Ground) -> Option<Self> {
        match ground {
            Ground::Passable => Some(Self::Ground),
            Ground::Glass => Some(Self::Glass),
            Ground::Downstairs => Some(Self::Downstairs),
            Ground::Hole => None,
        }
    }

    /// Ground that would be deposited from the slot, `None` when empty.
    #[must_use]
    pub const fn carried(self) -> Option<Ground> {
        match self {
            Self::Empty => None,
            Self::Ground => Some(Ground::Passable),
            Self::Glass => Some(Ground::Glass),
            Self::Downstairs => Some(Ground::Downstairs),
        }
    }
}

/// Classification of a world snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// The player stands on the exit with every chest opened and every rupee collected.
    Win,
    /// The player is not standing on the exit.
    Lose,
    /// The player stands on the exit, chests are open, but rupees are missing.
    Rupee,
    /// The player stands on the exit with every rupee, but a chest is still closed.
    Chest,
    /// The player stands on the exit with rupees missing and a chest closed.
    Exit,
}

impl Status {
    /// Partial-progress milestone represented by the status, if any.
    #[must_use]
    pub const fn milestone(self) -> Option<Milestone> {
        match self {
            Self::Rupee => Some(Milestone::Rupee),
            Self::Chest => Some(Milestone::Chest),
            Self::Exit => Some(Milestone::Exit),
            Self::Win | Self::Lose => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Win => "WIN",
            Self::Lose => "LOSE",
            Self::Rupee => "RUPEE",
            Self::Chest => "CHEST",
            Self::Exit => "EXIT",
        };
        f.write_str(label)
    }
}

/// Partial-progress classifications reported once per solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Milestone {
    /// Exit reached with only rupees missing.
    Rupee,
    /// Exit reached with only a closed chest remaining.
    Chest,
    /// Exit reached with both rupees and a chest outstanding.
    Exit,
}

impl Milestone {
    /// Every milestone kind.
    pub const ALL: [Milestone; 3] = [Milestone::Rupee, Milestone::Chest, Milestone::Exit];

    /// Status that carries this milestone.
    #[must_use]
    pub const fn status(self) -> Status {
        match self {
            Self::Rupee => Status::Rupee,
            Self::Chest => Status::Chest,
            Self::Exit => Status::Exit,
        }
    }
}

/// Error raised when a single-step playback requests an action that is not
/// legal from the provided state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("action {action} is not legal from the current state")]
pub struct IllegalAction {
    /// Action that was rejected.
    pub action: Action,
}

/// Error raised when a string does not name an action token.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown action token `{token}`")]
pub struct ParseActionError {
    /// Offending input, trimmed.
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::{Action, Direction, Ground, Holding, Occupant, Position, Status};
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn positions_order_by_row_then_column() {
        let mut positions = vec![
            Position::new(3, 1),
            Position::new(0, 2),
            Position::new(5, 0),
            Position::new(1, 1),
        ];
        positions.sort();
        assert_eq!(
            positions,
            vec![
                Position::new(5, 0),
                Position::new(1, 1),
                Position::new(3, 1),
                Position::new(0, 2),
            ]
        );
    }

    #[test]
    fn adding_a_delta_steps_one_tile() {
        let origin = Position::new(2, 2);
        assert_eq!(origin + Direction::Up.delta(), Position::new(2, 1));
        assert_eq!(origin + Direction::Down.delta(), Position::new(2, 3));
        assert_eq!(origin + Direction::Left.delta(), Position::new(1, 2));
        assert_eq!(origin + Direction::Right.delta(), Position::new(3, 2));
    }

    #[test]
    fn opposite_directions_cancel_out() {
        for direction in Direction::ALL {
            let back = Position::new(4, 4) + direction.delta() + direction.opposite().delta();
            assert_eq!(back, Position::new(4, 4));
        }
    }

    #[test]
    fn action_tokens_parse_back() {
        for action in Action::ALL {
            assert_eq!(action.token().parse::<Action>(), Ok(action));
        }
        assert_eq!(" OPEN_CHEST ".parse::<Action>(), Ok(Action::OpenChest));
        let error = "JUMP".parse::<Action>().expect_err("JUMP is not a token");
        assert_eq!(error.token, "JUMP");
    }

    #[test]
    fn only_movement_actions_carry_a_direction() {
        assert_eq!(Action::Left.direction(), Some(Direction::Left));
        assert_eq!(Action::AbsorbGround.direction(), None);
        assert_eq!(Action::CreateGround.direction(), None);
        assert_eq!(Action::OpenChest.direction(), None);
    }

    #[test]
    fn holding_mirrors_absorbed_ground() {
        for ground in [Ground::Passable, Ground::Glass, Ground::Downstairs] {
            let holding = Holding::absorbing(ground).expect("solid ground can be absorbed");
            assert_eq!(holding.carried(), Some(ground));
        }
        assert_eq!(Holding::absorbing(Ground::Hole), None);
        assert_eq!(Holding::Empty.carried(), None);
    }

    #[test]
    fn enemies_are_recognised() {
        assert!(Occupant::Seeker.is_enemy());
        assert!(Occupant::BasicEnemy(Direction::Left).is_enemy());
        assert!(!Occupant::Boulder.is_enemy());
        assert!(!Occupant::ChestClosed.is_enemy());
        assert!(Occupant::Empty.is_empty());
    }

    #[test]
    fn only_partial_exits_are_milestones() {
        assert!(Status::Win.milestone().is_none());
        assert!(Status::Lose.milestone().is_none());
        for status in [Status::Rupee, Status::Chest, Status::Exit] {
            let milestone = status.milestone().expect("milestone");
            assert_eq!(milestone.status(), status);
        }
    }

    #[test]
    fn occupant_round_trips_through_bincode() {
        assert_round_trip(&Occupant::BasicEnemy(Direction::Down));
    }

    #[test]
    fn action_displays_canonical_token() {
        assert_round_trip(&Action::CreateGround);
        assert_eq!(Action::AbsorbGround.to_string(), "ABSORB_GROUND");
    }
}

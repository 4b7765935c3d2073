//! Assembly of a [`Level`] and its initial [`WorldState`].

use descent_core::{Direction, Ground, Occupant, Position};

use crate::{Level, WorldState};

/// Reasons a level description cannot be turned into a playable level.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    /// No ground tile was declared.
    #[error("level declares no tiles")]
    Empty,
    /// The same position received two ground values.
    #[error("tile {0} is declared twice")]
    DuplicateTile(Position),
    /// The same tile received two occupants.
    #[error("tile {0} holds more than one occupant")]
    DuplicateOccupant(Position),
    /// An occupant was placed where there is no tile.
    #[error("occupant at {0} does not stand on a tile")]
    OccupantOffGrid(Position),
    /// A rupee was placed where there is no tile.
    #[error("rupee at {0} does not lie on a tile")]
    RupeeOffGrid(Position),
    /// No player start was declared.
    #[error("level has no player start")]
    MissingPlayer,
    /// The player start is not a tile.
    #[error("player start {0} is not a tile")]
    PlayerOffGrid(Position),
    /// The player start is taken by an occupant.
    #[error("player start {0} is already occupied")]
    PlayerOccupied(Position),
    /// A sketch row contains a character outside the legend.
    #[error("unknown glyph `{glyph}` at {position}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Cell where it appeared.
        position: Position,
    },
}

/// Collects tiles, occupants, rupees and the player start of a level.
///
/// Declarations may arrive in any order; [`LevelBuilder::build`] sorts tiles
/// row-major, aligns both layers with the sorted tile array and validates
/// that every occupant, rupee and the player start lie on a tile.
#[derive(Clone, Debug, Default)]
pub struct LevelBuilder {
    identifier: String,
    width: i32,
    height: i32,
    grounds: Vec<(Position, Ground)>,
    occupants: Vec<(Position, Occupant)>,
    rupees: Vec<Position>,
    player: Option<(Position, Direction)>,
}

impl LevelBuilder {
    /// Starts an empty level description.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Parses a compact text sketch, one string per grid row.
    ///
    /// Legend: `#` wall, `.` ground, `_` hole, `:` glass, `D` downstairs,
    /// `B` boulder, `C` closed chest, `c` open chest, `S` seeker, `^` `v`
    /// `<` `>` basic enemies by facing, `$` rupee, `@` player. Occupants,
    /// rupees and the player stand on ground. The player faces down unless
    /// [`LevelBuilder::facing`] says otherwise.
    pub fn from_rows(identifier: impl Into<String>, rows: &[&str]) -> Result<Self, LevelError> {
        let mut builder = Self::new(identifier);
        for (row, line) in rows.iter().enumerate() {
            for (column, glyph) in line.chars().enumerate() {
                let position = Position::new(column as i32, row as i32);
                builder.width = builder.width.max(column as i32 + 1);
                let occupant = match glyph {
                    '#' => continue,
                    '.' => None,
                    '_' => {
                        builder.grounds.push((position, Ground::Hole));
                        continue;
                    }
                    ':' => {
                        builder.grounds.push((position, Ground::Glass));
                        continue;
                    }
                    'D' => {
                        builder.grounds.push((position, Ground::Downstairs));
                        continue;
                    }
                    'B' => Some(Occupant::Boulder),
                    'C' => Some(Occupant::ChestClosed),
                    'c' => Some(Occupant::ChestOpen),
                    'S' => Some(Occupant::Seeker),
                    '^' => Some(Occupant::BasicEnemy(Direction::Up)),
                    'v' => Some(Occupant::BasicEnemy(Direction::Down)),
                    '<' => Some(Occupant::BasicEnemy(Direction::Left)),
                    '>' => Some(Occupant::BasicEnemy(Direction::Right)),
                    '$' => {
                        builder.rupees.push(position);
                        None
                    }
                    '@' => {
                        builder.player = Some((position, Direction::Down));
                        None
                    }
                    other => {
                        return Err(LevelError::UnknownGlyph {
                            glyph: other,
                            position,
                        })
                    }
                };
                builder.grounds.push((position, Ground::Passable));
                if let Some(occupant) = occupant {
                    builder.occupants.push((position, occupant));
                }
            }
        }
        builder.height = rows.len() as i32;
        Ok(builder)
    }

    /// Ensures the grid spans at least `width` columns and `height` rows.
    #[must_use]
    pub fn extent(mut self, width: i32, height: i32) -> Self {
        self.width = self.width.max(width);
        self.height = self.height.max(height);
        self
    }

    /// Declares a tile with the provided ground.
    #[must_use]
    pub fn ground(mut self, position: Position, ground: Ground) -> Self {
        self.grounds.push((position, ground));
        self
    }

    /// Places an occupant on a declared tile.
    #[must_use]
    pub fn occupant(mut self, position: Position, occupant: Occupant) -> Self {
        self.occupants.push((position, occupant));
        self
    }

    /// Places a rupee on a declared tile.
    #[must_use]
    pub fn rupee(mut self, position: Position) -> Self {
        self.rupees.push(position);
        self
    }

    /// Sets the player start and facing.
    #[must_use]
    pub fn player(mut self, position: Position, facing: Direction) -> Self {
        self.player = Some((position, facing));
        self
    }

    /// Overrides the facing of an already declared player start.
    #[must_use]
    pub fn facing(mut self, facing: Direction) -> Self {
        if let Some((_, current)) = self.player.as_mut() {
            *current = facing;
        }
        self
    }

    /// Validates the description and produces the level with its initial state.
    pub fn build(self) -> Result<(Level, WorldState), LevelError> {
        let mut grounds = self.grounds;
        grounds.sort_by_key(|(position, _)| *position);
        if let Some(pair) = grounds.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(LevelError::DuplicateTile(pair[0].0));
        }
        if grounds.is_empty() {
            return Err(LevelError::Empty);
        }

        let positions: Vec<Position> = grounds.iter().map(|(position, _)| *position).collect();
        let ground: Vec<Ground> = grounds.iter().map(|(_, ground)| *ground).collect();
        let index_of = |position: Position| positions.binary_search(&position).ok();

        let mut up = vec![Occupant::Empty; positions.len()];
        for (position, occupant) in self.occupants {
            let index = index_of(position).ok_or(LevelError::OccupantOffGrid(position))?;
            if !up[index].is_empty() {
                return Err(LevelError::DuplicateOccupant(position));
            }
            up[index] = occupant;
        }

        let mut rupees = self
            .rupees
            .into_iter()
            .map(|position| index_of(position).ok_or(LevelError::RupeeOffGrid(position)))
            .collect::<Result<Vec<_>, _>>()?;
        rupees.sort_unstable();
        rupees.dedup();

        let (start, facing) = self.player.ok_or(LevelError::MissingPlayer)?;
        let player = index_of(start).ok_or(LevelError::PlayerOffGrid(start))?;
        if !up[player].is_empty() {
            return Err(LevelError::PlayerOccupied(start));
        }

        let has_chest = up.contains(&Occupant::ChestClosed);
        let width = positions
            .iter()
            .map(|position| position.column() + 1)
            .fold(self.width, i32::max);
        let height = positions
            .iter()
            .map(|position| position.row() + 1)
            .fold(self.height, i32::max);

        let rupee_count = rupees.len();
        let level = Level::new(self.identifier, width, height, positions, rupees, has_chest);
        let state = WorldState::initial(player, facing, ground, up, rupee_count);
        Ok((level, state))
    }
}

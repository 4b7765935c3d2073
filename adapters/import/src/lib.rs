#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Loader for level-editor JSON exports.
//!
//! Exports list entities by kind, each at a pixel coordinate. Coordinates are
//! divided by [`TILE_SIZE`] to obtain grid cells. Cells covered by a ground
//! entity become tiles; everything else is wall.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use descent_core::{Direction, Ground, Occupant, Position};
use descent_world::{Level, LevelBuilder, LevelError, WorldState};
use serde::Deserialize;
use tracing::debug;

/// Edge length of one tile in export pixels.
pub const TILE_SIZE: i32 = 16;

/// Failures raised while turning an export into a level.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The export file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The export is not valid JSON or does not match the expected shape.
    #[error("invalid level export")]
    Json(#[from] serde_json::Error),
    /// No player start entity was present.
    #[error("level has no player start position")]
    MissingPlayer,
    /// A directional entity lacks its direction field.
    #[error("{kind} at {position} has no direction")]
    MissingDirection {
        /// Entity kind as named in the export.
        kind: &'static str,
        /// Grid cell of the entity.
        position: Position,
    },
    /// The entities do not describe a consistent level.
    #[error("inconsistent level layout")]
    Level(#[from] LevelError),
}

/// Reads and parses the export stored at `path`.
pub fn load_level(path: &Path) -> Result<(Level, WorldState), ImportError> {
    let contents = fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_level(&contents)
}

/// Parses an export held in memory.
pub fn parse_level(json: &str) -> Result<(Level, WorldState), ImportError> {
    let export: LevelExport = serde_json::from_str(json)?;
    let (level, state) = export.into_builder()?.build()?;
    debug!(
        level = level.identifier(),
        tiles = level.tile_count(),
        rupees = level.rupees().len(),
        "level_imported"
    );
    Ok((level, state))
}

#[derive(Debug, Deserialize)]
struct LevelExport {
    identifier: String,
    #[serde(default)]
    entities: Entities,
}

#[derive(Debug, Default, Deserialize)]
struct Entities {
    #[serde(rename = "Boulder", default)]
    boulder: Option<Vec<Entity>>,
    #[serde(rename = "Chest", default)]
    chest: Option<Vec<Entity>>,
    #[serde(rename = "Down_stairs", default)]
    down_stairs: Option<Vec<Entity>>,
    #[serde(rename = "Enemy_basic", alias = "Enemy", default)]
    enemy_basic: Option<Vec<Entity>>,
    #[serde(rename = "Enemy_seeker", default)]
    enemy_seeker: Option<Vec<Entity>>,
    #[serde(rename = "Glass", default)]
    glass: Option<Vec<Entity>>,
    #[serde(rename = "Ground", default)]
    ground: Option<Vec<Entity>>,
    #[serde(rename = "Hole", default)]
    hole: Option<Vec<Entity>>,
    #[serde(rename = "Player_start_position", default)]
    player_start: Option<Vec<Entity>>,
    #[serde(rename = "Rupee", default)]
    rupee: Option<Vec<Entity>>,
    #[serde(rename = "Wall", default)]
    wall: Option<Vec<Entity>>,
}

#[derive(Debug, Deserialize)]
struct Entity {
    x: i32,
    y: i32,
    #[serde(rename = "customFields", default)]
    custom_fields: Option<CustomFields>,
}

#[derive(Debug, Deserialize)]
struct CustomFields {
    #[serde(default)]
    direction: Option<Direction>,
}

impl Entity {
    fn position(&self) -> Position {
        Position::new(self.x.div_euclid(TILE_SIZE), self.y.div_euclid(TILE_SIZE))
    }

    fn direction(&self, kind: &'static str) -> Result<Direction, ImportError> {
        self.custom_fields
            .as_ref()
            .and_then(|fields| fields.direction)
            .ok_or(ImportError::MissingDirection {
                kind,
                position: self.position(),
            })
    }
}

fn each(entities: &Option<Vec<Entity>>) -> impl Iterator<Item = &Entity> {
    entities.iter().flatten()
}

impl LevelExport {
    fn into_builder(self) -> Result<LevelBuilder, ImportError> {
        let entities = &self.entities;

        // Earlier kinds win when two entities share a cell.
        let mut grounds = BTreeMap::new();
        for (list, ground) in [
            (&entities.ground, Ground::Passable),
            (&entities.hole, Ground::Hole),
            (&entities.glass, Ground::Glass),
            (&entities.down_stairs, Ground::Downstairs),
        ] {
            for entity in each(list) {
                let _ = grounds.entry(entity.position()).or_insert(ground);
            }
        }

        let mut occupants = BTreeMap::new();
        for entity in each(&entities.chest) {
            let _ = occupants
                .entry(entity.position())
                .or_insert(Occupant::ChestClosed);
        }
        for entity in each(&entities.boulder) {
            let _ = occupants.entry(entity.position()).or_insert(Occupant::Boulder);
        }
        for entity in each(&entities.enemy_seeker) {
            let _ = occupants.entry(entity.position()).or_insert(Occupant::Seeker);
        }
        for entity in each(&entities.enemy_basic) {
            let facing = entity.direction("Enemy_basic")?;
            let _ = occupants
                .entry(entity.position())
                .or_insert(Occupant::BasicEnemy(facing));
        }

        let start = each(&entities.player_start)
            .next()
            .ok_or(ImportError::MissingPlayer)?;
        let facing = start.direction("Player_start_position")?;

        let (width, height) = self.extent();
        let mut builder = LevelBuilder::new(self.identifier.as_str())
            .extent(width, height)
            .player(start.position(), facing);
        for (position, ground) in grounds {
            builder = builder.ground(position, ground);
        }
        for (position, occupant) in occupants {
            builder = builder.occupant(position, occupant);
        }
        for entity in each(&entities.rupee) {
            builder = builder.rupee(entity.position());
        }
        Ok(builder)
    }

    /// Grid size spanned by every entity, walls included.
    fn extent(&self) -> (i32, i32) {
        let entities = &self.entities;
        [
            &entities.boulder,
            &entities.chest,
            &entities.down_stairs,
            &entities.enemy_basic,
            &entities.enemy_seeker,
            &entities.glass,
            &entities.ground,
            &entities.hole,
            &entities.player_start,
            &entities.rupee,
            &entities.wall,
        ]
        .into_iter()
        .flat_map(each)
        .map(Entity::position)
        .fold((0, 0), |(width, height), position| {
            (width.max(position.column() + 1), height.max(position.row() + 1))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_map_to_cells() {
        let entity = Entity {
            x: 47,
            y: 16,
            custom_fields: None,
        };
        assert_eq!(entity.position(), Position::new(2, 1));
    }

    #[test]
    fn missing_direction_names_the_entity() {
        let entity = Entity {
            x: 0,
            y: 32,
            custom_fields: Some(CustomFields { direction: None }),
        };
        match entity.direction("Enemy_basic") {
            Err(ImportError::MissingDirection { kind, position }) => {
                assert_eq!(kind, "Enemy_basic");
                assert_eq!(position, Position::new(0, 2));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}

use std::path::Path;

use descent_core::{Direction, Ground, Holding, Occupant, Position};
use descent_import::{load_level, parse_level, ImportError};
use descent_world::LevelError;
use serde_json::json;

fn at(column: i32, row: i32) -> serde_json::Value {
    json!({ "x": column * 16, "y": row * 16 })
}

fn facing(column: i32, row: i32, direction: &str) -> serde_json::Value {
    json!({
        "x": column * 16,
        "y": row * 16,
        "customFields": { "direction": direction }
    })
}

#[test]
fn export_becomes_a_level_and_initial_state() {
    let export = json!({
        "identifier": "Level_0",
        "entities": {
            "Ground": [at(0, 0), at(1, 0), at(2, 0), at(0, 1)],
            "Glass": [at(1, 1)],
            "Hole": [at(2, 1)],
            "Down_stairs": [at(3, 1)],
            "Boulder": [at(1, 0)],
            "Chest": [at(0, 1)],
            "Enemy_basic": [facing(2, 0, "Left")],
            "Rupee": [at(1, 1)],
            "Wall": [at(4, 2)],
            "Player_start_position": [facing(0, 0, "Right")]
        }
    });

    let (level, state) = parse_level(&export.to_string()).expect("export imports");

    assert_eq!(level.identifier(), "Level_0");
    assert_eq!((level.width(), level.height()), (5, 3));
    assert_eq!(level.tile_count(), 7);
    assert!(level.has_chest());
    assert_eq!(level.position(state.player()), Position::new(0, 0));
    assert_eq!(state.facing(), Direction::Right);
    assert_eq!(state.holding(), Holding::Empty);
    assert_eq!(state.rupees_found(), &[false]);

    let index = |column, row| {
        level
            .position_index(Position::new(column, row))
            .expect("tile exists")
    };
    assert_eq!(state.ground()[index(1, 1)], Ground::Glass);
    assert_eq!(state.ground()[index(2, 1)], Ground::Hole);
    assert_eq!(state.ground()[index(3, 1)], Ground::Downstairs);
    assert_eq!(state.up()[index(1, 0)], Occupant::Boulder);
    assert_eq!(state.up()[index(0, 1)], Occupant::ChestClosed);
    assert_eq!(
        state.up()[index(2, 0)],
        Occupant::BasicEnemy(Direction::Left)
    );
    assert_eq!(level.rupees(), &[index(1, 1)]);
}

#[test]
fn ground_kinds_resolve_by_priority() {
    let export = json!({
        "identifier": "overlap",
        "entities": {
            "Ground": [at(0, 0)],
            "Hole": [at(0, 0), at(1, 0)],
            "Glass": [at(1, 0), at(2, 0)],
            "Down_stairs": [at(2, 0)],
            "Player_start_position": [facing(0, 0, "Up")]
        }
    });

    let (_, state) = parse_level(&export.to_string()).expect("export imports");
    assert_eq!(
        state.ground(),
        &[Ground::Passable, Ground::Hole, Ground::Glass]
    );
}

#[test]
fn occupants_resolve_by_priority() {
    let export = json!({
        "identifier": "stacked",
        "entities": {
            "Ground": [at(0, 0), at(1, 0), at(2, 0)],
            "Chest": [at(1, 0)],
            "Boulder": [at(1, 0), at(2, 0)],
            "Enemy_seeker": [at(2, 0)],
            "Player_start_position": [facing(0, 0, "Down")]
        }
    });

    let (_, state) = parse_level(&export.to_string()).expect("export imports");
    assert_eq!(
        state.up(),
        &[Occupant::Empty, Occupant::ChestClosed, Occupant::Boulder]
    );
}

#[test]
fn legacy_enemy_kind_is_a_basic_enemy() {
    let export = json!({
        "identifier": "legacy",
        "entities": {
            "Ground": [at(0, 0), at(1, 0)],
            "Enemy": [facing(1, 0, "Down")],
            "Player_start_position": [facing(0, 0, "Down")]
        }
    });

    let (_, state) = parse_level(&export.to_string()).expect("export imports");
    assert_eq!(state.up()[1], Occupant::BasicEnemy(Direction::Down));
}

#[test]
fn null_and_missing_lists_are_empty() {
    let export = json!({
        "identifier": "sparse",
        "entities": {
            "Ground": [at(0, 0)],
            "Boulder": null,
            "Player_start_position": [facing(0, 0, "Left")]
        }
    });

    let (level, state) = parse_level(&export.to_string()).expect("export imports");
    assert_eq!(level.tile_count(), 1);
    assert!(state.rupees_found().is_empty());
    assert!(!level.has_chest());
}

#[test]
fn missing_player_start_is_reported() {
    let export = json!({
        "identifier": "nobody",
        "entities": { "Ground": [at(0, 0)] }
    });

    let error = parse_level(&export.to_string()).expect_err("no player");
    assert!(matches!(error, ImportError::MissingPlayer));
}

#[test]
fn enemy_without_direction_is_reported() {
    let export = json!({
        "identifier": "lost",
        "entities": {
            "Ground": [at(0, 0), at(0, 1)],
            "Enemy_basic": [at(0, 1)],
            "Player_start_position": [facing(0, 0, "Down")]
        }
    });

    let error = parse_level(&export.to_string()).expect_err("enemy has no direction");
    match error {
        ImportError::MissingDirection { kind, position } => {
            assert_eq!(kind, "Enemy_basic");
            assert_eq!(position, Position::new(0, 1));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn player_on_a_wall_is_reported() {
    let export = json!({
        "identifier": "walled in",
        "entities": {
            "Ground": [at(0, 0)],
            "Wall": [at(1, 0)],
            "Player_start_position": [facing(1, 0, "Down")]
        }
    });

    let error = parse_level(&export.to_string()).expect_err("player stands on a wall");
    assert!(matches!(
        error,
        ImportError::Level(LevelError::PlayerOffGrid(position)) if position == Position::new(1, 0)
    ));
}

#[test]
fn malformed_json_is_reported() {
    let error = parse_level("{ \"identifier\": ").expect_err("truncated export");
    assert!(matches!(error, ImportError::Json(_)));
}

#[test]
fn unreadable_file_names_the_path() {
    let path = Path::new("definitely/not/a/level.json");
    let error = load_level(path).expect_err("file does not exist");
    match error {
        ImportError::Read { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

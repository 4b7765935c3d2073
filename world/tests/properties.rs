use std::collections::{HashSet, VecDeque};

use descent_core::{Action, Direction};
use descent_world::{classify, expand, simulate, Level, LevelBuilder, WorldState};

const ROWS: &[&str] = &["$.B.:", ".C.>.", "@.S_D", "..:.."];

#[test]
fn successors_keep_layers_aligned_with_the_level() {
    let (level, states) = explore(4);
    for state in &states {
        assert_eq!(state.ground().len(), level.tile_count());
        assert_eq!(state.up().len(), level.tile_count());
        assert_eq!(state.rupees_found().len(), level.rupees().len());
        assert!(state.player() < level.tile_count());
        assert!(!state.up()[state.player()].is_enemy());
    }
}

#[test]
fn collected_rupees_stay_collected() {
    let (level, states) = explore(4);
    for state in &states {
        for successor in expand(&level, state) {
            for (before, after) in state.rupees_found().iter().zip(successor.rupees_found()) {
                assert!(!before || *after, "a rupee was uncollected");
            }
        }
    }
}

#[test]
fn simulate_is_referentially_transparent() {
    let (level, states) = explore(3);
    for state in &states {
        let snapshot = state.clone();
        for action in Action::ALL {
            let first = simulate(&level, state, action);
            let second = simulate(&level, state, action);
            assert_eq!(first, second, "{action} is not deterministic");
        }
        assert_eq!(state, &snapshot, "simulate mutated its input");
        assert_eq!(state.ground(), snapshot.ground());
        assert_eq!(state.up(), snapshot.up());
    }
}

#[test]
fn successor_depth_and_trail_extend_the_parent() {
    let (level, states) = explore(3);
    for state in &states {
        for successor in expand(&level, state) {
            assert_eq!(successor.depth(), state.depth() + 1);
            let mut expected = state.actions();
            expected.push(successor.last_action().expect("successor has an action"));
            assert_eq!(successor.actions(), expected);
        }
    }
}

#[test]
fn replaying_the_trail_reproduces_the_state() {
    let (level, states) = explore(4);
    let initial = initial();
    for state in &states {
        let mut replayed = initial.clone();
        for action in state.actions() {
            replayed = simulate(&level, &replayed, action).expect("recorded action is legal");
        }
        assert_eq!(&replayed, state);
    }
}

#[test]
fn classify_is_pure() {
    let (level, states) = explore(3);
    for state in &states {
        assert_eq!(classify(&level, state), classify(&level, &state.clone()));
    }
}

fn initial() -> WorldState {
    build().1
}

fn build() -> (Level, WorldState) {
    LevelBuilder::from_rows("properties", ROWS)
        .expect("sketch parses")
        .facing(Direction::Right)
        .build()
        .expect("sketch builds")
}

/// Breadth-first enumeration of distinct states up to `depth` actions deep.
fn explore(depth: usize) -> (Level, Vec<WorldState>) {
    let (level, start) = build();
    let mut seen = HashSet::new();
    let mut states = Vec::new();
    let mut queue = VecDeque::new();
    let _ = seen.insert(start.clone());
    queue.push_back(start);

    while let Some(state) = queue.pop_front() {
        if state.depth() < depth {
            for successor in expand(&level, &state) {
                if seen.insert(successor.clone()) {
                    queue.push_back(successor);
                }
            }
        }
        states.push(state);
    }
    (level, states)
}

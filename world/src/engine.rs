//! Deterministic transition engine.
//!
//! Every function here is pure: it reads a parent [`WorldState`] and either
//! produces a freshly allocated successor or reports that the action is not
//! legal. Actions whose post-move tick leaves an enemy on the player's tile
//! are discarded as illegal rather than producing a defeated state.

use std::rc::Rc;

use descent_core::{Action, Direction, Ground, Holding, IllegalAction, Occupant};

use crate::{Level, WorldState};

/// Applies a single action, failing if it is not legal from `state`.
pub fn simulate(
    level: &Level,
    state: &WorldState,
    action: Action,
) -> Result<WorldState, IllegalAction> {
    let next = match action.direction() {
        Some(direction) => walk(level, state, direction),
        None => interact(level, state).filter(|next| next.last_action() == Some(action)),
    };
    next.ok_or(IllegalAction { action })
}

/// Enumerates every legal successor of `state`.
///
/// Successors are produced in the fixed priority order up, down, left,
/// right, followed by the context action bound to the player's facing.
#[must_use]
pub fn expand(level: &Level, state: &WorldState) -> Vec<WorldState> {
    let mut successors = Vec::with_capacity(Direction::ALL.len() + 1);
    for direction in Direction::ALL {
        if let Some(next) = walk(level, state, direction) {
            successors.push(next);
        }
    }
    if let Some(next) = interact(level, state) {
        successors.push(next);
    }
    successors
}

fn walk(level: &Level, state: &WorldState, direction: Direction) -> Option<WorldState> {
    let action = direction.action();
    let mut draft = Draft::new(level, state);
    draft.facing = direction;

    let Some(target) = level.neighbor(state.player, direction) else {
        return draft.settle(action, None);
    };

    match state.up[target] {
        Occupant::Boulder => return push_boulder(draft, target, direction, action),
        Occupant::ChestClosed | Occupant::ChestOpen => return draft.settle(action, None),
        Occupant::BasicEnemy(_) | Occupant::Seeker => return None,
        Occupant::Empty => {}
    }

    match state.ground[target] {
        Ground::Hole => None,
        Ground::Passable | Ground::Downstairs | Ground::Glass => {
            draft.player = target;
            draft.settle(action, None)
        }
    }
}

fn push_boulder(
    mut draft: Draft<'_>,
    boulder: usize,
    direction: Direction,
    action: Action,
) -> Option<WorldState> {
    let Some(beyond) = draft.level.neighbor(boulder, direction) else {
        return draft.settle(action, None);
    };

    match draft.parent.up[beyond] {
        Occupant::Boulder | Occupant::ChestClosed | Occupant::ChestOpen => {
            draft.settle(action, None)
        }
        Occupant::BasicEnemy(_) | Occupant::Seeker => {
            draft.lift_boulder(boulder);
            draft.set_up(beyond, Occupant::Boulder);
            draft.settle(action, Some(beyond))
        }
        Occupant::Empty => match draft.parent.ground[beyond] {
            Ground::Hole => {
                draft.lift_boulder(boulder);
                draft.settle(action, None)
            }
            Ground::Passable | Ground::Downstairs | Ground::Glass => {
                draft.lift_boulder(boulder);
                draft.set_up(beyond, Occupant::Boulder);
                draft.settle(action, None)
            }
        },
    }
}

fn interact(level: &Level, state: &WorldState) -> Option<WorldState> {
    let target = level.neighbor(state.player, state.facing)?;
    let mut draft = Draft::new(level, state);

    match state.up[target] {
        Occupant::Boulder | Occupant::ChestOpen | Occupant::BasicEnemy(_) | Occupant::Seeker => {
            None
        }
        Occupant::ChestClosed => {
            // Chests only open from below.
            if state.facing != Direction::Up {
                return None;
            }
            draft.set_up(target, Occupant::ChestOpen);
            draft.settle(Action::OpenChest, None)
        }
        Occupant::Empty => match (state.ground[target], state.holding) {
            (Ground::Hole, held) => {
                let deposit = held.carried()?;
                draft.set_ground(target, deposit);
                draft.holding = Holding::Empty;
                draft.settle(Action::CreateGround, None)
            }
            (ground @ (Ground::Passable | Ground::Downstairs | Ground::Glass), Holding::Empty) => {
                draft.holding = Holding::absorbing(ground)?;
                draft.set_ground(target, Ground::Hole);
                if let Some(slot) = level.rupee_slot(target) {
                    draft.collect_rupee(slot);
                }
                draft.settle(Action::AbsorbGround, None)
            }
            (Ground::Passable | Ground::Downstairs | Ground::Glass, _) => None,
        },
    }
}

/// Successor under construction.
///
/// Layers start out shared with the parent and are copied on first write.
pub(crate) struct Draft<'a> {
    pub(crate) level: &'a Level,
    pub(crate) parent: &'a WorldState,
    pub(crate) player: usize,
    pub(crate) facing: Direction,
    pub(crate) holding: Holding,
    ground: Rc<Vec<Ground>>,
    up: Rc<Vec<Occupant>>,
    rupees: Rc<Vec<bool>>,
}

impl<'a> Draft<'a> {
    fn new(level: &'a Level, parent: &'a WorldState) -> Self {
        Self {
            level,
            parent,
            player: parent.player,
            facing: parent.facing,
            holding: parent.holding,
            ground: Rc::clone(&parent.ground),
            up: Rc::clone(&parent.up),
            rupees: Rc::clone(&parent.rupees),
        }
    }

    pub(crate) fn ground(&self, index: usize) -> Ground {
        self.ground[index]
    }

    pub(crate) fn up(&self, index: usize) -> Occupant {
        self.up[index]
    }

    pub(crate) fn set_ground(&mut self, index: usize, ground: Ground) {
        if self.ground[index] != ground {
            Rc::make_mut(&mut self.ground)[index] = ground;
        }
    }

    pub(crate) fn set_up(&mut self, index: usize, occupant: Occupant) {
        if self.up[index] != occupant {
            Rc::make_mut(&mut self.up)[index] = occupant;
        }
    }

    /// Turns glass into a hole once whatever stood on it has left.
    pub(crate) fn crack(&mut self, index: usize) {
        if self.ground[index] == Ground::Glass {
            self.set_ground(index, Ground::Hole);
        }
    }

    fn lift_boulder(&mut self, index: usize) {
        self.set_up(index, Occupant::Empty);
        self.crack(index);
    }

    fn collect_rupee(&mut self, slot: usize) {
        if !self.rupees[slot] {
            Rc::make_mut(&mut self.rupees)[slot] = true;
        }
    }

    /// Runs the post-move tick and seals the successor, discarding it when an
    /// enemy ends up on the player's tile.
    fn settle(mut self, action: Action, crushed: Option<usize>) -> Option<WorldState> {
        self.tick(crushed);
        if self.up[self.player].is_enemy() {
            return None;
        }
        let trail = self.parent.extend_trail(action);
        Some(WorldState {
            player: self.player,
            facing: self.facing,
            holding: self.holding,
            ground: self.ground,
            up: self.up,
            rupees: self.rupees,
            trail: Some(trail),
        })
    }
}

#[cfg(test)]
mod tests {
    use descent_core::Position;

    use super::*;
    use crate::LevelBuilder;

    fn sketch(rows: &[&str]) -> (Level, WorldState) {
        LevelBuilder::from_rows("engine", rows)
            .expect("sketch parses")
            .build()
            .expect("sketch builds")
    }

    fn facing_right(rows: &[&str]) -> (Level, WorldState) {
        LevelBuilder::from_rows("engine", rows)
            .expect("sketch parses")
            .facing(Direction::Right)
            .build()
            .expect("sketch builds")
    }

    #[test]
    fn untouched_layers_stay_shared_with_the_parent() {
        let (level, state) = sketch(&["@.D"]);
        let next = simulate(&level, &state, Action::Right).expect("walk right");

        assert!(Rc::ptr_eq(&state.ground, &next.ground));
        assert!(Rc::ptr_eq(&state.up, &next.up));
        assert!(Rc::ptr_eq(&state.rupees, &next.rupees));
    }

    #[test]
    fn written_layers_are_copied_before_mutation() {
        let (level, state) = facing_right(&["@.D"]);
        let absorbed = simulate(&level, &state, Action::AbsorbGround).expect("absorb");

        assert!(!Rc::ptr_eq(&state.ground, &absorbed.ground));
        assert!(Rc::ptr_eq(&state.up, &absorbed.up));
        assert_eq!(state.ground[1], Ground::Passable);
        assert_eq!(absorbed.ground[1], Ground::Hole);
    }

    #[test]
    fn interact_picks_the_context_action() {
        let (level, state) = facing_right(&["@.D"]);
        let absorbed = interact(&level, &state).expect("absorb is legal");
        assert_eq!(absorbed.last_action(), Some(Action::AbsorbGround));
        assert_eq!(absorbed.holding, Holding::Ground);

        let error = simulate(&level, &state, Action::CreateGround)
            .expect_err("nothing to deposit");
        assert_eq!(error.action, Action::CreateGround);
    }

    #[test]
    fn player_position_follows_walks() {
        let (level, state) = sketch(&["@.D"]);
        let next = simulate(&level, &state, Action::Right).expect("walk right");
        assert_eq!(level.position(next.player), Position::new(1, 0));
    }
}

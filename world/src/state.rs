//! Immutable world snapshots and the action trail that links them.

use std::{
    hash::{Hash, Hasher},
    rc::Rc,
};

use descent_core::{Action, Direction, Ground, Holding, Occupant};

/// One immutable snapshot of the dynamic world.
///
/// Layers are reference counted and shared with the parent snapshot until the
/// engine writes to them, so producing a successor never mutates or aliases a
/// layer that another snapshot can observe. Equality and hashing cover every
/// field except the trail: two snapshots with identical content reached along
/// different paths are the same world.
#[derive(Clone, Debug)]
pub struct WorldState {
    pub(crate) player: usize,
    pub(crate) facing: Direction,
    pub(crate) holding: Holding,
    pub(crate) ground: Rc<Vec<Ground>>,
    pub(crate) up: Rc<Vec<Occupant>>,
    pub(crate) rupees: Rc<Vec<bool>>,
    pub(crate) trail: Option<Rc<TrailNode>>,
}

impl WorldState {
    pub(crate) fn initial(
        player: usize,
        facing: Direction,
        ground: Vec<Ground>,
        up: Vec<Occupant>,
        rupee_count: usize,
    ) -> Self {
        Self {
            player,
            facing,
            holding: Holding::Empty,
            ground: Rc::new(ground),
            up: Rc::new(up),
            rupees: Rc::new(vec![false; rupee_count]),
            trail: None,
        }
    }

    /// Tile index the player stands on.
    #[must_use]
    pub const fn player(&self) -> usize {
        self.player
    }

    /// Direction the player faces.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Content of the player's inventory slot.
    #[must_use]
    pub const fn holding(&self) -> Holding {
        self.holding
    }

    /// Ground layer, one entry per tile.
    #[must_use]
    pub fn ground(&self) -> &[Ground] {
        &self.ground
    }

    /// Up layer, one entry per tile.
    #[must_use]
    pub fn up(&self) -> &[Occupant] {
        &self.up
    }

    /// Collected flag for each rupee, aligned with [`crate::Level::rupees`].
    #[must_use]
    pub fn rupees_found(&self) -> &[bool] {
        &self.rupees
    }

    /// Action that produced this snapshot, `None` for the initial state.
    #[must_use]
    pub fn last_action(&self) -> Option<Action> {
        self.trail.as_ref().map(|node| node.action)
    }

    /// Number of actions between the initial state and this snapshot.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.trail.as_ref().map_or(0, |node| node.depth)
    }

    /// Actions leading from the initial state to this snapshot, oldest first.
    #[must_use]
    pub fn actions(&self) -> Vec<Action> {
        let mut actions = Vec::with_capacity(self.depth());
        let mut cursor = self.trail.as_deref();
        while let Some(node) = cursor {
            actions.push(node.action);
            cursor = node.parent.as_deref();
        }
        actions.reverse();
        actions
    }

    pub(crate) fn extend_trail(&self, action: Action) -> Rc<TrailNode> {
        Rc::new(TrailNode {
            action,
            depth: self.depth() + 1,
            parent: self.trail.clone(),
        })
    }
}

impl PartialEq for WorldState {
    fn eq(&self, other: &Self) -> bool {
        self.player == other.player
            && self.facing == other.facing
            && self.holding == other.holding
            && self.ground == other.ground
            && self.up == other.up
            && self.rupees == other.rupees
    }
}

impl Eq for WorldState {}

impl Hash for WorldState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.player.hash(state);
        self.facing.hash(state);
        self.holding.hash(state);
        self.ground.hash(state);
        self.up.hash(state);
        self.rupees.hash(state);
    }
}

/// Node of the append-only tree of discovered actions.
#[derive(Debug)]
pub(crate) struct TrailNode {
    action: Action,
    depth: usize,
    parent: Option<Rc<TrailNode>>,
}

impl Drop for TrailNode {
    // Unlinks long chains iteratively so dropping a deep trail cannot overflow the stack.
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            match Rc::try_unwrap(node) {
                Ok(mut node) => parent = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}

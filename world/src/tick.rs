//! Post-move world tick: enemy movement and floor decay.

use descent_core::{Direction, Ground, Occupant};

use crate::engine::Draft;

impl Draft<'_> {
    /// Advances every enemy once and breaks the glass the player stood on.
    ///
    /// Enemies are enumerated from the parent snapshot, so an enemy that walks
    /// onto a later tile is not moved a second time. Obstruction checks read
    /// the draft, which keeps at most one occupant per tile. The enemy crushed
    /// by this action's boulder push, if any, sits the tick out.
    pub(crate) fn tick(&mut self, crushed: Option<usize>) {
        let parent = self.parent;
        for (index, occupant) in parent.up.iter().enumerate() {
            if crushed == Some(index) {
                continue;
            }
            match *occupant {
                Occupant::BasicEnemy(facing) => self.patrol(index, facing),
                Occupant::Seeker => self.seek(index),
                Occupant::Empty
                | Occupant::Boulder
                | Occupant::ChestClosed
                | Occupant::ChestOpen => {}
            }
        }

        match parent.ground[parent.player] {
            Ground::Glass => self.set_ground(parent.player, Ground::Hole),
            Ground::Passable | Ground::Hole | Ground::Downstairs => {}
        }
    }

    fn patrol(&mut self, index: usize, facing: Direction) {
        let Some(target) = self.level.neighbor(index, facing) else {
            self.set_up(index, Occupant::BasicEnemy(facing.opposite()));
            return;
        };
        if !self.up(target).is_empty() {
            self.set_up(index, Occupant::BasicEnemy(facing.opposite()));
            return;
        }
        match self.ground(target) {
            Ground::Hole => self.set_up(index, Occupant::BasicEnemy(facing.opposite())),
            Ground::Passable | Ground::Downstairs | Ground::Glass => {
                self.set_up(index, Occupant::Empty);
                self.set_up(target, Occupant::BasicEnemy(facing));
                self.crack(index);
            }
        }
    }

    fn seek(&mut self, index: usize) {
        let Some(toward) = self.line_of_sight(index) else {
            return;
        };
        let Some(target) = self.level.neighbor(index, toward) else {
            return;
        };
        self.set_up(index, Occupant::Empty);
        match self.ground(target) {
            // The seeker falls in and is gone.
            Ground::Hole => {}
            Ground::Passable | Ground::Downstairs | Ground::Glass => {
                self.set_up(target, Occupant::Seeker);
            }
        }
        self.crack(index);
    }

    /// Direction toward the player when the seeker shares a row or column
    /// with them and nothing stands in between.
    fn line_of_sight(&self, index: usize) -> Option<Direction> {
        let enemy = self.level.position(index);
        let player = self.level.position(self.player);

        let toward = if enemy.row() == player.row() && enemy.column() != player.column() {
            if player.column() > enemy.column() {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if enemy.column() == player.column() && enemy.row() != player.row() {
            if player.row() > enemy.row() {
                Direction::Down
            } else {
                Direction::Up
            }
        } else {
            return None;
        };

        let mut cursor = self.level.neighbor(index, toward);
        loop {
            // Walls interrupt the line as well.
            let tile = cursor?;
            if tile == self.player {
                return Some(toward);
            }
            if !self.up(tile).is_empty() {
                return None;
            }
            cursor = self.level.neighbor(tile, toward);
        }
    }
}

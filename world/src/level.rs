//! Immutable per-level tile layout.

use descent_core::{Direction, Position};

/// Static data shared by every world snapshot of a level.
///
/// Only the positions listed in the sorted tile array are addressable; every
/// other cell of the grid is a wall. Tile indices are stable for the lifetime
/// of the level and align one-to-one with the ground and up layers stored in
/// each [`crate::WorldState`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    identifier: String,
    width: i32,
    height: i32,
    positions: Vec<Position>,
    rupees: Vec<usize>,
    has_chest: bool,
}

impl Level {
    /// Assembles a level from tiles already sorted row-major and rupee
    /// indices already sorted ascending.
    pub(crate) fn new(
        identifier: String,
        width: i32,
        height: i32,
        positions: Vec<Position>,
        rupees: Vec<usize>,
        has_chest: bool,
    ) -> Self {
        debug_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        debug_assert!(rupees.windows(2).all(|pair| pair[0] < pair[1]));
        Self {
            identifier,
            width,
            height,
            positions,
            rupees,
            has_chest,
        }
    }

    /// Name the level was exported under.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Number of grid columns, walls included.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of grid rows, walls included.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Number of addressable tiles.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.positions.len()
    }

    /// Addressable tiles in row-major order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Position of the tile stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a tile index of this level.
    #[must_use]
    pub fn position(&self, index: usize) -> Position {
        self.positions[index]
    }

    /// Index of the tile at `position`, or `None` for walls and cells outside
    /// the grid.
    #[must_use]
    pub fn position_index(&self, position: Position) -> Option<usize> {
        self.positions.binary_search(&position).ok()
    }

    /// Index of the tile one step away from `index` along `direction`.
    #[must_use]
    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<usize> {
        let origin = self.positions.get(index)?;
        self.position_index(*origin + direction.delta())
    }

    /// Tile indices holding rupees, sorted ascending.
    #[must_use]
    pub fn rupees(&self) -> &[usize] {
        &self.rupees
    }

    /// Slot within the rupee bitset for the tile at `index`, if it holds a rupee.
    #[must_use]
    pub fn rupee_slot(&self, index: usize) -> Option<usize> {
        self.rupees.binary_search(&index).ok()
    }

    /// Whether the level started with at least one closed chest.
    #[must_use]
    pub const fn has_chest(&self) -> bool {
        self.has_chest
    }
}

/// Canonical occupancy key of a grid cell: `x + y * size`.
pub type TileIndex = u32;

/// A cell on the square placement grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// `size` must not exceed [`MAX_GRID_SIZE`](crate::config::MAX_GRID_SIZE),
    /// which config validation enforces.
    pub fn tile_index(self, size: u32) -> TileIndex {
        self.x + self.y * size
    }

    pub fn from_tile_index(tile: TileIndex, size: u32) -> Self {
        Self {
            x: tile % size,
            y: tile / size,
        }
    }

    pub fn in_bounds(self, size: u32) -> bool {
        self.x < size && self.y < size
    }
}

/// Append-only record of settled tiles.
///
/// Lookups scan the record list, which is O(n) in the number of records.
/// That is fine for grids of a few hundred cells; a larger grid should swap
/// the backing store for a hashed set behind the same methods.
///
/// Records are never removed. Near saturation the generator may record a
/// tile twice, so [`len`](Self::len) counts records, not distinct tiles.
#[derive(Debug, Clone, Default)]
pub struct OccupancyRegistry {
    records: Vec<TileIndex>,
}

impl OccupancyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self, tile: TileIndex) -> bool {
        self.records.contains(&tile)
    }

    pub fn mark_occupied(&mut self, tile: TileIndex) {
        self.records.push(tile);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recorded tiles in placement order.
    pub fn records(&self) -> &[TileIndex] {
        &self.records
    }
}

//! Settlement layout templates.
//!
//! Each settlement is drawn as a block of `SUB_TILE_COLUMNS x SUB_TILE_ROWS`
//! sub-tiles, row-major, each picking a tile from the shared city atlas.

pub const SUB_TILE_COLUMNS: usize = 3;
pub const SUB_TILE_ROWS: usize = 4;
pub const SUB_TILES: usize = SUB_TILE_COLUMNS * SUB_TILE_ROWS;

/// A fixed sub-tile pattern for one settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutTemplate {
    pub name: &'static str,
    /// Atlas indices, row-major.
    pub tiles: [u32; SUB_TILES],
}

impl LayoutTemplate {
    /// Column and row of sub-tile `slot`.
    pub fn slot_position(slot: usize) -> (usize, usize) {
        (slot % SUB_TILE_COLUMNS, slot / SUB_TILE_COLUMNS)
    }
}

pub static LAYOUTS: [LayoutTemplate; 10] = [
    LayoutTemplate {
        name: "chapel",
        tiles: [99, 100, 101, 454, 269, 455, 415, 195, 416, 452, 306, 453],
    },
    LayoutTemplate {
        name: "terrace",
        tiles: [99, 100, 101, 268, 269, 270, 268, 269, 270, 305, 306, 307],
    },
    LayoutTemplate {
        name: "market",
        tiles: [75, 76, 77, 446, 261, 447, 446, 261, 447, 444, 298, 445],
    },
    LayoutTemplate {
        name: "tenement",
        tiles: [75, 76, 77, 407, 187, 408, 407, 187, 408, 444, 298, 445],
    },
    LayoutTemplate {
        name: "warehouse",
        tiles: [75, 76, 77, 186, 150, 188, 186, 150, 188, 297, 191, 299],
    },
    LayoutTemplate {
        name: "courthouse",
        tiles: [83, 84, 85, 413, 228, 414, 411, 191, 412, 448, 302, 449],
    },
    LayoutTemplate {
        name: "row_houses",
        tiles: [83, 84, 85, 227, 228, 229, 190, 191, 192, 301, 302, 303],
    },
    LayoutTemplate {
        name: "mill",
        tiles: [91, 92, 93, 241, 242, 243, 278, 279, 280, 945, 946, 947],
    },
    LayoutTemplate {
        name: "depot",
        tiles: [91, 92, 93, 241, 242, 243, 278, 279, 280, 945, 803, 947],
    },
    LayoutTemplate {
        name: "hall",
        tiles: [91, 92, 93, 238, 239, 240, 238, 239, 240, 312, 313, 314],
    },
];

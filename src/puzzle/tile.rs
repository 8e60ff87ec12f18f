use std::fmt;

/// Tile identifier: the slot the tile belongs in, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub usize);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TileId {
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Human-facing number (1-based)
    pub const fn label(&self) -> usize {
        self.0 + 1
    }
}

/// Grid position (row, col), row 0 at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        GridPos { row, col }
    }

    /// Layout for a 3x3 grid:
    /// 0 1 2
    /// 3 4 5
    /// 6 7 8
    pub const fn from_index(index: usize, grid_size: usize) -> Self {
        GridPos {
            row: index / grid_size,
            col: index % grid_size,
        }
    }

    pub const fn to_index(&self, grid_size: usize) -> usize {
        self.row * grid_size + self.col
    }
}

/// One puzzle piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    fixed: bool,
}

impl Tile {
    pub const fn new(id: TileId) -> Self {
        Tile { id, fixed: false }
    }

    /// The slot this tile belongs in
    pub const fn correct_position(&self) -> TileId {
        self.id
    }

    /// Locked tiles never move again
    pub const fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub(super) fn fix(&mut self) {
        self.fixed = true;
    }
}

/// Top-left corner of a tile's region inside the source image, in pixels:
/// (col * piece, row * piece)
pub fn crop_offset(id: TileId, grid_size: usize, piece_size: u32) -> (u32, u32) {
    let pos = GridPos::from_index(id.index(), grid_size);
    (pos.col as u32 * piece_size, pos.row as u32 * piece_size)
}

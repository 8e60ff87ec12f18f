mod arrangement;
mod board;
mod tile;

pub use arrangement::Arrangement;
pub use board::{Board, PlacementResult, ReorderError, Swap};
pub use tile::{GridPos, Tile, TileId, crop_offset};

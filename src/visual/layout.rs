use bevy::prelude::*;

use crate::{game::config::GameConfig, puzzle::GridPos};

/// Where the board sits in world space. Centred on the origin, row 0 at the top.
#[derive(Resource, Debug, Clone, Copy)]
pub struct BoardLayout {
    pub grid_size: usize,
    /// Tile edge in world units
    pub piece_size: f32,
    /// Distance between neighbouring slot centres
    pub cell: f32,
}

impl BoardLayout {
    pub fn from_config(config: &GameConfig) -> Self {
        let piece_size = config.piece_size as f32;
        BoardLayout {
            grid_size: config.grid_size,
            piece_size,
            cell: piece_size + config.tile_gap,
        }
    }

    /// Board edge including gaps
    pub fn extent(&self) -> f32 {
        self.cell * (self.grid_size as f32 - 1.0) + self.piece_size
    }

    /// World-space centre of a slot
    pub fn slot_center(&self, slot: usize) -> Vec2 {
        let pos = GridPos::from_index(slot, self.grid_size);
        let first = -(self.cell * (self.grid_size as f32 - 1.0)) * 0.5;
        Vec2::new(
            first + pos.col as f32 * self.cell,
            -(first + pos.row as f32 * self.cell),
        )
    }

    /// Slot under a world point; gaps count toward the nearest slot
    pub fn slot_at(&self, point: Vec2) -> Option<usize> {
        let half = self.extent() * 0.5;
        let local = Vec2::new(point.x + half, half - point.y);
        if local.x < 0.0 || local.y < 0.0 || local.x > self.extent() || local.y > self.extent() {
            return None;
        }

        let last = self.grid_size - 1;
        let col = ((local.x / self.cell) as usize).min(last);
        let row = ((local.y / self.cell) as usize).min(last);
        Some(GridPos::new(row, col).to_index(self.grid_size))
    }
}

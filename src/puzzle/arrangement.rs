use super::tile::{Tile, TileId};
use rand::Rng;
use std::fmt;

/// The visual ordering of every tile on the board.
/// Slot index = position in `slots`. Invariant: always a permutation of
/// `0..grid_size²` by correct position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    grid_size: usize,
    slots: Vec<Tile>,
}

impl Arrangement {
    /// Every tile in its correct slot
    pub fn solved(grid_size: usize) -> Self {
        let slots = (0..grid_size * grid_size)
            .map(|i| Tile::new(TileId(i)))
            .collect();
        Arrangement { grid_size, slots }
    }

    /// Uniformly random order: repeatedly take a random remaining tile and append it
    pub fn shuffled<R: Rng>(grid_size: usize, rng: &mut R) -> Self {
        let mut remaining = Self::solved(grid_size).slots;
        let mut slots = Vec::with_capacity(remaining.len());
        while !remaining.is_empty() {
            let pick = rng.random_range(0..remaining.len());
            slots.push(remaining.remove(pick));
        }
        Arrangement { grid_size, slots }
    }

    /// Build from an explicit order of correct positions
    #[cfg(test)]
    pub fn from_order(grid_size: usize, order: &[usize]) -> Result<Self, String> {
        let expected = grid_size * grid_size;
        if order.len() != expected {
            return Err(format!(
                "Arrangement has {} tiles, expected {}",
                order.len(),
                expected
            ));
        }

        let arrangement = Arrangement {
            grid_size,
            slots: order.iter().map(|&i| Tile::new(TileId(i))).collect(),
        };
        if !arrangement.is_permutation() {
            return Err(format!("Order {:?} is not a permutation", order));
        }
        Ok(arrangement)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Tiles in slot order
    pub fn tiles(&self) -> &[Tile] {
        &self.slots
    }

    pub fn tile_at(&self, slot: usize) -> Option<&Tile> {
        self.slots.get(slot)
    }

    pub(super) fn tile_at_mut(&mut self, slot: usize) -> Option<&mut Tile> {
        self.slots.get_mut(slot)
    }

    /// Current slot of a tile
    pub fn slot_of(&self, id: TileId) -> Option<usize> {
        self.slots.iter().position(|t| t.correct_position() == id)
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.slots.iter().find(|t| t.correct_position() == id)
    }

    /// Every correct position appears exactly once
    pub fn is_permutation(&self) -> bool {
        let mut seen = vec![false; self.slots.len()];
        for tile in &self.slots {
            let i = tile.correct_position().index();
            if i >= seen.len() || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }

    /// Slot i holds tile i for every i
    pub fn is_complete(&self) -> bool {
        self.slots
            .iter()
            .enumerate()
            .all(|(slot, tile)| tile.correct_position().index() == slot)
    }

    /// Number of tiles sitting in their correct slot
    pub fn correct_count(&self) -> usize {
        self.slots
            .iter()
            .enumerate()
            .filter(|(slot, tile)| tile.correct_position().index() == *slot)
            .count()
    }

    pub(super) fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
        debug_assert!(self.is_permutation(), "swap broke arrangement: {self}");
    }
}

impl fmt::Display for Arrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.slots.chunks(self.grid_size.max(1)).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = chunk
                .iter()
                .map(|t| {
                    if t.is_fixed() {
                        format!("[{}]", t.correct_position())
                    } else {
                        format!(" {} ", t.correct_position())
                    }
                })
                .collect();
            write!(f, "{}", cells.join(""))?;
        }
        Ok(())
    }
}

use super::arrangement::Arrangement;
use super::tile::{Tile, TileId};
use rand::Rng;
use std::fmt;

/// Reasons a reorder request is ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    SessionInactive,
    SourceFixed(TileId),
    TargetFixed(TileId),
    SameSlot(usize),
    UnknownTile(TileId),
    SlotOutOfRange(usize),
}

impl fmt::Display for ReorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReorderError::SessionInactive => write!(f, "Puzzle is not active"),
            ReorderError::SourceFixed(t) => write!(f, "Tile {} is locked in place", t),
            ReorderError::TargetFixed(t) => write!(f, "Target tile {} is locked in place", t),
            ReorderError::SameSlot(s) => write!(f, "Tile is already in slot {}", s),
            ReorderError::UnknownTile(t) => write!(f, "Tile {} is not on the board", t),
            ReorderError::SlotOutOfRange(s) => write!(f, "Slot {} is off the board", s),
        }
    }
}

/// A successful reorder: the two slots that exchanged tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swap {
    pub from: usize,
    pub to: usize,
}

/// Outcome of committing a dropped tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementResult {
    /// Dropped somewhere other than its home slot; stays movable
    Misplaced { slot: usize },
    /// Landed home and is now locked
    Fixed { slot: usize },
    /// Landed home and every tile is now in place
    PuzzleComplete,
    /// Nothing to commit (unknown or already fixed tile)
    Ignored,
}

/// The board: one arrangement plus the move rules
#[derive(Debug, Clone)]
pub struct Board {
    arrangement: Arrangement,
}

impl Board {
    /// Fresh board with a random order
    pub fn shuffled<R: Rng>(grid_size: usize, rng: &mut R) -> Self {
        let arrangement = Arrangement::shuffled(grid_size, rng);
        log::debug!("Shuffled board:\n{}", arrangement);
        Board { arrangement }
    }

    #[cfg(test)]
    pub fn from_arrangement(arrangement: Arrangement) -> Self {
        Board { arrangement }
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.arrangement.tile(id)
    }

    pub fn tile_at(&self, slot: usize) -> Option<&Tile> {
        self.arrangement.tile_at(slot)
    }

    pub fn slot_of(&self, id: TileId) -> Option<usize> {
        self.arrangement.slot_of(id)
    }

    pub fn is_complete(&self) -> bool {
        self.arrangement.is_complete()
    }

    /// Check whether a tile may be picked up
    pub fn can_move(&self, id: TileId) -> Result<usize, ReorderError> {
        let slot = self
            .arrangement
            .slot_of(id)
            .ok_or(ReorderError::UnknownTile(id))?;
        if self.arrangement.tiles()[slot].is_fixed() {
            return Err(ReorderError::SourceFixed(id));
        }
        Ok(slot)
    }

    /// Validate a move of `source` into `target_slot`
    pub fn can_reorder(&self, source: TileId, target_slot: usize) -> Result<Swap, ReorderError> {
        let from = self.can_move(source)?;

        let target = self
            .arrangement
            .tile_at(target_slot)
            .ok_or(ReorderError::SlotOutOfRange(target_slot))?;

        if target.is_fixed() {
            return Err(ReorderError::TargetFixed(target.correct_position()));
        }

        if from == target_slot {
            return Err(ReorderError::SameSlot(from));
        }

        Ok(Swap {
            from,
            to: target_slot,
        })
    }

    /// Move `source` into `target_slot`; the displaced tile takes the source's old slot
    pub fn reorder(&mut self, source: TileId, target_slot: usize) -> Result<Swap, ReorderError> {
        let swap = self.can_reorder(source, target_slot)?;
        self.arrangement.swap(swap.from, swap.to);
        Ok(swap)
    }

    /// Lock the tile if it sits in its home slot
    pub fn commit(&mut self, id: TileId) -> PlacementResult {
        let Some(slot) = self.arrangement.slot_of(id) else {
            return PlacementResult::Ignored;
        };
        let Some(tile) = self.arrangement.tile_at_mut(slot) else {
            return PlacementResult::Ignored;
        };

        if tile.is_fixed() {
            return PlacementResult::Ignored;
        }

        if tile.correct_position().index() != slot {
            return PlacementResult::Misplaced { slot };
        }

        tile.fix();
        log::debug!(
            "Tile {} locked in slot {} ({}/{} in place)",
            id,
            slot,
            self.arrangement.correct_count(),
            self.arrangement.len()
        );

        if self.arrangement.is_complete() {
            PlacementResult::PuzzleComplete
        } else {
            PlacementResult::Fixed { slot }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board(order: &[usize]) -> Board {
        Board::from_arrangement(Arrangement::from_order(3, order).unwrap())
    }

    #[test]
    fn test_reorder_swaps_source_and_target() {
        let mut board = board(&[1, 0, 2, 3, 4, 5, 6, 7, 8]);

        let swap = board.reorder(TileId(0), 0).unwrap();
        assert_eq!(swap, Swap { from: 1, to: 0 });
        assert!(board.is_complete());
    }

    #[test]
    fn test_reorder_across_the_board() {
        let mut board = board(&[2, 1, 0, 3, 4, 5, 6, 7, 8]);
        board.reorder(TileId(0), 0).unwrap();
        assert_eq!(board.slot_of(TileId(0)), Some(0));
        assert_eq!(board.slot_of(TileId(2)), Some(2));
        // Tiles in between stay where they were
        assert_eq!(board.slot_of(TileId(1)), Some(1));
    }

    #[test]
    fn test_fixed_source_is_rejected() {
        let mut board = board(&[0, 2, 1, 3, 4, 5, 6, 7, 8]);
        assert_eq!(board.commit(TileId(0)), PlacementResult::Fixed { slot: 0 });

        let before = board.arrangement().clone();
        assert_eq!(
            board.reorder(TileId(0), 1),
            Err(ReorderError::SourceFixed(TileId(0)))
        );
        assert_eq!(board.arrangement(), &before);
    }

    #[test]
    fn test_fixed_target_is_rejected() {
        let mut board = board(&[0, 2, 1, 3, 4, 5, 6, 7, 8]);
        board.commit(TileId(0));

        let before = board.arrangement().clone();
        assert_eq!(
            board.reorder(TileId(2), 0),
            Err(ReorderError::TargetFixed(TileId(0)))
        );
        assert_eq!(board.arrangement(), &before);
    }

    #[test]
    fn test_invalid_slots_are_rejected() {
        let mut board = board(&[1, 0, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(board.reorder(TileId(1), 0), Err(ReorderError::SameSlot(0)));
        assert_eq!(
            board.reorder(TileId(1), 9),
            Err(ReorderError::SlotOutOfRange(9))
        );
        assert_eq!(
            board.reorder(TileId(12), 3),
            Err(ReorderError::UnknownTile(TileId(12)))
        );
    }

    #[test]
    fn test_commit_misplaced_changes_nothing() {
        let mut board = board(&[1, 0, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(board.commit(TileId(1)), PlacementResult::Misplaced { slot: 0 });
        assert!(!board.tile(TileId(1)).unwrap().is_fixed());
        // Still movable
        assert!(board.can_move(TileId(1)).is_ok());
    }

    #[test]
    fn test_commit_fixes_exactly_once() {
        let mut board = board(&[0, 2, 1, 3, 4, 5, 6, 7, 8]);
        assert_eq!(board.commit(TileId(0)), PlacementResult::Fixed { slot: 0 });
        assert!(board.tile(TileId(0)).unwrap().is_fixed());
        assert_eq!(board.commit(TileId(0)), PlacementResult::Ignored);
    }

    #[test]
    fn test_last_commit_completes() {
        let mut board = board(&[0, 1, 2, 3, 4, 5, 6, 8, 7]);
        board.reorder(TileId(7), 7).unwrap();
        assert_eq!(board.commit(TileId(7)), PlacementResult::PuzzleComplete);
        assert!(board.is_complete());
    }

    #[test]
    fn test_random_reorders_keep_permutation() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut board = Board::shuffled(3, &mut rng);

        for _ in 0..500 {
            let source = TileId(rng.random_range(0..9));
            let target = rng.random_range(0..9);
            if board.reorder(source, target).is_ok() {
                board.commit(source);
            }
            assert!(board.arrangement().is_permutation());
        }
    }
}

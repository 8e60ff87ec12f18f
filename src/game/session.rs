// game/session.rs

use super::best_time::BestTime;
use super::config::GameConfig;
use super::timer::SessionTimer;
use crate::puzzle::*;
use crate::storage::KeyValueStore;
use bevy::prelude::Resource;
use rand::Rng;
use std::time::Duration;

/// A game session - owns the board, the timer and the best time
#[derive(Debug, Resource)]
pub struct PuzzleSession {
    /// The current board
    board: Board,
    /// False once the puzzle is solved, until the next reset
    active: bool,
    timer: SessionTimer,
    best_time: BestTime,
    /// Where the best time lives
    store: Box<dyn KeyValueStore>,
    best_time_key: String,
    grid_size: usize,
}

impl PuzzleSession {
    /// Create a session with a freshly shuffled board, timer running from `now`
    pub fn new(config: &GameConfig, store: Box<dyn KeyValueStore>, now: Duration) -> Self {
        Self::with_rng(config, store, now, &mut rand::rng())
    }

    pub fn with_rng<R: Rng>(
        config: &GameConfig,
        store: Box<dyn KeyValueStore>,
        now: Duration,
        rng: &mut R,
    ) -> Self {
        Self::from_board(config, store, now, Board::shuffled(config.grid_size, rng))
    }

    /// Start from a known arrangement
    #[cfg(test)]
    pub fn with_arrangement(
        config: &GameConfig,
        store: Box<dyn KeyValueStore>,
        now: Duration,
        arrangement: Arrangement,
    ) -> Self {
        Self::from_board(config, store, now, Board::from_arrangement(arrangement))
    }

    fn from_board(
        config: &GameConfig,
        store: Box<dyn KeyValueStore>,
        now: Duration,
        board: Board,
    ) -> Self {
        let best_time = BestTime::load(store.as_ref(), &config.best_time_key);
        let mut session = PuzzleSession {
            board,
            active: true,
            timer: SessionTimer::new(),
            best_time,
            store,
            best_time_key: config.best_time_key.clone(),
            grid_size: config.grid_size,
        };
        session.timer.start(now);
        session
    }

    // === Query Methods ===

    /// Has the puzzle been solved this round?
    pub fn is_complete(&self) -> bool {
        !self.active && self.board.is_complete()
    }

    pub fn arrangement(&self) -> &Arrangement {
        self.board.arrangement()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.board.tile(id)
    }

    pub fn tile_at(&self, slot: usize) -> Option<&Tile> {
        self.board.tile_at(slot)
    }

    pub fn slot_of(&self, id: TileId) -> Option<usize> {
        self.board.slot_of(id)
    }

    pub fn elapsed_secs(&self, now: Duration) -> u64 {
        self.timer.elapsed_secs(now)
    }

    pub fn best_time(&self) -> BestTime {
        self.best_time
    }

    /// Everything the HUD needs to draw
    pub fn hud_snapshot(&self, now: Duration) -> HudSnapshot {
        HudSnapshot {
            elapsed_seconds: self.elapsed_secs(now),
            best_time_label: self.best_time.label(),
            completion_visible: self.is_complete(),
        }
    }

    /// May this tile be picked up right now?
    pub fn can_drag(&self, id: TileId) -> Result<usize, ReorderError> {
        if !self.active {
            return Err(ReorderError::SessionInactive);
        }
        self.board.can_move(id)
    }

    // === Mutation Methods ===

    /// Move `source` into `target_slot`, swapping with whatever is there
    pub fn try_reorder(&mut self, source: TileId, target_slot: usize) -> Result<Swap, ReorderError> {
        if !self.active {
            return Err(ReorderError::SessionInactive);
        }
        self.board.reorder(source, target_slot)
    }

    /// The player let go of `id`: lock it if it is home, finish the puzzle if all are
    pub fn commit_placement(&mut self, id: TileId, now: Duration) -> SessionResult {
        if !self.active {
            return SessionResult::Ignored;
        }

        match self.board.commit(id) {
            PlacementResult::Misplaced { slot } => SessionResult::Misplaced { slot },
            PlacementResult::Fixed { slot } => SessionResult::TileFixed { slot },
            PlacementResult::Ignored => SessionResult::Ignored,
            PlacementResult::PuzzleComplete => self.complete(now),
        }
    }

    /// Advance the displayed clock; `Some(secs)` when a new second is reached
    pub fn tick(&mut self, now: Duration) -> Option<u64> {
        let ticket = self.timer.ticket();
        self.timer.tick(ticket, now)
    }

    /// New board, all tiles movable, clock back to zero. Best time is kept.
    pub fn reset(&mut self, now: Duration) {
        self.reset_with_rng(now, &mut rand::rng());
    }

    pub fn reset_with_rng<R: Rng>(&mut self, now: Duration, rng: &mut R) {
        self.active = true;
        self.timer.cancel();
        self.board = Board::shuffled(self.grid_size, rng);
        // Re-derive from the store; a failed write earlier must not lose the record
        if let Some(stored) = BestTime::load(self.store.as_ref(), &self.best_time_key).get() {
            self.best_time.record(stored);
        }
        self.timer.start(now);
        log::debug!("Session reset:\n{}", self.board.arrangement());
    }

    fn complete(&mut self, now: Duration) -> SessionResult {
        self.active = false;
        let elapsed = self.timer.stop(now);

        let new_best = self.best_time.record(elapsed);
        if new_best {
            if let Err(e) = self.best_time.save(self.store.as_mut(), &self.best_time_key) {
                log::warn!("Could not persist best time {}: {}", elapsed, e);
            }
        }

        SessionResult::Complete { elapsed, new_best }
    }
}

/// Result of committing a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionResult {
    /// Tile is not in its home slot; it stays movable
    Misplaced { slot: usize },
    /// Tile locked into its home slot
    TileFixed { slot: usize },
    /// Last tile locked; the clock stopped at `elapsed`
    Complete { elapsed: u64, new_best: bool },
    /// Nothing happened (inactive session or already-fixed tile)
    Ignored,
}

/// State handed to the HUD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudSnapshot {
    pub elapsed_seconds: u64,
    pub best_time_label: String,
    pub completion_visible: bool,
}

// game/timer.rs

use std::time::Duration;

/// Identifies one run of the timer; stale tickets are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running { started_at: Duration },
    Stopped { elapsed: u64 },
}

/// Whole-second session timer.
///
/// Elapsed time is always derived from the captured start timestamp,
/// so late or missed ticks never skew it.
#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    state: TimerState,
    generation: u64,
    /// Last value handed out by `tick` for the current generation
    last_reported: u64,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Start from zero at `now`, cancelling any previous run
    pub fn start(&mut self, now: Duration) -> TimerTicket {
        self.generation += 1;
        self.state = TimerState::Running { started_at: now };
        self.last_reported = 0;
        TimerTicket(self.generation)
    }

    /// Freeze at the current elapsed value and return it
    pub fn stop(&mut self, now: Duration) -> u64 {
        let elapsed = self.elapsed_secs(now);
        self.state = TimerState::Stopped { elapsed };
        elapsed
    }

    /// Drop back to idle; outstanding tickets go stale
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.state = TimerState::Idle;
        self.last_reported = 0;
    }

    /// Ticket for the current run
    pub fn ticket(&self) -> TimerTicket {
        TimerTicket(self.generation)
    }

    /// floor((now - start) / 1s) while running, frozen value once stopped
    pub fn elapsed_secs(&self, now: Duration) -> u64 {
        match self.state {
            TimerState::Idle => 0,
            TimerState::Running { started_at } => now.saturating_sub(started_at).as_secs(),
            TimerState::Stopped { elapsed } => elapsed,
        }
    }

    /// Periodic tick. Returns the new elapsed value when it advanced,
    /// `None` for stale tickets, stopped timers, or no change.
    pub fn tick(&mut self, ticket: TimerTicket, now: Duration) -> Option<u64> {
        if ticket.0 != self.generation || !self.is_running() {
            return None;
        }
        let elapsed = self.elapsed_secs(now);
        if elapsed == self.last_reported {
            return None;
        }
        self.last_reported = elapsed;
        Some(elapsed)
    }
}

//! Render-tick scheduler
//!
//! Each scheduled wake carries a [`TickToken`]. Starting or stopping the
//! scheduler bumps the token generation, so a wake that fires after it was
//! superseded is recognised and dropped.

/// Identifies one scheduled wake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickToken {
    generation: u32,
}

/// One scheduled redraw wake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderTick {
    pub token: TickToken,
    /// Delay from the time of scheduling
    pub delay_ms: u64,
    /// Wall-clock time the wake is due
    pub due_ms: u64,
}

/// Instruction to the tick timer; the latest one replaces any before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickCommand {
    Schedule(RenderTick),
    Cancel,
}

/// What to do with a fired wake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Superseded or scheduler stopped; do nothing
    Ignored,
    /// Redraw and arm the next wake
    Render(TickCommand),
    /// Face left interactive mode before the wake fired; scheduler stopped
    Stopped,
}

/// Delay from `now_ms` to the next whole multiple of `period_ms`
///
/// Always in `(0, period_ms]`: a time exactly on a boundary waits a full
/// period.
pub fn delay_until_next(now_ms: u64, period_ms: u64) -> u64 {
    let period = period_ms.max(1);
    period - now_ms % period
}

/// Schedules redraw ticks while the face is interactive
#[derive(Debug, Clone)]
pub struct RenderScheduler {
    period_ms: u64,
    generation: u32,
    active: bool,
}

impl RenderScheduler {
    pub const fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            generation: 0,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn schedule(&self, now_ms: u64) -> TickCommand {
        let delay_ms = delay_until_next(now_ms, self.period_ms);
        TickCommand::Schedule(RenderTick {
            token: TickToken {
                generation: self.generation,
            },
            delay_ms,
            due_ms: now_ms + delay_ms,
        })
    }

    /// Start ticking; supersedes any outstanding wake
    pub fn start(&mut self, now_ms: u64) -> TickCommand {
        self.generation = self.generation.wrapping_add(1);
        self.active = true;
        self.schedule(now_ms)
    }

    /// Stop ticking; returns the cancel to send if a wake was outstanding
    pub fn stop(&mut self) -> Option<TickCommand> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.generation = self.generation.wrapping_add(1);
        Some(TickCommand::Cancel)
    }

    /// Handle a fired wake
    ///
    /// `interactive` is whether the face is still in interactive mode.
    pub fn on_tick(&mut self, token: TickToken, now_ms: u64, interactive: bool) -> TickOutcome {
        if !self.active || token.generation != self.generation {
            return TickOutcome::Ignored;
        }
        if !interactive {
            self.active = false;
            self.generation = self.generation.wrapping_add(1);
            return TickOutcome::Stopped;
        }
        TickOutcome::Render(self.schedule(now_ms))
    }
}

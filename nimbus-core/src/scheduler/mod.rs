//! Render-tick scheduling
//!
//! Keeps at most one redraw wake outstanding while the face is interactive,
//! aligned to whole periods of wall-clock time.

pub mod tick;

pub use tick::{delay_until_next, RenderScheduler, RenderTick, TickCommand, TickOutcome, TickToken};

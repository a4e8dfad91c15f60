//! Host wall clock

use std::time::{SystemTime, UNIX_EPOCH};

use nimbus_core::weather::WallClock;

/// Milliseconds since the Unix epoch from the host clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}

impl WallClock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemClock::now_ms()
    }
}

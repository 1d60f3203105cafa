//! [`EmbassyClock`]: the `linksched_core::Clock` backed by `embassy_time`'s
//! monotonic instant, for use outside tests where `FakeClock` stands in.

use embassy_time::Instant;
use linksched_core::Clock;

/// Millisecond clock read from `embassy_time::Instant::now()`. Wraps the same
/// way the scheduler's deadline arithmetic already assumes (`u32`
/// milliseconds); `embassy_time`'s instant itself does not wrap on any
/// timescale this deployment runs for, so the cast is the only place
/// wraparound can occur, and the scheduler already tolerates it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}

//! [`LinkQuality`]: the single most recent [`ReceiveControl`] reading,
//! shared between the receive loop (which writes it on every received frame)
//! and the power-control loop (which reads it on its own timer, per §4.7's
//! "on each sample... or on a periodic timer").

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use linksched_driver::ReceiveControl;

/// Holds the latest link-quality reading for a single-core, single-executor
/// deployment. `NoopRawMutex` is sound here precisely because every actor in
/// this crate runs on the same cooperative executor (§5).
pub struct LinkQuality {
    latest: Mutex<NoopRawMutex, Cell<Option<ReceiveControl>>>,
}

impl LinkQuality {
    pub const fn new() -> Self {
        LinkQuality {
            latest: Mutex::new(Cell::new(None)),
        }
    }

    pub fn record(&self, reading: ReceiveControl) {
        self.latest.lock(|cell| cell.set(Some(reading)));
    }

    /// Takes the latest reading, if one has arrived since the last read.
    pub fn take(&self) -> Option<ReceiveControl> {
        self.latest.lock(|cell| cell.take())
    }
}

impl Default for LinkQuality {
    fn default() -> Self {
        Self::new()
    }
}

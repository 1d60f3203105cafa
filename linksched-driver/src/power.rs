//! Adaptive transmit-power control (§4.7): maps a measured RSSI reading into
//! one of four discrete power levels and instructs `LinkTx` to change power
//! when the target level changes.

use crate::link::LinkTx;

/// One of the four discrete power levels the radio can be instructed to use.
/// `MIN` is the most conservative (strongest link, least power spent); `HIGH`
/// is reserved for the weakest observed link quality.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PowerLevel {
    Min,
    Low,
    Medium,
    High,
}

/// RSSI thresholds, in dBm, bounding the bands of the table in §4.7. The
/// spec leaves the concrete dBm cutoffs unspecified; these follow the
/// conventional Wi-Fi signal-quality bands (excellent/good/fair/poor).
pub const RSSI_EXCELLENT_DBM: i32 = -50;
pub const RSSI_GOOD_DBM: i32 = -60;
pub const RSSI_FAIR_DBM: i32 = -70;

fn target_for_rssi(rssi_dbm: i32) -> PowerLevel {
    if rssi_dbm >= RSSI_EXCELLENT_DBM {
        PowerLevel::Min
    } else if rssi_dbm >= RSSI_GOOD_DBM {
        PowerLevel::Low
    } else if rssi_dbm >= RSSI_FAIR_DBM {
        PowerLevel::Medium
    } else {
        PowerLevel::High
    }
}

/// Tracks the radio's current power level and drives changes through
/// `LinkTx` as RSSI samples (or a periodic timer, per §4.7) come in. Inert
/// when `auto_tx_power` is disabled in configuration; the actor binding in
/// `linksched-embassy` simply does not spawn this component in that case.
pub struct PowerCtl {
    current_power: PowerLevel,
}

impl PowerCtl {
    pub const fn new() -> Self {
        PowerCtl {
            current_power: PowerLevel::Min,
        }
    }

    pub fn current_power(&self) -> PowerLevel {
        self.current_power
    }

    /// Feeds one RSSI sample. Changes `LinkTx`'s power if the target level
    /// differs from the current one. No hysteresis band is applied, per the
    /// spec as given.
    pub fn on_rssi_sample(&mut self, rssi_dbm: i32, link: &mut impl LinkTx) {
        let target = target_for_rssi(rssi_dbm);
        if target != self.current_power {
            if link.set_tx_power(target).is_ok() {
                linksched_util::debug!("power level changed");
                self.current_power = target;
            } else {
                linksched_util::warn!("failed to change tx power");
            }
        }
    }
}

impl Default for PowerCtl {
    fn default() -> Self {
        Self::new()
    }
}

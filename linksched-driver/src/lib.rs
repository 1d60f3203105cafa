//! Everything between the scheduler core and the radio: the `LinkTx`/`LinkRx`
//! traits the core treats as opaque, the adaptive power controller driven by
//! link-quality readings, and the configuration surface supplied by the
//! terminal collaborator at start-up.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod config;
pub mod link;
pub mod power;

pub use config::{BurstConfig, ClassConfig, ConfigError, LinkConfig, PowerSaveMode, SchedulerConfig};
pub use link::{LinkError, LinkRx, LinkTx, ReceiveControl};
pub use power::{PowerCtl, PowerLevel};

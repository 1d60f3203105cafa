//! Embassy actor bindings for `linksched`: a clock backed by `embassy_time`,
//! shared link-quality state, and the plain async loops that drive the
//! scheduler tick, the producers and the power controller.
//!
//! These are deliberately *not* `#[embassy_executor::task]` functions
//! themselves — each takes generic parameters (`LinkTx`, `LinkRx`, `RngCore`
//! implementations), and embassy tasks cannot be generic. An application
//! wraps each loop in its own concrete task, the same way `dot15d4-embassy`'s
//! `Ieee802154Stack::run` is a plain generic async method that the
//! application spawns from its own task.

#![no_std]

pub mod clock;
pub mod quality;
pub mod tasks;

pub use clock::EmbassyClock;
pub use quality::LinkQuality;

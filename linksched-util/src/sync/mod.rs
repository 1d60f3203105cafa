//! A handful of executor independent synchronization primitives.
//!
//! The goal is to provide synchronization across the actors that share
//! `linksched-core`'s scheduler state without pulling in a specific async
//! runtime.
pub mod mutex;

pub use mutex::*;

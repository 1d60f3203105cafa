//! The scheduler core: bounded per-class queues, a logical clock
//! abstraction, the deadline-aware scheduler tick, producers (periodic and
//! burst/jitter), and the receiver-side decode-and-account path.
//!
//! Nothing in this crate touches a radio directly — that boundary is
//! [`linksched_driver::LinkTx`]/[`linksched_driver::LinkRx`]; this crate only
//! calls across it.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod clock;
pub mod producer;
pub mod queue;
pub mod receiver;
pub mod scheduler;

pub use clock::Clock;
pub use producer::{BurstProducer, PeriodicProducer};
pub use queue::{BoundedClassQueue, Sample, SubmitError, QUEUE_CAPACITY};
pub use receiver::{ClassDelivery, Delivery, ReceiverCounters, ReceiverDecoder};
pub use scheduler::{Scheduler, SchedulerCounters, SchedulerState};

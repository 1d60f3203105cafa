//! Periodic and burst/jitter producers (§4.5).
//!
//! Sample synthesis is grounded on `packet_generator.c`'s
//! `create_test_*_packet` family: each call fills `count` fresh elements
//! indexed from zero with a type-specific deterministic formula, it does not
//! carry a running counter across calls.

use heapless::Vec;
use rand_core::RngCore;

use linksched_driver::{BurstConfig, ClassConfig};
use linksched_wire::{ClassId, DataType};

use crate::clock::Clock;
use crate::queue::SubmitError;
use crate::scheduler::Scheduler;

/// Upper bound on a synthesized sample's byte size: `packet_count`'s
/// configuration range tops out at 200 elements of the widest `DataType`
/// (f64, 8 bytes). This is larger than `MAX_PAYLOAD_BYTES`; a producer whose
/// configuration yields an oversized sample gets `SampleTooLarge` back from
/// `Scheduler::submit` rather than having its payload silently truncated
/// here.
pub const SYNTH_CAPACITY: usize = 200 * 8;

/// Writes `count` elements of `data_type` into `buf`, using the same
/// sequential formulas as the original firmware's test packet generator:
/// `i % 256` (i8), `i * 10` (i16), `i` (i32), `i * 0.1` (f32), `i * 0.01`
/// (f64), each restarting from `i = 0`.
pub fn synthesize(data_type: DataType, count: u16, buf: &mut Vec<u8, SYNTH_CAPACITY>) {
    buf.clear();
    for i in 0..count as i32 {
        match data_type {
            DataType::I8 => {
                let _ = buf.push((i % 256) as u8);
            }
            DataType::I16 => {
                let _ = buf.extend_from_slice(&((i * 10) as i16).to_le_bytes());
            }
            DataType::I32 => {
                let _ = buf.extend_from_slice(&i.to_le_bytes());
            }
            DataType::F32 => {
                let _ = buf.extend_from_slice(&(i as f32 * 0.1).to_le_bytes());
            }
            DataType::F64 => {
                let _ = buf.extend_from_slice(&(i as f64 * 0.01).to_le_bytes());
            }
        }
    }
}

/// Per-class periodic producer: every `config.period_ms`, synthesizes
/// `config.packet_count` elements of `config.data_type` and submits them.
/// The actor binding in `linksched-embassy` drives `produce_once` from a
/// `Timer::after(Duration::from_millis(config.period_ms))` loop.
pub struct PeriodicProducer {
    class: ClassId,
    config: ClassConfig,
    queue_full_count: u32,
}

impl PeriodicProducer {
    pub const fn new(class: ClassId, config: ClassConfig) -> Self {
        PeriodicProducer {
            class,
            config,
            queue_full_count: 0,
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.config.period_ms
    }

    pub fn queue_full_count(&self) -> u32 {
        self.queue_full_count
    }

    /// Synthesizes and submits one sample. Never blocks on the scheduler
    /// beyond the mutex: a `QueueFull` return is counted and the producer
    /// simply waits for its next scheduled interval (§4.5).
    pub async fn produce_once(&mut self, scheduler: &Scheduler<'_>, clock: &impl Clock) {
        let mut payload = Vec::new();
        synthesize(self.config.data_type, self.config.packet_count, &mut payload);
        let deadline = clock.now_ms().wrapping_add(self.config.deadline_ms);
        let result = scheduler
            .submit(
                self.class,
                self.config.data_type,
                self.config.packet_count,
                &payload,
                deadline,
            )
            .await;
        match result {
            Ok(()) => {}
            Err(SubmitError::QueueFull) => {
                self.queue_full_count += 1;
                linksched_util::debug!("producer queue full");
            }
            Err(SubmitError::SampleTooLarge) => {
                linksched_util::warn!("producer configuration yields an oversized sample");
            }
        }
    }
}

/// Burst/jitter producer for the `Crand` aspiration class. Alternates
/// between a normal regime (intervals drawn uniformly from
/// `[min_interval_ms, max_interval_ms]`) and a denser burst regime
/// (`burst_interval_ms`, lasting `burst_duration_ms`) entered
/// `burst_activation_ms` after the producer started — measured from start,
/// not from the end of the last burst — then repeating (§4.5).
pub struct BurstProducer {
    config: BurstConfig,
    start_ms: u32,
    queue_full_count: u32,
}

impl BurstProducer {
    pub fn new(config: BurstConfig, start_ms: u32) -> Self {
        BurstProducer {
            config,
            start_ms,
            queue_full_count: 0,
        }
    }

    pub fn queue_full_count(&self) -> u32 {
        self.queue_full_count
    }

    fn in_burst_regime(&self, now: u32) -> bool {
        let elapsed = now.wrapping_sub(self.start_ms);
        (elapsed % self.burst_cycle_ms()) >= self.config.burst_activation_ms
    }

    fn burst_cycle_ms(&self) -> u32 {
        self.config.burst_activation_ms + self.config.burst_duration_ms
    }

    /// The interval to wait before the next call to `produce_once`, given the
    /// current time. Callers (the embassy task binding) re-read this after
    /// every production to decide how long to sleep next.
    pub fn next_interval_ms(&self, now: u32, rng: &mut impl RngCore) -> u32 {
        if self.in_burst_regime(now) {
            self.config.burst_interval_ms
        } else {
            let span = self.config.max_interval_ms - self.config.min_interval_ms;
            let jitter = if span == 0 { 0 } else { rng.next_u32() % (span + 1) };
            self.config.min_interval_ms + jitter
        }
    }

    pub async fn produce_once(&mut self, scheduler: &Scheduler<'_>, clock: &impl Clock) {
        if !self.config.enabled {
            return;
        }
        let now = clock.now_ms();
        let mut payload = Vec::new();
        synthesize(self.config.data_type, self.config.element_count, &mut payload);
        let deadline = now.wrapping_add(self.config.relative_deadline_ms);
        let result = scheduler
            .submit(
                ClassId::Crand,
                self.config.data_type,
                self.config.element_count,
                &payload,
                deadline,
            )
            .await;
        match result {
            Ok(()) => {}
            Err(SubmitError::QueueFull) => {
                self.queue_full_count += 1;
                linksched_util::debug!("burst producer queue full");
            }
            Err(SubmitError::SampleTooLarge) => {
                linksched_util::warn!("burst configuration yields an oversized sample");
            }
        }
    }
}

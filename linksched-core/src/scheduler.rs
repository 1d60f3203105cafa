//! The deadline-aware scheduler: [`SchedulerState`] holds the per-class
//! queues and counters behind the executor-independent mutex, and
//! [`Scheduler`] is the handle producers and the tick task share to reach it.
//!
//! Grounded on `station_example_main.c`'s main scheduling loop: the
//! earliest-deadline threshold gate, fixed class-order drain, and
//! `point_count`-as-`class_counts` accounting are all carried over; only the
//! storage (bounded heapless queues instead of malloc'd lists) and the
//! concurrency model (a shared `Mutex` instead of a single-threaded C loop)
//! differ.

use heapless::Vec;

use linksched_driver::{LinkError, LinkTx};
use linksched_util::sync::Mutex;
use linksched_wire::{AppHeader, ClassId, DataType, MacAddr, Role, WireCodec, MAX_CLASSES, MAX_PAYLOAD_BYTES, NO_CLASS_TYPE};

use crate::clock::Clock;
use crate::queue::{BoundedClassQueue, Sample, SubmitError};

/// Samples with fewer than this many bytes of headroom remaining in the
/// assembly buffer stop a class's drain early, per §4.4 step 5f.
const SMALL_SLACK: usize = 100;

/// Running totals observable from outside the scheduler mutex, for metrics
/// and tests. Mirrors §8's Q5 accounting invariant:
/// `points_processed = deadline_misses + Σ(samples included in emitted frames)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerCounters {
    pub points_processed: u32,
    pub deadline_misses: u32,
    pub packets_transmitted: u32,
}

/// The mutable state shared by producers and the scheduler's own tick,
/// serialized under a single mutex per the spec's shared-resource policy.
pub struct SchedulerState {
    queues: [BoundedClassQueue; MAX_CLASSES],
    class_data_type: [DataType; MAX_CLASSES],
    processing_threshold_ms: u32,
    counters: SchedulerCounters,
}

impl SchedulerState {
    pub const fn new(class_data_type: [DataType; MAX_CLASSES], processing_threshold_ms: u32) -> Self {
        SchedulerState {
            queues: [
                BoundedClassQueue::new(),
                BoundedClassQueue::new(),
                BoundedClassQueue::new(),
                BoundedClassQueue::new(),
            ],
            class_data_type,
            processing_threshold_ms,
            counters: SchedulerCounters {
                points_processed: 0,
                deadline_misses: 0,
                packets_transmitted: 0,
            },
        }
    }

    pub fn counters(&self) -> SchedulerCounters {
        self.counters
    }
}

/// Returns `now`'s signed distance from `earliest`, positive when `earliest`
/// is still in the future. Deadlines and the clock live in the same wrapping
/// `u32` millisecond space (§4.4 edge cases); the gap between them is always
/// far below `i32::MAX` under the documented precondition, so recovering the
/// sign via a cast is safe.
fn signed_delta(earliest: u32, now: u32) -> i32 {
    earliest.wrapping_sub(now) as i32
}

/// The handle producers and the tick task use to reach a [`SchedulerState`].
/// Owns the wire codec and local MAC header template; those never change
/// once the link is configured, so they live outside the mutex.
pub struct Scheduler<'a> {
    state: &'a Mutex<SchedulerState>,
    codec: WireCodec,
    destination: MacAddr,
    source: MacAddr,
    bssid: MacAddr,
}

impl<'a> Scheduler<'a> {
    pub const fn new(
        state: &'a Mutex<SchedulerState>,
        role: Role,
        source: MacAddr,
        destination: MacAddr,
        bssid: MacAddr,
    ) -> Self {
        Scheduler {
            state,
            codec: WireCodec::new(role, source),
            destination,
            source,
            bssid,
        }
    }

    /// Enqueues `payload` (already serialized, `data_count` elements of
    /// `data_type`) for `class`, due by `deadline`. Never blocks on the
    /// scheduler tick; at most waits for the mutex.
    pub async fn submit(
        &self,
        class: ClassId,
        data_type: DataType,
        data_count: u16,
        payload: &[u8],
        deadline: u32,
    ) -> Result<(), SubmitError> {
        if payload.len() > MAX_PAYLOAD_BYTES {
            return Err(SubmitError::SampleTooLarge);
        }
        let mut buf = Vec::<u8, MAX_PAYLOAD_BYTES>::new();
        buf.extend_from_slice(payload)
            .map_err(|_| SubmitError::SampleTooLarge)?;
        let sample = Sample {
            class,
            data_type,
            data_count,
            payload: buf,
            deadline,
        };
        let mut guard = self.state.lock().await;
        guard.queues[class.index()].enqueue(sample)
    }

    /// Runs one scheduler tick: Idle → (maybe) Assembling → (maybe) Emitting
    /// → Idle, per §4.4. Intended to be called once per `TICK_MS` from the
    /// actor binding in `linksched-embassy`.
    pub async fn tick(&self, clock: &impl Clock, link: &mut impl LinkTx) {
        let now = clock.now_ms();

        let assembled = {
            let mut guard = self.state.lock().await;

            let earliest = ClassId::ALL
                .iter()
                .filter_map(|class| guard.queues[class.index()].peek_front())
                .map(|sample| sample.deadline)
                .min();
            let Some(earliest) = earliest else {
                return;
            };
            if signed_delta(earliest, now) > guard.processing_threshold_ms as i32 {
                return;
            }

            let mut buf = [0u8; MAX_PAYLOAD_BYTES];
            let mut cursor = 0usize;
            let mut remaining = MAX_PAYLOAD_BYTES;
            let mut class_counts = [0u8; MAX_CLASSES];
            let mut class_types = [NO_CLASS_TYPE; MAX_CLASSES];

            for class in ClassId::ALL {
                let idx = class.index();
                loop {
                    let Some(front) = guard.queues[idx].peek_front() else {
                        break;
                    };
                    if front.payload_bytes() > remaining {
                        break;
                    }
                    let sample = guard.queues[idx].dequeue().expect("front just peeked");

                    if now > sample.deadline {
                        guard.counters.deadline_misses += 1;
                        guard.counters.points_processed += 1;
                        continue;
                    }

                    let bytes = sample.payload_bytes();
                    buf[cursor..cursor + bytes].copy_from_slice(&sample.payload);
                    cursor += bytes;
                    remaining -= bytes;
                    class_counts[idx] = class_counts[idx].saturating_add(1);
                    class_types[idx] = guard.class_data_type[idx].as_u8();
                    guard.counters.points_processed += 1;

                    if remaining < SMALL_SLACK {
                        break;
                    }
                }
            }

            if cursor == 0 {
                return;
            }
            (buf, class_types, class_counts, cursor)
        };

        let (buf, class_types, class_counts, cursor) = assembled;
        let header = AppHeader {
            class_counts,
            class_types,
            total_size: cursor as u16,
            timestamp: now,
        };
        let mac = linksched_wire::codec::MacHeader {
            destination: self.destination,
            source: self.source,
            bssid: self.bssid,
        };
        let built = self.codec.encode(&mac, &header, &buf[..cursor]);

        let outcome = link.transmit(built.as_bytes());
        let mut guard = self.state.lock().await;
        match outcome {
            Ok(()) => {
                let classes_contributing = class_counts.iter().filter(|&&count| count > 0).count() as u32;
                guard.counters.packets_transmitted += classes_contributing;
            }
            Err(LinkError) => {
                linksched_util::warn!("link transmit failed");
            }
        }
    }

    pub async fn counters(&self) -> SchedulerCounters {
        self.state.lock().await.counters()
    }
}

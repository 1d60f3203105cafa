//! [`Sample`], the unit a producer submits and the scheduler assembles into
//! frames, and [`BoundedClassQueue`], the fixed-capacity FIFO each class
//! keeps its pending samples in.
//!
//! Grounded on the original station firmware's per-class linked-list queue
//! (`msgqueue.c`: `enqueue`/`dequeue`/`peek`, capacity 50, 1400-byte nodes);
//! here the same bounded-FIFO-of-byte-buffers shape is built on
//! `heapless::Deque` instead of a malloc'd linked list, since this
//! deployment has no allocator.

use heapless::{Deque, Vec};

use linksched_wire::{ClassId, DataType, MAX_PAYLOAD_BYTES};

/// Matches `MAX_QUEUE_SIZE` in the original firmware's `msgqueue.h`.
pub const QUEUE_CAPACITY: usize = 50;

/// A producer's submission: `data_count` elements of `data_type`, already
/// serialized into `payload`, destined for `class`, due by `deadline`.
#[derive(Clone)]
pub struct Sample {
    pub class: ClassId,
    pub data_type: DataType,
    pub data_count: u16,
    pub payload: Vec<u8, MAX_PAYLOAD_BYTES>,
    /// Absolute deadline in the scheduler's millisecond clock.
    pub deadline: u32,
}

impl Sample {
    pub fn payload_bytes(&self) -> usize {
        self.payload.len()
    }
}

/// Failure modes of [`BoundedClassQueue::enqueue`]. Both are returned to the
/// producer, never retried or dropped silently by the queue itself (§7: no
/// drop-oldest policy).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SubmitError {
    /// The queue already holds [`QUEUE_CAPACITY`] samples.
    QueueFull,
    /// `payload.len() > MAX_PAYLOAD_BYTES`; this sample could never fit in a
    /// frame regardless of queue state.
    SampleTooLarge,
}

/// A single class's bounded FIFO of pending [`Sample`]s.
pub struct BoundedClassQueue {
    samples: Deque<Sample, QUEUE_CAPACITY>,
}

impl BoundedClassQueue {
    pub const fn new() -> Self {
        BoundedClassQueue {
            samples: Deque::new(),
        }
    }

    /// `sample.payload` is already bounded to `MAX_PAYLOAD_BYTES` by its type;
    /// rejecting an oversized submission happens earlier, in
    /// `Scheduler::submit`, before a `Sample` is even built. This can only
    /// fail when the queue is already at [`QUEUE_CAPACITY`].
    pub fn enqueue(&mut self, sample: Sample) -> Result<(), SubmitError> {
        self.samples
            .push_back(sample)
            .map_err(|_| SubmitError::QueueFull)
    }

    /// Puts `sample` back at the front of the queue. Used only to undo a
    /// `dequeue` when the assembly loop discovers, after the fact, that a
    /// Sample cannot be included — the fixed class-order drain in
    /// `Scheduler::tick` instead checks size by peeking before it dequeues,
    /// so it never needs this in practice; it exists for the same reason the
    /// original firmware's queue exposed it.
    pub fn enqueue_front(&mut self, sample: Sample) -> Result<(), SubmitError> {
        self.samples
            .push_front(sample)
            .map_err(|_| SubmitError::QueueFull)
    }

    pub fn peek_front(&self) -> Option<&Sample> {
        self.samples.front()
    }

    pub fn dequeue(&mut self) -> Option<Sample> {
        self.samples.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }
}

impl Default for BoundedClassQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(deadline: u32, bytes: usize) -> Sample {
        let mut payload = Vec::new();
        payload.resize(bytes, 0xab).unwrap();
        Sample {
            class: ClassId::C1,
            data_type: DataType::I8,
            data_count: bytes as u16,
            payload,
            deadline,
        }
    }

    #[test]
    fn fifo_order_preserved() {
        let mut queue = BoundedClassQueue::new();
        queue.enqueue(sample(10, 4)).unwrap();
        queue.enqueue(sample(20, 4)).unwrap();
        assert_eq!(queue.peek_front().unwrap().deadline, 10);
        assert_eq!(queue.dequeue().unwrap().deadline, 10);
        assert_eq!(queue.dequeue().unwrap().deadline, 20);
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn putback_preserves_front_position() {
        let mut queue = BoundedClassQueue::new();
        queue.enqueue(sample(20, 4)).unwrap();
        let front = queue.dequeue().unwrap();
        assert_eq!(front.deadline, 20);
        queue.enqueue_front(front).unwrap();
        assert_eq!(queue.dequeue().unwrap().deadline, 20);
    }

    #[test]
    fn rejects_enqueue_past_capacity() {
        let mut queue = BoundedClassQueue::new();
        for i in 0..QUEUE_CAPACITY {
            queue.enqueue(sample(i as u32, 1)).unwrap();
        }
        assert_eq!(queue.enqueue(sample(999, 1)), Err(SubmitError::QueueFull));
    }
}

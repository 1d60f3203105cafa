//! [`ClassId`], [`DataType`] and the packed [`AppHeader`] that sits between
//! the MAC header and the payload on the wire.

use crate::{APP_HEADER_LEN, MAX_CLASSES};

/// Traffic class tag. The variant order is also the class iteration order
/// used both for queue draining and for payload byte order: C1, C2, C3,
/// Crand.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ClassId {
    C1 = 0,
    C2 = 1,
    C3 = 2,
    /// The aspiration class used for bursty, randomized load.
    Crand = 3,
}

impl ClassId {
    /// All classes, in fixed class order.
    pub const ALL: [ClassId; MAX_CLASSES] = [ClassId::C1, ClassId::C2, ClassId::C3, ClassId::Crand];

    pub const fn index(self) -> usize {
        self as u8 as usize
    }

    pub const fn from_index(index: usize) -> Option<ClassId> {
        match index {
            0 => Some(ClassId::C1),
            1 => Some(ClassId::C2),
            2 => Some(ClassId::C3),
            3 => Some(ClassId::Crand),
            _ => None,
        }
    }
}

/// The element type carried by a class, constant for the lifetime of the
/// scheduler that owns the class.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum DataType {
    I8 = 0,
    I16 = 1,
    I32 = 2,
    F32 = 3,
    F64 = 4,
}

impl DataType {
    /// Element width in bytes.
    pub const fn width(self) -> usize {
        match self {
            DataType::I8 => 1,
            DataType::I16 => 2,
            DataType::I32 => 4,
            DataType::F32 => 4,
            DataType::F64 => 8,
        }
    }

    /// Parses a wire byte, rejecting anything not in `[I8, F64]`.
    ///
    /// `DataType` and the optional `PacketType` tag are carried as single
    /// bytes on the wire; the byte must be validated to be in range before it
    /// is interpreted, it must never be transmuted.
    pub const fn from_u8(value: u8) -> Option<DataType> {
        match value {
            0 => Some(DataType::I8),
            1 => Some(DataType::I16),
            2 => Some(DataType::I32),
            3 => Some(DataType::F32),
            4 => Some(DataType::F64),
            _ => None,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// The packed application header carried between the MAC header and the
/// payload.
///
/// This is the single AppHeader variant chosen for this deployment out of the
/// several near-identical sender/receiver variants observed in the original
/// implementation (with/without a control-frame prelude, with/without a
/// `signature` sentinel, 3 vs. 4 classes): no signature, the type map folded
/// into the data frame header, and `MAX_CLASSES = 4` so the burst class gets
/// its own slot.
///
/// `class_counts[i]` is the number of `Sample`s of class `i` folded into this
/// frame, not the total element count — `energy_aware_sched_station_1`'s
/// scheduler increments a plain `point_count` once per dequeued packet and
/// writes that into the header, it never accumulates the per-sample element
/// count there. A sibling sender variant keeps a *separate* `data_counts[i]`
/// array for the element-count reading; this deployment drops that field
/// rather than carry two counters that can disagree.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct AppHeader {
    /// Number of Samples of each class folded into this frame.
    pub class_counts: [u8; MAX_CLASSES],
    /// `DataType` byte per class, effective at emission time. `0xff` marks a
    /// class with no contribution (and is never itself a valid `DataType`).
    pub class_types: [u8; MAX_CLASSES],
    /// Number of payload bytes following this header.
    pub total_size: u16,
    /// Sender's monotonic millisecond clock at emission.
    pub timestamp: u32,
}

/// Sentinel written to `class_types[i]` for a class with no contribution.
pub const NO_CLASS_TYPE: u8 = 0xff;

impl AppHeader {
    pub const ENCODED_LEN: usize = APP_HEADER_LEN;

    /// Encodes the header as little-endian bytes, with no interior padding.
    pub fn encode_into(&self, buf: &mut [u8]) {
        debug_assert!(buf.len() >= Self::ENCODED_LEN);
        let mut cursor = 0;
        buf[cursor..cursor + MAX_CLASSES].copy_from_slice(&self.class_counts);
        cursor += MAX_CLASSES;
        buf[cursor..cursor + MAX_CLASSES].copy_from_slice(&self.class_types);
        cursor += MAX_CLASSES;
        buf[cursor..cursor + 2].copy_from_slice(&self.total_size.to_le_bytes());
        cursor += 2;
        buf[cursor..cursor + 4].copy_from_slice(&self.timestamp.to_le_bytes());
    }

    /// Decodes a header from a byte slice at least [`Self::ENCODED_LEN`] long.
    /// Field values are not validated here; range-checking (`total_size`,
    /// `class_types`) is the caller's responsibility, see
    /// [`crate::codec::WireCodec::decode`].
    pub fn decode(buf: &[u8]) -> AppHeader {
        debug_assert!(buf.len() >= Self::ENCODED_LEN);
        let mut cursor = 0;
        let mut class_counts = [0u8; MAX_CLASSES];
        class_counts.copy_from_slice(&buf[cursor..cursor + MAX_CLASSES]);
        cursor += MAX_CLASSES;
        let mut class_types = [0u8; MAX_CLASSES];
        class_types.copy_from_slice(&buf[cursor..cursor + MAX_CLASSES]);
        cursor += MAX_CLASSES;
        let total_size = u16::from_le_bytes(buf[cursor..cursor + 2].try_into().unwrap());
        cursor += 2;
        let timestamp = u32::from_le_bytes(buf[cursor..cursor + 4].try_into().unwrap());
        AppHeader {
            class_counts,
            class_types,
            total_size,
            timestamp,
        }
    }
}

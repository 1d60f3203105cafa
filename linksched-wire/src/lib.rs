//! Wire framing shared by the linksched sender and receiver.
//!
//! A datagram on the air is, in order: a fixed 24-byte MAC header shaped like
//! an 802.11 data frame, a packed [`header::AppHeader`], and a payload of up
//! to [`MAX_PAYLOAD_BYTES`]. Nothing here aliases a Rust struct over the wire
//! buffer — every field is explicitly read and written as little-endian bytes
//! so truncation produces a well-formed [`codec::CodecError`] instead of an
//! out-of-bounds read.
#![no_std]
#![allow(dead_code)]

pub mod addr;
pub mod codec;
pub mod header;

pub use addr::MacAddr;
pub use codec::{BuiltFrame, CodecError, DecodedFrame, Role, WireCodec};
pub use header::{AppHeader, ClassId, DataType, NO_CLASS_TYPE};

/// Number of traffic classes carried in a frame: C1, C2, C3, Crand.
pub const MAX_CLASSES: usize = 4;

/// Largest payload a single frame may carry, in bytes.
pub const MAX_PAYLOAD_BYTES: usize = 1400;

/// Length of the fixed 802.11-shaped MAC header, in bytes.
pub const MAC_HEADER_LEN: usize = 24;

/// Length of the packed [`AppHeader`] on the wire, in bytes.
pub const APP_HEADER_LEN: usize = 2 * MAX_CLASSES + 2 + 4;

/// Largest buffer a [`BuiltFrame`] can occupy.
pub const FRAME_CAPACITY: usize = MAC_HEADER_LEN + APP_HEADER_LEN + MAX_PAYLOAD_BYTES;

/// Latency values outside `[0, LATENCY_SANITY_MAX_MS]` are clamped to zero and
/// flagged as a clock anomaly rather than trusted.
pub const LATENCY_SANITY_MAX_MS: u32 = 30_000;

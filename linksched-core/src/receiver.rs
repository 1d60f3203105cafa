//! [`ReceiverDecoder`]: the receive-side path from raw link bytes to
//! per-class typed deliveries (§4.8).

use linksched_wire::{
    CodecError, ClassId, DataType, WireCodec, LATENCY_SANITY_MAX_MS, MAX_CLASSES, NO_CLASS_TYPE,
};

/// Running totals the receiver maintains across frames, mirroring the
/// scheduler-side counters' role as observable metrics (§7, §4.8 step 8).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverCounters {
    pub data_packets: u32,
    pub error_packets: u32,
    pub clock_anomalies: u32,
}

/// One class's delivery out of a decoded frame: the raw bytes for that
/// class's slice of the payload, and whether the slice was cut short because
/// the frame ran out of payload before `class_counts[c]` elements were
/// accounted for.
#[derive(Debug, PartialEq, Eq)]
pub struct ClassDelivery<'a> {
    pub class: ClassId,
    pub data_type: DataType,
    pub count: u8,
    pub bytes: &'a [u8],
    pub truncated: bool,
}

/// The outcome of decoding one received frame: the per-class deliveries and
/// the computed end-to-end latency.
pub struct Delivery<'a> {
    pub classes: heapless::Vec<ClassDelivery<'a>, MAX_CLASSES>,
    pub latency_ms: u32,
    pub clock_anomaly: bool,
}

/// Decodes received frames, applying the ordered checks of §4.8 and
/// maintaining the last successfully decoded frame's class snapshot plus
/// running counters.
pub struct ReceiverDecoder {
    codec: WireCodec,
    counters: ReceiverCounters,
    last_class_types: [u8; MAX_CLASSES],
    last_class_counts: [u8; MAX_CLASSES],
}

impl ReceiverDecoder {
    pub const fn new(codec: WireCodec) -> Self {
        ReceiverDecoder {
            codec,
            counters: ReceiverCounters {
                data_packets: 0,
                error_packets: 0,
                clock_anomalies: 0,
            },
            last_class_types: [NO_CLASS_TYPE; MAX_CLASSES],
            last_class_counts: [0; MAX_CLASSES],
        }
    }

    pub fn counters(&self) -> ReceiverCounters {
        self.counters
    }

    /// Processes one received frame. Returns `None` for drops that are
    /// expected in promiscuous capture (wrong direction, not addressed to
    /// us, too short) and for header-level corruption; `Some` otherwise,
    /// even when the payload was truncated.
    pub fn decode_frame<'a>(&mut self, frame: &'a [u8], receive_clock_ms: u32) -> Option<Delivery<'a>> {
        let decoded = match self.codec.decode(frame) {
            Ok(decoded) => decoded,
            Err(CodecError::NotForUs | CodecError::NotOurFrame | CodecError::TooShortFor80211) => {
                return None;
            }
            Err(CodecError::TooShortForAppHeader | CodecError::InvalidHeader) => {
                self.counters.error_packets += 1;
                return None;
            }
        };

        let expected = WireCodec::expected_payload_bytes(&decoded.header);
        if expected != decoded.header.total_size as u32 {
            linksched_util::warn!("payload size mismatch between class_counts and total_size");
        }

        let mut classes = heapless::Vec::new();
        let mut cursor = 0usize;
        for class in ClassId::ALL {
            let idx = class.index();
            let count = decoded.header.class_counts[idx];
            let type_byte = decoded.header.class_types[idx];
            if count == 0 || type_byte == NO_CLASS_TYPE {
                continue;
            }
            // `WireCodec::decode` already rejected any class_types byte that
            // is neither NO_CLASS_TYPE nor a valid DataType.
            let data_type = DataType::from_u8(type_byte).expect("decode validated class_types");
            let slice_len = count as usize * data_type.width();
            let available = decoded.payload.len().saturating_sub(cursor);
            let (bytes, truncated) = if slice_len > available {
                (&decoded.payload[cursor..], true)
            } else {
                (&decoded.payload[cursor..cursor + slice_len], false)
            };
            cursor += bytes.len();
            classes
                .push(ClassDelivery {
                    class,
                    data_type,
                    count,
                    bytes,
                    truncated,
                })
                .ok();
            if truncated {
                break;
            }
        }

        let (latency_ms, clock_anomaly) = latency_from_timestamp(decoded.header.timestamp, receive_clock_ms);
        if clock_anomaly {
            self.counters.clock_anomalies += 1;
        }

        self.counters.data_packets += 1;
        self.last_class_types = decoded.header.class_types;
        self.last_class_counts = decoded.header.class_counts;

        Some(Delivery {
            classes,
            latency_ms,
            clock_anomaly,
        })
    }

    pub fn last_class_types(&self) -> [u8; MAX_CLASSES] {
        self.last_class_types
    }

    pub fn last_class_counts(&self) -> [u8; MAX_CLASSES] {
        self.last_class_counts
    }
}

/// `latency_ms = receive_clock_ms - header.timestamp`, clamped to 0 with a
/// clock-anomaly flag when negative or implausibly large (§3).
fn latency_from_timestamp(timestamp_ms: u32, receive_clock_ms: u32) -> (u32, bool) {
    let delta = receive_clock_ms.wrapping_sub(timestamp_ms) as i64;
    if delta < 0 || delta > LATENCY_SANITY_MAX_MS as i64 {
        (0, true)
    } else {
        (delta as u32, false)
    }
}

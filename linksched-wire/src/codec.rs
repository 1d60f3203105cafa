//! [`WireCodec`]: the framing layer between raw link bytes and an
//! [`AppHeader`] + payload pair.

use heapless::Vec;

use crate::{
    addr::MacAddr,
    header::{AppHeader, DataType, NO_CLASS_TYPE},
    FRAME_CAPACITY, MAC_HEADER_LEN, MAX_CLASSES, MAX_PAYLOAD_BYTES,
};

const FRAME_CONTROL_1_DATA: u8 = 0x08;
const FRAME_CONTROL_2_TO_AP: u8 = 0x01;
const FRAME_CONTROL_2_FROM_AP: u8 = 0x02;

/// Which end of the link a [`WireCodec`] is framing for. Determines both the
/// direction bits written on encode and the direction bits required on
/// decode.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Role {
    /// Station talking to an access point: frames are sent `to_ds`, received
    /// frames are expected `from_ds`.
    Station,
    /// Access point talking to a station: the reverse.
    AccessPoint,
}

impl Role {
    const fn outgoing_frame_control_2(self) -> u8 {
        match self {
            Role::Station => FRAME_CONTROL_2_TO_AP,
            Role::AccessPoint => FRAME_CONTROL_2_FROM_AP,
        }
    }

    const fn expected_incoming_frame_control_2(self) -> u8 {
        match self {
            Role::Station => FRAME_CONTROL_2_FROM_AP,
            Role::AccessPoint => FRAME_CONTROL_2_TO_AP,
        }
    }
}

/// The fixed 24-byte 802.11-shaped MAC header.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MacHeader {
    pub destination: MacAddr,
    pub source: MacAddr,
    pub bssid: MacAddr,
}

impl MacHeader {
    fn encode_into(&self, role: Role, buf: &mut [u8]) {
        buf[0] = FRAME_CONTROL_1_DATA;
        buf[1] = role.outgoing_frame_control_2();
        buf[2] = 0;
        buf[3] = 0;
        buf[4..10].copy_from_slice(self.destination.as_bytes());
        buf[10..16].copy_from_slice(self.source.as_bytes());
        buf[16..22].copy_from_slice(self.bssid.as_bytes());
        buf[22] = 0;
        buf[23] = 0;
    }
}

/// A frame built by [`WireCodec::encode`], ready to hand to `LinkTx`.
pub struct BuiltFrame {
    bytes: Vec<u8, FRAME_CAPACITY>,
}

impl BuiltFrame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A frame decoded by [`WireCodec::decode`].
///
/// `payload` borrows from the buffer passed to `decode` and may be shorter
/// than `header.total_size` states — see `truncated`.
#[derive(Debug, PartialEq, Eq)]
pub struct DecodedFrame<'a> {
    pub mac: MacHeader,
    pub header: AppHeader,
    pub payload: &'a [u8],
    /// Set when fewer payload bytes were present than `header.total_size`
    /// claims. The core processes what is available rather than drop the
    /// frame outright (§4.3 step 6).
    pub truncated: bool,
}

/// Failure modes of [`WireCodec::decode`]. Mirrors the taxonomy of hard,
/// header-level rejections in the error-handling design; payload truncation
/// is not one of these — it is reported on [`DecodedFrame::truncated`]
/// instead, since the frame is still usable.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CodecError {
    /// Fewer than [`MAC_HEADER_LEN`] bytes total.
    TooShortFor80211,
    /// First byte is not a data frame, or the direction bits don't match the
    /// configured [`Role`].
    NotOurFrame,
    /// Destination address is neither the local MAC nor broadcast.
    NotForUs,
    /// Frame is long enough for a MAC header but not for the AppHeader that
    /// must follow it.
    TooShortForAppHeader,
    /// AppHeader fields are out of range (`total_size` over the payload cap,
    /// or a `class_types[i]` byte that isn't a valid `DataType` or the
    /// no-contribution sentinel).
    InvalidHeader,
}

/// Encodes and decodes frames for one [`Role`] and local address.
pub struct WireCodec {
    role: Role,
    local_mac: MacAddr,
}

impl WireCodec {
    pub const fn new(role: Role, local_mac: MacAddr) -> Self {
        WireCodec { role, local_mac }
    }

    /// Builds a frame: MAC header, then AppHeader, then `payload` verbatim.
    /// `payload.len()` must equal `header.total_size`; the caller (the
    /// scheduler's assembly step) guarantees this.
    pub fn encode(&self, mac: &MacHeader, header: &AppHeader, payload: &[u8]) -> BuiltFrame {
        debug_assert!(payload.len() == header.total_size as usize);
        debug_assert!(payload.len() <= MAX_PAYLOAD_BYTES);

        let mut bytes = Vec::<u8, FRAME_CAPACITY>::new();
        bytes
            .resize(MAC_HEADER_LEN + AppHeader::ENCODED_LEN, 0)
            .ok();
        let mut mac_buf = [0u8; MAC_HEADER_LEN];
        mac.encode_into(self.role, &mut mac_buf);
        bytes[..MAC_HEADER_LEN].copy_from_slice(&mac_buf);
        header.encode_into(&mut bytes[MAC_HEADER_LEN..]);
        bytes.extend_from_slice(payload).ok();

        BuiltFrame { bytes }
    }

    /// Decodes a frame received off the link, applying the ordered checks of
    /// §4.3: length, frame type and direction, addressing, header length,
    /// then header-field validity.
    pub fn decode<'a>(&self, frame: &'a [u8]) -> Result<DecodedFrame<'a>, CodecError> {
        if frame.len() < MAC_HEADER_LEN {
            return Err(CodecError::TooShortFor80211);
        }

        if frame[0] != FRAME_CONTROL_1_DATA
            || frame[1] != self.role.expected_incoming_frame_control_2()
        {
            return Err(CodecError::NotOurFrame);
        }

        let destination = MacAddr::new(frame[4..10].try_into().unwrap());
        if destination != self.local_mac && !destination.is_broadcast() {
            return Err(CodecError::NotForUs);
        }
        let source = MacAddr::new(frame[10..16].try_into().unwrap());
        let bssid = MacAddr::new(frame[16..22].try_into().unwrap());
        let mac = MacHeader {
            destination,
            source,
            bssid,
        };

        let app_header_end = MAC_HEADER_LEN + AppHeader::ENCODED_LEN;
        if frame.len() < app_header_end {
            return Err(CodecError::TooShortForAppHeader);
        }
        let header = AppHeader::decode(&frame[MAC_HEADER_LEN..app_header_end]);

        if header.total_size as usize > MAX_PAYLOAD_BYTES {
            return Err(CodecError::InvalidHeader);
        }
        for i in 0..MAX_CLASSES {
            let type_byte = header.class_types[i];
            if type_byte != NO_CLASS_TYPE && DataType::from_u8(type_byte).is_none() {
                return Err(CodecError::InvalidHeader);
            }
        }

        let available = frame.len() - app_header_end;
        let claimed = header.total_size as usize;
        let (payload, truncated) = if available < claimed {
            (&frame[app_header_end..], true)
        } else {
            (&frame[app_header_end..app_header_end + claimed], false)
        };

        Ok(DecodedFrame {
            mac,
            header,
            payload,
            truncated,
        })
    }

    /// Σ `class_counts[i] × width(class_types[i])`, for reconciling against
    /// `header.total_size`. A mismatch is an anomaly the caller logs; it is
    /// not itself a decode failure.
    pub fn expected_payload_bytes(header: &AppHeader) -> u32 {
        let mut total = 0u32;
        for i in 0..MAX_CLASSES {
            if header.class_types[i] == NO_CLASS_TYPE {
                continue;
            }
            if let Some(data_type) = DataType::from_u8(header.class_types[i]) {
                total += header.class_counts[i] as u32 * data_type.width() as u32;
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec_pair() -> (WireCodec, WireCodec) {
        let sta_mac = MacAddr::new([1, 2, 3, 4, 5, 6]);
        let ap_mac = MacAddr::new([6, 5, 4, 3, 2, 1]);
        (
            WireCodec::new(Role::Station, sta_mac),
            WireCodec::new(Role::AccessPoint, ap_mac),
        )
    }

    #[test]
    fn round_trips_header_and_payload() {
        let (station, ap) = codec_pair();
        let mac = MacHeader {
            destination: MacAddr::new([6, 5, 4, 3, 2, 1]),
            source: MacAddr::new([1, 2, 3, 4, 5, 6]),
            bssid: MacAddr::new([6, 5, 4, 3, 2, 1]),
        };
        let payload = [7u8; 32];
        let header = AppHeader {
            class_counts: [8, 0, 0, 0],
            class_types: [DataType::I32.as_u8(), NO_CLASS_TYPE, NO_CLASS_TYPE, NO_CLASS_TYPE],
            total_size: 32,
            timestamp: 123,
        };
        let frame = station.encode(&mac, &header, &payload);

        let decoded = ap.decode(frame.as_bytes()).expect("valid frame");
        assert_eq!(decoded.header, header);
        assert_eq!(decoded.payload, &payload);
        assert!(!decoded.truncated);
    }

    #[test]
    fn rejects_frame_too_short_for_mac_header() {
        let (_, ap) = codec_pair();
        let short = [0u8; 10];
        assert_eq!(ap.decode(&short), Err(CodecError::TooShortFor80211));
    }

    #[test]
    fn rejects_wrong_direction() {
        let (station, _) = codec_pair();
        let mac = MacHeader {
            destination: MacAddr::BROADCAST,
            source: MacAddr::new([1, 2, 3, 4, 5, 6]),
            bssid: MacAddr::BROADCAST,
        };
        let header = AppHeader {
            class_counts: [0; MAX_CLASSES],
            class_types: [NO_CLASS_TYPE; MAX_CLASSES],
            total_size: 0,
            timestamp: 0,
        };
        let frame = station.encode(&mac, &header, &[]);
        // another station codec expects the same direction bits station sends,
        // so decoding a station-sent frame as a station must fail.
        let other_station = WireCodec::new(Role::Station, MacAddr::new([9, 9, 9, 9, 9, 9]));
        assert_eq!(
            other_station.decode(frame.as_bytes()),
            Err(CodecError::NotOurFrame)
        );
    }

    #[test]
    fn accepts_broadcast_destination() {
        let (station, ap) = codec_pair();
        let mac = MacHeader {
            destination: MacAddr::BROADCAST,
            source: MacAddr::new([1, 2, 3, 4, 5, 6]),
            bssid: MacAddr::BROADCAST,
        };
        let header = AppHeader {
            class_counts: [0; MAX_CLASSES],
            class_types: [NO_CLASS_TYPE; MAX_CLASSES],
            total_size: 0,
            timestamp: 0,
        };
        let frame = station.encode(&mac, &header, &[]);
        assert!(ap.decode(frame.as_bytes()).is_ok());
    }

    #[test]
    fn flags_truncated_payload_without_erroring() {
        let (station, ap) = codec_pair();
        let mac = MacHeader {
            destination: MacAddr::new([6, 5, 4, 3, 2, 1]),
            source: MacAddr::new([1, 2, 3, 4, 5, 6]),
            bssid: MacAddr::new([6, 5, 4, 3, 2, 1]),
        };
        let header = AppHeader {
            class_counts: [1, 0, 0, 0],
            class_types: [DataType::I32.as_u8(), NO_CLASS_TYPE, NO_CLASS_TYPE, NO_CLASS_TYPE],
            total_size: 40,
            timestamp: 0,
        };
        let full = station.encode(&mac, &header, &[0u8; 40]);
        let short = &full.as_bytes()[..full.len() - 10];

        let decoded = ap.decode(short).expect("truncated frame still decodes");
        assert!(decoded.truncated);
        assert_eq!(decoded.payload.len(), 30);
    }

    #[test]
    fn rejects_invalid_class_type_byte() {
        let (station, ap) = codec_pair();
        let mac = MacHeader {
            destination: MacAddr::new([6, 5, 4, 3, 2, 1]),
            source: MacAddr::new([1, 2, 3, 4, 5, 6]),
            bssid: MacAddr::new([6, 5, 4, 3, 2, 1]),
        };
        let header = AppHeader {
            class_counts: [1, 0, 0, 0],
            class_types: [0x07, NO_CLASS_TYPE, NO_CLASS_TYPE, NO_CLASS_TYPE],
            total_size: 0,
            timestamp: 0,
        };
        let frame = station.encode(&mac, &header, &[]);
        assert_eq!(ap.decode(frame.as_bytes()), Err(CodecError::InvalidHeader));
    }

    #[test]
    fn expected_payload_bytes_sums_class_contributions() {
        let header = AppHeader {
            class_counts: [2, 3, 0, 0],
            class_types: [
                DataType::I32.as_u8(),
                DataType::I8.as_u8(),
                NO_CLASS_TYPE,
                NO_CLASS_TYPE,
            ],
            total_size: 11,
            timestamp: 0,
        };
        assert_eq!(WireCodec::expected_payload_bytes(&header), 2 * 4 + 3 * 1);
    }
}

//! LoRa Mailbox Shared Types
//!
//! This crate provides the announcement-line parser and the packet types
//! consumed by the receiver binary. Everything here is pure: no I/O, no
//! async, no global state.

pub mod parser;
pub mod payload;

use std::fmt;
use thiserror::Error;

pub use parser::parse;
pub use payload::{extract, Payload};

/// Literal markers every announcement line carries
pub mod markers {
    /// Announcement phrase emitted by the gateway for each received packet
    pub const ANNOUNCEMENT: &str = "Received LoRa packet";

    /// Signal strength marker
    pub const RSSI: &str = "rssi";

    /// Weight key inside the payload fragment
    pub const WEIGHT: &str = "w:";

    /// Battery key inside the payload fragment
    pub const BATTERY: &str = "b:";

    /// Markers that identify a line as a packet announcement
    pub const ANNOUNCEMENT_MARKERS: [&str; 2] = [ANNOUNCEMENT, RSSI];

    /// Markers of the two payload keys
    pub const PAYLOAD_MARKERS: [&str; 2] = [WEIGHT, BATTERY];
}

/// Why a line did not produce a [`PacketRecord`]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    #[error("line is not a packet announcement")]
    NotAnAnnouncement,

    #[error("announcement does not have exactly 4 fields")]
    WrongFieldCount,

    #[error("rssi or length field is malformed")]
    MalformedHeader,

    #[error("data payload is malformed")]
    MalformedPayload,
}

impl RejectReason {
    /// Every reason, in taxonomy order
    pub const ALL: [RejectReason; 4] = [
        RejectReason::NotAnAnnouncement,
        RejectReason::WrongFieldCount,
        RejectReason::MalformedHeader,
        RejectReason::MalformedPayload,
    ];

    /// Short machine-friendly label, used as a log field
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NotAnAnnouncement => "not_an_announcement",
            RejectReason::WrongFieldCount => "wrong_field_count",
            RejectReason::MalformedHeader => "malformed_header",
            RejectReason::MalformedPayload => "malformed_payload",
        }
    }
}

/// Result of parsing one raw line
pub type ParseOutcome = Result<PacketRecord, RejectReason>;

/// A numeric reading kept in the exact text form it arrived in
///
/// Construction validates the text against the JSON number grammar, so a
/// `Reading` is always safe to hand to an external command as an argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reading(String);

impl Reading {
    /// Accept any JSON-style number literal (`-43`, `0.5`, `1e3`)
    pub fn number(text: &str) -> Option<Self> {
        is_number_literal(text).then(|| Self(text.to_string()))
    }

    /// Accept only a non-negative decimal integer (`0`, `17`)
    pub fn unsigned(text: &str) -> Option<Self> {
        let valid = !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit());
        valid.then(|| Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized telemetry extracted from one announcement line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketRecord {
    /// Radio RSSI in dBm, typically negative
    pub signal_strength: Reading,
    /// Radio payload length in bytes
    pub payload_length: Reading,
    /// Scale reading
    pub weight: Reading,
    /// Battery reading
    pub battery_level: Reading,
}

impl PacketRecord {
    /// Positional callback arguments: rssi, length, weight, battery
    pub fn to_args(&self) -> [String; 4] {
        [
            self.signal_strength.to_string(),
            self.payload_length.to_string(),
            self.weight.to_string(),
            self.battery_level.to_string(),
        ]
    }
}

/// JSON number grammar: `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`
fn is_number_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;

    let digits = |i: &mut usize| {
        let start = *i;
        while *i < bytes.len() && bytes[*i].is_ascii_digit() {
            *i += 1;
        }
        *i - start
    };

    if bytes.get(i) == Some(&b'-') {
        i += 1;
    }

    match bytes.get(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            digits(&mut i);
        }
        _ => return false,
    }

    if bytes.get(i) == Some(&b'.') {
        i += 1;
        if digits(&mut i) == 0 {
            return false;
        }
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if digits(&mut i) == 0 {
            return false;
        }
    }

    i == bytes.len()
}

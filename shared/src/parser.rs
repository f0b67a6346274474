//! Announcement-line parser
//!
//! The receiver firmware prints one line per received radio packet:
//! ```text
//! Received LoRa packet;rssi=<int>;length=<int>;data={w:<number>,b:<number>}
//! ```
//!
//! Fields are positional. A line is accepted only when it carries every
//! marker (phrase, `rssi`, `w:`, `b:`) AND splits into exactly four
//! `;`-separated segments.
//!
//! Rejection precedence:
//! 1. phrase or `rssi` missing: [`RejectReason::NotAnAnnouncement`]
//! 2. segment count other than four: [`RejectReason::WrongFieldCount`], or
//!    `NotAnAnnouncement` when the payload markers are missing as well
//! 3. bad `rssi=` / `length=` field: [`RejectReason::MalformedHeader`].
//!    The gateway format only names the three other reasons; this one is
//!    an addition so unchecked header text never reaches the callback.
//! 4. bad `data=` fragment, including a missing `w` or `b` key:
//!    [`RejectReason::MalformedPayload`]

use crate::payload;
use crate::{markers, PacketRecord, ParseOutcome, Reading, RejectReason};

const RSSI_PREFIX: &str = "rssi=";
const LENGTH_PREFIX: &str = "length=";
const DATA_PREFIX: &str = "data=";

/// Parse one raw line read from the gateway
pub fn parse(line: &str) -> ParseOutcome {
    let line = line.trim();

    if !contains_all(line, &markers::ANNOUNCEMENT_MARKERS) {
        return Err(RejectReason::NotAnAnnouncement);
    }

    let segments: Vec<&str> = line.split(';').collect();
    let &[_title, rssi, length, data] = segments.as_slice() else {
        return Err(if contains_all(line, &markers::PAYLOAD_MARKERS) {
            RejectReason::WrongFieldCount
        } else {
            RejectReason::NotAnAnnouncement
        });
    };

    let signal_strength = field(rssi, RSSI_PREFIX).and_then(Reading::number);
    let payload_length = field(length, LENGTH_PREFIX).and_then(Reading::unsigned);
    let (Some(signal_strength), Some(payload_length)) = (signal_strength, payload_length) else {
        return Err(RejectReason::MalformedHeader);
    };

    let fragment = data
        .trim()
        .strip_prefix(DATA_PREFIX)
        .ok_or(RejectReason::MalformedPayload)?;
    let payload = payload::extract(fragment)?;

    Ok(PacketRecord {
        signal_strength,
        payload_length,
        weight: payload.weight,
        battery_level: payload.battery,
    })
}

fn contains_all(line: &str, markers: &[&str]) -> bool {
    markers.iter().all(|marker| line.contains(marker))
}

fn field<'a>(segment: &'a str, prefix: &str) -> Option<&'a str> {
    segment.trim().strip_prefix(prefix).map(str::trim)
}

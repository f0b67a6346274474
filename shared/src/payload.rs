//! Extractor for the `data=` fragment of an announcement
//!
//! The gateway prints the sensor payload as a brace-delimited list with bare
//! keys:
//! ```text
//! {w:267872,b:3746}
//! ```
//!
//! Keys are written directly before their colon (`w:`, never `w :`). Only
//! the `w` (weight) and `b` (battery) keys are read. Other bare keys are
//! tolerated and ignored. Nested objects, strings and escapes are not part of
//! the format and are rejected.

use crate::{Reading, RejectReason};

/// Sensor readings carried in the payload fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub weight: Reading,
    pub battery: Reading,
}

/// Extract `w` and `b` from a `{key:value,...}` fragment
pub fn extract(fragment: &str) -> Result<Payload, RejectReason> {
    let body = fragment
        .trim()
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .ok_or(RejectReason::MalformedPayload)?;

    if body.contains(['{', '}']) {
        return Err(RejectReason::MalformedPayload);
    }

    let mut weight = None;
    let mut battery = None;

    for entry in body.split(',') {
        let (key, value) = entry
            .split_once(':')
            .ok_or(RejectReason::MalformedPayload)?;
        // Key must touch its colon: `w :1` is not the `w:` key
        let key = key.trim_start();

        if !is_bare_key(key) {
            return Err(RejectReason::MalformedPayload);
        }

        let slot = match key {
            "w" => &mut weight,
            "b" => &mut battery,
            _ => continue,
        };

        // Repeated keys are ambiguous
        if slot.is_some() {
            return Err(RejectReason::MalformedPayload);
        }

        *slot = Some(Reading::number(value.trim()).ok_or(RejectReason::MalformedPayload)?);
    }

    match (weight, battery) {
        (Some(weight), Some(battery)) => Ok(Payload { weight, battery }),
        _ => Err(RejectReason::MalformedPayload),
    }
}

fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_weight_and_battery() {
        let payload = extract("{w:267872,b:3746}").expect("extract failed");
        assert_eq!(payload.weight.as_str(), "267872");
        assert_eq!(payload.battery.as_str(), "3746");
    }

    #[test]
    fn test_extract_tolerates_whitespace_and_order() {
        let payload = extract("  { b: 3.9 , w: -12.5 } ").expect("extract failed");
        assert_eq!(payload.weight.as_str(), "-12.5");
        assert_eq!(payload.battery.as_str(), "3.9");
    }

    #[test]
    fn test_extract_ignores_other_keys() {
        let payload = extract("{t:21,w:100,b:50}").expect("extract failed");
        assert_eq!(payload.weight.as_str(), "100");
        assert_eq!(payload.battery.as_str(), "50");
    }

    #[test]
    fn test_missing_key() {
        assert_eq!(extract("{w:100}"), Err(RejectReason::MalformedPayload));
        assert_eq!(extract("{b:50}"), Err(RejectReason::MalformedPayload));
        assert_eq!(extract("{}"), Err(RejectReason::MalformedPayload));
    }

    #[test]
    fn test_unbalanced_braces() {
        assert_eq!(extract("{w:100,b:50"), Err(RejectReason::MalformedPayload));
        assert_eq!(extract("w:100,b:50}"), Err(RejectReason::MalformedPayload));
        assert_eq!(extract("{w:{1},b:50}"), Err(RejectReason::MalformedPayload));
    }

    #[test]
    fn test_non_numeric_values() {
        assert_eq!(extract("{w:abc,b:50}"), Err(RejectReason::MalformedPayload));
        assert_eq!(extract("{w:100,b:}"), Err(RejectReason::MalformedPayload));
        assert_eq!(extract("{w:\"100\",b:50}"), Err(RejectReason::MalformedPayload));
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(extract("{w:100,,b:50}"), Err(RejectReason::MalformedPayload));
        assert_eq!(extract("{w:100,b:50,}"), Err(RejectReason::MalformedPayload));
        assert_eq!(extract("{w=100,b:50}"), Err(RejectReason::MalformedPayload));
        assert_eq!(extract("{\"w\":100,b:50}"), Err(RejectReason::MalformedPayload));
    }

    #[test]
    fn test_space_before_colon_is_rejected() {
        assert_eq!(extract("{w :1,b:2}"), Err(RejectReason::MalformedPayload));
        assert_eq!(extract("{w:1,b :2}"), Err(RejectReason::MalformedPayload));
    }

    #[test]
    fn test_repeated_key() {
        assert_eq!(extract("{w:1,w:2,b:3}"), Err(RejectReason::MalformedPayload));
    }
}

//! # Badge wire codec
//!
//! Encodes a [`Badge`] to its payload bytes and back. The format is plain
//! JSON with a fixed field set (`deny_unknown_fields`), so decoding never
//! constructs anything beyond the badge shape itself. Decoding is
//! crate-internal: request handlers only ever receive badges through
//! [`crate::v1::token::IntegrityGuard::open_token`], which verifies the
//! integrity tag first.

use core::fmt;

use serde::Deserialize;

use super::badge::{Badge, MAX_LEVEL};

/// Largest payload `decode` will even look at
pub const MAX_PAYLOAD_LEN: usize = 4096;

/// Wire shape of a badge payload. [`Badge`] itself has no `Deserialize`
/// impl, so this mirror is the single place payload bytes turn back into
/// a badge; its fields must stay in lockstep with the `Badge` serializer.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BadgeWire {
    guild_name: String,
    rank: String,
    level: u32,
    message: String,
    is_admin: bool,
}

/// Encode a badge to payload bytes.
pub fn encode(badge: &Badge) -> Vec<u8> {
    serde_json::to_vec(badge).expect("badge always serializes")
}

/// Decode payload bytes into a badge. Rejects oversized input, anything
/// that is not exactly the badge shape, and out-of-bounds levels.
pub(crate) fn decode(payload: &[u8]) -> Result<Badge, DecodeError> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(DecodeError::Oversized(payload.len()));
    }

    let wire: BadgeWire = serde_json::from_slice(payload).map_err(DecodeError::Malformed)?;

    if wire.level < 1 || wire.level > MAX_LEVEL {
        return Err(DecodeError::LevelOutOfBounds(wire.level));
    }

    Ok(Badge::from_wire(
        wire.guild_name,
        wire.rank,
        wire.level,
        wire.message,
        wire.is_admin,
    ))
}

/// Error while decoding a badge payload
#[non_exhaustive]
#[derive(Debug)]
pub enum DecodeError {
    /// Payload is not a badge: bad syntax, missing or unknown fields
    Malformed(serde_json::Error),
    /// Payload longer than [`MAX_PAYLOAD_LEN`]
    Oversized(usize),
    /// Level outside `1..=MAX_LEVEL`
    LevelOutOfBounds(u32),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "payload is not a badge: {e}"),
            Self::Oversized(len) => write!(f, "payload of {len} bytes exceeds limit"),
            Self::LevelOutOfBounds(level) => write!(f, "level {level} out of bounds"),
        }
    }
}

impl std::error::Error for DecodeError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn roundtrip() {
        let badge = Badge::custom("Iron Hammer".into(), "Journeyman".into(), 7);
        let payload = encode(&badge);
        assert_eq!(decode(&payload).unwrap(), badge);
    }

    #[test]
    fn rejects_unknown_fields() {
        // extra top-level structure is rejected, not ignored
        let payload = br#"{"guildName":"g","rank":"r","level":1,"message":"m","isAdmin":false,"extra":1}"#;
        assert!(matches!(decode(payload), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn decode_carries_admin_flag() {
        // decode runs only on verified payloads, so it reproduces the
        // admin flag the server signed
        let payload = br#"{"guildName":"g","rank":"r","level":1,"message":"m","isAdmin":true}"#;
        assert!(decode(payload).unwrap().is_admin());
    }

    #[test]
    fn rejects_truncated_payload() {
        let badge = Badge::default();
        let payload = encode(&badge);
        assert!(matches!(
            decode(&payload[..payload.len() - 2]),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_level_out_of_bounds() {
        let payload = br#"{"guildName":"g","rank":"r","level":10001,"message":"m","isAdmin":false}"#;
        assert!(matches!(
            decode(payload),
            Err(DecodeError::LevelOutOfBounds(10001))
        ));

        let payload = br#"{"guildName":"g","rank":"r","level":0,"message":"m","isAdmin":false}"#;
        assert!(matches!(decode(payload), Err(DecodeError::LevelOutOfBounds(0))));
    }

    #[test]
    fn rejects_oversized_payload() {
        let payload = vec![b' '; MAX_PAYLOAD_LEN + 1];
        assert!(matches!(
            decode(&payload),
            Err(DecodeError::Oversized(len)) if len == MAX_PAYLOAD_LEN + 1
        ));
    }
}

//! # Badge tokens
//!
//! This module contains the [`Token`] struct that represents an issued
//! badge token, and the [`IntegrityGuard`] that signs and verifies them.
//! A token carries the encoded badge payload followed by an HMAC-SHA256
//! tag over it; the guard recomputes the tag and requires an exact match
//! *before* the payload is decoded. A badge therefore only ever reaches a
//! caller if the process that holds the secret key issued it unchanged.
//!
//! ## Example usage
//!
//! ```
//! use guildforge::v1::{badge::Badge, token::IntegrityGuard};
//!
//! let guard = IntegrityGuard::ephemeral();
//!
//! // Issue a token for a badge
//! let badge = Badge::custom("Iron Hammer".into(), "Journeyman".into(), 7);
//! let token = guard.issue_token(&badge);
//!
//! // Convert it to string and open it again:
//! let opened = guard.open(&token.to_string());
//! assert_eq!(opened.ok(), Some(badge));
//! ```

use core::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::{
    badge::Badge,
    codec::{self, DecodeError},
};

type HmacSha256 = Hmac<Sha256>;

/// Prefix of every badge token string
pub const TOKEN_PREFIX: &str = "gfb";

/// Length of the integrity tag (HMAC-SHA256)
pub const TAG_LEN: usize = 32;

/// An issued badge token: encoded payload plus integrity tag. Immutable
/// once issued; "modifying" a badge means issuing a brand-new token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Encoded badge payload
    pub payload: Vec<u8>,
    /// Tag over the payload
    pub tag: [u8; TAG_LEN],
}

impl Token {
    /// Parse token string to [`Token`]. Token should contain prefix.
    ///
    /// Parsing only recovers the payload/tag split; it does **not**
    /// verify the tag. Use [`IntegrityGuard::open_token`] for that.
    pub fn parse(token: &str) -> Result<Self, TokenError> {
        let Some((prefix, token)) = token.split_once('_') else {
            return Err(TokenError::MissingPrefix);
        };

        if prefix != TOKEN_PREFIX {
            return Err(TokenError::UnknownPrefix);
        }

        let data = match URL_SAFE_NO_PAD.decode(token) {
            Ok(data) if data.len() <= TAG_LEN => return Err(TokenError::Truncated),
            Ok(data) => data,
            Err(e) => return Err(TokenError::Encoding(e)),
        };

        let split_at = data.len() - TAG_LEN;
        let mut tag = [0; TAG_LEN];
        tag.copy_from_slice(&data[split_at..]);

        Ok(Self {
            payload: data[..split_at].to_vec(),
            tag,
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut data = Vec::with_capacity(self.payload.len() + TAG_LEN);
        data.extend_from_slice(&self.payload);
        data.extend_from_slice(&self.tag);

        let token_str = URL_SAFE_NO_PAD.encode(&data);

        write!(f, "{TOKEN_PREFIX}_{token_str}")
    }
}

/// Signs and verifies badge tokens with a process-wide secret key.
///
/// The key is established once at startup and read-only afterwards, so
/// concurrent requests may sign and verify freely.
pub struct IntegrityGuard {
    key: Vec<u8>,
}

impl IntegrityGuard {
    /// Guard over the given secret key.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self { key: secret.into() }
    }

    /// Guard over a random key. Tokens die with the process; meant for
    /// development and tests.
    pub fn ephemeral() -> Self {
        let key: [u8; 32] = rand::random();
        Self { key: key.to_vec() }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key).expect("hmac accepts any key length")
    }

    /// Compute the integrity tag over payload bytes.
    pub fn sign(&self, payload: &[u8]) -> [u8; TAG_LEN] {
        let mut mac = self.mac();
        mac.update(payload);
        mac.finalize().into_bytes().into()
    }

    /// Does the tag match the payload? Comparison is constant-time.
    pub fn verify(&self, payload: &[u8], tag: &[u8]) -> bool {
        let mut mac = self.mac();
        mac.update(payload);
        mac.verify_slice(tag).is_ok()
    }

    /// Encode a badge and sign it into a fresh [`Token`].
    pub fn issue_token(&self, badge: &Badge) -> Token {
        let payload = codec::encode(badge);
        let tag = self.sign(&payload);
        Token { payload, tag }
    }

    /// Recover the badge from a token. The tag is verified over the
    /// supplied payload first; on mismatch the payload is never decoded
    /// and never used for any decision.
    pub fn open_token(&self, token: &Token) -> Result<Badge, TokenError> {
        if !self.verify(&token.payload, &token.tag) {
            return Err(TokenError::TagMismatch);
        }

        codec::decode(&token.payload).map_err(TokenError::Decode)
    }

    /// Parse a token string and open it. See [`Self::open_token`].
    pub fn open(&self, token: &str) -> Result<Badge, TokenError> {
        self.open_token(&Token::parse(token)?)
    }
}

/// Error while parsing or opening a token. Any variant collapses to
/// "no valid badge" downstream; there is no partially-trusted outcome.
#[non_exhaustive]
#[derive(Debug)]
pub enum TokenError {
    /// Missing prefix of token
    MissingPrefix,
    /// Unknown prefix of token
    UnknownPrefix,
    /// Failed to decode base64
    Encoding(base64::DecodeError),
    /// Decoded data too short to contain a tag
    Truncated,
    /// Tag does not match payload
    TagMismatch,
    /// Tag matched but the payload is not a valid badge
    Decode(DecodeError),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPrefix => f.write_str("missing token prefix"),
            Self::UnknownPrefix => f.write_str("unknown token prefix"),
            Self::Encoding(e) => write!(f, "invalid token encoding: {e}"),
            Self::Truncated => f.write_str("token too short"),
            Self::TagMismatch => f.write_str("integrity tag mismatch"),
            Self::Decode(e) => write!(f, "invalid badge payload: {e}"),
        }
    }
}

impl std::error::Error for TokenError {}

#[cfg(test)]
mod test {
    use super::*;

    fn badges() -> Vec<Badge> {
        vec![
            Badge::default(),
            Badge::custom("Iron Hammer".into(), "Journeyman".into(), 7),
            Badge::custom("Старшая Гильдия".into(), "Master".into(), 10_000),
            Badge::custom("a=b; c".into(), "\"rank\"".into(), 1),
        ]
    }

    #[test]
    fn issue_and_open_token() {
        let guard = IntegrityGuard::ephemeral();

        for badge in badges() {
            let s = guard.issue_token(&badge).to_string();
            match guard.open(&s) {
                Ok(opened) => assert_eq!(opened, badge, "String: {s}"),
                Err(e) => panic!("Failed to open: {e:?}\nString: {s}\nBadge: {badge:?}"),
            }
        }
    }

    #[test]
    fn flipped_tag_bit_is_rejected() {
        let guard = IntegrityGuard::ephemeral();
        let token = guard.issue_token(&Badge::default());

        for bit in 0..TAG_LEN * 8 {
            let mut tampered = token.clone();
            tampered.tag[bit / 8] ^= 1 << (bit % 8);

            assert!(matches!(
                guard.open_token(&tampered),
                Err(TokenError::TagMismatch)
            ));
        }
    }

    #[test]
    fn mutated_payload_is_rejected_before_decode() {
        let guard = IntegrityGuard::ephemeral();
        let token = guard.issue_token(&Badge::default());

        // every single-byte mutation with the tag left unchanged
        for i in 0..token.payload.len() {
            let mut tampered = token.clone();
            tampered.payload[i] ^= 0xff;

            assert!(matches!(
                guard.open_token(&tampered),
                Err(TokenError::TagMismatch)
            ));
        }
    }

    #[test]
    fn spliced_admin_payload_is_rejected() {
        let guard = IntegrityGuard::ephemeral();
        let token = guard.issue_token(&Badge::default());

        // keep the valid tag, swap in a hand-crafted admin payload
        let tampered = Token {
            payload:
                br#"{"guildName":"g","rank":"r","level":1,"message":"m","isAdmin":true}"#.to_vec(),
            tag: token.tag,
        };

        assert!(matches!(
            guard.open_token(&tampered),
            Err(TokenError::TagMismatch)
        ));
    }

    #[test]
    fn foreign_key_is_rejected() {
        let issuer = IntegrityGuard::new(*b"server-key-00000000000000000000!");
        let other = IntegrityGuard::new(*b"server-key-00000000000000000001!");

        let s = issuer.issue_token(&Badge::default()).to_string();
        assert!(issuer.open(&s).is_ok());
        assert!(matches!(other.open(&s), Err(TokenError::TagMismatch)));
    }

    #[test]
    fn parse_errors() {
        let guard = IntegrityGuard::ephemeral();
        let s = guard.issue_token(&Badge::default()).to_string();

        assert!(matches!(
            guard.open("no-prefix-here"),
            Err(TokenError::MissingPrefix)
        ));
        assert!(matches!(
            guard.open(&format!("acp_{}", &s[4..])),
            Err(TokenError::UnknownPrefix)
        ));
        assert!(matches!(
            guard.open("gfb_!!!not-base64!!!"),
            Err(TokenError::Encoding(_))
        ));
        assert!(matches!(guard.open("gfb_AAAA"), Err(TokenError::Truncated)));
    }

    #[test]
    fn signed_garbage_fails_as_decode_error() {
        // a correctly signed token whose payload is not a badge: the tag
        // verifies, decode still rejects it
        let guard = IntegrityGuard::ephemeral();
        let payload = b"[1,2,3]".to_vec();
        let tag = guard.sign(&payload);

        assert!(matches!(
            guard.open_token(&Token { payload, tag }),
            Err(TokenError::Decode(_))
        ));
    }

    #[cfg(feature = "trusted-issue")]
    #[test]
    fn trusted_issue_roundtrips_admin_flag() {
        let guard = IntegrityGuard::ephemeral();
        let badge = Badge::default().into_admin();

        let s = guard.issue_token(&badge).to_string();
        assert!(guard.open(&s).unwrap().is_admin());
    }
}

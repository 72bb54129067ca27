//! Strong type definitions for tmail.
//!
//! Identifiers are newtypes so a raw byte array or an arbitrary string can
//! never be mistaken for a verified message identity.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseIdError;

/// Length of a message identity in bytes.
pub const MESSAGE_ID_LEN: usize = 32;

/// Length of the text form of a message identity (unpadded base64).
pub const MESSAGE_ID_TEXT_LEN: usize = 43;

/// A 32-byte message identifier, computed as BLAKE3 over the canonical body.
///
/// This is the content-address of a message. Two messages with the same
/// canonical body have the same `MessageId`.
///
/// The text form is unpadded URL-safe base64. Parsing is strict, so each
/// identity has exactly one accepted text form.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub [u8; MESSAGE_ID_LEN]);

impl MessageId {
    /// Create a new MessageId from raw bytes.
    pub const fn from_bytes(bytes: [u8; MESSAGE_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; MESSAGE_ID_LEN] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Encode as the canonical text form.
    pub fn to_text(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Parse the canonical text form.
    ///
    /// Rejects wrong lengths, padding, characters outside the URL-safe
    /// alphabet and non-zero trailing bits. No trimming or case folding is
    /// applied.
    pub fn parse(s: &str) -> Result<Self, ParseIdError> {
        if s.len() != MESSAGE_ID_TEXT_LEN {
            return Err(ParseIdError::Length {
                expected: MESSAGE_ID_TEXT_LEN,
                got: s.len(),
            });
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|e| ParseIdError::Encoding(e.to_string()))?;

        let arr: [u8; MESSAGE_ID_LEN] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| ParseIdError::Length {
                    expected: MESSAGE_ID_LEN,
                    got: bytes.len(),
                })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for MessageId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<[u8]> for MessageId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; MESSAGE_ID_LEN]> for MessageId {
    fn from(bytes: [u8; MESSAGE_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for MessageId {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; MESSAGE_ID_LEN] = slice.try_into()?;
        Ok(Self(arr))
    }
}

impl Serialize for MessageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_text())
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_text_roundtrip() {
        let id = MessageId::from_bytes([0x42; 32]);
        let text = id.to_text();
        assert_eq!(text.len(), MESSAGE_ID_TEXT_LEN);
        assert_eq!(MessageId::parse(&text).unwrap(), id);
    }

    #[test]
    fn test_message_id_display_is_text_form() {
        let id = MessageId::from_bytes([0xab; 32]);
        assert_eq!(format!("{}", id), id.to_text());
    }

    #[test]
    fn test_message_id_debug() {
        let id = MessageId::from_bytes([0xcd; 32]);
        assert_eq!(format!("{:?}", id), "MessageId(cdcdcdcdcdcdcdcd)");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let err = MessageId::parse("not-a-real-id").unwrap_err();
        assert!(matches!(err, ParseIdError::Length { expected: 43, got: 13 }));

        let err = MessageId::parse("").unwrap_err();
        assert!(matches!(err, ParseIdError::Length { got: 0, .. }));
    }

    #[test]
    fn test_parse_rejects_padded_form() {
        let text = format!("{}=", &MessageId::from_bytes([0x11; 32]).to_text()[..42]);
        assert!(MessageId::parse(&text).is_err());
    }

    #[test]
    fn test_parse_rejects_standard_alphabet() {
        // '+' and '/' belong to the standard alphabet, not the URL-safe one.
        let text = format!("+/{}", &MessageId::from_bytes([0u8; 32]).to_text()[2..]);
        assert!(matches!(
            MessageId::parse(&text),
            Err(ParseIdError::Encoding(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_canonical_trailing_bits() {
        // All zero bytes encode to 43 'A's; the last char carries two
        // trailing bits that must be zero. 'B' sets one of them.
        let zero = MessageId::from_bytes([0u8; 32]).to_text();
        assert_eq!(zero, "A".repeat(43));
        let tweaked = format!("{}B", &zero[..42]);
        assert!(MessageId::parse(&tweaked).is_err());
    }

    #[test]
    fn test_parse_rejects_hex_form() {
        let id = MessageId::from_bytes([0x42; 32]);
        assert!(MessageId::parse(&id.to_hex()).is_err());
    }

    #[test]
    fn test_serde_uses_text_form() {
        let id = MessageId::from_bytes([0x07; 32]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.to_text()));
        let back: MessageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

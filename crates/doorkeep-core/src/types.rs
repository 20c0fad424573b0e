use crate::{Result, error::Error};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use subtle::ConstantTimeEq;

/// Proximity-card identifier.
///
/// An opaque byte sequence as reported by the reader chip. No internal
/// structure is assumed; equality is byte-exact. The transport and logging
/// form is lowercase hex (the directory stores the hex string).
///
/// # Security
/// Comparison is constant-time to avoid leaking how many leading bytes of a
/// presented card match an enrolled one.
#[derive(Debug, Clone, Eq)]
pub struct CardId(Vec<u8>);

impl CardId {
    /// Create a card identifier from raw UID bytes.
    ///
    /// # Errors
    /// Returns `Error::InvalidCardFormat` if the byte sequence is empty.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidCardFormat(
                "card identifier cannot be empty".to_string(),
            ));
        }
        Ok(CardId(bytes))
    }

    /// Raw identifier bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex form used on the wire and in logs.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for CardId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| Error::InvalidCardFormat(format!("invalid hex '{s}': {e}")))?;
        CardId::new(bytes)
    }
}

/// Constant-time comparison implementation for CardId
impl PartialEq for CardId {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice().ct_eq(other.0.as_slice()).into()
    }
}

impl std::hash::Hash for CardId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl Serialize for CardId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CardId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Process role, fixed once at startup.
///
/// A reader unit runs the continuous access loop; an enroller unit waits for
/// enrollment requests over HTTP. The remote-open endpoint is served in both
/// modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceMode {
    Reader,
    Enroller,
}

impl fmt::Display for DeviceMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeviceMode::Reader => write!(f, "reader"),
            DeviceMode::Enroller => write!(f, "enroller"),
        }
    }
}

impl std::str::FromStr for DeviceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reader" => Ok(DeviceMode::Reader),
            "enroller" => Ok(DeviceMode::Enroller),
            _ => Err(Error::Config(format!(
                "invalid device mode '{s}' (expected 'reader' or 'enroller')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("04aabbcc", vec![0x04, 0xaa, 0xbb, 0xcc])]
    #[case("04AABBCC", vec![0x04, 0xaa, 0xbb, 0xcc])]
    #[case(" ffbb ", vec![0xff, 0xbb])]
    fn test_card_id_parse(#[case] input: &str, #[case] expected: Vec<u8>) {
        let card: CardId = input.parse().unwrap();
        assert_eq!(card.as_bytes(), expected.as_slice());
    }

    #[rstest]
    #[case("")] // empty
    #[case("zz")] // non-hex
    #[case("04a")] // odd length
    fn test_card_id_parse_invalid(#[case] input: &str) {
        let result: Result<CardId> = input.parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_card_id_hex_roundtrip() {
        let card = CardId::new(vec![0x04, 0xAB, 0xCD, 0xEF]).unwrap();
        assert_eq!(card.to_hex(), "04abcdef");
        assert_eq!(card.to_string(), "04abcdef");

        let parsed: CardId = card.to_hex().parse().unwrap();
        assert_eq!(parsed, card);
    }

    #[test]
    fn test_card_id_equality() {
        let a = CardId::new(vec![0x04, 0xaa]).unwrap();
        let b: CardId = "04aa".parse().unwrap();
        let c: CardId = "04ab".parse().unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_card_id_empty_rejected() {
        assert!(CardId::new(vec![]).is_err());
    }

    #[test]
    fn test_card_id_serde_hex_string() {
        let card: CardId = "04aa".parse().unwrap();
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"04aa\"");

        let back: CardId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }

    #[rstest]
    #[case("reader", DeviceMode::Reader)]
    #[case("Reader", DeviceMode::Reader)]
    #[case("ENROLLER", DeviceMode::Enroller)]
    fn test_device_mode_parse(#[case] input: &str, #[case] expected: DeviceMode) {
        let mode: DeviceMode = input.parse().unwrap();
        assert_eq!(mode, expected);
    }

    #[test]
    fn test_device_mode_parse_invalid() {
        let result: Result<DeviceMode> = "gateway".parse();
        assert!(result.is_err());
    }
}

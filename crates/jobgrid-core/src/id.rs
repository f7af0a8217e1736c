//! Record identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of random bytes behind an identifier (24 hex characters).
const OBJECT_ID_BYTES: usize = 12;

/// Error returned when a string is not a valid object id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid object id: expected 24 lowercase hex characters")]
pub struct ParseObjectIdError;

/// A 24-character lowercase-hex record identifier.
///
/// Every stored record is reachable by one of these. The hex form is
/// the record key in the store, the `sub` claim in session tokens, and
/// the wire representation everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        let mut rng = rand::rng();
        let bytes: [u8; OBJECT_ID_BYTES] = rand::Rng::random(&mut rng);
        Self(hex::encode(bytes))
    }

    /// Parse a 24-character lowercase-hex string.
    pub fn parse_str(s: &str) -> Result<Self, ParseObjectIdError> {
        if s.len() != OBJECT_ID_BYTES * 2 {
            return Err(ParseObjectIdError);
        }
        if !s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
            return Err(ParseObjectIdError);
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ParseObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ParseObjectIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_str(&s)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_24_hex_chars() {
        let id = ObjectId::new();
        assert_eq!(id.as_str().len(), 24);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(ObjectId::new(), ObjectId::new());
    }

    #[test]
    fn parse_roundtrip() {
        let id = ObjectId::new();
        let parsed = ObjectId::parse_str(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(ObjectId::parse_str("abc123").is_err());
        assert!(ObjectId::parse_str("").is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!(ObjectId::parse_str("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
        // Uppercase hex is not canonical.
        assert!(ObjectId::parse_str("ABCDEF0123456789ABCDEF01").is_err());
    }
}

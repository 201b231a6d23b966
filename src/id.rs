//! Audiolink identifier type
//!
//! An [`AudiolinkId`] is the permanent, content-independent name embedded
//! in a media file's tags. It is a randomly drawn 128-bit UUID (v4)
//! serialized as 32 lowercase hex characters followed by the fixed `-al`
//! suffix, which disambiguates the field from unrelated UUID-like strings
//! that might occupy the same tag slot.
//!
//! The serialized grammar is `^[0-9a-f]{32}-al$`. Serialization is total
//! and deterministic; the hex case and suffix are fixed at construction,
//! so string equality of two serialized identifiers is equivalent to
//! equality of the underlying values.
//!
//! No collision check is performed on generation: uniqueness rests on the
//! improbability of collision in 128-bit random space.
//!
//! # Examples
//!
//! ```rust
//! use audiolink::AudiolinkId;
//!
//! let id = AudiolinkId::generate();
//! let text = id.to_string();
//! assert!(text.ends_with("-al"));
//! assert_eq!(AudiolinkId::parse(&text).unwrap(), id);
//! ```

use crate::error::{AudiolinkError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Fixed suffix appended to the hex serialization of every identifier
pub const ID_SUFFIX: &str = "-al";

/// Permanent identifier embedded in a media file's tags
///
/// Immutable once constructed; created either freshly via
/// [`AudiolinkId::generate`] or by parsing an existing tag value via
/// [`AudiolinkId::parse`]. Its only durable form is the tag value
/// embedded in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AudiolinkId {
    value: Uuid,
}

impl AudiolinkId {
    /// Generate a new identifier from a freshly drawn random 128-bit value
    pub fn generate() -> Self {
        AudiolinkId {
            value: Uuid::new_v4(),
        }
    }

    /// Parse a serialized identifier
    ///
    /// The text must match `<32 lowercase hex chars>-al` exactly; the hex
    /// portion must parse as a UUID.
    ///
    /// # Errors
    ///
    /// Returns [`AudiolinkError::Format`] when the text does not match
    /// the grammar. The *absence* of an identifier is not an error and is
    /// represented outside this type (see
    /// [`IdState`](crate::types::IdState)).
    pub fn parse(text: &str) -> Result<Self> {
        let hex = text
            .strip_suffix(ID_SUFFIX)
            .ok_or_else(|| AudiolinkError::format(text))?;

        // Uuid accepts hyphenated and uppercase input; the identifier
        // grammar does not.
        if hex.len() != 32 || !hex.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
            return Err(AudiolinkError::format(text));
        }

        let value = Uuid::try_parse(hex).map_err(|_| AudiolinkError::format(text))?;
        Ok(AudiolinkId { value })
    }
}

impl fmt::Display for AudiolinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value.simple(), ID_SUFFIX)
    }
}

impl FromStr for AudiolinkId {
    type Err = AudiolinkError;

    fn from_str(s: &str) -> Result<Self> {
        AudiolinkId::parse(s)
    }
}

impl From<AudiolinkId> for String {
    fn from(id: AudiolinkId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for AudiolinkId {
    type Error = AudiolinkError;

    fn try_from(s: String) -> Result<Self> {
        AudiolinkId::parse(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_round_trip() {
        let id = AudiolinkId::generate();
        let text = id.to_string();
        assert_eq!(text.len(), 32 + ID_SUFFIX.len());
        assert_eq!(AudiolinkId::parse(&text).unwrap(), id);
    }

    #[test]
    fn test_parse_canonical() {
        let id = AudiolinkId::parse("0123456789abcdef0123456789abcdef-al").unwrap();
        assert_eq!(id.to_string(), "0123456789abcdef0123456789abcdef-al");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        let cases = [
            "",
            "-al",
            "0123456789abcdef0123456789abcdef",     // missing suffix
            "0123456789abcdef0123456789abcdef_al",  // wrong suffix separator
            "0123456789ABCDEF0123456789ABCDEF-al",  // uppercase hex
            "0123456789abcdef0123456789abcde-al",   // 31 hex chars
            "0123456789abcdef0123456789abcdef0-al", // 33 hex chars
            "01234567-89ab-cdef-0123-456789abcdef-al", // hyphenated uuid
            "zzzz456789abcdef0123456789abcdef-al",  // non-hex
        ];
        for case in cases {
            assert!(
                matches!(
                    AudiolinkId::parse(case),
                    Err(AudiolinkError::Format { .. })
                ),
                "expected Format error for {case:?}"
            );
        }
    }

    #[test]
    fn test_from_str() {
        let id: AudiolinkId = "deadbeefdeadbeefdeadbeefdeadbeef-al".parse().unwrap();
        assert_eq!(id.to_string(), "deadbeefdeadbeefdeadbeefdeadbeef-al");
    }

    #[test]
    fn test_serde_round_trip() {
        let id = AudiolinkId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: AudiolinkId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

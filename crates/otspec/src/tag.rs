//! Four-byte table tags.

use crate::{DeserializationError, Deserialize, ReaderContext, SerializationError, Serialize};
use std::str::FromStr;

/// A table tag: four bytes in the printable ASCII range.
///
/// Tags order bytewise, which is the order the table directory wants.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Create a tag from a literal. Intended for constants such as
    /// `Tag::new(b"glyf")`; no validation is performed.
    pub const fn new(raw: &[u8; 4]) -> Self {
        Tag(*raw)
    }

    /// Create a tag from one to four printable ASCII bytes, padding with
    /// spaces.
    pub fn from_raw(src: impl AsRef<[u8]>) -> Result<Self, InvalidTag> {
        let src = src.as_ref();
        if src.is_empty() || src.len() > 4 {
            return Err(InvalidTag::InvalidLength(src.len()));
        }
        if let Some(pos) = src.iter().position(|b| !(0x20..=0x7E).contains(b)) {
            return Err(InvalidTag::InvalidByte {
                pos,
                byte: src[pos],
            });
        }
        let mut out = [b' '; 4];
        out[..src.len()].copy_from_slice(src);
        Ok(Tag(out))
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidTag {
    InvalidLength(usize),
    InvalidByte { pos: usize, byte: u8 },
}

impl FromStr for Tag {
    type Err = InvalidTag;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Tag::from_raw(src)
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for Tag {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        self.0.to_bytes(data)
    }
}

impl Deserialize for Tag {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let bytes = c.consume(4)?;
        Tag::from_raw(bytes).map_err(|e| DeserializationError(e.to_string()))
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

impl std::fmt::Debug for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "'{}'", self.as_str())
    }
}

impl std::fmt::Display for InvalidTag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InvalidLength(len) => write!(f, "length {} not in accepted range (1..=4)", len),
            Self::InvalidByte { pos, byte } => {
                write!(f, "invalid byte '0x{:02X}' at position {}", byte, pos)
            }
        }
    }
}

impl std::error::Error for InvalidTag {}

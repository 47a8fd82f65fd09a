use otspec::Tag;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// A path operation arrived in a state where it makes no sense.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("operation {index}: moveTo while a contour is already open")]
    MoveWhileOpen { index: usize },
    #[error("operation {index}: {op} without an open contour")]
    NoOpenContour { op: &'static str, index: usize },
    #[error("outline ends with an unclosed contour")]
    Unclosed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("duplicate glyph name '{0}'")]
    DuplicateName(String),
    #[error("no '.notdef' glyph was registered")]
    MissingNotdef,
    #[error("{0} glyphs cannot be indexed (at most 65535)")]
    TooManyGlyphs(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("'{0}' is not a Unicode scalar value")]
    InvalidCodepoint(String),
    #[error("U+{codepoint:04X} maps to unregistered glyph '{glyph}'")]
    UnregisteredGlyph { codepoint: u32, glyph: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    #[error("{what} overflows its {width}-bit field")]
    Overflow { what: String, width: u8 },
    #[error("glyph data ({0} bytes) does not fit short loca offsets")]
    ShortLocaOverflow(u32),
    #[error("required table {0} is missing")]
    MissingTable(Tag),
    #[error("table {0} is malformed: {1}")]
    Malformed(Tag, String),
    #[error("checksum mismatch in {0}")]
    ChecksumMismatch(Tag),
    #[error("font checksum identity does not hold (sum {0:#010x})")]
    ChecksumAdjustment(u32),
    #[error("invalid font metadata: {0}")]
    Metadata(String),
    #[error(transparent)]
    Encoding(#[from] otspec::SerializationError),
    #[error(transparent)]
    Decoding(#[from] otspec::DeserializationError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid outline in glyph '{glyph}'")]
    Geometry {
        glyph: String,
        #[source]
        source: GeometryError,
    },
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse font source {path}")]
    Source {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Only I/O failures can succeed on a second attempt; everything else is
    /// a property of the input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Io { .. })
    }
}

impl From<otspec::SerializationError> for Error {
    fn from(e: otspec::SerializationError) -> Self {
        Error::Serialization(e.into())
    }
}

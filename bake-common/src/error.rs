//! Errors raised while encoding or decoding baked files.

use thiserror::Error;

use crate::layout::MAX_ATTRIBUTE_SLOTS;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error(
        "vertex semantic {semantic} has no hardware attribute slot (budget is {} slots)",
        MAX_ATTRIBUTE_SLOTS
    )]
    AttributeBudget { semantic: u8 },

    #[error("unexpected end of stream at offset {offset}: needed {needed} bytes, {remaining} left")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("unsupported mesh format version {0:?}")]
    UnsupportedVersion(String),

    #[error("length {len} exceeds the maximum of {max} for its prefix")]
    LengthOverflow { len: usize, max: u64 },

    #[error("unknown animation channel identifier {0}")]
    UnknownChannel(u8),

    #[error("unknown vertex element type 0x{0:04X}")]
    UnknownElementType(u32),

    #[error("invalid vertex element count {0}")]
    InvalidElementCount(u8),

    #[error("{0} trailing bytes after decoded data")]
    TrailingBytes(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FormatError>;

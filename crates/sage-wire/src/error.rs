/// Errors raised by the byte-stream decoder.
///
/// Every variant carries the byte offset of the read that failed and,
/// where it applies, the name of the operation. A failed operation never
/// moves the cursor: composite reads roll back to where they started.
///
/// ```text
///   WireError
///   ├── UnexpectedEof        ← fewer bytes remain than the read needs
///   ├── GridTooLarge         ← width × height overflows addressable size
///   ├── InvalidText          ← UTF-8 mode met a malformed sequence
///   └── PositionOutOfRange   ← seek past the end of the buffer
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Input ended before the operation could consume all of its bytes.
    ///
    /// A null-terminated string with no terminator before the end of the
    /// buffer is reported here too, with `needed` one past what remained.
    #[error("unexpected end of input reading {op} at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        op: &'static str,
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// Grid dimensions whose cell or byte count does not fit in `usize`.
    #[error("grid of {width}x{height} cells is too large for {op} at offset {offset}")]
    GridTooLarge {
        op: &'static str,
        width: u32,
        height: u32,
        offset: usize,
    },

    /// Bytes that are not valid text in the configured character encoding.
    #[error("invalid {encoding} text reading {op} at offset {offset}")]
    InvalidText {
        op: &'static str,
        encoding: &'static str,
        offset: usize,
    },

    /// An explicit seek beyond the end of the buffer.
    #[error("position {position} is past the end of a {len}-byte buffer")]
    PositionOutOfRange { position: usize, len: usize },
}

impl WireError {
    /// Byte offset the error refers to.
    pub fn offset(&self) -> usize {
        match self {
            Self::UnexpectedEof { offset, .. }
            | Self::GridTooLarge { offset, .. }
            | Self::InvalidText { offset, .. } => *offset,
            Self::PositionOutOfRange { position, .. } => *position,
        }
    }

    /// Whether the input was too short for the requested read.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}

use sage_wire::WireError;

/// Errors raised while decoding typed values on top of the byte cursor.
///
/// These sit one level above [`WireError`]: the bytes were there, but they
/// did not form a legal value of the requested type.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                                   │
/// │   ├── InvalidEnumValue for values outside the enum set   │
/// │   ├── RecordSizeMismatch for decoders that mis-count     │
/// │   ├── InvalidMagic for headers with the wrong signature  │
/// │   ├── InvalidSyncsafe for ID3 sizes with high bits set   │
/// │   └── wraps WireError for truncation and bad text        │
/// └──────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
  /// A decoded integer is not a member of the target enumeration.
  #[error("unexpected value for {enum_name} at offset {offset}: {value}")]
  InvalidEnumValue {
    enum_name: &'static str,
    value: i64,
    offset: usize,
  },

  /// A record decoder consumed a different number of bytes than the
  /// record's declared size.
  #[error("{record} decoder consumed {consumed} bytes at offset {offset}, declared size is {declared}")]
  RecordSizeMismatch {
    record: &'static str,
    declared: usize,
    consumed: usize,
    offset: usize,
  },

  /// A header did not start with its format signature.
  #[error("invalid {record} signature at offset {offset}: expected {expected:02X?}, found {found:02X?}")]
  InvalidMagic {
    record: &'static str,
    expected: &'static [u8],
    found: Vec<u8>,
    offset: usize,
  },

  /// A syncsafe integer with the high bit set in one of its bytes.
  #[error("invalid syncsafe integer in {record} at offset {offset}: {value:#010X}")]
  InvalidSyncsafe {
    record: &'static str,
    value: u32,
    offset: usize,
  },

  #[error(transparent)]
  Wire(#[from] WireError),
}

impl TypeError {
  /// Byte offset the error refers to.
  pub fn offset(&self) -> usize {
    match self {
      Self::InvalidEnumValue { offset, .. }
      | Self::RecordSizeMismatch { offset, .. }
      | Self::InvalidMagic { offset, .. }
      | Self::InvalidSyncsafe { offset, .. } => *offset,
      Self::Wire(e) => e.offset(),
    }
  }

  /// Whether the input was too short for the requested value.
  pub fn is_truncation(&self) -> bool {
    matches!(self, Self::Wire(e) if e.is_truncation())
  }
}

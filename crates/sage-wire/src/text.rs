use crate::config::CharEncoding;
use crate::cursor::ByteCursor;
use crate::error::WireError;

/// String layouts found in asset files.
///
/// ```text
/// ┌──────────────────────┬────────────────────────────────────────────┐
/// │ Layout               │ Bytes on the wire                          │
/// ├──────────────────────┼────────────────────────────────────────────┤
/// │ null-terminated      │ chars... 0x00                              │
/// │ u16-prefixed ASCII   │ len (u16 LE) │ len bytes                   │
/// │ u16-prefixed Unicode │ len (u16 LE) │ len UTF-16LE code units     │
/// │ fixed-length         │ exactly N chars, trailing NULs are padding  │
/// └──────────────────────┴────────────────────────────────────────────┘
/// ```
///
/// The null-terminated and fixed-length layouts count characters in the
/// cursor's [`CharEncoding`]. The prefixed layouts carry their encoding in
/// the operation itself.
impl ByteCursor<'_> {
    /// Read characters up to a `0x00` terminator.
    ///
    /// The terminator is consumed but not returned.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if the buffer ends before a terminator.
    /// - [`WireError::InvalidText`] for malformed UTF-8 in [`CharEncoding::Utf8`] mode.
    pub fn read_null_terminated_string(&mut self) -> Result<String, WireError> {
        const OP: &str = "null-terminated string";

        let rest = self.remaining_bytes();
        let Some(len) = rest.iter().position(|&b| b == 0) else {
            return Err(self.eof(OP, rest.len() + 1));
        };

        let text = decode_text(self.config().char_encoding, &rest[..len], OP, self.position())?;
        self.skip(len + 1)?;
        Ok(text)
    }

    /// Read a `u16` character count followed by that many ASCII bytes.
    ///
    /// Bytes outside `0x00..=0x7F` decode as `'?'`.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if the length or the body is truncated.
    pub fn read_u16_prefixed_ascii(&mut self) -> Result<String, WireError> {
        self.atomic(|c| {
            let len = c.read_u16()?;
            let bytes = c.take("ASCII string", usize::from(len))?;
            Ok(bytes
                .iter()
                .map(|&b| if b.is_ascii() { char::from(b) } else { '?' })
                .collect())
        })
    }

    /// Read a `u16` character count followed by that many UTF-16LE code
    /// units (`2 * len` bytes).
    ///
    /// Unpaired surrogates decode as U+FFFD.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if the length or the body is truncated.
    pub fn read_u16_prefixed_unicode(&mut self) -> Result<String, WireError> {
        self.atomic(|c| {
            let len = c.read_u16()?;
            let bytes = c.take("UTF-16 string", usize::from(len) * 2)?;
            let units = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
            Ok(char::decode_utf16(units)
                .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect())
        })
    }

    /// Read exactly `count` characters and strip trailing NULs.
    ///
    /// Only the right-hand side is trimmed: `"a\0b\0\0"` becomes `"a\0b"`.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if fewer than `count` characters remain.
    /// - [`WireError::InvalidText`] for malformed UTF-8 in [`CharEncoding::Utf8`] mode.
    pub fn read_fixed_length_string(&mut self, count: usize) -> Result<String, WireError> {
        const OP: &str = "fixed-length string";

        let mut text = match self.config().char_encoding {
            CharEncoding::SingleByte => {
                let bytes = self.take(OP, count)?;
                bytes.iter().copied().map(char::from).collect::<String>()
            }
            CharEncoding::Utf8 => self.atomic(|c| {
                let mut out = String::with_capacity(count.min(c.remaining()));
                for _ in 0..count {
                    out.push(read_utf8_char(c, OP)?);
                }
                Ok(out)
            })?,
        };

        let trimmed = text.trim_end_matches('\0').len();
        text.truncate(trimmed);
        Ok(text)
    }
}

fn decode_text(
    encoding: CharEncoding,
    bytes: &[u8],
    op: &'static str,
    offset: usize,
) -> Result<String, WireError> {
    match encoding {
        CharEncoding::SingleByte => Ok(bytes.iter().copied().map(char::from).collect()),
        CharEncoding::Utf8 => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| invalid_utf8(op, offset + e.valid_up_to())),
    }
}

/// Decode one UTF-8 scalar value, sizing the read from its lead byte.
fn read_utf8_char(c: &mut ByteCursor<'_>, op: &'static str) -> Result<char, WireError> {
    let at = c.position();
    let width = match c.peek_u8().map_err(|_| c.eof(op, 1))? {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Err(invalid_utf8(op, at)),
    };
    let bytes = c.take(op, width)?;
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.chars().next())
        .ok_or_else(|| invalid_utf8(op, at))
}

fn invalid_utf8(op: &'static str, offset: usize) -> WireError {
    tracing::debug!(op, offset, "rejected malformed UTF-8");
    WireError::InvalidText {
        op,
        encoding: CharEncoding::Utf8.name(),
        offset,
    }
}

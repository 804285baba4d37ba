use crate::config::ReaderConfig;
use crate::error::WireError;

/// A read position over an immutable, fully materialized byte buffer.
///
/// Every read advances the cursor by exactly the number of bytes it
/// consumes. A read that fails leaves the position where it was, so a
/// caller can report the offset or try a different interpretation.
///
/// ```text
///   buf:  ┌────────────────────────────┬──────────────────────┐
///         │ consumed                   │ remaining            │
///         └────────────────────────────┴──────────────────────┘
///         0                       position                  len
/// ```
///
/// The cursor borrows its buffer and is mutated through `&mut self`, so
/// one cursor belongs to one decode session. Decode independent buffers
/// with independent cursors.
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    position: usize,
    config: ReaderConfig,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of `buf` with the default configuration.
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_config(buf, ReaderConfig::default())
    }

    /// Create a cursor at the start of `buf` with the given configuration.
    pub fn with_config(buf: &'a [u8], config: ReaderConfig) -> Self {
        Self {
            buf,
            position: 0,
            config,
        }
    }

    /// Create a cursor that starts reading at `position`.
    ///
    /// # Errors
    ///
    /// [`WireError::PositionOutOfRange`] if `position > buf.len()`.
    pub fn at(buf: &'a [u8], position: usize) -> Result<Self, WireError> {
        let mut cursor = Self::new(buf);
        cursor.set_position(position)?;
        Ok(cursor)
    }

    pub fn config(&self) -> ReaderConfig {
        self.config
    }

    /// Current read offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total buffer length.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position == self.buf.len()
    }

    /// The unread tail of the buffer. Does not advance.
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.buf[self.position..]
    }

    /// Move to an absolute offset.
    ///
    /// # Errors
    ///
    /// [`WireError::PositionOutOfRange`] if `position` is past the end.
    pub fn set_position(&mut self, position: usize) -> Result<(), WireError> {
        if position > self.buf.len() {
            return Err(WireError::PositionOutOfRange {
                position,
                len: self.buf.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Run `f` and roll the position back if it fails.
    ///
    /// Composite reads go through here so that a failure part-way through
    /// (a truncated grid row, a bad enum value) does not leave the cursor
    /// in the middle of a value.
    pub fn atomic<T, E>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
        let start = self.position;
        let result = f(self);
        if result.is_err() {
            self.position = start;
        }
        result
    }

    /// A copy of this cursor whose buffer ends `n` bytes past the current
    /// position. Offsets inside the window stay absolute.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `n` bytes remain.
    pub fn window(&self, op: &'static str, n: usize) -> Result<ByteCursor<'a>, WireError> {
        self.ensure(op, n)?;
        Ok(ByteCursor {
            buf: &self.buf[..self.position + n],
            position: self.position,
            config: self.config,
        })
    }

    /// Fail unless at least `n` bytes remain.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] naming `op`.
    pub fn ensure(&self, op: &'static str, n: usize) -> Result<(), WireError> {
        if self.remaining() < n {
            return Err(self.eof(op, n));
        }
        Ok(())
    }

    pub(crate) fn eof(&self, op: &'static str, needed: usize) -> WireError {
        tracing::trace!(
            op,
            offset = self.position,
            needed,
            remaining = self.remaining(),
            "read past end of buffer"
        );
        WireError::UnexpectedEof {
            op,
            offset: self.position,
            needed,
            remaining: self.remaining(),
        }
    }

    /// Consume `n` bytes and return them as a borrowed slice.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] naming `op` if fewer than `n` bytes remain.
    pub fn take(&mut self, op: &'static str, n: usize) -> Result<&'a [u8], WireError> {
        self.ensure(op, n)?;
        let start = self.position;
        self.position += n;
        Ok(&self.buf[start..self.position])
    }

    fn take_array<const N: usize>(&mut self, op: &'static str) -> Result<[u8; N], WireError> {
        let bytes = self.take(op, N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Consume `n` raw bytes.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `n` bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        self.take("bytes", n)
    }

    /// Read a fixed-size byte array, e.g. a FourCC.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        self.take_array("byte array")
    }

    /// Advance past `n` bytes without decoding them.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `n` bytes remain.
    pub fn skip(&mut self, n: usize) -> Result<(), WireError> {
        self.take("skip", n).map(|_| ())
    }

    /// Look at the next byte without consuming it.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] at the end of the buffer.
    pub fn peek_u8(&self) -> Result<u8, WireError> {
        self.buf
            .get(self.position)
            .copied()
            .ok_or_else(|| self.eof("u8", 1))
    }

    // ── Little-endian primitives ──────────────────────────────────────
    //
    // Multi-byte values in asset files are stored in the byte order of the
    // machine that wrote them, which is little-endian for every format we
    // decode. Big-endian values get their own explicitly named methods.

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] at the end of the buffer.
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take_array::<1>("u8")?[0])
    }

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] at the end of the buffer.
    pub fn read_i8(&mut self) -> Result<i8, WireError> {
        Ok(i8::from_le_bytes(self.take_array("i8")?))
    }

    /// Read a byte as a boolean: zero is `false`, anything else `true`.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] at the end of the buffer.
    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        Ok(self.take_array::<1>("bool")?[0] != 0)
    }

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 2 bytes remain.
    pub fn read_u16(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_le_bytes(self.take_array("u16")?))
    }

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 2 bytes remain.
    pub fn read_i16(&mut self) -> Result<i16, WireError> {
        Ok(i16::from_le_bytes(self.take_array("i16")?))
    }

    /// Read a 3-byte little-endian unsigned integer.
    ///
    /// ```text
    ///   [b0, b1, b2]  →  b0 | b1 << 8 | b2 << 16
    /// ```
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 3 bytes remain.
    pub fn read_u24(&mut self) -> Result<u32, WireError> {
        let bytes = self.take_array::<3>("u24")?;
        Ok(bytes
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &b)| acc | (u32::from(b) << (8 * i))))
    }

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 4 bytes remain.
    pub fn read_u32(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_le_bytes(self.take_array("u32")?))
    }

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 4 bytes remain.
    pub fn read_i32(&mut self) -> Result<i32, WireError> {
        Ok(i32::from_le_bytes(self.take_array("i32")?))
    }

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 8 bytes remain.
    pub fn read_u64(&mut self) -> Result<u64, WireError> {
        Ok(u64::from_le_bytes(self.take_array("u64")?))
    }

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 4 bytes remain.
    pub fn read_f32(&mut self) -> Result<f32, WireError> {
        Ok(f32::from_le_bytes(self.take_array("f32")?))
    }

    // ── Big-endian primitives ─────────────────────────────────────────

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 2 bytes remain.
    pub fn read_u16_be(&mut self) -> Result<u16, WireError> {
        Ok(u16::from_be_bytes(self.take_array("u16 (big-endian)")?))
    }

    /// Read a 4-byte big-endian unsigned integer.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 4 bytes remain.
    pub fn read_u32_be(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_be_bytes(self.take_array("u32 (big-endian)")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_integers() {
        let buf = [
            0x7F, // u8
            0xFE, // i8 = -2
            0x34, 0x12, // u16 = 0x1234
            0xFF, 0xFF, // i16 = -1
            0x78, 0x56, 0x34, 0x12, // u32 = 0x12345678
            0xFE, 0xFF, 0xFF, 0xFF, // i32 = -2
        ];
        let mut c = ByteCursor::new(&buf);
        assert_eq!(c.read_u8().unwrap(), 0x7F);
        assert_eq!(c.read_i8().unwrap(), -2);
        assert_eq!(c.read_u16().unwrap(), 0x1234);
        assert_eq!(c.read_i16().unwrap(), -1);
        assert_eq!(c.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(c.read_i32().unwrap(), -2);
        assert!(c.is_at_end());
    }

    #[test]
    fn big_endian_u32_reverses_byte_order() {
        let buf = [0x12, 0x34, 0x56, 0x78];
        let mut c = ByteCursor::new(&buf);
        assert_eq!(c.read_u32_be().unwrap(), 0x1234_5678);
        assert_eq!(c.position(), 4);
    }

    #[test]
    fn big_endian_u16() {
        let mut c = ByteCursor::new(&[0xAB, 0xCD]);
        assert_eq!(c.read_u16_be().unwrap(), 0xABCD);
    }

    #[test]
    fn u24_is_little_endian_without_fourth_byte() {
        let buf = [0x01, 0x02, 0x03, 0xFF];
        let mut c = ByteCursor::new(&buf);
        assert_eq!(c.read_u24().unwrap(), 0x0003_0201);
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn u24_max() {
        let mut c = ByteCursor::new(&[0xFF, 0xFF, 0xFF]);
        assert_eq!(c.read_u24().unwrap(), 0x00FF_FFFF);
    }

    #[test]
    fn f32_and_bool() {
        let mut buf = 1.5f32.to_le_bytes().to_vec();
        buf.extend_from_slice(&[0x00, 0x02]);
        let mut c = ByteCursor::new(&buf);
        assert!((c.read_f32().unwrap() - 1.5).abs() < f32::EPSILON);
        assert!(!c.read_bool().unwrap());
        assert!(c.read_bool().unwrap());
    }

    #[test]
    fn truncated_read_leaves_position_unchanged() {
        let buf = [0x01, 0x02, 0x03];
        let mut c = ByteCursor::new(&buf);
        c.read_u8().unwrap();

        let err = c.read_u32().unwrap_err();
        assert_eq!(
            err,
            WireError::UnexpectedEof {
                op: "u32",
                offset: 1,
                needed: 4,
                remaining: 2,
            }
        );
        assert_eq!(c.position(), 1);
    }

    #[test]
    fn read_on_empty_buffer() {
        let mut c = ByteCursor::new(&[]);
        assert!(c.is_empty());
        assert!(matches!(
            c.read_u8(),
            Err(WireError::UnexpectedEof { offset: 0, .. })
        ));
        assert!(c.peek_u8().is_err());
    }

    #[test]
    fn start_at_offset() {
        let buf = [0xAA, 0xBB, 0xCC];
        let mut c = ByteCursor::at(&buf, 2).unwrap();
        assert_eq!(c.read_u8().unwrap(), 0xCC);

        // One past the last byte is a valid (empty) position.
        assert!(ByteCursor::at(&buf, 3).unwrap().is_at_end());
        assert!(matches!(
            ByteCursor::at(&buf, 4),
            Err(WireError::PositionOutOfRange { position: 4, len: 3 })
        ));
    }

    #[test]
    fn peek_does_not_advance() {
        let mut c = ByteCursor::new(&[0x42, 0x43]);
        assert_eq!(c.peek_u8().unwrap(), 0x42);
        assert_eq!(c.position(), 0);
        assert_eq!(c.read_u8().unwrap(), 0x42);
    }

    #[test]
    fn skip_and_read_bytes() {
        let buf = b"RIFFdata";
        let mut c = ByteCursor::new(buf);
        c.skip(4).unwrap();
        assert_eq!(c.read_bytes(4).unwrap(), b"data");
        assert!(c.skip(1).is_err());
        assert_eq!(c.position(), 8);
    }

    #[test]
    fn read_array_fourcc() {
        let mut c = ByteCursor::new(b"WAVE");
        assert_eq!(c.read_array::<4>().unwrap(), *b"WAVE");
    }

    #[test]
    fn window_keeps_absolute_offsets() {
        let buf = [0, 1, 2, 3, 4, 5];
        let mut c = ByteCursor::new(&buf);
        c.skip(2).unwrap();

        let mut w = c.window("test", 2).unwrap();
        assert_eq!(w.position(), 2);
        assert_eq!(w.read_u16().unwrap(), 0x0302);
        let err = w.read_u8().unwrap_err();
        assert_eq!(err.offset(), 4);

        // The parent cursor is untouched.
        assert_eq!(c.position(), 2);
        assert!(c.window("test", 5).is_err());
    }

    #[test]
    fn atomic_rolls_back_on_error() {
        let buf = [0x01, 0x02, 0x03];
        let mut c = ByteCursor::new(&buf);
        let result: Result<(u16, u16), WireError> =
            c.atomic(|c| Ok((c.read_u16()?, c.read_u16()?)));
        assert!(result.is_err());
        assert_eq!(c.position(), 0);

        let ok: Result<u16, WireError> = c.atomic(|c| c.read_u16());
        assert_eq!(ok.unwrap(), 0x0201);
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn decoding_is_deterministic() {
        let buf = [0x10, 0x20, 0x30, 0x40, 0x50];
        let decode = || {
            let mut c = ByteCursor::at(&buf, 1).unwrap();
            let v = (c.read_u24().unwrap(), c.read_u8().unwrap());
            (v, c.position())
        };
        assert_eq!(decode(), decode());
    }
}

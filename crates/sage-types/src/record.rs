use sage_wire::ByteCursor;

use crate::error::TypeError;

/// A value with a fixed byte width that can appear as a record field.
///
/// Multi-byte integers are little-endian, matching how the asset formats
/// lay out their in-memory structs. Big-endian fields belong in a
/// hand-written [`Record`] impl that calls the `_be` cursor methods.
///
/// ```text
/// ┌──────────┬───────┐
/// │ Type     │ Width │
/// ├──────────┼───────┤
/// │ u8 / i8  │ 1     │
/// │ u16/ i16 │ 2     │
/// │ u32/ i32 │ 4     │
/// │ f32      │ 4     │
/// │ u64      │ 8     │
/// │ [u8; N]  │ N     │
/// │ enums    │ repr  │
/// └──────────┴───────┘
/// ```
pub trait WireField: Sized {
    /// Bytes consumed by [`read_field`](Self::read_field).
    const WIDTH: usize;

    /// Decode one field at the cursor.
    ///
    /// # Errors
    ///
    /// [`TypeError::Wire`] on truncation; enum fields may also return
    /// [`TypeError::InvalidEnumValue`].
    fn read_field(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError>;
}

macro_rules! primitive_field {
    ($($ty:ty => $read:ident),+ $(,)?) => {
        $(
            impl WireField for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn read_field(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
                    Ok(cursor.$read()?)
                }
            }
        )+
    };
}

primitive_field! {
    u8 => read_u8,
    i8 => read_i8,
    u16 => read_u16,
    i16 => read_i16,
    u32 => read_u32,
    i32 => read_i32,
    u64 => read_u64,
    f32 => read_f32,
}

impl<const N: usize> WireField for [u8; N] {
    const WIDTH: usize = N;

    fn read_field(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
        Ok(cursor.read_array::<N>()?)
    }
}

/// A fixed-size structure decoded field by field.
///
/// `SIZE` is the exact number of bytes the structure occupies. Decoding
/// goes through [`read_record`], which gives [`decode_fields`] a window of
/// exactly `SIZE` bytes and rejects a decoder that stops short of it.
///
/// Most records are declared with [`wire_record!`](crate::wire_record),
/// which derives `SIZE` from the field widths. Records with signatures,
/// reserved gaps or big-endian fields implement the trait by hand.
///
/// [`decode_fields`]: Record::decode_fields
pub trait Record: Sized {
    const NAME: &'static str;
    const SIZE: usize;

    /// Decode the fields in declaration order.
    ///
    /// # Errors
    ///
    /// Any [`TypeError`] raised by a field.
    fn decode_fields(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError>;
}

/// Decode a record of exactly `R::SIZE` bytes.
///
/// The cursor only moves once the whole record has decoded. A decoder that
/// tries to read past `SIZE` hits the end of its window and fails with
/// [`WireError::UnexpectedEof`](sage_wire::WireError::UnexpectedEof).
///
/// # Errors
///
/// - [`TypeError::Wire`] if fewer than `R::SIZE` bytes remain.
/// - [`TypeError::RecordSizeMismatch`] if the decoder consumed fewer bytes
///   than `R::SIZE`.
/// - Any error raised by the record's fields.
pub fn read_record<R: Record>(cursor: &mut ByteCursor<'_>) -> Result<R, TypeError> {
    let offset = cursor.position();
    let mut window = cursor.window(R::NAME, R::SIZE)?;

    let record = R::decode_fields(&mut window).inspect_err(|e| {
        tracing::debug!(record = R::NAME, offset, error = %e, "record decode failed");
    })?;

    let consumed = window.position() - offset;
    if consumed != R::SIZE {
        tracing::debug!(record = R::NAME, offset, consumed, declared = R::SIZE, "record size mismatch");
        return Err(TypeError::RecordSizeMismatch {
            record: R::NAME,
            declared: R::SIZE,
            consumed,
            offset,
        });
    }

    cursor.skip(R::SIZE)?;
    Ok(record)
}

/// Record decoding as a cursor method.
pub trait RecordReadExt {
    /// See [`read_record`].
    ///
    /// # Errors
    ///
    /// See [`read_record`].
    fn read_record<R: Record>(&mut self) -> Result<R, TypeError>;
}

impl RecordReadExt for ByteCursor<'_> {
    fn read_record<R: Record>(&mut self) -> Result<R, TypeError> {
        read_record(self)
    }
}

/// Consume `expected.len()` bytes and check them against a signature.
///
/// On a mismatch the cursor stays where it was.
///
/// # Errors
///
/// - [`TypeError::Wire`] if the signature is truncated.
/// - [`TypeError::InvalidMagic`] if the bytes differ.
pub fn expect_magic(
    cursor: &mut ByteCursor<'_>,
    record: &'static str,
    expected: &'static [u8],
) -> Result<(), TypeError> {
    cursor.atomic(|c| {
        let offset = c.position();
        let found = c.take(record, expected.len())?;
        if found != expected {
            return Err(TypeError::InvalidMagic {
                record,
                expected,
                found: found.to_vec(),
                offset,
            });
        }
        Ok(())
    })
}

/// Declare a struct whose fields are all [`WireField`]s and implement
/// [`Record`] for it.
///
/// Fields decode in the order they are written, and `SIZE` is the sum of
/// their widths.
///
/// ```
/// sage_types::wire_record! {
///     #[derive(Debug)]
///     pub struct ChunkHeader {
///         pub id: [u8; 4],
///         pub size: u32,
///     }
/// }
///
/// use sage_types::{ByteCursor, Record, RecordReadExt};
///
/// assert_eq!(ChunkHeader::SIZE, 8);
/// let mut cursor = ByteCursor::new(b"data\x10\x00\x00\x00");
/// let header: ChunkHeader = cursor.read_record().unwrap();
/// assert_eq!(header.size, 16);
/// ```
#[macro_export]
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $ty ),+
        }

        impl $crate::record::Record for $name {
            const NAME: &'static str = stringify!($name);
            const SIZE: usize = 0 $( + <$ty as $crate::record::WireField>::WIDTH )+;

            fn decode_fields(
                cursor: &mut $crate::ByteCursor<'_>,
            ) -> ::std::result::Result<Self, $crate::TypeError> {
                Ok(Self {
                    $( $field: <$ty as $crate::record::WireField>::read_field(cursor)?, )+
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_wire::WireError;

    crate::wire_record! {
        #[derive(Debug, PartialEq)]
        struct Sample {
            tag: [u8; 2],
            count: u16,
            value: i32,
            scale: f32,
        }
    }

    /// Declares 6 bytes but only reads 4.
    #[derive(Debug)]
    struct ShortCount;

    impl Record for ShortCount {
        const NAME: &'static str = "ShortCount";
        const SIZE: usize = 6;

        fn decode_fields(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
            cursor.read_u32()?;
            Ok(Self)
        }
    }

    /// Declares 2 bytes but reads 4.
    #[derive(Debug)]
    struct LongCount;

    impl Record for LongCount {
        const NAME: &'static str = "LongCount";
        const SIZE: usize = 2;

        fn decode_fields(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
            cursor.read_u32()?;
            Ok(Self)
        }
    }

    fn sample_bytes() -> Vec<u8> {
        let mut buf = b"SM".to_vec();
        buf.extend_from_slice(&7u16.to_le_bytes());
        buf.extend_from_slice(&(-3i32).to_le_bytes());
        buf.extend_from_slice(&0.5f32.to_le_bytes());
        buf
    }

    #[test]
    fn size_is_sum_of_field_widths() {
        assert_eq!(Sample::SIZE, 12);
        assert_eq!(Sample::NAME, "Sample");
    }

    #[test]
    fn fields_decode_in_declaration_order() {
        let buf = sample_bytes();
        let mut c = ByteCursor::new(&buf);
        let s: Sample = c.read_record().unwrap();
        assert_eq!(
            s,
            Sample {
                tag: *b"SM",
                count: 7,
                value: -3,
                scale: 0.5,
            }
        );
        assert_eq!(c.position(), Sample::SIZE);
    }

    #[test]
    fn truncated_record_does_not_move_cursor() {
        let buf = sample_bytes();
        let mut c = ByteCursor::new(&buf[..11]);
        let err = read_record::<Sample>(&mut c).unwrap_err();
        assert!(err.is_truncation());
        assert!(matches!(
            err,
            TypeError::Wire(WireError::UnexpectedEof {
                op: "Sample",
                needed: 12,
                remaining: 11,
                ..
            })
        ));
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn under_consuming_decoder_is_rejected() {
        let buf = [0u8; 8];
        let mut c = ByteCursor::new(&buf);
        let err = read_record::<ShortCount>(&mut c).unwrap_err();
        assert_eq!(
            err,
            TypeError::RecordSizeMismatch {
                record: "ShortCount",
                declared: 6,
                consumed: 4,
                offset: 0,
            }
        );
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn over_consuming_decoder_stops_at_window() {
        let buf = [0u8; 8];
        let mut c = ByteCursor::new(&buf);
        let err = read_record::<LongCount>(&mut c).unwrap_err();
        assert!(matches!(
            err,
            TypeError::Wire(WireError::UnexpectedEof {
                needed: 4,
                remaining: 2,
                ..
            })
        ));
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn magic_mismatch_reports_found_bytes() {
        let mut c = ByteCursor::new(b"XYZ!");
        let err = expect_magic(&mut c, "Test", b"RIFF").unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidMagic {
                record: "Test",
                expected: b"RIFF",
                found: b"XYZ!".to_vec(),
                offset: 0,
            }
        );
    }

    #[test]
    fn magic_mismatch_leaves_position() {
        let mut c = ByteCursor::new(b"RIFXWAVE");
        assert!(expect_magic(&mut c, "Test", b"RIFF").is_err());
        assert_eq!(c.position(), 0);

        expect_magic(&mut c, "Test", b"RIFX").unwrap();
        assert_eq!(c.position(), 4);
    }
}

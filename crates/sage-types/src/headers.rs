use sage_wire::ByteCursor;

use crate::enums::{BitmapCompression, CsfLanguage};
use crate::error::TypeError;
use crate::file_kind::FileKind;
use crate::record::{Record, RecordReadExt, expect_magic};

// ── Bitmap ────────────────────────────────────────────────────────────

/// `BITMAPFILEHEADER`, the first 14 bytes of a `.bmp` file.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────┐
/// │ Offset │ Size    │ Description                  │
/// ├────────┼─────────┼──────────────────────────────┤
/// │ 0x00   │ 2 bytes │ Signature "BM"               │
/// │ 0x02   │ u32     │ File size                    │
/// │ 0x06   │ 4 bytes │ Reserved                     │
/// │ 0x0A   │ u32     │ Offset of the pixel array    │
/// └────────┴─────────┴──────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitmapFileHeader {
    pub file_size: u32,
    pub pixel_offset: u32,
}

impl Record for BitmapFileHeader {
    const NAME: &'static str = "BitmapFileHeader";
    const SIZE: usize = 14;

    fn decode_fields(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
        expect_magic(cursor, Self::NAME, b"BM")?;
        let file_size = cursor.read_u32()?;
        cursor.skip(4)?;
        let pixel_offset = cursor.read_u32()?;
        Ok(Self {
            file_size,
            pixel_offset,
        })
    }
}

crate::wire_record! {
    /// `BITMAPINFOHEADER`, the 40-byte DIB header following the file header.
    ///
    /// A negative `height` means the rows are stored top-down.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct BitmapInfoHeader {
        pub header_size: u32,
        pub width: i32,
        pub height: i32,
        pub planes: u16,
        pub bit_count: u16,
        pub compression: BitmapCompression,
        pub image_size: u32,
        pub x_pixels_per_meter: i32,
        pub y_pixels_per_meter: i32,
        pub colors_used: u32,
        pub colors_important: u32,
    }
}

// ── RIFF (.wav, .ani) ─────────────────────────────────────────────────

crate::wire_record! {
    /// A RIFF chunk header: FourCC id and little-endian body size.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct RiffChunkHeader {
        pub id: [u8; 4],
        pub size: u32,
    }
}

/// The 12-byte RIFF container header.
///
/// ```text
///   "RIFF" │ size (u32 LE) │ form type (FourCC: "WAVE", "ACON", ...)
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiffHeader {
    pub size: u32,
    pub form_type: [u8; 4],
}

impl RiffHeader {
    /// Form type of wave audio.
    pub const WAVE: [u8; 4] = *b"WAVE";
    /// Form type of animated cursors.
    pub const ACON: [u8; 4] = *b"ACON";
}

impl Record for RiffHeader {
    const NAME: &'static str = "RiffHeader";
    const SIZE: usize = 12;

    fn decode_fields(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
        let chunk: RiffChunkHeader = cursor.read_record()?;
        if chunk.id != *b"RIFF" {
            return Err(TypeError::InvalidMagic {
                record: Self::NAME,
                expected: b"RIFF",
                found: chunk.id.to_vec(),
                offset: cursor.position() - RiffChunkHeader::SIZE,
            });
        }
        Ok(Self {
            size: chunk.size,
            form_type: cursor.read_array()?,
        })
    }
}

/// A RIFF header whose form type must be `form_type`.
fn read_riff(
    cursor: &mut ByteCursor<'_>,
    form_type: &'static [u8; 4],
) -> Result<RiffHeader, TypeError> {
    let offset = cursor.position();
    let header: RiffHeader = cursor.read_record()?;
    if header.form_type != *form_type {
        cursor.set_position(offset)?;
        return Err(TypeError::InvalidMagic {
            record: RiffHeader::NAME,
            expected: form_type,
            found: header.form_type.to_vec(),
            offset: offset + 8,
        });
    }
    Ok(header)
}

// ── ID3 (.mp3) ────────────────────────────────────────────────────────

/// ID3v2 tag header at the start of an `.mp3` file.
///
/// The tag size is stored big-endian as a "syncsafe" integer: four bytes
/// of 7 significant bits each, so no byte of it ever has the high bit set.
///
/// ```text
///   "ID3" │ major │ revision │ flags │ size (4 × 7 bits, big-endian)
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Id3Header {
    pub major_version: u8,
    pub revision: u8,
    pub flags: u8,
    /// Tag size in bytes, excluding this header.
    pub tag_size: u32,
}

impl Record for Id3Header {
    const NAME: &'static str = "Id3Header";
    const SIZE: usize = 10;

    fn decode_fields(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
        expect_magic(cursor, Self::NAME, b"ID3")?;
        let major_version = cursor.read_u8()?;
        let revision = cursor.read_u8()?;
        let flags = cursor.read_u8()?;
        let size_offset = cursor.position();
        let raw = cursor.read_u32_be()?;
        if raw & 0x8080_8080 != 0 {
            return Err(TypeError::InvalidSyncsafe {
                record: Self::NAME,
                value: raw,
                offset: size_offset,
            });
        }
        let tag_size = (raw & 0x7F)
            | (((raw >> 8) & 0x7F) << 7)
            | (((raw >> 16) & 0x7F) << 14)
            | (((raw >> 24) & 0x7F) << 21);
        Ok(Self {
            major_version,
            revision,
            flags,
            tag_size,
        })
    }
}

// ── Bink (.bik) ───────────────────────────────────────────────────────

/// Leading fields of a Bink video header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinkHeader {
    /// Codec revision letter following `"BIK"`.
    pub revision: u8,
    /// File size minus the 8 bytes of signature and this field.
    pub file_size: u32,
    pub frame_count: u32,
    pub largest_frame_size: u32,
    pub width: u32,
    pub height: u32,
}

impl Record for BinkHeader {
    const NAME: &'static str = "BinkHeader";
    const SIZE: usize = 28;

    fn decode_fields(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
        expect_magic(cursor, Self::NAME, b"BIK")?;
        let revision = cursor.read_u8()?;
        let file_size = cursor.read_u32()?;
        let frame_count = cursor.read_u32()?;
        let largest_frame_size = cursor.read_u32()?;
        // second frame count
        cursor.skip(4)?;
        let width = cursor.read_u32()?;
        let height = cursor.read_u32()?;
        Ok(Self {
            revision,
            file_size,
            frame_count,
            largest_frame_size,
            width,
            height,
        })
    }
}

// ── Compiled string table (.csf) ──────────────────────────────────────

/// Header of a compiled string table.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────┐
/// │ Offset │ Size    │ Description                  │
/// ├────────┼─────────┼──────────────────────────────┤
/// │ 0x00   │ 4 bytes │ Signature " FSC"             │
/// │ 0x04   │ u32     │ Format version               │
/// │ 0x08   │ u32     │ Label count                  │
/// │ 0x0C   │ u32     │ String count                 │
/// │ 0x10   │ 4 bytes │ Reserved                     │
/// │ 0x14   │ u32     │ Language ([`CsfLanguage`])   │
/// └────────┴─────────┴──────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsfHeader {
    pub version: u32,
    pub label_count: u32,
    pub string_count: u32,
    pub language: CsfLanguage,
}

impl CsfHeader {
    /// `"CSF "` read as a little-endian FourCC.
    pub const MAGIC: &'static [u8; 4] = b" FSC";
}

impl Record for CsfHeader {
    const NAME: &'static str = "CsfHeader";
    const SIZE: usize = 24;

    fn decode_fields(cursor: &mut ByteCursor<'_>) -> Result<Self, TypeError> {
        expect_magic(cursor, Self::NAME, Self::MAGIC)?;
        let version = cursor.read_u32()?;
        let label_count = cursor.read_u32()?;
        let string_count = cursor.read_u32()?;
        cursor.skip(4)?;
        let language = crate::enums::read_enum(cursor)?;
        Ok(Self {
            version,
            label_count,
            string_count,
            language,
        })
    }
}

// ── Dispatch by file kind ─────────────────────────────────────────────

/// The decoded leading header of an asset file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetHeader {
    Bitmap {
        file: BitmapFileHeader,
        info: BitmapInfoHeader,
    },
    Riff(RiffHeader),
    Id3(Id3Header),
    Bink(BinkHeader),
    StringTable(CsfHeader),
}

impl AssetHeader {
    /// Decode the header that files of `kind` start with.
    ///
    /// Returns `Ok(None)` for kinds without a binary header (text files,
    /// window layouts, unknown extensions) and for `.mp3` files without an
    /// ID3 tag, which start directly with an MPEG frame.
    ///
    /// # Errors
    ///
    /// Any [`TypeError`] from the header records, e.g. a wrong signature or
    /// a file shorter than its header.
    pub fn decode(kind: FileKind, bytes: &[u8]) -> Result<Option<Self>, TypeError> {
        let mut cursor = ByteCursor::new(bytes);
        let header = match kind {
            FileKind::Bitmap => Self::Bitmap {
                file: cursor.read_record()?,
                info: cursor.read_record()?,
            },
            FileKind::Wave => Self::Riff(read_riff(&mut cursor, b"WAVE")?),
            FileKind::AnimatedCursor => Self::Riff(read_riff(&mut cursor, b"ACON")?),
            FileKind::Mp3 if bytes.starts_with(b"ID3") => Self::Id3(cursor.read_record()?),
            FileKind::Bink => Self::Bink(cursor.read_record()?),
            FileKind::StringTable => Self::StringTable(cursor.read_record()?),
            FileKind::Mp3
            | FileKind::WindowLayout
            | FileKind::Text
            | FileKind::Unsupported => return Ok(None),
        };
        tracing::debug!(?kind, consumed = cursor.position(), "decoded asset header");
        Ok(Some(header))
    }

    /// Name of the header record, for display.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bitmap { .. } => "Bitmap",
            Self::Riff(_) => RiffHeader::NAME,
            Self::Id3(_) => Id3Header::NAME,
            Self::Bink(_) => BinkHeader::NAME,
            Self::StringTable(_) => CsfHeader::NAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sizes() {
        assert_eq!(BitmapFileHeader::SIZE, 14);
        assert_eq!(BitmapInfoHeader::SIZE, 40);
        assert_eq!(RiffChunkHeader::SIZE, 8);
        assert_eq!(RiffHeader::SIZE, 12);
        assert_eq!(Id3Header::SIZE, 10);
        assert_eq!(BinkHeader::SIZE, 28);
        assert_eq!(CsfHeader::SIZE, 24);
    }

    #[test]
    fn riff_header_wave() {
        let mut buf = b"RIFF".to_vec();
        buf.extend_from_slice(&36u32.to_le_bytes());
        buf.extend_from_slice(b"WAVEfmt ");
        let mut c = ByteCursor::new(&buf);
        let header: RiffHeader = c.read_record().unwrap();
        assert_eq!(header.size, 36);
        assert_eq!(header.form_type, RiffHeader::WAVE);
        assert_eq!(c.position(), 12);
    }

    #[test]
    fn riff_header_wrong_signature() {
        let buf = b"RIFXxxxxWAVE";
        let err = ByteCursor::new(buf).read_record::<RiffHeader>().unwrap_err();
        assert!(matches!(
            err,
            TypeError::InvalidMagic {
                record: "RiffHeader",
                offset: 0,
                ..
            }
        ));
    }

    #[test]
    fn id3_syncsafe_size() {
        // 0x00 0x00 0x02 0x01 → (2 << 7) | 1 = 257
        let buf = [b'I', b'D', b'3', 4, 0, 0, 0x00, 0x00, 0x02, 0x01];
        let header: Id3Header = ByteCursor::new(&buf).read_record().unwrap();
        assert_eq!(header.major_version, 4);
        assert_eq!(header.tag_size, 257);
    }

    #[test]
    fn id3_rejects_high_bits_in_size() {
        let buf = [b'I', b'D', b'3', 3, 0, 0, 0x00, 0x00, 0x82, 0x01];
        let mut c = ByteCursor::new(&buf);
        let err = c.read_record::<Id3Header>().unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidSyncsafe {
                record: "Id3Header",
                value: 0x0000_8201,
                offset: 6,
            }
        );
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn riff_form_type_must_match_kind() {
        let mut buf = b"RIFF".to_vec();
        buf.extend_from_slice(&4u32.to_le_bytes());
        buf.extend_from_slice(b"ACON");

        assert!(AssetHeader::decode(FileKind::AnimatedCursor, &buf).is_ok());
        let err = AssetHeader::decode(FileKind::Wave, &buf).unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidMagic {
                record: "RiffHeader",
                expected: b"WAVE",
                found: b"ACON".to_vec(),
                offset: 8,
            }
        );
    }

    #[test]
    fn csf_header_language() {
        let mut buf = CsfHeader::MAGIC.to_vec();
        for v in [3u32, 10, 12, 0, 2] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        let header: CsfHeader = ByteCursor::new(&buf).read_record().unwrap();
        assert_eq!(header.version, 3);
        assert_eq!(header.label_count, 10);
        assert_eq!(header.string_count, 12);
        assert_eq!(header.language, CsfLanguage::German);
    }

    #[test]
    fn csf_header_unknown_language() {
        let mut buf = CsfHeader::MAGIC.to_vec();
        for v in [3u32, 0, 0, 0, 42] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        let err = ByteCursor::new(&buf).read_record::<CsfHeader>().unwrap_err();
        assert_eq!(
            err,
            TypeError::InvalidEnumValue {
                enum_name: "CsfLanguage",
                value: 42,
                offset: 20,
            }
        );
    }

    #[test]
    fn text_kinds_have_no_header() {
        assert_eq!(AssetHeader::decode(FileKind::Text, b"hello").unwrap(), None);
        assert_eq!(AssetHeader::decode(FileKind::Mp3, &[0xFF, 0xFB]).unwrap(), None);
    }
}

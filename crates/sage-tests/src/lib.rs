//! Shared fixtures for the integration tests and benches.
//!
//! Each builder returns the leading bytes of a small but well-formed asset
//! file. Constant parts are written as hex so they can be compared against
//! a hex dump of a real file byte for byte.

/// Decode a hex fixture, ignoring whitespace.
///
/// # Panics
///
/// Panics if `s` is not valid hex; fixtures are compile-time constants.
pub fn unhex(s: &str) -> Vec<u8> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&compact).unwrap_or_else(|e| panic!("bad fixture hex {s:?}: {e}"))
}

/// A 24-bit uncompressed bitmap header pair for a `width x height` image.
pub fn bitmap(width: i32, height: i32) -> Vec<u8> {
    let row = (u32::try_from(width).unwrap_or(0) * 3).div_ceil(4) * 4;
    let image_size = row * height.unsigned_abs();
    let file_size = 54 + image_size;

    let mut out = b"BM".to_vec();
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&54u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    // planes = 1, bit count = 24, compression = RGB
    out.extend_from_slice(&unhex("0100 1800 00000000"));
    out.extend_from_slice(&image_size.to_le_bytes());
    // 2835 pixels per meter (72 dpi) both ways, no palette
    out.extend_from_slice(&unhex("130b0000 130b0000 00000000 00000000"));
    out
}

/// A canonical 16-bit mono PCM wave header with `data_len` bytes of samples.
pub fn wave(data_len: u32) -> Vec<u8> {
    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    // fmt chunk: 16 bytes, PCM, 1 channel, 22050 Hz, 44100 B/s, align 2, 16 bits
    out.extend_from_slice(&unhex("10000000 0100 0100 22560000 44ac0000 0200 1000"));
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out
}

/// The start of an animated cursor: a RIFF/ACON container and its `anih` chunk id.
pub fn animated_cursor() -> Vec<u8> {
    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&4096u32.to_le_bytes());
    out.extend_from_slice(b"ACONanih");
    out.extend_from_slice(&36u32.to_le_bytes());
    out
}

/// A compiled string table header with the given raw language value.
pub fn string_table(labels: u32, strings: u32, language: u32) -> Vec<u8> {
    let mut out = b" FSC".to_vec();
    out.extend_from_slice(&3u32.to_le_bytes());
    out.extend_from_slice(&labels.to_le_bytes());
    out.extend_from_slice(&strings.to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&language.to_le_bytes());
    out
}

/// An ID3v2.3 tag header whose syncsafe size field encodes `tag_size`.
pub fn id3(tag_size: u32) -> Vec<u8> {
    let syncsafe = (tag_size & 0x7F)
        | (((tag_size >> 7) & 0x7F) << 8)
        | (((tag_size >> 14) & 0x7F) << 16)
        | (((tag_size >> 21) & 0x7F) << 24);
    let mut out = unhex("494433 03 00 00");
    out.extend_from_slice(&syncsafe.to_be_bytes());
    out
}

/// A Bink revision `i` header for a `width x height` video.
pub fn bink(frames: u32, width: u32, height: u32) -> Vec<u8> {
    let mut out = b"BIKi".to_vec();
    out.extend_from_slice(&1_000_000u32.to_le_bytes());
    out.extend_from_slice(&frames.to_le_bytes());
    out.extend_from_slice(&20_000u32.to_le_bytes());
    out.extend_from_slice(&frames.to_le_bytes());
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out
}

/// A map-like blob: a dimensions prefix, a height map, then a passability bit grid.
///
/// ```text
///   width (u32) │ height (u32) │ width*height u16 │ height*ceil(width/8) bytes
/// ```
pub fn terrain(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    for i in 0..width * height {
        out.extend_from_slice(&u16::try_from(i % 0x1_0000).unwrap_or(0).to_le_bytes());
    }
    let row_bytes = width.div_ceil(8);
    for y in 0..height {
        for b in 0..row_bytes {
            out.push(if (y + b) % 2 == 0 { 0x55 } else { 0xAA });
        }
    }
    out
}

/// Implementation of `sage inspect`.
///
/// Classifies an asset file by extension, decodes the header its kind
/// starts with, and prints the header fields. With `--show-hex` the first
/// bytes of the file follow as a hex dump.
///
/// # Output format
///
/// ```text
/// File: ui/mainmenu.bmp
/// Kind: bitmap (14406 bytes)
/// Header: Bitmap
///   file size      14406
///   pixel offset   54
///   dimensions     80 x 60
///   bit count      24
///   compression    Rgb
/// ```
use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result};
use sage_types::headers::{BinkHeader, CsfHeader, Id3Header, RiffHeader};
use sage_types::{AssetHeader, FileKind};

use crate::InspectArgs;

const HEX_DUMP_LEN: usize = 64;

/// Run the `sage inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its header is malformed
/// (wrong signature, truncated, undefined enum value).
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;
    let kind = FileKind::from_path(&args.file);

    println!("File: {}", args.file.display());
    println!("Kind: {} ({} bytes)", kind.label(), bytes.len());

    let header = AssetHeader::decode(kind, &bytes)
        .with_context(|| format!("failed to decode {} header", kind.label()))?;

    match header {
        Some(header) => {
            println!("Header: {}", header.name());
            for (name, value) in header_fields(&header) {
                println!("  {name:<14} {value}");
            }
        }
        None if matches!(kind, FileKind::Unsupported) => println!("Header: unsupported"),
        None => println!("Header: none (no binary header)"),
    }

    if args.show_hex {
        println!("Hex dump:");
        for line in hex_dump(&bytes[..bytes.len().min(HEX_DUMP_LEN)]) {
            println!("  {line}");
        }
    }

    Ok(())
}

// ── Formatting helpers ────────────────────────────────────────────────────────

/// Label/value pairs for every field worth showing.
fn header_fields(header: &AssetHeader) -> Vec<(&'static str, String)> {
    match header {
        AssetHeader::Bitmap { file, info } => vec![
            ("file size", file.file_size.to_string()),
            ("pixel offset", file.pixel_offset.to_string()),
            ("dimensions", format!("{} x {}", info.width, info.height)),
            ("planes", info.planes.to_string()),
            ("bit count", info.bit_count.to_string()),
            ("compression", format!("{:?}", info.compression)),
            ("image size", info.image_size.to_string()),
            ("colors used", info.colors_used.to_string()),
        ],
        AssetHeader::Riff(RiffHeader { size, form_type }) => vec![
            ("size", size.to_string()),
            ("form type", fourcc(form_type)),
        ],
        AssetHeader::Id3(Id3Header {
            major_version,
            revision,
            flags,
            tag_size,
        }) => vec![
            ("version", format!("2.{major_version}.{revision}")),
            ("flags", format!("0x{flags:02X}")),
            ("tag size", tag_size.to_string()),
        ],
        AssetHeader::Bink(BinkHeader {
            revision,
            file_size,
            frame_count,
            largest_frame_size,
            width,
            height,
        }) => vec![
            ("revision", char::from(*revision).to_string()),
            ("file size", file_size.to_string()),
            ("frames", frame_count.to_string()),
            ("largest frame", largest_frame_size.to_string()),
            ("dimensions", format!("{width} x {height}")),
        ],
        AssetHeader::StringTable(CsfHeader {
            version,
            label_count,
            string_count,
            language,
        }) => vec![
            ("version", version.to_string()),
            ("labels", label_count.to_string()),
            ("strings", string_count.to_string()),
            ("language", format!("{language:?}")),
        ],
    }
}

/// Render a four-character code as text, escaping non-printable bytes.
fn fourcc(code: &[u8; 4]) -> String {
    code.iter().fold(String::with_capacity(4), |mut s, &b| {
        if b.is_ascii_graphic() || b == b' ' {
            s.push(char::from(b));
        } else {
            let _ = write!(s, "\\x{b:02x}");
        }
        s
    })
}

/// Format bytes as `offset  hex  ascii` lines of 16 bytes each.
fn hex_dump(bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let hex = chunk
                .iter()
                .fold(String::with_capacity(chunk.len() * 3), |mut s, b| {
                    if !s.is_empty() {
                        s.push(' ');
                    }
                    let _ = write!(s, "{b:02x}");
                    s
                });
            let ascii: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() { char::from(b) } else { '.' })
                .collect();
            format!("{:04x}  {hex:<47}  {ascii}", i * 16)
        })
        .collect()
}

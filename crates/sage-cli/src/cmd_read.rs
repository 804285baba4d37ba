/// Implementation of `sage read`.
///
/// Runs an ordered list of primitive reads against a file and prints each
/// decoded value next to the offset it was read from. This is the same
/// sequencing a format decoder does in code, exposed for poking at files
/// whose layout is still being worked out.
///
/// # Example output
///
/// ```text
/// 0x0000  u32        4 bytes  541348640 (0x20445343)
/// 0x0004  u24        3 bytes  197121 (0x030201)
/// 0x0007  cstr       6 bytes  "hello"
/// 0x000D  bitgrid:3x2  2 bytes
///           #.#
///           .#.
/// ```
use std::fmt;
use std::fs;
use std::str::FromStr;

use anyhow::{Context, Result};
use sage_wire::{ByteCursor, CharEncoding, Grid, ReaderConfig, WireError};
use serde::Serialize;

use crate::{Encoding, ReadArgs};

/// One primitive read requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadOp {
    U8,
    I8,
    Bool,
    U16,
    I16,
    U16Be,
    U24,
    U32,
    I32,
    U32Be,
    U64,
    F32,
    CStr,
    Ascii,
    Wide,
    Fixed(usize),
    U16Grid { width: u32, height: u32 },
    BitGrid { width: u32, height: u32 },
    Skip(usize),
}

impl FromStr for ReadOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        let op = match (name, arg) {
            ("u8", None) => Self::U8,
            ("i8", None) => Self::I8,
            ("bool", None) => Self::Bool,
            ("u16", None) => Self::U16,
            ("i16", None) => Self::I16,
            ("u16be", None) => Self::U16Be,
            ("u24", None) => Self::U24,
            ("u32", None) => Self::U32,
            ("i32", None) => Self::I32,
            ("u32be", None) => Self::U32Be,
            ("u64", None) => Self::U64,
            ("f32", None) => Self::F32,
            ("cstr", None) => Self::CStr,
            ("ascii", None) => Self::Ascii,
            ("wide", None) => Self::Wide,
            ("fixed", Some(n)) => Self::Fixed(parse_count(s, n)?),
            ("skip", Some(n)) => Self::Skip(parse_count(s, n)?),
            ("u16grid", Some(dims)) => {
                let (width, height) = parse_dims(s, dims)?;
                Self::U16Grid { width, height }
            }
            ("bitgrid", Some(dims)) => {
                let (width, height) = parse_dims(s, dims)?;
                Self::BitGrid { width, height }
            }
            _ => return Err(format!("unknown read operation {s:?}")),
        };
        Ok(op)
    }
}

impl fmt::Display for ReadOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8 => f.write_str("u8"),
            Self::I8 => f.write_str("i8"),
            Self::Bool => f.write_str("bool"),
            Self::U16 => f.write_str("u16"),
            Self::I16 => f.write_str("i16"),
            Self::U16Be => f.write_str("u16be"),
            Self::U24 => f.write_str("u24"),
            Self::U32 => f.write_str("u32"),
            Self::I32 => f.write_str("i32"),
            Self::U32Be => f.write_str("u32be"),
            Self::U64 => f.write_str("u64"),
            Self::F32 => f.write_str("f32"),
            Self::CStr => f.write_str("cstr"),
            Self::Ascii => f.write_str("ascii"),
            Self::Wide => f.write_str("wide"),
            Self::Fixed(n) => write!(f, "fixed:{n}"),
            Self::Skip(n) => write!(f, "skip:{n}"),
            Self::U16Grid { width, height } => write!(f, "u16grid:{width}x{height}"),
            Self::BitGrid { width, height } => write!(f, "bitgrid:{width}x{height}"),
        }
    }
}

fn parse_count(op: &str, n: &str) -> Result<usize, String> {
    n.parse()
        .map_err(|e| format!("invalid count in {op:?}: {e}"))
}

fn parse_dims(op: &str, dims: &str) -> Result<(u32, u32), String> {
    let (w, h) = dims
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT in {op:?}"))?;
    let parse = |v: &str| {
        v.parse::<u32>()
            .map_err(|e| format!("invalid dimension in {op:?}: {e}"))
    };
    Ok((parse(w)?, parse(h)?))
}

/// A decoded value, shaped for both the table and the JSON output.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReadValue {
    Unsigned(u64),
    Signed(i64),
    Float(f32),
    Bool(bool),
    Text(String),
    U16Rows(Vec<Vec<u16>>),
    BitRows(Vec<Vec<bool>>),
    Skipped,
}

/// A value together with where it came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReadRecord {
    pub op: String,
    pub offset: usize,
    pub len: usize,
    pub value: ReadValue,
}

/// Apply one operation at the cursor.
///
/// # Errors
///
/// Whatever the underlying cursor read returns.
pub fn apply(cursor: &mut ByteCursor<'_>, op: ReadOp) -> Result<ReadValue, WireError> {
    let value = match op {
        ReadOp::U8 => ReadValue::Unsigned(cursor.read_u8()?.into()),
        ReadOp::I8 => ReadValue::Signed(cursor.read_i8()?.into()),
        ReadOp::Bool => ReadValue::Bool(cursor.read_bool()?),
        ReadOp::U16 => ReadValue::Unsigned(cursor.read_u16()?.into()),
        ReadOp::I16 => ReadValue::Signed(cursor.read_i16()?.into()),
        ReadOp::U16Be => ReadValue::Unsigned(cursor.read_u16_be()?.into()),
        ReadOp::U24 => ReadValue::Unsigned(cursor.read_u24()?.into()),
        ReadOp::U32 => ReadValue::Unsigned(cursor.read_u32()?.into()),
        ReadOp::I32 => ReadValue::Signed(cursor.read_i32()?.into()),
        ReadOp::U32Be => ReadValue::Unsigned(cursor.read_u32_be()?.into()),
        ReadOp::U64 => ReadValue::Unsigned(cursor.read_u64()?),
        ReadOp::F32 => ReadValue::Float(cursor.read_f32()?),
        ReadOp::CStr => ReadValue::Text(cursor.read_null_terminated_string()?),
        ReadOp::Ascii => ReadValue::Text(cursor.read_u16_prefixed_ascii()?),
        ReadOp::Wide => ReadValue::Text(cursor.read_u16_prefixed_unicode()?),
        ReadOp::Fixed(n) => ReadValue::Text(cursor.read_fixed_length_string(n)?),
        ReadOp::U16Grid { width, height } => {
            ReadValue::U16Rows(rows(&cursor.read_u16_grid(width, height)?))
        }
        ReadOp::BitGrid { width, height } => {
            ReadValue::BitRows(rows(&cursor.read_bit_grid(width, height)?))
        }
        ReadOp::Skip(n) => {
            cursor.skip(n)?;
            ReadValue::Skipped
        }
    };
    Ok(value)
}

fn rows<T: Copy>(grid: &Grid<T>) -> Vec<Vec<T>> {
    grid.rows().map(<[T]>::to_vec).collect()
}

/// Run every operation in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the failing operation's error, with its index and name as context.
pub fn run_ops(cursor: &mut ByteCursor<'_>, ops: &[ReadOp]) -> Result<Vec<ReadRecord>> {
    let mut out = Vec::with_capacity(ops.len());
    for (idx, &op) in ops.iter().enumerate() {
        let offset = cursor.position();
        let value =
            apply(cursor, op).with_context(|| format!("operation #{idx} ({op}) failed"))?;
        tracing::debug!(%op, offset, len = cursor.position() - offset, "read");
        out.push(ReadRecord {
            op: op.to_string(),
            offset,
            len: cursor.position() - offset,
            value,
        });
    }
    Ok(out)
}

/// Run the `sage read` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the start offset is past the
/// end of the file, or any operation fails to decode.
pub fn run(args: &ReadArgs) -> Result<()> {
    let bytes =
        fs::read(&args.file).with_context(|| format!("cannot read {}", args.file.display()))?;

    let char_encoding = match args.encoding {
        Encoding::SingleByte => CharEncoding::SingleByte,
        Encoding::Utf8 => CharEncoding::Utf8,
    };
    let config = ReaderConfig::default().with_char_encoding(char_encoding);
    let mut cursor = ByteCursor::with_config(&bytes, config);
    cursor
        .set_position(args.at)
        .with_context(|| format!("cannot start reading {}", args.file.display()))?;

    let records = run_ops(&mut cursor, &args.ops)
        .with_context(|| format!("failed to decode {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            print_record(record);
        }
    }
    Ok(())
}

fn print_record(record: &ReadRecord) {
    let head = format!(
        "0x{:04X}  {:<10} {} bytes",
        record.offset, record.op, record.len
    );
    match &record.value {
        ReadValue::Unsigned(v) => println!("{head}  {v} (0x{v:X})"),
        ReadValue::Signed(v) => println!("{head}  {v}"),
        ReadValue::Float(v) => println!("{head}  {v}"),
        ReadValue::Bool(v) => println!("{head}  {v}"),
        ReadValue::Text(s) => println!("{head}  {s:?}"),
        ReadValue::Skipped => println!("{head}"),
        ReadValue::U16Rows(rows) => {
            println!("{head}");
            for row in rows {
                let cells: Vec<String> = row.iter().map(u16::to_string).collect();
                println!("          {}", cells.join(" "));
            }
        }
        ReadValue::BitRows(rows) => {
            println!("{head}");
            for row in rows {
                let cells: String = row.iter().map(|&b| if b { '#' } else { '.' }).collect();
                println!("          {cells}");
            }
        }
    }
}

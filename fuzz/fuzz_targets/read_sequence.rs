#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sage_types::{BitmapCompression, CsfLanguage, EnumReadExt};
use sage_wire::ByteCursor;

#[derive(Arbitrary, Debug)]
enum Op {
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
    Skip(u8),
    Language,
    Compression,
}

#[derive(Arbitrary, Debug)]
struct Input {
    start: u16,
    ops: Vec<Op>,
    data: Vec<u8>,
}

// Fuzz target: arbitrary sequences of fixed-width reads.
//
// Checks that:
// - a successful read advances by exactly its width
// - a failed read leaves the position where it was
// - the position never passes the end of the buffer
fuzz_target!(|input: Input| {
    let Ok(mut cursor) = ByteCursor::at(&input.data, usize::from(input.start)) else {
        return;
    };

    for op in &input.ops {
        let before = cursor.position();
        let (ok, width) = match op {
            Op::U8 => (cursor.read_u8().is_ok(), 1),
            Op::I8 => (cursor.read_i8().is_ok(), 1),
            Op::Bool => (cursor.read_bool().is_ok(), 1),
            Op::U16 => (cursor.read_u16().is_ok(), 2),
            Op::I16 => (cursor.read_i16().is_ok(), 2),
            Op::U16Be => (cursor.read_u16_be().is_ok(), 2),
            Op::U24 => (cursor.read_u24().is_ok(), 3),
            Op::U32 => (cursor.read_u32().is_ok(), 4),
            Op::I32 => (cursor.read_i32().is_ok(), 4),
            Op::U32Be => (cursor.read_u32_be().is_ok(), 4),
            Op::U64 => (cursor.read_u64().is_ok(), 8),
            Op::F32 => (cursor.read_f32().is_ok(), 4),
            Op::Skip(n) => (cursor.skip(usize::from(*n)).is_ok(), usize::from(*n)),
            Op::Language => (cursor.read_u32_enum::<CsfLanguage>().is_ok(), 4),
            Op::Compression => (cursor.read_u32_enum::<BitmapCompression>().is_ok(), 4),
        };

        let expected = if ok { before + width } else { before };
        assert_eq!(cursor.position(), expected, "{op:?} at {before}");
        assert!(cursor.position() <= cursor.len());
    }
});

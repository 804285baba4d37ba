#![no_main]

use libfuzzer_sys::fuzz_target;
use sage_wire::{ByteCursor, CharEncoding, ReaderConfig};

// Fuzz target: every string layout under both character encodings.
//
// Input format:
//   byte 0: fixed-length character count
//   bytes 1..: string data
//
// Catches bugs in:
// - terminator search running off the buffer
// - odd UTF-16 byte counts
// - UTF-8 lead bytes claiming more bytes than remain
fuzz_target!(|data: &[u8]| {
    let Some((&count, body)) = data.split_first() else {
        return;
    };

    for encoding in [CharEncoding::SingleByte, CharEncoding::Utf8] {
        let config = ReaderConfig::default().with_char_encoding(encoding);

        let mut c = ByteCursor::with_config(body, config);
        match c.read_null_terminated_string() {
            Ok(_) => assert!(c.position() >= 1),
            Err(_) => assert_eq!(c.position(), 0),
        }

        let mut c = ByteCursor::with_config(body, config);
        if c.read_fixed_length_string(usize::from(count)).is_err() {
            assert_eq!(c.position(), 0);
        }

        let mut c = ByteCursor::with_config(body, config);
        match c.read_u16_prefixed_ascii() {
            Ok(s) => assert_eq!(c.position(), 2 + s.len()),
            Err(_) => assert_eq!(c.position(), 0),
        }

        let mut c = ByteCursor::with_config(body, config);
        if c.read_u16_prefixed_unicode().is_err() {
            assert_eq!(c.position(), 0);
        }
    }
});

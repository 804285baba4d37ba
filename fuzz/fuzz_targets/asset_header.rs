#![no_main]

use libfuzzer_sys::fuzz_target;
use sage_types::{AssetHeader, FileKind};

// Fuzz target: header decoding for every file kind.
//
// Catches bugs in:
// - records reading past their declared size
// - magic checks on short input
// - enum fields with undefined values
fuzz_target!(|data: &[u8]| {
    for kind in [
        FileKind::Wave,
        FileKind::Mp3,
        FileKind::Bink,
        FileKind::AnimatedCursor,
        FileKind::Bitmap,
        FileKind::StringTable,
        FileKind::WindowLayout,
        FileKind::Text,
        FileKind::Unsupported,
    ] {
        let _ = AssetHeader::decode(kind, data);
    }
});

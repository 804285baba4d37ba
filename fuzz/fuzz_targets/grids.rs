#![no_main]

use libfuzzer_sys::fuzz_target;
use sage_wire::ByteCursor;

// Fuzz target: u16 and bit grid reads with dimensions from the input.
//
// Input format:
//   bytes 0..4: width (u32 LE)
//   bytes 4..8: height (u32 LE)
//   bytes 8..: grid data
//
// Huge dimensions must fail without allocating for them.
fuzz_target!(|data: &[u8]| {
    let mut c = ByteCursor::new(data);
    let (Ok(width), Ok(height)) = (c.read_u32(), c.read_u32()) else {
        return;
    };

    let mut numeric = c.clone();
    match numeric.read_u16_grid(width, height) {
        Ok(grid) => {
            assert_eq!(grid.cells().len(), grid.width() * grid.height());
            assert_eq!(numeric.position(), 8 + 2 * grid.cells().len());
        }
        Err(_) => assert_eq!(numeric.position(), 8),
    }

    let mut bits = c.clone();
    match bits.read_bit_grid(width, height) {
        Ok(grid) => {
            assert_eq!(grid.cells().len(), grid.width() * grid.height());
            assert_eq!(bits.position(), 8 + grid.height() * grid.width().div_ceil(8));
        }
        Err(_) => assert_eq!(bits.position(), 8),
    }
});

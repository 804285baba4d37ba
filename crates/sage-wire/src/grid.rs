use std::ops::Index;

use crate::cursor::ByteCursor;
use crate::error::WireError;

/// A `width × height` grid stored row-major.
///
/// Cell `(x, y)` lives at index `y * width + x`, which is also the order
/// its value appears in the byte stream: rows are the outer loop and
/// columns the inner loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid from row-major cells.
    ///
    /// Returns `None` if `cells.len() != width * height`.
    pub fn from_row_major(width: usize, height: usize, cells: Vec<T>) -> Option<Self> {
        (width.checked_mul(height)? == cells.len()).then_some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at column `x`, row `y`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Iterate over rows, top to bottom. A zero-width grid still yields
    /// `height` empty rows.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        (0..self.height).map(move |y| &self.cells[y * self.width..(y + 1) * self.width])
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    fn index(&self, (x, y): (usize, usize)) -> &T {
        match self.get(x, y) {
            Some(cell) => cell,
            None => panic!(
                "grid index ({x}, {y}) out of bounds for {}x{} grid",
                self.width, self.height
            ),
        }
    }
}

// ── Grid reads ────────────────────────────────────────────────────────
//
// Both reads size-check the whole grid before allocating, so a corrupt
// width or height fails fast instead of allocating for data that isn't
// there.

impl ByteCursor<'_> {
    /// Read `width * height` little-endian `u16` values, row by row.
    ///
    /// # Errors
    ///
    /// - [`WireError::GridTooLarge`] if the byte count overflows `usize`.
    /// - [`WireError::UnexpectedEof`] if fewer than `2 * width * height`
    ///   bytes remain.
    pub fn read_u16_grid(&mut self, width: u32, height: u32) -> Result<Grid<u16>, WireError> {
        const OP: &str = "u16 grid";

        let (w, h, cells) = grid_dims(OP, width, height, self.position())?;
        let needed = cells
            .checked_mul(2)
            .ok_or_else(|| too_large(OP, width, height, self.position()))?;

        let bytes = self.take(OP, needed)?;
        let cells = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Ok(Grid {
            width: w,
            height: h,
            cells,
        })
    }

    /// Read a bit-packed boolean grid.
    ///
    /// Each row occupies `ceil(width / 8)` bytes of its own; packing never
    /// carries over from one row to the next. Within a row, column `x`
    /// is bit `x % 8` (least significant first) of byte `x / 8`.
    ///
    /// ```text
    ///   width = 9, one row:  [0b0000_0001, 0b0000_0001]
    ///                          └ x=0 ┘       └ x=8 ┘
    ///   → x=0 true, x=1..=7 false, x=8 true
    /// ```
    ///
    /// # Errors
    ///
    /// - [`WireError::GridTooLarge`] if the cell count overflows `usize`.
    /// - [`WireError::UnexpectedEof`] if fewer than
    ///   `height * ceil(width / 8)` bytes remain.
    pub fn read_bit_grid(&mut self, width: u32, height: u32) -> Result<Grid<bool>, WireError> {
        const OP: &str = "bit grid";

        let (w, h, cells) = grid_dims(OP, width, height, self.position())?;
        let row_bytes = w.div_ceil(8);
        let needed = row_bytes
            .checked_mul(h)
            .ok_or_else(|| too_large(OP, width, height, self.position()))?;

        let bytes = self.take(OP, needed)?;
        if cells == 0 {
            return Ok(Grid {
                width: w,
                height: h,
                cells: Vec::new(),
            });
        }

        let mut out = Vec::with_capacity(cells);
        for row in bytes.chunks_exact(row_bytes) {
            out.extend((0..w).map(|x| row[x / 8] & (1 << (x % 8)) != 0));
        }

        Ok(Grid {
            width: w,
            height: h,
            cells: out,
        })
    }
}

fn grid_dims(
    op: &'static str,
    width: u32,
    height: u32,
    offset: usize,
) -> Result<(usize, usize, usize), WireError> {
    let dims = usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| Some((w, h, w.checked_mul(h)?)));
    dims.ok_or_else(|| too_large(op, width, height, offset))
}

fn too_large(op: &'static str, width: u32, height: u32, offset: usize) -> WireError {
    tracing::debug!(op, width, height, offset, "grid dimensions overflow");
    WireError::GridTooLarge {
        op,
        width,
        height,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_grid_is_row_major() {
        let buf = [1, 0, 2, 0, 3, 0, 4, 0];
        let mut c = ByteCursor::new(&buf);
        let grid = c.read_u16_grid(2, 2).unwrap();

        assert_eq!(grid[(0, 0)], 1);
        assert_eq!(grid[(1, 0)], 2);
        assert_eq!(grid[(0, 1)], 3);
        assert_eq!(grid[(1, 1)], 4);
        assert_eq!(c.position(), 8);
    }

    #[test]
    fn u16_grid_non_square() {
        // 3 wide, 1 tall
        let buf = [0x10, 0x00, 0x20, 0x00, 0x30, 0x00];
        let mut c = ByteCursor::new(&buf);
        let grid = c.read_u16_grid(3, 1).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 1);
        assert_eq!(grid.cells(), &[0x10, 0x20, 0x30]);
        assert_eq!(grid.get(0, 1), None);
    }

    #[test]
    fn u16_grid_truncated() {
        let buf = [1, 0, 2, 0, 3, 0, 4];
        let mut c = ByteCursor::new(&buf);
        let err = c.read_u16_grid(2, 2).unwrap_err();
        assert!(matches!(
            err,
            WireError::UnexpectedEof {
                op: "u16 grid",
                needed: 8,
                remaining: 7,
                ..
            }
        ));
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn u16_grid_overflow() {
        let mut c = ByteCursor::new(&[]);
        assert!(matches!(
            c.read_u16_grid(u32::MAX, u32::MAX),
            Err(WireError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn empty_grids_consume_nothing() {
        let mut c = ByteCursor::new(&[0xFF]);
        assert!(c.read_u16_grid(0, 5).unwrap().cells().is_empty());
        assert!(c.read_bit_grid(5, 0).unwrap().cells().is_empty());
        assert!(c.read_bit_grid(0, 5).unwrap().cells().is_empty());
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn zero_width_grid_keeps_its_rows() {
        let mut c = ByteCursor::new(&[]);
        let grid = c.read_u16_grid(0, 3).unwrap();
        let rows: Vec<&[u16]> = grid.rows().collect();
        let empty: &[u16] = &[];
        assert_eq!(rows, vec![empty; 3]);
        assert_eq!(c.read_bit_grid(4, 0).unwrap().rows().count(), 0);
    }

    #[test]
    fn bit_grid_lsb_first_across_bytes() {
        let buf = [0b0000_0001, 0b0000_0001];
        let mut c = ByteCursor::new(&buf);
        let grid = c.read_bit_grid(9, 1).unwrap();

        assert!(grid[(0, 0)]);
        for x in 1..8 {
            assert!(!grid[(x, 0)], "column {x} should be clear");
        }
        assert!(grid[(8, 0)]);
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn bit_grid_rows_do_not_share_bytes() {
        // 3 columns use 3 bits per row, but each row still gets its own byte.
        let buf = [0b0000_0101, 0b0000_0010];
        let mut c = ByteCursor::new(&buf);
        let grid = c.read_bit_grid(3, 2).unwrap();

        let rows: Vec<&[bool]> = grid.rows().collect();
        assert_eq!(rows, vec![&[true, false, true][..], &[false, true, false][..]]);
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn bit_grid_ignores_padding_bits() {
        let mut c = ByteCursor::new(&[0xFF]);
        let grid = c.read_bit_grid(2, 1).unwrap();
        assert_eq!(grid.cells(), &[true, true]);
    }

    #[test]
    fn bit_grid_truncated() {
        // 9 columns × 2 rows needs 4 bytes.
        let mut c = ByteCursor::new(&[0, 0, 0]);
        let err = c.read_bit_grid(9, 2).unwrap_err();
        assert!(matches!(
            err,
            WireError::UnexpectedEof {
                needed: 4,
                remaining: 3,
                ..
            }
        ));
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn from_row_major_checks_length() {
        assert!(Grid::from_row_major(2, 2, vec![0u16; 4]).is_some());
        assert!(Grid::from_row_major(2, 2, vec![0u16; 3]).is_none());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_out_of_bounds_panics() {
        let grid = Grid::from_row_major(1, 1, vec![7u16]).unwrap();
        let _ = grid[(1, 0)];
    }
}

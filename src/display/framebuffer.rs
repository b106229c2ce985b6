use crate::config::{FRAME_HEIGHT, FRAME_ROW_BYTES, FRAME_WIDTH};

/// A 1-bit-per-pixel bitmap of the fixed display geometry.
///
/// Pixels are packed MSB first: pixel `(x, y)` is bit `7 - (x % 8)` of byte
/// `y * FRAME_ROW_BYTES + x / 8`. Rows are stored top to bottom, which is also
/// the scan order handed to the display.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    rows: [[u8; FRAME_ROW_BYTES]; FRAME_HEIGHT],
}

impl FrameBuffer {
    pub const WIDTH: usize = FRAME_WIDTH;
    pub const HEIGHT: usize = FRAME_HEIGHT;

    /// Creates an all-dark frame.
    pub fn new() -> Self {
        FrameBuffer {
            rows: [[0; FRAME_ROW_BYTES]; FRAME_HEIGHT],
        }
    }

    /// Turns every pixel off.
    pub fn clear(&mut self) {
        for row in self.rows.iter_mut() {
            row.fill(0);
        }
    }

    /// Turns pixel `(x, y)` on. Out-of-range coordinates are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        if x < FRAME_WIDTH && y < FRAME_HEIGHT {
            self.rows[y][x / 8] |= 1 << (7 - (x % 8));
        }
    }

    /// Returns whether pixel `(x, y)` is on.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < FRAME_WIDTH && y < FRAME_HEIGHT && self.rows[y][x / 8] & (1 << (7 - (x % 8))) != 0
    }

    /// Turns on pixels `x_start..x_end` of row `y`.
    pub fn fill_span(&mut self, y: usize, x_start: usize, x_end: usize) {
        for x in x_start..x_end.min(FRAME_WIDTH) {
            self.set_pixel(x, y);
        }
    }

    /// Number of lit pixels in column `x`, counted upward from the bottom row
    /// until the first dark pixel.
    pub fn column_height(&self, x: usize) -> usize {
        (0..FRAME_HEIGHT)
            .rev()
            .take_while(|&y| self.pixel(x, y))
            .count()
    }

    /// The packed storage in scan order (`FRAME_HEIGHT * FRAME_ROW_BYTES` bytes).
    pub fn as_bytes(&self) -> &[u8] {
        self.rows.as_flattened()
    }

    pub fn is_blank(&self) -> bool {
        self.as_bytes().iter().all(|&b| b == 0)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let lit = self
            .as_bytes()
            .iter()
            .map(|b| b.count_ones() as usize)
            .sum::<usize>();
        f.debug_struct("FrameBuffer")
            .field("width", &FRAME_WIDTH)
            .field("height", &FRAME_HEIGHT)
            .field("lit_pixels", &lit)
            .finish()
    }
}

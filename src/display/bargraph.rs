use super::framebuffer::FrameBuffer;

/// Draws a power spectrum as vertical bars, one per bin.
///
/// Bins are spread across the display at `width / bins` pixels each; the
/// remaining pixels on the right stay dark. Power is mapped linearly from
/// `[min_dbm, max_dbm]` onto `[0, height]` and clamped.
#[derive(Debug, Clone, Copy)]
pub struct BargraphRasterizer {
    min_dbm: f32,
    max_dbm: f32,
}

impl BargraphRasterizer {
    /// Creates a new BargraphRasterizer.
    ///
    /// # Arguments
    /// * `min_dbm` - Power drawn as an empty bar.
    /// * `max_dbm` - Power drawn as a full-height bar.
    pub fn new(min_dbm: f32, max_dbm: f32) -> Self {
        BargraphRasterizer { min_dbm, max_dbm }
    }

    /// Bar height in pixels for one power value, always within `0..=HEIGHT`.
    #[inline]
    pub fn bar_height(&self, dbm: f32) -> usize {
        let norm = (dbm - self.min_dbm) / (self.max_dbm - self.min_dbm);
        let norm = if norm.is_nan() { 0.0 } else { norm.clamp(0.0, 1.0) };
        (norm * FrameBuffer::HEIGHT as f32) as usize
    }

    /// Width in pixels of each bar for `bins` bins.
    pub fn column_width(bins: usize) -> usize {
        if bins == 0 {
            0
        } else {
            FrameBuffer::WIDTH / bins
        }
    }

    /// Clears `frame` and draws one bar per entry of `power_dbm`.
    pub fn rasterize(&self, power_dbm: &[f32], frame: &mut FrameBuffer) {
        frame.clear();

        let col_w = Self::column_width(power_dbm.len());
        if col_w == 0 {
            return;
        }

        for (i, &dbm) in power_dbm.iter().enumerate() {
            let h = self.bar_height(dbm);
            let x_start = i * col_w;
            for y in (FrameBuffer::HEIGHT - h)..FrameBuffer::HEIGHT {
                frame.fill_span(y, x_start, x_start + col_w);
            }
        }
    }
}

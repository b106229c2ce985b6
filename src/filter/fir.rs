use crate::FrameProcessor;
use core::f32::consts::PI;

/// Designs a windowed-sinc low-pass kernel.
///
/// The ideal sinc response is centered at `(TAPS - 1) / 2`, shaped by a
/// Hamming window, and divided by its sum so the DC gain is exactly 1.
///
/// # Arguments
/// * `cutoff_ratio` - Cutoff frequency divided by the sample rate, in (0, 0.5).
pub fn design_lowpass<const TAPS: usize>(cutoff_ratio: f32) -> [f32; TAPS] {
    const { assert!(TAPS > 1) };
    debug_assert!(
        cutoff_ratio > 0.0 && cutoff_ratio < 0.5,
        "cutoff ratio {} outside (0, 0.5)",
        cutoff_ratio
    );

    let order = (TAPS - 1) as f32;
    let mut coeffs = [0.0; TAPS];
    let mut sum = 0.0;

    for (n, c) in coeffs.iter_mut().enumerate() {
        let m = n as f32 - order / 2.0;
        // sinc has a removable singularity at m = 0; use its limit.
        let h = if libm::fabsf(m) < 1e-6 {
            2.0 * cutoff_ratio
        } else {
            libm::sinf(2.0 * PI * cutoff_ratio * m) / (PI * m)
        };
        let w = 0.54 - 0.46 * libm::cosf(2.0 * PI * n as f32 / order);
        *c = h * w;
        sum += *c;
    }

    for c in coeffs.iter_mut() {
        *c /= sum;
    }
    coeffs
}

/// A streaming FIR low-pass filter.
///
/// Keeps the last `TAPS` inputs in a circular history so each new sample costs
/// one write and one `TAPS`-long dot product, with no data movement. The
/// history is never cleared between blocks: the filter sees one continuous
/// stream.
pub struct FirFilter<const TAPS: usize> {
    coeffs: [f32; TAPS],
    history: [f32; TAPS],
    cursor: usize,
}

impl<const TAPS: usize> FirFilter<TAPS> {
    /// Creates a filter from precomputed coefficients.
    pub fn new(coeffs: [f32; TAPS]) -> Self {
        FirFilter {
            coeffs,
            history: [0.0; TAPS],
            cursor: 0,
        }
    }

    /// Creates a Hamming-windowed sinc low-pass filter.
    ///
    /// # Arguments
    /// * `cutoff_ratio` - Cutoff frequency divided by the sample rate, in (0, 0.5).
    ///   `AnalyzerConfig::cutoff_ratio` of a validated config is always in range.
    pub fn lowpass(cutoff_ratio: f32) -> Self {
        Self::new(design_lowpass(cutoff_ratio))
    }

    /// Filters one sample.
    ///
    /// The newest input is multiplied by `coeffs[0]`, the oldest by
    /// `coeffs[TAPS - 1]`.
    #[inline]
    pub fn apply(&mut self, sample: f32) -> f32 {
        self.history[self.cursor] = sample;

        let mut acc = 0.0;
        let mut idx = self.cursor;
        for &c in self.coeffs.iter() {
            acc += c * self.history[idx];
            idx = if idx == 0 { TAPS - 1 } else { idx - 1 };
        }

        self.cursor += 1;
        if self.cursor == TAPS {
            self.cursor = 0;
        }
        acc
    }

    /// Returns the filter coefficients.
    pub fn coefficients(&self) -> &[f32; TAPS] {
        &self.coeffs
    }
}

impl<const TAPS: usize> FrameProcessor for FirFilter<TAPS> {
    fn process(&mut self, buffer: &mut [f32], _sample_index: u64) {
        for sample in buffer.iter_mut() {
            *sample = self.apply(*sample);
        }
    }

    fn reset(&mut self) {
        self.history = [0.0; TAPS];
        self.cursor = 0;
    }

    fn latency_samples(&self) -> u32 {
        ((TAPS - 1) / 2) as u32
    }

    #[cfg(feature = "debug_visualize")]
    fn name(&self) -> &str {
        "FirFilter (Hamming Sinc LowPass)"
    }
}

use crate::FrameProcessor;
use core::f32::consts::PI;
use wide::f32x4;

/// A precomputed Hann window of `N` coefficients.
///
/// Multiplies a time-ordered block of exactly `N` samples, position by position.
pub struct WindowTable<const N: usize> {
    coeffs: [f32; N],
    sum: f32,
}

impl<const N: usize> WindowTable<N> {
    /// Builds the symmetric Hann window `0.5 * (1 - cos(2*pi*i / (N - 1)))`.
    pub fn hann() -> Self {
        const { assert!(N > 1) };

        let mut coeffs = [0.0; N];
        // Mirror the first half so both ends are exactly zero and W[i] == W[N-1-i].
        for i in 0..N.div_ceil(2) {
            let arg = 2.0 * PI * i as f32 / (N - 1) as f32;
            let w = 0.5 * (1.0 - libm::cosf(arg));
            coeffs[i] = w;
            coeffs[N - 1 - i] = w;
        }
        let sum = coeffs.iter().sum();

        WindowTable { coeffs, sum }
    }

    /// Returns the window coefficients.
    pub fn coefficients(&self) -> &[f32; N] {
        &self.coeffs
    }

    /// Sum of all coefficients (N times the coherent gain).
    pub fn sum(&self) -> f32 {
        self.sum
    }

    /// Multiplies `buffer` by the window in place.
    pub fn apply(&self, buffer: &mut [f32; N]) {
        let (chunks, remainder) = buffer.as_chunks_mut::<4>();
        let (w_chunks, w_rem) = self.coeffs.as_chunks::<4>();

        for (chunk, w) in chunks.iter_mut().zip(w_chunks.iter()) {
            let res = f32x4::from(*chunk) * f32x4::from(*w);
            *chunk = res.to_array();
        }

        for (sample, w) in remainder.iter_mut().zip(w_rem.iter()) {
            *sample *= *w;
        }
    }
}

impl<const N: usize> FrameProcessor for WindowTable<N> {
    /// Windows one acquisition block. Samples past `N` are left untouched.
    fn process(&mut self, buffer: &mut [f32], _sample_index: u64) {
        debug_assert_eq!(buffer.len(), N);
        if let Ok(block) = <&mut [f32; N]>::try_from(&mut *buffer) {
            self.apply(block);
            return;
        }
        for (sample, w) in buffer.iter_mut().zip(self.coeffs.iter()) {
            *sample *= *w;
        }
    }

    #[cfg(feature = "debug_visualize")]
    fn name(&self) -> &str {
        "WindowTable (Hann)"
    }
}

use num_complex::Complex32;

/// Helper trait to abstract the forward FFT for the supported sizes.
pub trait FftHelper {
    fn do_fft(&mut self);
}

impl FftHelper for [Complex32; 128] {
    fn do_fft(&mut self) {
        let _ = microfft::complex::cfft_128(self);
    }
}

impl FftHelper for [Complex32; 256] {
    fn do_fft(&mut self) {
        let _ = microfft::complex::cfft_256(self);
    }
}

impl FftHelper for [Complex32; 512] {
    fn do_fft(&mut self) {
        let _ = microfft::complex::cfft_512(self);
    }
}

impl FftHelper for [Complex32; 1024] {
    fn do_fft(&mut self) {
        let _ = microfft::complex::cfft_1024(self);
    }
}

/// Forward DFT of a real, windowed block of `N` samples.
///
/// Owns the complex scratch buffer, which is fully overwritten on every call.
pub struct SpectrumTransform<const N: usize> {
    bins: [Complex32; N],
}

impl<const N: usize> SpectrumTransform<N>
where
    [Complex32; N]: FftHelper,
{
    pub fn new() -> Self {
        SpectrumTransform {
            bins: [Complex32::new(0.0, 0.0); N],
        }
    }

    /// Transforms `input` and returns the full complex spectrum.
    pub fn transform(&mut self, input: &[f32; N]) -> &[Complex32; N] {
        for (bin, &x) in self.bins.iter_mut().zip(input.iter()) {
            *bin = Complex32::new(x, 0.0);
        }
        self.bins.do_fft();
        &self.bins
    }

    /// Writes `sqrt(re^2 + im^2)` of the first `out.len()` bins (at most N/2).
    pub fn magnitudes(&self, out: &mut [f32]) {
        debug_assert!(out.len() <= N / 2);
        for (m, c) in out.iter_mut().zip(self.bins.iter()) {
            *m = libm::sqrtf(c.re * c.re + c.im * c.im);
        }
    }

    /// Writes the single-sided amplitude spectrum of the first `out.len()` bins.
    ///
    /// Bin 0 is divided by the window sum, every other bin by half of it, so a
    /// sinusoid of amplitude `a` (in normalized input units) reads `a` at its
    /// bin. Inputs in [0, 1] therefore give magnitudes nominally in [0, 1].
    pub fn amplitudes(&self, window_sum: f32, out: &mut [f32]) {
        self.magnitudes(out);
        let dc_scale = 1.0 / window_sum;
        let ac_scale = 2.0 / window_sum;
        for (k, m) in out.iter_mut().enumerate() {
            *m *= if k == 0 { dc_scale } else { ac_scale };
        }
    }
}

impl<const N: usize> Default for SpectrumTransform<N>
where
    [Complex32; N]: FftHelper,
{
    fn default() -> Self {
        Self::new()
    }
}

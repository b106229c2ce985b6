use core::f32::consts::SQRT_2;

/// Smallest power in milliwatts fed to the logarithm.
pub const POWER_FLOOR_MW: f32 = 1e-12;

/// Converts spectral magnitudes to a dBm-like power scale.
///
/// A normalized magnitude `m` is read as a peak voltage `m * Vref` across the
/// load impedance. The result is not clamped; the display range is applied
/// by the rasterizer.
#[derive(Debug, Clone, Copy)]
pub struct PowerConverter {
    reference_voltage: f32,
    load_impedance_ohms: f32,
}

impl PowerConverter {
    /// Creates a new PowerConverter.
    ///
    /// # Arguments
    /// * `reference_voltage` - Voltage of a full-scale (1.0) magnitude.
    /// * `load_impedance_ohms` - Impedance the power is referenced to.
    pub fn new(reference_voltage: f32, load_impedance_ohms: f32) -> Self {
        PowerConverter {
            reference_voltage,
            load_impedance_ohms,
        }
    }

    /// Converts one magnitude to dBm.
    #[inline]
    pub fn dbm(&self, magnitude: f32) -> f32 {
        let v_peak = magnitude * self.reference_voltage;
        let v_rms = v_peak / SQRT_2;
        let p_mw = (v_rms * v_rms) / self.load_impedance_ohms * 1000.0;
        10.0 * libm::log10f(libm::fmaxf(p_mw, POWER_FLOOR_MW))
    }

    /// Converts every magnitude into `out`, position by position.
    pub fn convert(&self, magnitudes: &[f32], out: &mut [f32]) {
        debug_assert_eq!(magnitudes.len(), out.len());
        for (p, &m) in out.iter_mut().zip(magnitudes.iter()) {
            *p = self.dbm(m);
        }
    }

    /// The value produced for a zero (or vanishing) magnitude.
    pub fn floor_dbm(&self) -> f32 {
        10.0 * libm::log10f(POWER_FLOOR_MW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter() -> PowerConverter {
        PowerConverter::new(3.3, 50.0)
    }

    #[test]
    fn test_zero_magnitude_hits_floor() {
        let pc = converter();
        let value = pc.dbm(0.0);
        assert!(value.is_finite());
        assert!((value - -120.0).abs() < 1e-3);
        assert!(value >= pc.floor_dbm());
    }

    #[test]
    fn test_full_scale_value() {
        // 3.3 V peak into 50 ohm: 108.9 mW
        let pc = converter();
        assert!((pc.dbm(1.0) - 20.370).abs() < 1e-2);
    }

    #[test]
    fn test_monotonic() {
        let pc = converter();
        let mut last = pc.dbm(0.0);
        for i in 1..=2000 {
            let value = pc.dbm(i as f32 / 1000.0);
            assert!(value >= last, "not monotonic at {}", i);
            last = value;
        }
    }

    #[test]
    fn test_convert_is_not_clamped() {
        let pc = converter();
        let mags = [0.0, 1e-9, 0.5, 4.0];
        let mut out = [0.0; 4];
        pc.convert(&mags, &mut out);

        assert_eq!(out[0], pc.floor_dbm());
        assert_eq!(out[1], pc.floor_dbm());
        assert!(out[3] > 30.0);
        assert!(out.iter().all(|v| v.is_finite()));
    }
}

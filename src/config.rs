use crate::error::ConfigError;
use core::time::Duration;

/// Number of samples per acquisition buffer and FFT size.
pub const SAMPLE_COUNT: usize = 256;

/// Number of usable (Nyquist-limited) frequency bins.
pub const BIN_COUNT: usize = SAMPLE_COUNT / 2;

/// FIR low-pass tap count.
pub const FIR_TAP_COUNT: usize = 64;

/// Display width in pixels.
pub const FRAME_WIDTH: usize = 320;

/// Display height in pixels.
pub const FRAME_HEIGHT: usize = 240;

/// Bytes per packed display row (8 pixels per byte).
pub const FRAME_ROW_BYTES: usize = FRAME_WIDTH / 8;

/// Full-scale code of a 12-bit ADC.
pub const ADC_FULL_SCALE_12BIT: u16 = 4095;

const _: () = assert!(SAMPLE_COUNT.is_power_of_two());
const _: () = assert!(FIR_TAP_COUNT > 1);
const _: () = assert!(FRAME_WIDTH % 8 == 0);
const _: () = assert!(BIN_COUNT <= FRAME_WIDTH);

/// Initialization inputs of the analyzer, fixed once the pipeline is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    /// Acquisition sample rate in Hz (default: 128 kHz)
    pub sample_rate_hz: f32,

    /// FIR low-pass cutoff in Hz (default: 50 kHz)
    pub cutoff_hz: f32,

    /// ADC reference voltage in volts (default: 3.3)
    pub reference_voltage: f32,

    /// Load impedance in ohms used for the dBm scale (default: 50)
    pub load_impedance_ohms: f32,

    /// Power mapped to an empty bar (default: -100 dBm)
    pub min_power_dbm: f32,

    /// Power mapped to a full-height bar (default: 0 dBm)
    pub max_power_dbm: f32,

    /// Raw code that normalizes to 1.0 (default: 4095)
    pub adc_full_scale: u16,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 128_000.0,
            cutoff_hz: 50_000.0,
            reference_voltage: 3.3,
            load_impedance_ohms: 50.0,
            min_power_dbm: -100.0,
            max_power_dbm: 0.0,
            adc_full_scale: ADC_FULL_SCALE_12BIT,
        }
    }
}

impl AnalyzerConfig {
    /// Checks every parameter once, before any coefficient table is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate_hz > 0.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate_hz));
        }
        let nyquist = self.sample_rate_hz * 0.5;
        if !(self.cutoff_hz > 0.0 && self.cutoff_hz < nyquist) {
            return Err(ConfigError::CutoffOutOfRange {
                cutoff_hz: self.cutoff_hz,
                nyquist_hz: nyquist,
            });
        }
        if !(self.reference_voltage > 0.0) {
            return Err(ConfigError::InvalidReferenceVoltage(self.reference_voltage));
        }
        if !(self.load_impedance_ohms > 0.0) {
            return Err(ConfigError::InvalidImpedance(self.load_impedance_ohms));
        }
        if !(self.min_power_dbm < self.max_power_dbm) {
            return Err(ConfigError::InvalidPowerRange {
                min_dbm: self.min_power_dbm,
                max_dbm: self.max_power_dbm,
            });
        }
        if self.adc_full_scale == 0 {
            return Err(ConfigError::ZeroFullScale);
        }
        Ok(())
    }

    /// Cutoff normalized to the sample rate (cycles per sample).
    pub fn cutoff_ratio(&self) -> f32 {
        self.cutoff_hz / self.sample_rate_hz
    }

    /// Time the acquisition side needs to fill one buffer.
    ///
    /// Processing a buffer must finish within this budget or the next fill
    /// of the same slot overruns it.
    pub fn fill_duration(&self) -> Duration {
        let nanos = SAMPLE_COUNT as f64 * 1e9 / self.sample_rate_hz as f64;
        Duration::from_nanos(nanos as u64)
    }

    /// Center frequency of a spectrum bin in Hz.
    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate_hz / SAMPLE_COUNT as f32
    }
}

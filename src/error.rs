use thiserror::Error;

/// Rejected analyzer configuration.
///
/// The processing stages themselves have no failure modes; this is only
/// produced while building a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("sample rate must be greater than zero, got {0} Hz")]
    InvalidSampleRate(f32),
    #[error("cutoff {cutoff_hz} Hz must lie strictly between 0 and Nyquist ({nyquist_hz} Hz)")]
    CutoffOutOfRange { cutoff_hz: f32, nyquist_hz: f32 },
    #[error("reference voltage must be greater than zero, got {0} V")]
    InvalidReferenceVoltage(f32),
    #[error("load impedance must be greater than zero, got {0} ohm")]
    InvalidImpedance(f32),
    #[error("power range is empty: min {min_dbm} dBm, max {max_dbm} dBm")]
    InvalidPowerRange { min_dbm: f32, max_dbm: f32 },
    #[error("ADC full-scale code must be non-zero")]
    ZeroFullScale,
}

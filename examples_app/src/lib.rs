pub mod audio_backend;
pub mod terminal_display;

use specbar_core::config::ADC_FULL_SCALE_12BIT;
use specbar_core::display::link::DisplaySink;
use specbar_core::{Pipeline, PollOutcome};
use std::time::{Duration, Instant};

/// Maps a bipolar sample in [-1, 1] to a unipolar 12-bit ADC code.
pub fn to_adc_code(sample: f32) -> u16 {
    let unipolar = (sample.clamp(-1.0, 1.0) + 1.0) * 0.5;
    (unipolar * ADC_FULL_SCALE_12BIT as f32).round() as u16
}

/// Installs the logger used by every demo binary.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Polls `pipeline` until `done` returns true while nothing is ready.
///
/// Times every processed buffer against `budget` (one fill duration) and
/// returns how many took longer.
pub fn poll_until<S: DisplaySink>(
    pipeline: &mut Pipeline<S>,
    budget: Duration,
    mut done: impl FnMut() -> bool,
) -> u64 {
    let mut slow = 0;
    loop {
        let started = Instant::now();
        match pipeline.poll() {
            PollOutcome::Processed { slot, .. } => {
                let elapsed = started.elapsed();
                if elapsed > budget {
                    slow += 1;
                    log::warn!(
                        "buffer {:?} took {:?}, fill budget is {:?}",
                        slot,
                        elapsed,
                        budget
                    );
                }
            }
            PollOutcome::Idle if done() => return slow,
            PollOutcome::Idle => std::thread::yield_now(),
        }
    }
}

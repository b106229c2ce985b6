use anyhow::Result;
use cpal::traits::StreamTrait;
use specbar_core::config::SAMPLE_COUNT;
use specbar_core::core::acquisition::AcquisitionBridge;
use specbar_core::{AnalyzerConfig, Pipeline};
use specbar_examples::audio_backend::init_capture;
use specbar_examples::terminal_display::TerminalDisplay;
use specbar_examples::{init_logging, poll_until};
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    init_logging();

    let (writer, reader) = AcquisitionBridge::<SAMPLE_COUNT>::new().split();
    let (stream, sample_rate) = init_capture(writer)?;

    // Same cutoff ratio as the 128 kHz reference design, at the device rate.
    let reference = AnalyzerConfig::default();
    let config = AnalyzerConfig {
        sample_rate_hz: sample_rate,
        cutoff_hz: sample_rate * reference.cutoff_ratio(),
        ..reference
    };

    let display = TerminalDisplay::new(Duration::from_millis(50));
    let mut pipeline = Pipeline::new(&config, reader, display)?;
    println!("Signal Chain:\n{}", pipeline.get_graph());
    print!("\x1b[2J");

    stream.play()?;

    let run_for = Duration::from_secs(20);
    let start = Instant::now();
    let slow = poll_until(&mut pipeline, config.fill_duration(), || start.elapsed() >= run_for);

    let stats = pipeline.stats();
    println!(
        "processed {} frames, shown {}, superseded {}, overruns {}, over budget {}",
        stats.frames_processed,
        pipeline.display().sink().frames_shown(),
        stats.frames_superseded,
        stats.overruns,
        slow
    );

    Ok(())
}

use anyhow::{bail, Context, Result};
use specbar_core::config::SAMPLE_COUNT;
use specbar_core::core::acquisition::AcquisitionBridge;
use specbar_core::{AnalyzerConfig, Pipeline};
use specbar_examples::terminal_display::TerminalDisplay;
use specbar_examples::{init_logging, poll_until, to_adc_code};
use std::thread;
use std::time::Duration;

/// Reads the first channel of a WAV file as samples in [-1, 1].
fn read_first_channel(path: &str) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path).with_context(|| format!("opening {}", path))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .step_by(channels)
            .collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .step_by(channels)
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    Ok((samples, spec.sample_rate))
}

fn main() -> Result<()> {
    init_logging();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: wav_analyzer <file.wav>");
    };
    let (samples, sample_rate) = read_first_channel(&path)?;
    log::info!("{}: {} samples at {} Hz", path, samples.len(), sample_rate);

    let reference = AnalyzerConfig::default();
    let config = AnalyzerConfig {
        sample_rate_hz: sample_rate as f32,
        cutoff_hz: sample_rate as f32 * reference.cutoff_ratio(),
        ..reference
    };
    let fill = config.fill_duration();

    let (mut writer, reader) = AcquisitionBridge::<SAMPLE_COUNT>::new().split();
    let display = TerminalDisplay::new(Duration::from_millis(40));
    let mut pipeline = Pipeline::new(&config, reader, display)?;
    print!("\x1b[2J");

    // Replays the file at its own rate, one acquisition buffer per fill period.
    let producer = thread::spawn(move || {
        for chunk in samples.chunks(SAMPLE_COUNT) {
            let codes: Vec<u16> = chunk.iter().map(|&s| to_adc_code(s)).collect();
            writer.write(&codes);
            thread::sleep(fill);
        }
    });

    let slow = poll_until(&mut pipeline, fill, || producer.is_finished());
    if producer.join().is_err() {
        bail!("replay thread panicked");
    }

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

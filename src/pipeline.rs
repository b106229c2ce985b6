use crate::config::{AnalyzerConfig, BIN_COUNT, FIR_TAP_COUNT, SAMPLE_COUNT};
use crate::core::acquisition::{AcquisitionReader, BufferSlot};
use crate::core::static_dsp_chain::{SerialProcessor, StaticDspChain};
use crate::display::bargraph::BargraphRasterizer;
use crate::display::framebuffer::FrameBuffer;
use crate::display::link::{DisplayLink, DisplaySink, Submission};
use crate::error::ConfigError;
use crate::filter::fir::FirFilter;
use crate::filter::window::WindowTable;
use crate::spectral::power::PowerConverter;
use crate::spectral::transform::SpectrumTransform;
use crate::FrameProcessor;
use alloc::string::String;

type FrontEnd = StaticDspChain<SerialProcessor<FirFilter<FIR_TAP_COUNT>, WindowTable<SAMPLE_COUNT>>>;

/// What one call to `Pipeline::poll` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No buffer was ready.
    Idle,
    /// One buffer went through every stage.
    Processed {
        slot: BufferSlot,
        submission: Submission,
    },
}

/// Counters kept by the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Buffers that went through every stage.
    pub frames_processed: u64,
    /// Frames whose transfer to the display was started.
    pub frames_presented: u64,
    /// Finished frames replaced by a newer one before the display took them.
    pub frames_superseded: u64,
    /// Acquisition fills dropped or torn because processing fell behind.
    pub overruns: u32,
}

/// Runs acquisition buffers through filter, window, transform, power
/// conversion and rasterization, and publishes the result to the display.
///
/// All buffers are sized at compile time and owned here; nothing is allocated
/// after construction.
pub struct Pipeline<S: DisplaySink> {
    reader: AcquisitionReader<SAMPLE_COUNT>,
    front_end: FrontEnd,
    transform: SpectrumTransform<SAMPLE_COUNT>,
    power: PowerConverter,
    rasterizer: BargraphRasterizer,
    display: DisplayLink<S>,

    signal: [f32; SAMPLE_COUNT],
    magnitudes: [f32; BIN_COUNT],
    power_dbm: [f32; BIN_COUNT],
    frame: FrameBuffer,

    full_scale: f32,
    window_sum: f32,
    frames_processed: u64,
    overruns_seen: u32,
}

impl<S: DisplaySink> Pipeline<S> {
    /// Validates `config` and builds every coefficient table.
    ///
    /// # Arguments
    /// * `config` - Initialization inputs, fixed for the life of the pipeline.
    /// * `reader` - Consumer half of the acquisition bridge.
    /// * `sink` - The display output collaborator.
    pub fn new(
        config: &AnalyzerConfig,
        reader: AcquisitionReader<SAMPLE_COUNT>,
        sink: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let fir = FirFilter::<FIR_TAP_COUNT>::lowpass(config.cutoff_ratio());
        let window = WindowTable::<SAMPLE_COUNT>::hann();
        let window_sum = window.sum();

        log::debug!(
            "pipeline: N={} K={} fc/fs={:.4} window sum {:.3}, fill budget {:?}",
            SAMPLE_COUNT,
            FIR_TAP_COUNT,
            config.cutoff_ratio(),
            window_sum,
            config.fill_duration()
        );

        Ok(Pipeline {
            reader,
            front_end: StaticDspChain::new(fir).and(window),
            transform: SpectrumTransform::new(),
            power: PowerConverter::new(config.reference_voltage, config.load_impedance_ohms),
            rasterizer: BargraphRasterizer::new(config.min_power_dbm, config.max_power_dbm),
            display: DisplayLink::new(sink),
            signal: [0.0; SAMPLE_COUNT],
            magnitudes: [0.0; BIN_COUNT],
            power_dbm: [0.0; BIN_COUNT],
            frame: FrameBuffer::new(),
            full_scale: config.adc_full_scale as f32,
            window_sum,
            frames_processed: 0,
            overruns_seen: 0,
        })
    }

    /// One non-blocking iteration of the processing loop.
    ///
    /// Starts a deferred display transfer if the sink became idle, then
    /// processes at most one ready buffer (A is checked before B).
    pub fn poll(&mut self) -> PollOutcome {
        self.display.flush(&self.frame);
        self.note_overruns();

        let Some(buffer) = self.reader.try_acquire() else {
            return PollOutcome::Idle;
        };
        let slot = buffer.slot();
        let scale = 1.0 / self.full_scale;
        for (dst, raw) in self.signal.iter_mut().zip(buffer.samples()) {
            *dst = raw as f32 * scale;
        }
        // The slot goes back to the writer as soon as it has been copied out.
        drop(buffer);

        let submission = self.run_stages();
        log::trace!("pipeline: slot {:?} -> {:?}", slot, submission);
        PollOutcome::Processed { slot, submission }
    }

    /// Polls forever. There is no shutdown path.
    pub fn run(&mut self) -> ! {
        loop {
            if self.poll() == PollOutcome::Idle {
                core::hint::spin_loop();
            }
        }
    }

    /// Processes one block of raw samples outside the acquisition bridge.
    ///
    /// The filter history is shared with `poll`, so this continues the same
    /// stream.
    pub fn process_samples(&mut self, raw: &[u16; SAMPLE_COUNT]) -> &FrameBuffer {
        let scale = 1.0 / self.full_scale;
        for (dst, &r) in self.signal.iter_mut().zip(raw.iter()) {
            *dst = r as f32 * scale;
        }
        self.run_stages();
        &self.frame
    }

    fn run_stages(&mut self) -> Submission {
        // No stage is time-varying, so the sample index is unused.
        self.front_end.process(&mut self.signal, 0);

        self.transform.transform(&self.signal);
        self.transform.amplitudes(self.window_sum, &mut self.magnitudes);
        self.power.convert(&self.magnitudes, &mut self.power_dbm);
        self.rasterizer.rasterize(&self.power_dbm, &mut self.frame);

        self.frames_processed += 1;
        self.display.submit(&self.frame)
    }

    fn note_overruns(&mut self) {
        let overruns = self.reader.overruns();
        if overruns != self.overruns_seen {
            log::warn!(
                "pipeline: {} acquisition overrun(s), processing is slower than one fill",
                overruns.wrapping_sub(self.overruns_seen)
            );
            self.overruns_seen = overruns;
        }
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            frames_processed: self.frames_processed,
            frames_presented: self.display.presented(),
            frames_superseded: self.display.superseded(),
            overruns: self.reader.overruns(),
        }
    }

    /// The most recently rasterized frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Power of each bin from the most recent frame, before clamping.
    pub fn power_dbm(&self) -> &[f32; BIN_COUNT] {
        &self.power_dbm
    }

    pub fn display(&self) -> &DisplayLink<S> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut DisplayLink<S> {
        &mut self.display
    }

    /// Returns a graph visualization of the time-domain front-end.
    pub fn get_graph(&self) -> String {
        self.front_end.get_graph()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ADC_FULL_SCALE_12BIT, FRAME_HEIGHT};
    use crate::core::acquisition::{AcquisitionBridge, AcquisitionWriter};
    use core::f32::consts::PI;

    #[derive(Default)]
    struct RecordingSink {
        busy: bool,
        transfers: usize,
        last: Option<FrameBuffer>,
    }

    impl DisplaySink for RecordingSink {
        fn transfer_in_flight(&self) -> bool {
            self.busy
        }

        fn start_transfer(&mut self, frame: &FrameBuffer) {
            self.transfers += 1;
            self.last = Some(frame.clone());
        }
    }

    fn pipeline_with(
        config: AnalyzerConfig,
    ) -> (AcquisitionWriter<SAMPLE_COUNT>, Pipeline<RecordingSink>) {
        let (writer, reader) = AcquisitionBridge::<SAMPLE_COUNT>::new().split();
        let pipeline = Pipeline::new(&config, reader, RecordingSink::default())
            .expect("valid config");
        (writer, pipeline)
    }

    fn tone_block(bin: usize, amplitude: f32, block: usize) -> [u16; SAMPLE_COUNT] {
        let full = ADC_FULL_SCALE_12BIT as f32;
        core::array::from_fn(|i| {
            let n = (block * SAMPLE_COUNT + i) as f32;
            let phase = 2.0 * PI * bin as f32 * n / SAMPLE_COUNT as f32;
            let x = 0.5 + amplitude * libm::sinf(phase);
            libm::roundf(x * full) as u16
        })
    }

    #[test]
    fn test_invalid_config_rejected() {
        let (_, reader) = AcquisitionBridge::<SAMPLE_COUNT>::new().split();
        let config = AnalyzerConfig {
            load_impedance_ohms: 0.0,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            Pipeline::new(&config, reader, RecordingSink::default()),
            Err(ConfigError::InvalidImpedance(_))
        ));
    }

    #[test]
    fn test_all_zero_input_gives_blank_frame() {
        let (_, mut pipeline) = pipeline_with(AnalyzerConfig::default());
        let frame = pipeline.process_samples(&[0u16; SAMPLE_COUNT]);
        assert!(frame.is_blank());
        assert!(pipeline.power_dbm().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_pure_tone_peaks_at_its_column() {
        // Headroom above the tone so its bar is not clipped.
        let config = AnalyzerConfig {
            max_power_dbm: 20.0,
            ..AnalyzerConfig::default()
        };
        let (_, mut pipeline) = pipeline_with(config);

        let bin = 20;
        // Let the filter settle on the continuous tone first.
        for block in 0..3 {
            pipeline.process_samples(&tone_block(bin, 0.45, block));
        }
        let frame = pipeline.process_samples(&tone_block(bin, 0.45, 3)).clone();

        let col_w = BargraphRasterizer::column_width(BIN_COUNT);
        // Bins 0 and 1 carry the unipolar DC offset.
        let (tallest, height) = (2..BIN_COUNT)
            .map(|b| (b, frame.column_height(b * col_w)))
            .fold((0, 0), |best, cur| if cur.1 > best.1 { cur } else { best });

        assert!(height > 0);
        assert!(height < FRAME_HEIGHT);
        assert!(
            tallest.abs_diff(bin) <= 1,
            "tallest bar at bin {}, expected near {}",
            tallest,
            bin
        );
    }

    #[test]
    fn test_poll_processes_ready_buffers() {
        let (mut writer, mut pipeline) = pipeline_with(AnalyzerConfig::default());
        assert_eq!(pipeline.poll(), PollOutcome::Idle);

        writer.write(&tone_block(8, 0.4, 0));
        writer.write(&tone_block(8, 0.4, 1));

        assert_eq!(
            pipeline.poll(),
            PollOutcome::Processed {
                slot: BufferSlot::A,
                submission: Submission::Started
            }
        );
        assert_eq!(
            pipeline.poll(),
            PollOutcome::Processed {
                slot: BufferSlot::B,
                submission: Submission::Started
            }
        );
        assert_eq!(pipeline.poll(), PollOutcome::Idle);

        let stats = pipeline.stats();
        assert_eq!(stats.frames_processed, 2);
        assert_eq!(stats.frames_presented, 2);
        assert_eq!(stats.overruns, 0);
        assert_eq!(pipeline.display().sink().transfers, 2);
        assert_eq!(
            pipeline.display().sink().last.as_ref(),
            Some(pipeline.frame())
        );
    }

    #[test]
    fn test_busy_display_gets_newest_frame() {
        let (mut writer, mut pipeline) = pipeline_with(AnalyzerConfig::default());
        pipeline.display_mut().sink_mut().busy = true;

        writer.write(&tone_block(8, 0.4, 0));
        pipeline.poll();
        writer.write(&[0u16; SAMPLE_COUNT]);
        assert_eq!(
            pipeline.poll(),
            PollOutcome::Processed {
                slot: BufferSlot::B,
                submission: Submission::Superseded
            }
        );
        assert_eq!(pipeline.display().sink().transfers, 0);

        pipeline.display_mut().sink_mut().busy = false;
        assert_eq!(pipeline.poll(), PollOutcome::Idle);

        let sink = pipeline.display().sink();
        assert_eq!(sink.transfers, 1);
        assert_eq!(sink.last.as_ref(), Some(pipeline.frame()));
        assert_eq!(pipeline.stats().frames_superseded, 1);
    }

    #[test]
    fn test_overruns_are_reported() {
        let (mut writer, mut pipeline) = pipeline_with(AnalyzerConfig::default());
        for block in 0..3 {
            writer.write(&tone_block(4, 0.2, block));
        }
        assert!(matches!(pipeline.poll(), PollOutcome::Processed { .. }));
        assert_eq!(pipeline.stats().overruns, 1);
    }

    #[test]
    fn test_settled_input_gives_identical_frames() {
        let (_, mut pipeline) = pipeline_with(AnalyzerConfig::default());
        let steady = [2048u16; SAMPLE_COUNT];

        pipeline.process_samples(&steady);
        let first = pipeline.process_samples(&steady).clone();
        let first_power = *pipeline.power_dbm();
        let second = pipeline.process_samples(&steady).clone();

        assert_eq!(first, second);
        assert_eq!(&first_power, pipeline.power_dbm());
    }

    #[test]
    fn test_unshown_pending_frame_is_counted_when_replaced() {
        let (_, mut pipeline) = pipeline_with(AnalyzerConfig::default());
        pipeline.display_mut().sink_mut().busy = true;

        pipeline.process_samples(&tone_block(8, 0.4, 0));
        assert!(pipeline.display().has_pending());
        // Sink still busy when the loop tries to flush.
        assert_eq!(pipeline.poll(), PollOutcome::Idle);

        pipeline.display_mut().sink_mut().busy = false;
        pipeline.process_samples(&tone_block(8, 0.4, 1));

        let stats = pipeline.stats();
        assert_eq!(stats.frames_processed, 2);
        assert_eq!(stats.frames_presented, 1);
        assert_eq!(stats.frames_superseded, 1);
        assert_eq!(
            stats.frames_presented + stats.frames_superseded,
            stats.frames_processed
        );
    }
}

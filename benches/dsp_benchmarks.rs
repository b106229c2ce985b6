use iai_callgrind::{library_benchmark, library_benchmark_group, main};
use specbar_core::config::{AnalyzerConfig, BIN_COUNT, FIR_TAP_COUNT, SAMPLE_COUNT};
use specbar_core::core::acquisition::AcquisitionBridge;
use specbar_core::display::bargraph::BargraphRasterizer;
use specbar_core::display::framebuffer::FrameBuffer;
use specbar_core::display::link::DisplaySink;
use specbar_core::filter::fir::FirFilter;
use specbar_core::filter::window::WindowTable;
use specbar_core::spectral::transform::SpectrumTransform;
use specbar_core::{FrameProcessor, Pipeline};
use std::hint::black_box;

struct NullSink;

impl DisplaySink for NullSink {
    fn transfer_in_flight(&self) -> bool {
        false
    }

    fn start_transfer(&mut self, _frame: &FrameBuffer) {}
}

fn test_signal() -> [f32; SAMPLE_COUNT] {
    core::array::from_fn(|i| 0.5 + 0.4 * (i as f32 * 0.3).sin())
}

#[library_benchmark]
fn bench_fir_block() {
    let mut fir = FirFilter::<FIR_TAP_COUNT>::lowpass(0.390625);
    let mut buffer = test_signal();
    fir.process(black_box(&mut buffer), 0);
}

#[library_benchmark]
fn bench_window_and_fft() {
    let window = WindowTable::<SAMPLE_COUNT>::hann();
    let mut fft = SpectrumTransform::<SAMPLE_COUNT>::new();
    let mut buffer = test_signal();
    window.apply(&mut buffer);
    fft.transform(black_box(&buffer));
}

#[library_benchmark]
fn bench_rasterize() {
    let rasterizer = BargraphRasterizer::new(-100.0, 0.0);
    let mut power = [0.0f32; BIN_COUNT];
    for (i, p) in power.iter_mut().enumerate() {
        *p = -100.0 + (i % 100) as f32;
    }
    let mut frame = FrameBuffer::new();
    rasterizer.rasterize(black_box(&power), &mut frame);
}

#[library_benchmark]
fn bench_full_frame() {
    let (_writer, reader) = AcquisitionBridge::<SAMPLE_COUNT>::new().split();
    let mut pipeline = Pipeline::new(&AnalyzerConfig::default(), reader, NullSink)
        .expect("default config is valid");
    let raw: [u16; SAMPLE_COUNT] = core::array::from_fn(|i| (2048.0 + 1600.0 * (i as f32 * 0.3).sin()) as u16);
    pipeline.process_samples(black_box(&raw));
}

library_benchmark_group!(
    name = stages;
    benchmarks = bench_fir_block, bench_window_and_fft, bench_rasterize
);

library_benchmark_group!(
    name = pipeline;
    benchmarks = bench_full_frame
);

main!(library_benchmark_groups = stages, pipeline);

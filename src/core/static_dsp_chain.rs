use super::frame_processor::FrameProcessor;
#[cfg(feature = "debug_visualize")]
use alloc::format;
use alloc::string::String;

/// A processor that runs two processors in series.
///
/// This is the building block for `StaticDspChain`.
pub struct SerialProcessor<P1, P2> {
    pub first: P1,
    pub second: P2,
}

impl<P1, P2> SerialProcessor<P1, P2> {
    pub fn new(first: P1, second: P2) -> Self {
        Self { first, second }
    }
}

impl<P1, P2> FrameProcessor for SerialProcessor<P1, P2>
where
    P1: FrameProcessor,
    P2: FrameProcessor,
{
    fn process(&mut self, buffer: &mut [f32], sample_index: u64) {
        self.first.process(buffer, sample_index);
        self.second.process(buffer, sample_index);
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    fn latency_samples(&self) -> u32 {
        self.first.latency_samples() + self.second.latency_samples()
    }

    #[cfg(feature = "debug_visualize")]
    fn name(&self) -> &str {
        "SerialProcessor"
    }

    #[cfg(feature = "debug_visualize")]
    fn visualize(&self, indent: usize) -> String {
        let spaces = " ".repeat(indent);
        let mut output = String::new();

        output.push_str(&self.first.visualize(indent));
        output.push_str(&format!("{}|\n", spaces));
        output.push_str(&format!("{}v\n", spaces));
        output.push_str(&self.second.visualize(indent));

        output
    }
}

/// A statically typed chain of time-domain stages.
///
/// Stages are composed with generics (`SerialProcessor`), so the whole
/// front-end of the analyzer (filter then window) compiles into one loop
/// nest without dynamic dispatch.
pub struct StaticDspChain<P> {
    pub processor: P,
}

impl<P: FrameProcessor> StaticDspChain<P> {
    /// Creates a new StaticDspChain starting with the given processor.
    pub fn new(processor: P) -> Self {
        Self { processor }
    }

    /// Appends a processor to the chain.
    pub fn and<P2>(self, next: P2) -> StaticDspChain<SerialProcessor<P, P2>>
    where
        P2: FrameProcessor,
    {
        StaticDspChain {
            processor: SerialProcessor::new(self.processor, next),
        }
    }

    /// Returns a graph visualization of the entire chain.
    pub fn get_graph(&self) -> String {
        #[cfg(feature = "debug_visualize")]
        {
            self.visualize(0)
        }
        #[cfg(not(feature = "debug_visualize"))]
        {
            String::new()
        }
    }
}

impl<P: FrameProcessor> FrameProcessor for StaticDspChain<P> {
    fn process(&mut self, buffer: &mut [f32], sample_index: u64) {
        self.processor.process(buffer, sample_index);
    }

    fn reset(&mut self) {
        self.processor.reset();
    }

    fn latency_samples(&self) -> u32 {
        self.processor.latency_samples()
    }

    #[cfg(feature = "debug_visualize")]
    fn name(&self) -> &str {
        "StaticDspChain"
    }

    #[cfg(feature = "debug_visualize")]
    fn visualize(&self, indent: usize) -> String {
        let spaces = " ".repeat(indent);
        let arrow_spaces = " ".repeat(indent + 2);

        let mut output = String::new();
        output.push_str(&format!("{}StaticDspChain (Mono)\n", spaces));
        output.push_str(&format!("{}|\n", arrow_spaces));
        output.push_str(&format!("{}v\n", arrow_spaces));

        output.push_str(&self.processor.visualize(indent));

        output.push_str(&format!("{}|\n", arrow_spaces));
        output.push_str(&format!("{}v\n", arrow_spaces));
        output.push_str(&format!("{}Spectrum\n", spaces));

        output
    }
}

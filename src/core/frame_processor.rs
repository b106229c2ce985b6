#[cfg(feature = "debug_visualize")]
use alloc::format;
use alloc::string::String;

/// The core trait for the time-domain stages of the analyzer.
///
/// Implementors transform a block of normalized samples in place. Coefficients
/// are fixed when the processor is built; there is no runtime reconfiguration.
pub trait FrameProcessor {
    /// Processes a block of samples.
    ///
    /// # Arguments
    /// * `buffer` - The samples to process (in-place).
    /// * `sample_index` - The global sample index of the start of the block.
    fn process(&mut self, buffer: &mut [f32], sample_index: u64);

    /// Clears any streaming state. Coefficients are kept.
    fn reset(&mut self) {}

    /// Returns the latency of the processor in samples.
    fn latency_samples(&self) -> u32 {
        0
    }

    /// Returns the name of the processor.
    fn name(&self) -> &str {
        #[cfg(feature = "debug_visualize")]
        {
            "Node"
        }
        #[cfg(not(feature = "debug_visualize"))]
        {
            ""
        }
    }

    /// Returns an ASCII visualization of the processor structure.
    fn visualize(&self, indent: usize) -> String {
        #[cfg(feature = "debug_visualize")]
        {
            let spaces = " ".repeat(indent);
            format!("{}{}\n", spaces, self.name())
        }
        #[cfg(not(feature = "debug_visualize"))]
        {
            let _ = indent;
            String::new()
        }
    }
}

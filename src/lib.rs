#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod config;
pub mod core;
pub mod display;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod spectral;

pub use crate::config::AnalyzerConfig;
pub use crate::core::frame_processor::FrameProcessor;
pub use crate::error::ConfigError;
pub use crate::pipeline::{Pipeline, PipelineStats, PollOutcome};

pub mod acquisition;
pub mod frame_processor;
pub mod static_dsp_chain;

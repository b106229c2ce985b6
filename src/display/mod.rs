pub mod bargraph;
pub mod framebuffer;
pub mod link;

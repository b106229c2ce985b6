pub mod fir;
pub mod window;

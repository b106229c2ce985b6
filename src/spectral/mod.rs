pub mod power;
pub mod transform;

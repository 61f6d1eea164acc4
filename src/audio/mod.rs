pub mod device;
pub mod levels;
pub mod sampler;

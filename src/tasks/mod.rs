pub mod detector;
pub mod sampler;

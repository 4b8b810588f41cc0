pub mod moving_average;
pub mod noise;

pub use crate::types::filters::moving_average::MovingAverage;
pub use crate::types::filters::noise::NoiseFilter;

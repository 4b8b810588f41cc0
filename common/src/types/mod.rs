pub mod buffers;
pub mod callback;
pub mod filters;
pub mod sensors;

pub use callback::Callback;
pub use sensors::{Dimension, SamplingDelay, SensorEvent, SensorHandle, SensorKind, Values};

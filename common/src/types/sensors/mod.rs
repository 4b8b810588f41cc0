pub mod sensor_event;
pub mod sensor_kind;

pub use crate::types::sensors::sensor_event::{SamplingDelay, SensorEvent, SensorHandle, Values};
pub use crate::types::sensors::sensor_kind::{Dimension, SensorKind};

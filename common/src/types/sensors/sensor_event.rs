use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw values delivered by a sensor. Scalar sensors report one component,
/// 3-axis sensors report three.
pub type Values = Vec<f32>;

/// Event pushed by the platform when a sensor produces a new reading.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorEvent {
    pub sensor_type: i32,
    pub values: Values,
    pub timestamp_nanos: u64,
}

impl SensorEvent {
    pub fn new(sensor_type: i32, values: Values, timestamp_nanos: u64) -> Self {
        Self {
            sensor_type,
            values,
            timestamp_nanos,
        }
    }
}

/// Hardware sensor resolved by the platform for a sensor-type identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensorHandle {
    pub sensor_type: i32,
    pub name: String,
}

impl SensorHandle {
    pub fn new(sensor_type: i32, name: &str) -> Self {
        Self {
            sensor_type,
            name: name.to_string(),
        }
    }
}

/// Rate at which the platform delivers events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingDelay {
    Fastest,
    Game,
    #[default]
    Ui,
    Normal,
}

impl SamplingDelay {
    /// Nominal period between two events.
    pub fn period(&self) -> Duration {
        match self {
            SamplingDelay::Fastest => Duration::ZERO,
            SamplingDelay::Game => Duration::from_millis(20),
            SamplingDelay::Ui => Duration::from_millis(60),
            SamplingDelay::Normal => Duration::from_millis(200),
        }
    }
}

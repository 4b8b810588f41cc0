use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use common::traits::SensorPort;
use common::types::{SensorKind, Values};
use sensor_flow::{
    sensor_flow, MeasurableSensor, NoiseStreamExt, ReadingStreamExt, SensorError, SensorSuite,
};

use crate::config::DashboardConfig;
use crate::state::LiveState;

/// How raw flows are turned into presentation values.
#[derive(Clone, Copy, Debug)]
pub struct Pipeline {
    pub noise_threshold: f32,
    pub smoothing_window: Option<usize>,
    pub stop_timeout: Duration,
}

impl From<&DashboardConfig> for Pipeline {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            noise_threshold: config.noise_threshold,
            smoothing_window: config.smoothing_window,
            stop_timeout: config.stop_timeout(),
        }
    }
}

impl Pipeline {
    fn readings(
        &self,
        sensor: &Arc<dyn MeasurableSensor>,
    ) -> Result<BoxStream<'static, Values>, SensorError> {
        let flow = sensor_flow(sensor.clone())?;
        Ok(match self.smoothing_window {
            Some(window) => flow.smoothed(window),
            None => flow.boxed(),
        })
    }

    /// flow, optional smoothing, first component, noise rejection
    pub fn scalar_state(&self, sensor: Arc<dyn MeasurableSensor>) -> LiveState<f32> {
        let pipeline = *self;
        let name = sensor.kind().label();
        LiveState::new(name, 0.0, self.stop_timeout, move || {
            Ok(pipeline
                .readings(&sensor)?
                .scalar(0.0)
                .without_noise(pipeline.noise_threshold))
        })
    }

    /// flow, optional smoothing, element-wise noise rejection
    pub fn vector_state(&self, sensor: Arc<dyn MeasurableSensor>) -> LiveState<Values> {
        let pipeline = *self;
        let name = sensor.kind().label();
        LiveState::new(name, vec![0.0; 3], self.stop_timeout, move || {
            Ok(pipeline
                .readings(&sensor)?
                .without_noise(pipeline.noise_threshold))
        })
    }
}

/// Current value of every sensor shown on the home screen.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HomeSnapshot {
    pub light: f32,
    pub proximity: f32,
    pub accelerometer: Values,
    pub gyroscope: Values,
    pub pressure: f32,
    pub magnetometer: Values,
    pub ambient_temperature: f32,
    pub humidity: f32,
}

/// Presentation states of the home screen, one per sensor kind.
pub struct HomeModel {
    pub light: LiveState<f32>,
    pub proximity: LiveState<f32>,
    pub accelerometer: LiveState<Values>,
    pub gyroscope: LiveState<Values>,
    pub pressure: LiveState<f32>,
    pub magnetometer: LiveState<Values>,
    pub ambient_temperature: LiveState<f32>,
    pub humidity: LiveState<f32>,
}

impl HomeModel {
    /// Builds every state from the sensors of `suite`. Nothing is started until the first
    /// subscription.
    pub fn new<P: SensorPort>(suite: &SensorSuite<P>, pipeline: Pipeline) -> Self {
        let sensor = |kind: SensorKind| -> Arc<dyn MeasurableSensor> { suite.get(kind) };
        Self {
            light: pipeline.scalar_state(sensor(SensorKind::Light)),
            proximity: pipeline.scalar_state(sensor(SensorKind::Proximity)),
            accelerometer: pipeline.vector_state(sensor(SensorKind::Accelerometer)),
            gyroscope: pipeline.vector_state(sensor(SensorKind::Gyroscope)),
            pressure: pipeline.scalar_state(sensor(SensorKind::Pressure)),
            magnetometer: pipeline.vector_state(sensor(SensorKind::Magnetometer)),
            ambient_temperature: pipeline.scalar_state(sensor(SensorKind::AmbientTemperature)),
            humidity: pipeline.scalar_state(sensor(SensorKind::Humidity)),
        }
    }

    pub fn snapshot(&self) -> HomeSnapshot {
        HomeSnapshot {
            light: self.light.value(),
            proximity: self.proximity.value(),
            accelerometer: self.accelerometer.value(),
            gyroscope: self.gyroscope.value(),
            pressure: self.pressure.value(),
            magnetometer: self.magnetometer.value(),
            ambient_temperature: self.ambient_temperature.value(),
            humidity: self.humidity.value(),
        }
    }
}

use std::sync::Arc;

use common::traits::SensorPort;
use common::types::{SamplingDelay, SensorKind};

use crate::errors::SensorError;
use crate::flow::{sensor_flow, SensorFlow};
use crate::sensor::{DeviceSensor, MeasurableSensor};

/// The eight built-in sensors of a device, one shared instance per kind.
pub struct SensorSuite<P> {
    port: Arc<P>,
    sensors: Vec<Arc<DeviceSensor<P>>>,
}

impl<P: SensorPort> SensorSuite<P> {
    pub fn new(port: Arc<P>) -> Self {
        Self::with_delay(port, SamplingDelay::Ui)
    }

    pub fn with_delay(port: Arc<P>, delay: SamplingDelay) -> Self {
        // indexed by usize::from(kind)
        let sensors = SensorKind::ALL
            .iter()
            .map(|kind| Arc::new(DeviceSensor::with_delay(*kind, port.clone(), delay)))
            .collect();
        Self { port, sensors }
    }

    pub fn port(&self) -> &Arc<P> {
        &self.port
    }

    pub fn get(&self, kind: SensorKind) -> Arc<DeviceSensor<P>> {
        self.sensors[usize::from(kind)].clone()
    }

    /// Opens a conflating flow over the sensor of `kind`.
    pub fn flow(&self, kind: SensorKind) -> Result<SensorFlow, SensorError> {
        sensor_flow(self.get(kind))
    }

    /// Kinds whose capability the device declares.
    pub fn available(&self) -> Vec<SensorKind> {
        self.sensors
            .iter()
            .filter(|sensor| sensor.does_sensor_exist())
            .map(|sensor| sensor.kind())
            .collect()
    }

    pub fn light(&self) -> Arc<DeviceSensor<P>> {
        self.get(SensorKind::Light)
    }

    pub fn proximity(&self) -> Arc<DeviceSensor<P>> {
        self.get(SensorKind::Proximity)
    }

    pub fn accelerometer(&self) -> Arc<DeviceSensor<P>> {
        self.get(SensorKind::Accelerometer)
    }

    pub fn gyroscope(&self) -> Arc<DeviceSensor<P>> {
        self.get(SensorKind::Gyroscope)
    }

    pub fn pressure(&self) -> Arc<DeviceSensor<P>> {
        self.get(SensorKind::Pressure)
    }

    pub fn magnetometer(&self) -> Arc<DeviceSensor<P>> {
        self.get(SensorKind::Magnetometer)
    }

    pub fn ambient_temperature(&self) -> Arc<DeviceSensor<P>> {
        self.get(SensorKind::AmbientTemperature)
    }

    pub fn humidity(&self) -> Arc<DeviceSensor<P>> {
        self.get(SensorKind::Humidity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::ScriptedPort;

    #[test]
    fn test_sensors_match_their_kind() {
        let suite = SensorSuite::new(Arc::new(ScriptedPort::all()));
        for kind in SensorKind::ALL {
            assert_eq!(suite.get(kind).kind(), kind);
        }
        assert_eq!(suite.light().kind(), SensorKind::Light);
        assert_eq!(suite.humidity().kind(), SensorKind::Humidity);
    }

    #[test]
    fn test_sensors_are_shared() {
        let suite = SensorSuite::new(Arc::new(ScriptedPort::all()));
        assert!(Arc::ptr_eq(&suite.gyroscope(), &suite.get(SensorKind::Gyroscope)));
    }

    #[test]
    fn test_available_follows_device_features() {
        let port = Arc::new(ScriptedPort::new(&[
            SensorKind::Accelerometer,
            SensorKind::Light,
        ]));
        let suite = SensorSuite::new(port);
        assert_eq!(
            suite.available(),
            vec![SensorKind::Light, SensorKind::Accelerometer]
        );
    }

    #[test]
    fn test_suite_delay_reaches_the_port() {
        let port = Arc::new(ScriptedPort::all());
        let suite = SensorSuite::with_delay(port.clone(), SamplingDelay::Game);

        let flow = suite.flow(SensorKind::Magnetometer).unwrap();
        assert_eq!(port.requested_delays(), vec![SamplingDelay::Game]);
        drop(flow);

        let default_suite = SensorSuite::new(port.clone());
        let flow = default_suite.flow(SensorKind::Light).unwrap();
        assert_eq!(
            port.requested_delays(),
            vec![SamplingDelay::Game, SamplingDelay::Ui]
        );
        drop(flow);
    }
}

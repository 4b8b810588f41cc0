// Emulates the sensor service of a real device

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use common::errors::PortError;
use common::traits::{Notifiable, SensorPort};
use common::types::{SamplingDelay, SensorEvent, SensorHandle, SensorKind, Values};
use publisher::{PublisherError, PublisherManager};

use super::emitter::Emitter;
use super::gaussian::GaussianNoise;
use crate::errors::SensorError;

/// Resting value reported by each simulated sensor before noise is added.
pub fn baseline(kind: SensorKind) -> Values {
    match kind {
        SensorKind::Light => vec![120.0],
        SensorKind::Proximity => vec![5.0],
        SensorKind::Accelerometer => vec![0.0, 0.0, 9.81],
        SensorKind::Gyroscope => vec![0.0, 0.0, 0.0],
        SensorKind::Pressure => vec![1013.25],
        SensorKind::Magnetometer => vec![22.0, 5.0, -40.0],
        SensorKind::AmbientTemperature => vec![21.5],
        SensorKind::Humidity => vec![45.0],
    }
}

/// Simulated device: declares a configurable set of sensors and pushes their baseline
/// readings, optionally with Gaussian noise, at the rate each registration asks for.
pub struct SimulatedDevice {
    present: Vec<SensorKind>,
    noise: Option<GaussianNoise>,
    publishers: PublisherManager<SensorEvent, SensorKind>,
    emitters: DashMap<SensorKind, Emitter>,
    started: Instant,
}

impl SimulatedDevice {
    /// Creates a device with the `present` sensors. A `noise_stdev` of `None` produces
    /// constant readings.
    pub fn new(present: &[SensorKind], noise_stdev: Option<f32>) -> Result<Self, SensorError> {
        let noise = noise_stdev
            .map(|stdev| GaussianNoise::new(0.0, stdev))
            .transpose()?;
        Ok(Self {
            present: present.to_vec(),
            noise,
            publishers: PublisherManager::new(present),
            emitters: DashMap::new(),
            started: Instant::now(),
        })
    }

    /// Device with every sensor kind present.
    pub fn with_all_sensors(noise_stdev: Option<f32>) -> Result<Self, SensorError> {
        Self::new(&SensorKind::ALL, noise_stdev)
    }

    /// Pushes an explicit reading to every listener of `kind`, from the caller's thread.
    pub fn inject(&self, kind: SensorKind, values: Values) {
        let event = SensorEvent::new(kind.sensor_type(), values, self.timestamp_nanos());
        self.publishers.notify_listeners(kind, Arc::new(event));
    }

    pub fn is_emitting(&self, kind: SensorKind) -> bool {
        self.emitters.contains_key(&kind)
    }

    fn timestamp_nanos(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    // the entry lock is held while spawning, so a concurrent stop of the same kind waits
    fn start_emitter(&self, kind: SensorKind, delay: SamplingDelay) -> Result<(), PortError> {
        let Entry::Vacant(slot) = self.emitters.entry(kind) else {
            return Ok(());
        };
        let publishers = self.publishers.clone();
        let noise = self.noise.clone();
        let started = self.started;
        let resting = baseline(kind);
        let mut rng = StdRng::from_entropy();

        let emitter = Emitter::spawn(&format!("simulated-{kind:?}"), delay.period(), move || {
            let values = match noise.as_ref() {
                Some(noise) => noise.add_noise(&mut rng, &resting),
                None => resting.clone(),
            };
            let timestamp = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
            let event = SensorEvent::new(kind.sensor_type(), values, timestamp);
            publishers.notify_listeners(kind, Arc::new(event));
        })
        .map_err(|e| PortError::Registration(e.to_string()))?;

        slot.insert(emitter);
        Ok(())
    }
}

impl SensorPort for SimulatedDevice {
    fn has_system_feature(&self, feature: &str) -> bool {
        SensorKind::from_feature(feature).is_some_and(|kind| self.present.contains(&kind))
    }

    fn default_sensor(&self, sensor_type: i32) -> Option<SensorHandle> {
        let kind = SensorKind::from_sensor_type(sensor_type)?;
        self.present
            .contains(&kind)
            .then(|| SensorHandle::new(sensor_type, &format!("Simulated {}", kind.label())))
    }

    fn register_listener(
        &self,
        sensor: &SensorHandle,
        delay: SamplingDelay,
        listener: &mut dyn Notifiable<SensorEvent>,
    ) -> Result<Uuid, PortError> {
        let kind = SensorKind::from_sensor_type(sensor.sensor_type)
            .filter(|kind| self.present.contains(kind))
            .ok_or(PortError::SensorNotFound(sensor.sensor_type))?;
        let id = self
            .publishers
            .add_listener(listener, &kind)
            .map_err(|e| PortError::Registration(e.to_string()))?;
        if let Err(e) = self.start_emitter(kind, delay) {
            let _ = self.publishers.remove_listener(id);
            return Err(e);
        }
        info!("Simulated {} registered ({:?})", kind, delay);
        Ok(id)
    }

    fn unregister_listener(&self, registration: Uuid) -> Result<(), PortError> {
        let kind = self
            .publishers
            .remove_listener(registration)
            .map_err(|e| match e {
                PublisherError::ListenerNotFound => PortError::UnknownRegistration(registration),
                PublisherError::PublisherNotFound => PortError::Registration(e.to_string()),
            })?;
        let idle = self
            .emitters
            .remove_if(&kind, |_, _| self.publishers.listener_count(&kind) == 0);
        if let Some((_, mut emitter)) = idle {
            emitter.stop();
            debug!("Simulated {} idle", kind);
        }
        Ok(())
    }
}

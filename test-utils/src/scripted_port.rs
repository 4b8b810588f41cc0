use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use common::errors::PortError;
use common::traits::{Notifiable, SensorPort};
use common::types::{SamplingDelay, SensorEvent, SensorHandle, SensorKind, Values};
use publisher::{PublisherError, PublisherManager};

/// Sensor port driven by the test: readings are only delivered when the test calls
/// [`ScriptedPort::emit`], synchronously on the calling thread.
pub struct ScriptedPort {
    features: HashSet<SensorKind>,
    hardware: Mutex<HashSet<SensorKind>>,
    publishers: PublisherManager<SensorEvent, SensorKind>,
    fail_registration: AtomicBool,
    registrations: AtomicUsize,
    unregistrations: AtomicUsize,
    delays: Mutex<Vec<SamplingDelay>>,
    clock: AtomicU64,
}

impl ScriptedPort {
    /// Port declaring, and backing with hardware, the `present` sensors.
    pub fn new(present: &[SensorKind]) -> Self {
        Self {
            features: present.iter().copied().collect(),
            hardware: Mutex::new(present.iter().copied().collect()),
            publishers: PublisherManager::new(present),
            fail_registration: AtomicBool::new(false),
            registrations: AtomicUsize::new(0),
            unregistrations: AtomicUsize::new(0),
            delays: Mutex::new(Vec::new()),
            clock: AtomicU64::new(0),
        }
    }

    pub fn all() -> Self {
        Self::new(&SensorKind::ALL)
    }

    /// Keeps the capability declared but makes `default_sensor` find nothing.
    pub fn remove_hardware(&self, kind: SensorKind) {
        self.hardware().remove(&kind);
    }

    pub fn set_fail_registration(&self, fail: bool) {
        self.fail_registration.store(fail, Ordering::SeqCst);
    }

    /// Delivers a reading of `kind` to its registered listeners.
    pub fn emit(&self, kind: SensorKind, values: Values) {
        let timestamp = self.clock.fetch_add(1, Ordering::SeqCst);
        self.emit_event(kind, SensorEvent::new(kind.sensor_type(), values, timestamp));
    }

    /// Delivers an arbitrary event through the listeners registered for `kind`.
    pub fn emit_event(&self, kind: SensorKind, event: SensorEvent) {
        self.publishers.notify_listeners(kind, Arc::new(event));
    }

    /// Replays readings in order, for instance the ones loaded from a csv file.
    pub fn replay(&self, readings: &[(SensorKind, Values)]) {
        for (kind, values) in readings {
            self.emit(*kind, values.clone());
        }
    }

    pub fn total_registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn total_unregistrations(&self) -> usize {
        self.unregistrations.load(Ordering::SeqCst)
    }

    pub fn active_registrations(&self, kind: SensorKind) -> usize {
        self.publishers.listener_count(&kind)
    }

    /// Sampling delays requested so far, in registration order.
    pub fn requested_delays(&self) -> Vec<SamplingDelay> {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn hardware(&self) -> MutexGuard<'_, HashSet<SensorKind>> {
        self.hardware.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SensorPort for ScriptedPort {
    fn has_system_feature(&self, feature: &str) -> bool {
        SensorKind::from_feature(feature).is_some_and(|kind| self.features.contains(&kind))
    }

    fn default_sensor(&self, sensor_type: i32) -> Option<SensorHandle> {
        let kind = SensorKind::from_sensor_type(sensor_type)?;
        self.hardware()
            .contains(&kind)
            .then(|| SensorHandle::new(sensor_type, &format!("Scripted {}", kind.label())))
    }

    fn register_listener(
        &self,
        sensor: &SensorHandle,
        delay: SamplingDelay,
        listener: &mut dyn Notifiable<SensorEvent>,
    ) -> Result<Uuid, PortError> {
        if self.fail_registration.load(Ordering::SeqCst) {
            return Err(PortError::Registration(format!(
                "scripted failure for {}",
                sensor.name
            )));
        }
        let kind = SensorKind::from_sensor_type(sensor.sensor_type)
            .ok_or(PortError::SensorNotFound(sensor.sensor_type))?;
        let id = self
            .publishers
            .add_listener(listener, &kind)
            .map_err(|_| PortError::SensorNotFound(sensor.sensor_type))?;
        self.registrations.fetch_add(1, Ordering::SeqCst);
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(delay);
        Ok(id)
    }

    fn unregister_listener(&self, registration: Uuid) -> Result<(), PortError> {
        self.publishers
            .remove_listener(registration)
            .map_err(|e| match e {
                PublisherError::ListenerNotFound => PortError::UnknownRegistration(registration),
                PublisherError::PublisherNotFound => PortError::Registration(e.to_string()),
            })?;
        self.unregistrations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use publisher::Listener;

    #[test]
    fn test_emit_reaches_registered_listener() {
        let port = ScriptedPort::new(&[SensorKind::Light]);
        let received = Arc::new(Mutex::new(Vec::new()));
        let mut listener = Listener::new({
            let received = received.clone();
            move |_id: Uuid, event: Arc<SensorEvent>| {
                received.lock().unwrap().push(event.values.clone());
            }
        });

        let handle = port.default_sensor(SensorKind::Light.sensor_type()).unwrap();
        let id = port
            .register_listener(&handle, SamplingDelay::Game, &mut listener)
            .unwrap();
        port.emit(SensorKind::Light, vec![1.0]);
        port.emit(SensorKind::Proximity, vec![2.0]);

        assert_eq!(*received.lock().unwrap(), vec![vec![1.0]]);
        assert_eq!(port.requested_delays(), vec![SamplingDelay::Game]);

        port.unregister_listener(id).unwrap();
        port.emit(SensorKind::Light, vec![3.0]);
        assert_eq!(received.lock().unwrap().len(), 1);
        assert_eq!(port.total_unregistrations(), 1);
    }

    #[test]
    fn test_removed_hardware_keeps_feature() {
        let port = ScriptedPort::all();
        port.remove_hardware(SensorKind::Gyroscope);
        assert!(port.has_system_feature(SensorKind::Gyroscope.feature()));
        assert!(port
            .default_sensor(SensorKind::Gyroscope.sensor_type())
            .is_none());
    }
}

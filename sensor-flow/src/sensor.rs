use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use common::traits::{Notifiable, SensorPort};
use common::types::{SamplingDelay, SensorEvent, SensorHandle, SensorKind, Values};
use publisher::{Listener, Publishable, Publisher};

use crate::errors::SensorError;
use crate::worker::{SensorWorker, WorkerHandle};

/// A sensor that can be switched on and off and reports its readings to value listeners.
pub trait MeasurableSensor: Send + Sync + 'static {
    fn kind(&self) -> SensorKind;

    /// True when the device declares the capability this sensor needs.
    fn does_sensor_exist(&self) -> bool;

    /// Starts hardware delivery. A missing sensor is a no-op, not an error.
    ///
    /// Calls nest: hardware stays registered until every start has been matched by a
    /// call to [`stop_listening`](MeasurableSensor::stop_listening).
    fn start_listening(&self) -> Result<(), SensorError>;

    fn stop_listening(&self);

    fn register_value_listener(&self, listener: &mut dyn Notifiable<Values>) -> Uuid;

    fn unregister_value_listener(&self, id: Uuid);
}

#[derive(Default)]
struct ListeningState {
    sensor: Option<SensorHandle>,
    registration: Option<Uuid>,
    worker: Option<SensorWorker>,
    starts: usize,
}

/// Generic adapter between a platform [`SensorPort`] and the value listeners of one
/// sensor kind. Kinds differ only in the capability feature and type identifier they
/// carry, so a single implementation serves all of them.
pub struct DeviceSensor<P> {
    kind: SensorKind,
    port: Arc<P>,
    delay: SamplingDelay,
    values: Publisher<Values>,
    state: Mutex<ListeningState>,
}

impl<P: SensorPort> DeviceSensor<P> {
    pub fn new(kind: SensorKind, port: Arc<P>) -> Self {
        Self::with_delay(kind, port, SamplingDelay::Ui)
    }

    pub fn with_delay(kind: SensorKind, port: Arc<P>, delay: SamplingDelay) -> Self {
        Self {
            kind,
            port,
            delay,
            values: Publisher::new(),
            state: Mutex::new(ListeningState::default()),
        }
    }

    pub fn light(port: Arc<P>) -> Self {
        Self::new(SensorKind::Light, port)
    }

    pub fn proximity(port: Arc<P>) -> Self {
        Self::new(SensorKind::Proximity, port)
    }

    pub fn accelerometer(port: Arc<P>) -> Self {
        Self::new(SensorKind::Accelerometer, port)
    }

    pub fn gyroscope(port: Arc<P>) -> Self {
        Self::new(SensorKind::Gyroscope, port)
    }

    pub fn pressure(port: Arc<P>) -> Self {
        Self::new(SensorKind::Pressure, port)
    }

    pub fn magnetometer(port: Arc<P>) -> Self {
        Self::new(SensorKind::Magnetometer, port)
    }

    pub fn ambient_temperature(port: Arc<P>) -> Self {
        Self::new(SensorKind::AmbientTemperature, port)
    }

    pub fn humidity(port: Arc<P>) -> Self {
        Self::new(SensorKind::Humidity, port)
    }

    /// True while the hardware listener is registered.
    pub fn is_listening(&self) -> bool {
        self.lock_state().registration.is_some()
    }

    fn lock_state(&self) -> MutexGuard<'_, ListeningState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Port listener: filters foreign events and hands the values over to the worker.
    fn event_listener(&self, worker: WorkerHandle) -> Listener<SensorEvent> {
        let sensor_type = self.kind.sensor_type();
        let values = self.values.clone();
        let kind = self.kind;
        Listener::new(move |_id: Uuid, event: Arc<SensorEvent>| {
            if event.sensor_type != sensor_type {
                return;
            }
            let values = values.clone();
            let posted = worker.post(move || {
                values.notify_listeners(Arc::new(event.values.clone()));
            });
            if !posted {
                debug!("{kind} event dropped, worker already stopped");
            }
        })
    }

    fn register(&self, state: &mut ListeningState) -> Result<(), SensorError> {
        if state.sensor.is_none() {
            state.sensor = self.port.default_sensor(self.kind.sensor_type());
        }
        let Some(sensor) = state.sensor.clone() else {
            warn!("Listener: no hardware sensor for {}", self.kind);
            return Ok(());
        };

        let worker = match state.worker.take() {
            Some(worker) => worker,
            None => SensorWorker::spawn(&format!("SensorThread-{:?}", self.kind))?,
        };
        let mut listener = self.event_listener(worker.handle());
        let registration = self
            .port
            .register_listener(&sensor, self.delay, &mut listener)?;
        info!("Listening to {} ({})", self.kind, sensor.name);
        state.registration = Some(registration);
        state.worker = Some(worker);
        Ok(())
    }
}

impl<P: SensorPort> MeasurableSensor for DeviceSensor<P> {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn does_sensor_exist(&self) -> bool {
        self.port.has_system_feature(self.kind.feature())
    }

    fn start_listening(&self) -> Result<(), SensorError> {
        if !self.does_sensor_exist() {
            warn!("Listener: Sensor does not exist {}", self.kind.feature());
            return Ok(());
        }
        let mut state = self.lock_state();
        if state.registration.is_none() {
            self.register(&mut state)?;
        }
        if state.registration.is_some() {
            state.starts += 1;
        }
        Ok(())
    }

    fn stop_listening(&self) {
        if !self.does_sensor_exist() {
            return;
        }
        let mut state = self.lock_state();
        if state.registration.is_none() {
            return;
        }
        state.starts = state.starts.saturating_sub(1);
        if state.starts > 0 {
            return;
        }
        if let Some(registration) = state.registration.take() {
            if let Err(e) = self.port.unregister_listener(registration) {
                warn!("Failed to unregister {} listener: {}", self.kind, e);
            }
            info!("Stopped listening to {}", self.kind);
        }
        let worker = state.worker.take();
        drop(state);
        if let Some(worker) = worker {
            worker.quit_safely();
        }
    }

    fn register_value_listener(&self, listener: &mut dyn Notifiable<Values>) -> Uuid {
        self.values.register_listener(listener)
    }

    fn unregister_value_listener(&self, id: Uuid) {
        self.values.unregister_listener(id);
    }
}

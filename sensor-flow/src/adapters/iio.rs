// Linux Industrial I/O sensors exposed through sysfs

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use common::errors::PortError;
use common::traits::{Notifiable, SensorPort};
use common::types::{Dimension, SamplingDelay, SensorEvent, SensorHandle, SensorKind, Values};
use publisher::{PublisherError, PublisherManager};

use super::emitter::Emitter;

pub const DEFAULT_IIO_ROOT: &str = "/sys/bus/iio/devices";

const AXES: [&str; 3] = ["_x", "_y", "_z"];

/// Channel type prefix and unit conversion to the values the dashboard expects.
fn channel_type(kind: SensorKind) -> (&'static str, f32) {
    match kind {
        SensorKind::Light => ("in_illuminance", 1.0),
        SensorKind::Proximity => ("in_proximity", 1.0),
        SensorKind::Accelerometer => ("in_accel", 1.0),
        SensorKind::Gyroscope => ("in_anglvel", 1.0),
        // kPa -> hPa
        SensorKind::Pressure => ("in_pressure", 10.0),
        // gauss -> uT
        SensorKind::Magnetometer => ("in_magn", 100.0),
        // milli degrees Celsius
        SensorKind::AmbientTemperature => ("in_temp", 0.001),
        // milli percent
        SensorKind::Humidity => ("in_humidityrelative", 0.001),
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    let raw = fs::read_to_string(path).ok()?;
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn read_f32(path: &Path) -> Option<f32> {
    read_trimmed(path)?.parse().ok()
}

#[derive(Clone, Debug)]
struct IioChannel {
    device_dir: PathBuf,
    device_name: String,
    type_prefix: &'static str,
    components: Vec<String>,
    factor: f32,
}

impl IioChannel {
    fn discover(device_dir: &Path, kind: SensorKind) -> Option<Self> {
        let (type_prefix, factor) = channel_type(kind);
        let components: Vec<String> = match kind.dimension() {
            Dimension::Scalar => vec![type_prefix.to_string()],
            Dimension::Vector => AXES
                .iter()
                .map(|axis| format!("{type_prefix}{axis}"))
                .collect(),
        };
        let readable = |stem: &String| {
            device_dir.join(format!("{stem}_input")).exists()
                || device_dir.join(format!("{stem}_raw")).exists()
        };
        if !components.iter().all(readable) {
            return None;
        }
        let device_name = read_trimmed(&device_dir.join("name")).unwrap_or_else(|| {
            device_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        Some(Self {
            device_dir: device_dir.to_path_buf(),
            device_name,
            type_prefix,
            components,
            factor,
        })
    }

    /// Processed `_input` when the driver provides it, `(raw + offset) * scale` otherwise.
    fn read_component(&self, stem: &str) -> Option<f32> {
        if let Some(value) = read_f32(&self.device_dir.join(format!("{stem}_input"))) {
            return Some(value * self.factor);
        }
        let raw = read_f32(&self.device_dir.join(format!("{stem}_raw")))?;
        let offset = self.attribute(stem, "offset").unwrap_or(0.0);
        let scale = self.attribute(stem, "scale").unwrap_or(1.0);
        Some((raw + offset) * scale * self.factor)
    }

    // per channel attribute first, then the one shared by the channel type
    fn attribute(&self, stem: &str, attribute: &str) -> Option<f32> {
        read_f32(&self.device_dir.join(format!("{stem}_{attribute}"))).or_else(|| {
            read_f32(
                &self
                    .device_dir
                    .join(format!("{}_{attribute}", self.type_prefix)),
            )
        })
    }

    fn read(&self) -> Option<Values> {
        self.components
            .iter()
            .map(|stem| self.read_component(stem))
            .collect()
    }
}

/// Sensor port backed by the IIO subsystem. Each device directory under the root is
/// scanned once, at construction, for the channels of every [`SensorKind`]; the first
/// device exposing a kind provides it. Registered kinds are polled at the requested
/// sampling period.
pub struct IioDevice {
    root: PathBuf,
    channels: HashMap<SensorKind, IioChannel>,
    publishers: PublisherManager<SensorEvent, SensorKind>,
    pollers: DashMap<SensorKind, Emitter>,
    started: Instant,
}

impl IioDevice {
    pub fn new() -> Result<Self, PortError> {
        Self::with_root(DEFAULT_IIO_ROOT)
    }

    pub fn with_root(root: impl AsRef<Path>) -> Result<Self, PortError> {
        let root = root.as_ref().to_path_buf();
        let mut device_dirs: Vec<PathBuf> = fs::read_dir(&root)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        device_dirs.sort();

        let mut channels = HashMap::new();
        for kind in SensorKind::ALL {
            if let Some(channel) = device_dirs
                .iter()
                .find_map(|dir| IioChannel::discover(dir, kind))
            {
                info!("IIO {} found on {}", kind, channel.device_name);
                channels.insert(kind, channel);
            }
        }
        if channels.is_empty() {
            warn!("No IIO sensors under {}", root.display());
        }

        let kinds: Vec<SensorKind> = channels.keys().copied().collect();
        Ok(Self {
            root,
            channels,
            publishers: PublisherManager::new(&kinds),
            pollers: DashMap::new(),
            started: Instant::now(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Kinds discovered under the root, in [`SensorKind::ALL`] order.
    pub fn available(&self) -> Vec<SensorKind> {
        self.publishers.get_available_publisher_types()
    }

    /// Reads the current value of `kind` straight from sysfs.
    pub fn read(&self, kind: SensorKind) -> Option<Values> {
        self.channels.get(&kind)?.read()
    }

    fn start_poller(&self, kind: SensorKind, delay: SamplingDelay) -> Result<(), PortError> {
        let Entry::Vacant(slot) = self.pollers.entry(kind) else {
            return Ok(());
        };
        let channel = self
            .channels
            .get(&kind)
            .cloned()
            .ok_or(PortError::SensorNotFound(kind.sensor_type()))?;
        let publishers = self.publishers.clone();
        let started = self.started;

        let poller = Emitter::spawn(&format!("iio-{kind:?}"), delay.period(), move || {
            let Some(values) = channel.read() else {
                debug!("IIO {} read failed on {}", kind, channel.device_name);
                return;
            };
            let timestamp = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
            let event = SensorEvent::new(kind.sensor_type(), values, timestamp);
            publishers.notify_listeners(kind, Arc::new(event));
        })
        .map_err(|e| PortError::Registration(e.to_string()))?;

        slot.insert(poller);
        Ok(())
    }
}

impl SensorPort for IioDevice {
    fn has_system_feature(&self, feature: &str) -> bool {
        SensorKind::from_feature(feature).is_some_and(|kind| self.channels.contains_key(&kind))
    }

    fn default_sensor(&self, sensor_type: i32) -> Option<SensorHandle> {
        let kind = SensorKind::from_sensor_type(sensor_type)?;
        let channel = self.channels.get(&kind)?;
        Some(SensorHandle::new(sensor_type, &channel.device_name))
    }

    fn register_listener(
        &self,
        sensor: &SensorHandle,
        delay: SamplingDelay,
        listener: &mut dyn Notifiable<SensorEvent>,
    ) -> Result<Uuid, PortError> {
        let kind = SensorKind::from_sensor_type(sensor.sensor_type)
            .filter(|kind| self.channels.contains_key(kind))
            .ok_or(PortError::SensorNotFound(sensor.sensor_type))?;
        let id = self
            .publishers
            .add_listener(listener, &kind)
            .map_err(|e| PortError::Registration(e.to_string()))?;
        if let Err(e) = self.start_poller(kind, delay) {
            let _ = self.publishers.remove_listener(id);
            return Err(e);
        }
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
            .pollers
            .remove_if(&kind, |_, _| self.publishers.listener_count(&kind) == 0);
        if let Some((_, mut poller)) = idle {
            poller.stop();
        }
        Ok(())
    }
}

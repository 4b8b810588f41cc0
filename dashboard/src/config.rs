use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use common::constants::{CHART_CAPACITY, NOISE_THRESHOLD, STOP_TIMEOUT_MILLIS};
use common::types::{SamplingDelay, SensorKind};
use sensor_flow::adapters::iio::DEFAULT_IIO_ROOT;

use crate::errors::ConfigError;

const DEFAULT_NOISE_STDEV: f32 = 0.05;

/// Where the readings come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeviceConfig {
    Simulated {
        #[serde(default = "default_noise_stdev")]
        noise_stdev: Option<f32>,
        #[serde(default = "default_present")]
        present: Vec<SensorKind>,
    },
    Iio {
        #[serde(default = "default_iio_root")]
        root: PathBuf,
    },
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig::Simulated {
            noise_stdev: default_noise_stdev(),
            present: default_present(),
        }
    }
}

fn default_noise_stdev() -> Option<f32> {
    Some(DEFAULT_NOISE_STDEV)
}

fn default_present() -> Vec<SensorKind> {
    SensorKind::ALL.to_vec()
}

fn default_iio_root() -> PathBuf {
    PathBuf::from(DEFAULT_IIO_ROOT)
}

/// Dashboard settings, read from a JSON file. Every field is optional.
///
/// ```rust
/// use dashboard::config::{DashboardConfig, DeviceConfig};
///
/// let config = DashboardConfig::from_json(r#"{ "noise_threshold": 0.5, "device": { "kind": "iio" } }"#).unwrap();
/// assert_eq!(config.noise_threshold, 0.5);
/// assert_eq!(config.stop_timeout_millis, 5000);
/// assert!(matches!(config.device, DeviceConfig::Iio { .. }));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub noise_threshold: f32,
    pub stop_timeout_millis: u64,
    pub chart_capacity: usize,
    pub smoothing_window: Option<usize>,
    pub sampling_delay: SamplingDelay,
    pub device: DeviceConfig,
    /// Stop after this many milliseconds instead of waiting for Ctrl-C.
    pub run_for_millis: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            noise_threshold: NOISE_THRESHOLD,
            stop_timeout_millis: STOP_TIMEOUT_MILLIS,
            chart_capacity: CHART_CAPACITY,
            smoothing_window: None,
            sampling_delay: SamplingDelay::default(),
            device: DeviceConfig::default(),
            run_for_millis: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reads `path` when given, defaults otherwise.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_millis)
    }
}

//! Module errors

use common::errors::PortError;
use sensor_flow::SensorError;
use thiserror::Error;

/// Errors raised while loading a [`DashboardConfig`](crate::config::DashboardConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Represents the different types of errors that can stop the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The device port could not be opened.
    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Sensor(#[from] SensorError),
}

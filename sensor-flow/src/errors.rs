//! Module errors

use common::errors::PortError;
use thiserror::Error;

/// Represents the different types of errors that can occur while acquiring sensor data.
#[derive(Debug, Error)]
pub enum SensorError {
    /// The platform port rejected an operation.
    #[error(transparent)]
    Port(#[from] PortError),

    /// The dedicated delivery thread could not be started.
    #[error("failed to start sensor worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// The simulated noise distribution is invalid.
    #[error("invalid noise model: {0}")]
    NoiseModel(String),
}

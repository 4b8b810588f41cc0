//! Module errors

use thiserror::Error;
use uuid::Uuid;

/// Errors reported by a platform sensor port.
#[derive(Debug, Error)]
pub enum PortError {
    /// The device does not provide a sensor for the requested type identifier.
    #[error("no sensor available for type {0}")]
    SensorNotFound(i32),

    /// The platform refused to register a listener.
    #[error("listener registration failed: {0}")]
    Registration(String),

    /// The registration id is not known by the port.
    #[error("registration {0} not found")]
    UnknownRegistration(Uuid),

    /// Reading from the device backend failed.
    #[error("device i/o error: {0}")]
    Io(#[from] std::io::Error),
}

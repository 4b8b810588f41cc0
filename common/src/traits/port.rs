use uuid::Uuid;

use crate::errors::PortError;
use crate::traits::Notifiable;
use crate::types::{SamplingDelay, SensorEvent, SensorHandle};

/// Platform sensor service.
///
/// A port delivers readings by push: once a listener is registered, the port calls
/// the listener's callback from its own context every time the hardware reports a
/// new reading, until the registration is removed.
pub trait SensorPort: Send + Sync + 'static {
    /// Returns true when the device declares the capability `feature`.
    fn has_system_feature(&self, feature: &str) -> bool;

    /// Resolves the default hardware sensor for a sensor-type identifier.
    fn default_sensor(&self, sensor_type: i32) -> Option<SensorHandle>;

    /// Starts delivering events from `sensor` to `listener`. Returns the registration id.
    fn register_listener(
        &self,
        sensor: &SensorHandle,
        delay: SamplingDelay,
        listener: &mut dyn Notifiable<SensorEvent>,
    ) -> Result<Uuid, PortError>;

    /// Stops delivering events for `registration`.
    fn unregister_listener(&self, registration: Uuid) -> Result<(), PortError>;
}

pub(crate) mod emitter;
mod gaussian;
pub mod iio;
pub mod simulated;

pub use iio::IioDevice;
pub use simulated::SimulatedDevice;

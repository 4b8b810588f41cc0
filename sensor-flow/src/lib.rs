//! # Crate sensor_flow
//!
//! ## sensor_flow
//!
//! The `sensor_flow` crate turns push-style platform sensor callbacks into cancellable,
//! conflating streams of readings.
//!
//! Features include:
//! - A generic adapter ([`DeviceSensor`]) for the eight built-in sensor kinds, which lazily
//!   registers the hardware listener and delivers callbacks on one dedicated worker thread
//!   per sensor.
//! - [`sensor_flow`], a `Stream` of readings that starts the sensor when opened, stops it
//!   when dropped, and only keeps the latest unconsumed reading.
//! - Stream operators to pick the scalar component, smooth with a moving average and drop
//!   readings that changed less than a noise threshold.
//! - Device ports: a simulated device with Gaussian noise and a Linux IIO sysfs reader.
//!
//! **NOTE** A sensor missing on the device is not an error: starting it is a no-op and its
//! flow never yields.

pub mod adapters;
pub mod errors;
pub mod filter;
pub mod flow;
pub mod sensor;
pub mod suite;
pub mod worker;

pub use errors::SensorError;
pub use filter::{NoiseStreamExt, ReadingStreamExt};
pub use flow::{sensor_flow, SensorFlow};
pub use sensor::{DeviceSensor, MeasurableSensor};
pub use suite::SensorSuite;
pub use worker::{SensorWorker, WorkerHandle};

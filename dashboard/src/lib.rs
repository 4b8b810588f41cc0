//! # Crate dashboard
//!
//! Presentation layer of `sentinel`: turns the sensor flows of a device into shared live
//! values and renders them as a home screen.
//!
//! - [`LiveState`] keeps the latest filtered value of one sensor and only collects the
//!   upstream while it has subscribers, plus a grace period after the last one leaves.
//! - [`HomeModel`] holds the eight states of the home screen.
//! - [`HomeScreen`] subscribes while visible and hands a [`Frame`] (readings table,
//!   compass heading and scrolling charts) to a [`Presenter`] on every change.
//!
//! ```rust,no_run
//! use dashboard::{services, DashboardConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = DashboardConfig {
//!         run_for_millis: Some(10_000),
//!         ..Default::default()
//!     };
//!     let last = services::run_service(&config).await.unwrap();
//!     println!("{:?}", last);
//! }
//! ```

pub mod chart;
pub mod compass;
pub mod config;
pub mod errors;
pub mod home;
pub mod presenter;
pub mod screen;
pub mod services;
pub mod shutdown;
pub mod state;

pub use config::{DashboardConfig, DeviceConfig};
pub use errors::{ConfigError, DashboardError};
pub use home::{HomeModel, HomeSnapshot, Pipeline};
pub use presenter::{LogPresenter, Presenter};
pub use screen::{Frame, HomeScreen};
pub use state::{LiveState, Subscription};

//! Test doubles and fixtures shared by the workspace crates.

pub mod csv_loader;
mod scripted_port;

pub use csv_loader::load_readings;
pub use scripted_port::ScriptedPort;

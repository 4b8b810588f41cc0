pub mod filter;
pub mod port;
pub mod publisher;

pub use crate::traits::filter::{ReadingFilter, Significance};
pub use crate::traits::port::SensorPort;
pub use crate::traits::publisher::Notifiable;

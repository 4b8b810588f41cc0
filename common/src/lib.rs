//! General functionality for the `sentinel` workspace: sensor kinds, platform port,
//! reading filters and buffers shared by every other crate.

pub mod constants;
pub mod errors;

#[doc(hidden)]
pub mod traits;
#[doc(hidden)]
pub mod types;

// Re-export traits
#[doc(inline)]
pub use traits::{Notifiable, ReadingFilter, SensorPort, Significance};

// Re-export types
#[doc(inline)]
pub use errors::PortError;
#[doc(inline)]
pub use types::{
    buffers, filters, Callback, Dimension, SamplingDelay, SensorEvent, SensorHandle, SensorKind,
    Values,
};

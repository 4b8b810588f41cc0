pub mod circular_buffer;

pub use crate::types::buffers::circular_buffer::CircularBuffer;

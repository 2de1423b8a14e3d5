pub mod buffer;
pub(crate) mod cursor;
pub mod raw;
pub mod ring_error;

pub use buffer::RingBuffer;
pub use raw::RawRingBuffer;
pub use ring_error::*;

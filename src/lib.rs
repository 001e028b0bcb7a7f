//! A growable double-ended ring buffer with a wraparound-aware random-access cursor.

pub mod algorithm;
pub mod buffer;
pub mod config;
pub mod error;
pub mod utils;

pub use buffer::{Buffer, RingIter};
pub use config::BufferConfig;
pub use error::{BufferError, BufferResult};

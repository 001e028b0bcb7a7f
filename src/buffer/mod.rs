pub mod cursor;
pub mod iter;
pub mod ring_buffer;
pub mod store;

pub use cursor::RingIter;
pub use iter::{IntoIter, Iter, IterMut};
pub use ring_buffer::Buffer;
pub use store::{RingStore, SlotId, SlotState};

//! `Buffer<T>`: a growable double-ended queue with O(1) random access.
//!
//! Elements live in one contiguous block organised as a ring. Pushing or
//! popping at either end never shifts existing elements; when only the slack
//! slot is left the block doubles and the window is re-centred at slot 0.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

use crate::buffer::cursor::RingIter;
use crate::buffer::iter::{IntoIter, Iter, IterMut};
use crate::buffer::store::{RingStore, SlotId, SlotState};
use crate::config::BufferConfig;
use crate::error::{BufferError, BufferResult};

pub struct Buffer<T> {
    store: RingStore<T>,
}

impl<T> Buffer<T> {
    pub fn new() -> Self {
        let config = BufferConfig::default();
        Self {
            store: RingStore::new(config.initial_capacity, config.log_growth),
        }
    }

    /// Buffer that holds `len` elements before its first growth.
    pub fn with_capacity(len: usize) -> Self {
        let capacity = match len.checked_add(1) {
            Some(capacity) => capacity,
            None => panic!("{}", BufferError::CapacityOverflow(len)),
        };
        Self {
            store: RingStore::new(capacity, BufferConfig::default().log_growth),
        }
    }

    pub fn with_config(config: BufferConfig) -> BufferResult<Self> {
        config.validate()?;
        Ok(Self {
            store: RingStore::new(config.initial_capacity, config.log_growth)
                .with_max_capacity(config.max_capacity),
        })
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Allocated slots, including the reserved slack slot.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    pub fn push_back(&mut self, value: T) {
        self.store.push_back(value);
    }

    pub fn try_push_back(&mut self, value: T) -> BufferResult<()> {
        self.store.try_push_back(value).map(|_| ())
    }

    /// Constructs `value` at the back and returns a reference to it.
    pub fn emplace_back(&mut self, value: T) -> &mut T {
        self.store.push_back(value)
    }

    /// Calls `make` for the new back element and returns a reference to it.
    pub fn emplace_back_with<F>(&mut self, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.store.push_back(make())
    }

    pub fn push_front(&mut self, value: T) {
        self.store.push_front(value);
    }

    pub fn try_push_front(&mut self, value: T) -> BufferResult<()> {
        self.store.try_push_front(value).map(|_| ())
    }

    pub fn emplace_front(&mut self, value: T) -> &mut T {
        self.store.push_front(value)
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.store.pop_front()
    }

    pub fn pop_back(&mut self) -> Option<T> {
        self.store.pop_back()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Makes room for `additional` more elements without further growth.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(e) = self.store.try_reserve(additional) {
            panic!("{e}");
        }
    }

    pub fn try_reserve(&mut self, additional: usize) -> BufferResult<()> {
        self.store.try_reserve(additional)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.store.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.store.get_mut(index)
    }

    pub fn front(&self) -> Option<&T> {
        self.store.get(0)
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.store.get_mut(0)
    }

    pub fn back(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|i| self.store.get(i))
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        match self.len().checked_sub(1) {
            Some(i) => self.store.get_mut(i),
            None => None,
        }
    }

    /// Cursor at the first element.
    pub fn begin(&self) -> RingIter {
        self.cursor_at(self.store.front())
    }

    /// Cursor one past the last element.
    pub fn end(&self) -> RingIter {
        self.cursor_at(self.store.slot_of(self.len()))
    }

    fn cursor_at(&self, slot: SlotId) -> RingIter {
        RingIter::new(
            slot,
            self.store.front(),
            self.store.capacity(),
            self.store.generation(),
        )
    }

    /// Resolves `cursor` to a live slot, panicking if it is stale or outside
    /// the window.
    fn live_slot(&self, cursor: RingIter) -> SlotId {
        if cursor.generation() != self.store.generation() {
            log::trace!(
                "stale cursor at slot {} (generation {}, buffer generation {})",
                cursor.position(),
                cursor.generation(),
                self.store.generation()
            );
            panic!("stale cursor: buffer changed after the cursor was taken");
        }
        let slot = cursor.position();
        assert!(
            self.store.is_live(slot),
            "cursor at slot {slot} is outside the live window (len {})",
            self.len()
        );
        slot
    }

    /// Element under `cursor`.
    pub fn at(&self, cursor: RingIter) -> &T {
        let slot = self.live_slot(cursor);
        match self.store.slot(slot) {
            Some(value) => value,
            None => unreachable!("live slot {slot} holds no element"),
        }
    }

    pub fn at_mut(&mut self, cursor: RingIter) -> &mut T {
        let slot = self.live_slot(cursor);
        match self.store.slot_mut(slot) {
            Some(value) => value,
            None => unreachable!("live slot {slot} holds no element"),
        }
    }

    /// Element `n` steps away from `cursor`; same as `self[cursor + n]`.
    pub fn at_offset(&self, cursor: RingIter, n: isize) -> &T {
        self.at(cursor + n)
    }

    pub fn swap_at(&mut self, a: RingIter, b: RingIter) {
        let (a, b) = (self.live_slot(a), self.live_slot(b));
        self.store.swap_slots(a, b);
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        let len = self.len();
        assert!(i < len && j < len, "swap index out of range (len {len})");
        let (a, b) = (self.store.slot_of(i), self.store.slot_of(j));
        self.store.swap_slots(a, b);
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.store.as_slices())
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.store.as_mut_slices())
    }

    /// The live elements as two runs: up to the wrap point, then the rest.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        self.store.as_slices()
    }

    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        self.store.as_mut_slices()
    }

    /// Occupancy of every physical slot, in physical order.
    pub fn layout(&self) -> Vec<SlotState> {
        self.store.layout()
    }
}

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        let mut out = Self {
            store: RingStore::new(self.capacity(), self.store.log_growth())
                .with_max_capacity(self.store.max_capacity()),
        };
        for value in self.iter() {
            out.push_back(value.clone());
        }
        out
    }
}

impl<T: fmt::Debug> fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Buffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Buffer<T> {}

impl<T: Hash> Hash for Buffer<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for value in self.iter() {
            value.hash(state);
        }
    }
}

impl<T> Index<usize> for Buffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.store.get(index) {
            Some(value) => value,
            None => panic!("index {index} out of range (len {})", self.len()),
        }
    }
}

impl<T> IndexMut<usize> for Buffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.store.get_mut(index) {
            Some(value) => value,
            None => panic!("index {index} out of range (len {len})"),
        }
    }
}

impl<T> Index<RingIter> for Buffer<T> {
    type Output = T;

    fn index(&self, cursor: RingIter) -> &T {
        self.at(cursor)
    }
}

impl<T> IndexMut<RingIter> for Buffer<T> {
    fn index_mut(&mut self, cursor: RingIter) -> &mut T {
        self.at_mut(cursor)
    }
}

impl<T> FromIterator<T> for Buffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut buf = Buffer::with_capacity(iter.size_hint().0);
        buf.extend(iter);
        buf
    }
}

impl<T> Extend<T> for Buffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for Buffer<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> IntoIterator for Buffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a Buffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Buffer<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, const N: usize> From<[T; N]> for Buffer<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

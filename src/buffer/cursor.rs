//! Random-access cursor over a [`Buffer`](crate::buffer::Buffer).
//!
//! A `RingIter` is a plain value: a physical slot plus a snapshot of the
//! store's front, capacity and generation. It borrows nothing, so it stays
//! `Copy` and can be held next to `&mut Buffer`. Elements are reached through
//! the buffer (`buf[it]`, `buf.at(it)`, `buf.at_mut(it)`).
//!
//! # Invalidation
//! Any push, pop, clear or growth changes the buffer's generation. A cursor
//! taken before such a change is stale; dereferencing it panics. Cursor
//! arithmetic and comparison never touch the buffer and stay well defined.

use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::buffer::store::{advance_slot, logical_rank, retreat_slot, wrap_offset, SlotId};

#[derive(Debug, Clone, Copy)]
pub struct RingIter {
    position: SlotId,
    front: SlotId,
    capacity: usize,
    generation: u64,
}

impl RingIter {
    pub(crate) fn new(position: SlotId, front: SlotId, capacity: usize, generation: u64) -> Self {
        debug_assert!(position < capacity && front < capacity);
        Self {
            position,
            front,
            capacity,
            generation,
        }
    }

    /// Physical slot index.
    pub fn position(&self) -> SlotId {
        self.position
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Steps from the snapshot front to this cursor, walking forward.
    pub fn rank(&self) -> usize {
        logical_rank(self.front, self.capacity, self.position)
    }

    /// Cursor `n` steps away; identical to `n` calls of [`inc`](Self::inc)
    /// (or `-n` calls of [`dec`](Self::dec)).
    pub fn offset(self, n: isize) -> Self {
        Self {
            position: wrap_offset(self.capacity, self.position, n),
            ..self
        }
    }

    /// Cursor `n` steps back; `it.offset_back(n)` is `it - n` for every `n`,
    /// `isize::MIN` included.
    pub fn offset_back(self, n: isize) -> Self {
        let steps = n.unsigned_abs();
        let position = if n >= 0 {
            retreat_slot(self.capacity, self.position, steps)
        } else {
            advance_slot(self.capacity, self.position, steps)
        };
        Self { position, ..self }
    }

    /// Pre-increment: advances and returns the advanced cursor.
    pub fn inc(&mut self) -> Self {
        *self = self.offset(1);
        *self
    }

    /// Pre-decrement: retreats and returns the retreated cursor.
    pub fn dec(&mut self) -> Self {
        *self = self.offset(-1);
        *self
    }

    /// Post-increment: advances and returns the cursor as it was.
    pub fn post_inc(&mut self) -> Self {
        let prev = *self;
        self.inc();
        prev
    }

    /// Post-decrement: retreats and returns the cursor as it was.
    pub fn post_dec(&mut self) -> Self {
        let prev = *self;
        self.dec();
        prev
    }

    /// Signed number of forward steps that turn `other` into `self`.
    ///
    /// Both cursors are ranked from the shared front, so the answer is the
    /// plain physical difference when they sit on the same side of the wrap
    /// point and the capacity-adjusted one otherwise.
    pub fn distance_from(&self, other: &RingIter) -> isize {
        self.debug_check_same_source(other);
        self.rank() as isize - other.rank() as isize
    }

    fn debug_check_same_source(&self, other: &RingIter) {
        debug_assert!(
            self.front == other.front && self.capacity == other.capacity,
            "comparing cursors from different buffer states"
        );
    }
}

impl PartialEq for RingIter {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl Eq for RingIter {}

impl PartialOrd for RingIter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RingIter {
    fn cmp(&self, other: &Self) -> Ordering {
        self.debug_check_same_source(other);
        self.rank().cmp(&other.rank())
    }
}

impl Add<isize> for RingIter {
    type Output = RingIter;

    fn add(self, n: isize) -> RingIter {
        self.offset(n)
    }
}

impl Sub<isize> for RingIter {
    type Output = RingIter;

    fn sub(self, n: isize) -> RingIter {
        self.offset_back(n)
    }
}

impl AddAssign<isize> for RingIter {
    fn add_assign(&mut self, n: isize) {
        *self = self.offset(n);
    }
}

impl SubAssign<isize> for RingIter {
    fn sub_assign(&mut self, n: isize) {
        *self = self.offset_back(n);
    }
}

impl Sub<RingIter> for RingIter {
    type Output = isize;

    fn sub(self, other: RingIter) -> isize {
        self.distance_from(&other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(position: usize, front: usize, capacity: usize) -> RingIter {
        RingIter::new(position, front, capacity, 0)
    }

    #[test]
    fn single_steps_wrap_both_ways() {
        let mut it = cursor(7, 6, 8);
        assert_eq!(it.inc().position(), 0);
        assert_eq!(it.dec().position(), 7);
        let before = it.post_inc();
        assert_eq!(before.position(), 7);
        assert_eq!(it.position(), 0);
        let before = it.post_dec();
        assert_eq!(before.position(), 0);
        assert_eq!(it.position(), 7);
    }

    #[test]
    fn offset_matches_repeated_steps() {
        let start = cursor(5, 5, 8);
        for n in -20isize..=20 {
            let mut stepped = start;
            for _ in 0..n.unsigned_abs() {
                if n > 0 {
                    stepped.inc();
                } else {
                    stepped.dec();
                }
            }
            assert_eq!(start + n, stepped, "offset {n}");
            assert_eq!(start - (-n), stepped, "offset {n}");
        }
    }

    #[test]
    fn distance_across_wrap_point() {
        // window starts at 6 of 8: logical 0,1 at slots 6,7 then 2,3,4 at 0,1,2
        let begin = cursor(6, 6, 8);
        let wrapped = cursor(1, 6, 8);
        assert_eq!(wrapped - begin, 3);
        assert_eq!(begin - wrapped, -3);
        assert!(begin < wrapped);
        assert!(wrapped > begin);

        let both_wrapped = cursor(2, 6, 8);
        assert_eq!(both_wrapped - wrapped, 1);
        let both_unwrapped = cursor(7, 6, 8);
        assert_eq!(both_unwrapped - begin, 1);
    }

    #[test]
    fn ordering_ignores_physical_order() {
        let early = cursor(7, 6, 8);
        let late = cursor(0, 6, 8);
        assert!(early.position() > late.position());
        assert!(early < late);
        assert!(early <= late);
        assert!(late >= early);
        assert_ne!(early, late);
    }

    #[test]
    fn compound_assignment() {
        let mut it = cursor(1, 0, 4);
        it += 5;
        assert_eq!(it.position(), 2);
        it -= 3;
        assert_eq!(it.position(), 3);
    }

    #[test]
    fn subtracting_isize_min_moves_forward() {
        let begin = cursor(0, 0, 3);
        let expected = (begin + isize::MAX) + 1isize;
        assert_eq!(expected.position(), 2);
        assert_eq!(begin - isize::MIN, expected);
        let mut it = begin;
        it -= isize::MIN;
        assert_eq!(it, expected);
        assert_eq!(begin + isize::MIN, (begin - isize::MAX) - 1isize);
    }
}

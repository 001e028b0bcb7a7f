//! Low-level ring storage: a block of uninitialized slots plus the live logical window.
//!
//! All wraparound arithmetic in the crate goes through [`physical_slot`] and
//! [`logical_rank`]. Every `unsafe` block in the crate lives in this file.

use std::fmt;
use std::mem::MaybeUninit;

use crate::error::{BufferError, BufferResult};

pub type SlotId = usize;

/// Occupancy of one physical slot, as reported by [`RingStore::layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Vacant,
    Occupied { logical: usize },
}

/// Physical slot holding the element at `logical` for a window starting at `front`.
#[inline]
pub fn physical_slot(front: SlotId, capacity: usize, logical: usize) -> SlotId {
    debug_assert!(front < capacity);
    debug_assert!(logical < capacity);
    let slot = front + logical;
    if slot >= capacity {
        slot - capacity
    } else {
        slot
    }
}

/// Logical distance from `front` to `slot`, walking forward and wrapping at `capacity`.
#[inline]
pub fn logical_rank(front: SlotId, capacity: usize, slot: SlotId) -> usize {
    debug_assert!(front < capacity);
    debug_assert!(slot < capacity);
    if slot >= front {
        slot - front
    } else {
        slot + capacity - front
    }
}

/// Moves `slot` forward by `steps`, wrapping modulo `capacity`.
#[inline]
pub fn advance_slot(capacity: usize, slot: SlotId, steps: usize) -> SlotId {
    debug_assert!(slot < capacity);
    (slot + steps % capacity) % capacity
}

/// Moves `slot` backward by `steps`, wrapping modulo `capacity`.
#[inline]
pub fn retreat_slot(capacity: usize, slot: SlotId, steps: usize) -> SlotId {
    debug_assert!(slot < capacity);
    (slot + capacity - steps % capacity) % capacity
}

/// Moves `slot` by a signed `delta`, wrapping modulo `capacity` in both directions.
#[inline]
pub fn wrap_offset(capacity: usize, slot: SlotId, delta: isize) -> SlotId {
    if delta >= 0 {
        advance_slot(capacity, slot, delta.unsigned_abs())
    } else {
        retreat_slot(capacity, slot, delta.unsigned_abs())
    }
}

fn allocate<T>(capacity: usize) -> Box<[MaybeUninit<T>]> {
    let mut block = Vec::with_capacity(capacity);
    block.resize_with(capacity, MaybeUninit::uninit);
    block.into_boxed_slice()
}

fn try_allocate<T>(capacity: usize) -> BufferResult<Box<[MaybeUninit<T>]>> {
    let mut block = Vec::new();
    block
        .try_reserve_exact(capacity)
        .map_err(|_| BufferError::AllocFailed { slots: capacity })?;
    block.resize_with(capacity, MaybeUninit::uninit);
    Ok(block.into_boxed_slice())
}

/// Exclusive owner of a contiguous slot block.
///
/// Live elements occupy `physical_slot(front, capacity, i)` for `i in 0..len`;
/// every other slot is uninitialized. `len < capacity` always holds, so the
/// end-of-window slot never coincides with `front` unless the store is empty.
pub struct RingStore<T> {
    slots: Box<[MaybeUninit<T>]>,
    front: SlotId,
    len: usize,
    generation: u64,
    log_growth: bool,
    max_capacity: usize,
}

impl<T> RingStore<T> {
    pub fn new(capacity: usize, log_growth: bool) -> Self {
        assert!(capacity > 0, "ring store capacity must be greater than 0");
        Self {
            slots: allocate(capacity),
            front: 0,
            len: 0,
            generation: 0,
            log_growth,
            max_capacity: usize::MAX,
        }
    }

    /// Caps growth: the block never doubles past `max_capacity` slots.
    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity.max(self.capacity());
        self
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn front(&self) -> SlotId {
        self.front
    }

    /// Bumped by every structural change; cursors compare against it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn log_growth(&self) -> bool {
        self.log_growth
    }

    pub fn slot_of(&self, logical: usize) -> SlotId {
        physical_slot(self.front, self.capacity(), logical)
    }

    pub fn logical_of(&self, slot: SlotId) -> usize {
        logical_rank(self.front, self.capacity(), slot)
    }

    pub fn is_live(&self, slot: SlotId) -> bool {
        slot < self.capacity() && self.logical_of(slot) < self.len
    }

    fn has_slack(&self) -> bool {
        self.len + 1 < self.capacity()
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn grown_capacity(&self) -> BufferResult<usize> {
        self.capacity()
            .checked_mul(2)
            .filter(|&doubled| doubled <= self.max_capacity)
            .ok_or(BufferError::CapacityOverflow(self.capacity()))
    }

    /// Moves every live element, in logical order, into slots `0..len` of `block`
    /// and adopts it. The old block is released without dropping anything: its
    /// elements were moved out bitwise.
    fn relocate(&mut self, mut block: Box<[MaybeUninit<T>]>) {
        debug_assert!(block.len() > self.len);
        let old_capacity = self.capacity();
        for (logical, target) in block.iter_mut().take(self.len).enumerate() {
            let slot = physical_slot(self.front, old_capacity, logical);
            // SAFETY: `slot` is inside the live window, so it holds an initialized
            // element. It is read exactly once and the old block is then discarded
            // without running element destructors.
            target.write(unsafe { self.slots[slot].assume_init_read() });
        }
        self.slots = block;
        self.front = 0;
        self.touch();
        if self.log_growth {
            log::debug!(
                "ring store grew from {} to {} slots ({} live)",
                old_capacity,
                self.capacity(),
                self.len
            );
        }
    }

    /// Doubles the block. Aborts through the global allocator on exhaustion.
    pub fn grow(&mut self) {
        let new_capacity = match self.grown_capacity() {
            Ok(capacity) => capacity,
            Err(e) => panic!("{e}"),
        };
        self.relocate(allocate(new_capacity));
    }

    /// Doubles the block, leaving the store untouched if allocation fails.
    pub fn try_grow(&mut self) -> BufferResult<()> {
        let new_capacity = self.grown_capacity()?;
        let block = try_allocate(new_capacity)?;
        self.relocate(block);
        Ok(())
    }

    /// Grows (by doubling) until `additional` more elements fit with slack to spare.
    pub fn try_reserve(&mut self, additional: usize) -> BufferResult<()> {
        let needed = self
            .len
            .checked_add(additional)
            .and_then(|n| n.checked_add(1))
            .ok_or(BufferError::CapacityOverflow(self.capacity()))?;
        let mut target = self.capacity();
        while target < needed {
            target = target
                .checked_mul(2)
                .filter(|&doubled| doubled <= self.max_capacity)
                .ok_or(BufferError::CapacityOverflow(target))?;
        }
        if target > self.capacity() {
            let block = try_allocate(target)?;
            self.relocate(block);
        }
        Ok(())
    }

    /// Constructs `value` in the uninitialized slot just past the window.
    /// The caller must have ensured slack.
    fn construct_back(&mut self, value: T) -> &mut T {
        debug_assert!(self.has_slack());
        let slot = self.slot_of(self.len);
        self.len += 1;
        self.touch();
        self.slots[slot].write(value)
    }

    /// Constructs `value` in the uninitialized slot just before `front`.
    /// The caller must have ensured slack.
    fn construct_front(&mut self, value: T) -> &mut T {
        debug_assert!(self.has_slack());
        let slot = wrap_offset(self.capacity(), self.front, -1);
        self.front = slot;
        self.len += 1;
        self.touch();
        self.slots[slot].write(value)
    }

    pub fn push_back(&mut self, value: T) -> &mut T {
        if !self.has_slack() {
            self.grow();
        }
        self.construct_back(value)
    }

    pub fn try_push_back(&mut self, value: T) -> BufferResult<&mut T> {
        if !self.has_slack() {
            self.try_grow()?;
        }
        Ok(self.construct_back(value))
    }

    pub fn push_front(&mut self, value: T) -> &mut T {
        if !self.has_slack() {
            self.grow();
        }
        self.construct_front(value)
    }

    pub fn try_push_front(&mut self, value: T) -> BufferResult<&mut T> {
        if !self.has_slack() {
            self.try_grow()?;
        }
        Ok(self.construct_front(value))
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let slot = self.front;
        self.front = wrap_offset(self.capacity(), slot, 1);
        self.len -= 1;
        self.touch();
        // SAFETY: `slot` was the first live slot; it is now outside the window,
        // so this is the only read of the element.
        Some(unsafe { self.slots[slot].assume_init_read() })
    }

    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let slot = self.slot_of(self.len - 1);
        self.len -= 1;
        self.touch();
        // SAFETY: `slot` was the last live slot; it is now outside the window,
        // so this is the only read of the element.
        Some(unsafe { self.slots[slot].assume_init_read() })
    }

    /// Drops every live element in logical order. `front` and capacity are kept.
    pub fn clear(&mut self) {
        let (front, len, capacity) = (self.front, self.len, self.capacity());
        // Shrink the window first so a panicking destructor leaks instead of
        // double-dropping.
        self.len = 0;
        self.touch();
        for logical in 0..len {
            let slot = physical_slot(front, capacity, logical);
            // SAFETY: every slot of the old window is initialized and dropped once.
            unsafe { self.slots[slot].assume_init_drop() };
        }
    }

    pub fn slot(&self, slot: SlotId) -> Option<&T> {
        if !self.is_live(slot) {
            return None;
        }
        // SAFETY: live slots are initialized.
        Some(unsafe { self.slots[slot].assume_init_ref() })
    }

    pub fn slot_mut(&mut self, slot: SlotId) -> Option<&mut T> {
        if !self.is_live(slot) {
            return None;
        }
        // SAFETY: live slots are initialized.
        Some(unsafe { self.slots[slot].assume_init_mut() })
    }

    pub fn get(&self, logical: usize) -> Option<&T> {
        if logical >= self.len {
            return None;
        }
        self.slot(self.slot_of(logical))
    }

    pub fn get_mut(&mut self, logical: usize) -> Option<&mut T> {
        if logical >= self.len {
            return None;
        }
        self.slot_mut(self.slot_of(logical))
    }

    /// Exchanges two live slots. Panics if either lies outside the window.
    pub fn swap_slots(&mut self, a: SlotId, b: SlotId) {
        assert!(
            self.is_live(a) && self.is_live(b),
            "swap outside live window: slots {a} and {b} (front {}, len {})",
            self.front,
            self.len
        );
        self.slots.swap(a, b);
    }

    /// The live window as two contiguous runs: `front..` up to the wrap point,
    /// then the wrapped remainder from slot 0.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        let (head, tail) = self.window_ranges();
        let head = &self.slots[head.0..head.1];
        let tail = &self.slots[tail.0..tail.1];
        // SAFETY: both ranges cover only live, initialized slots, and
        // `MaybeUninit<T>` has the same layout as `T`.
        unsafe {
            (
                &*(head as *const [MaybeUninit<T>] as *const [T]),
                &*(tail as *const [MaybeUninit<T>] as *const [T]),
            )
        }
    }

    pub fn as_mut_slices(&mut self) -> (&mut [T], &mut [T]) {
        let (head, tail) = self.window_ranges();
        let (low, high) = self.slots.split_at_mut(head.0);
        let head = &mut high[..head.1 - head.0];
        let tail = &mut low[tail.0..tail.1];
        // SAFETY: as in `as_slices`; the two runs are disjoint.
        unsafe {
            (
                &mut *(head as *mut [MaybeUninit<T>] as *mut [T]),
                &mut *(tail as *mut [MaybeUninit<T>] as *mut [T]),
            )
        }
    }

    fn window_ranges(&self) -> ((usize, usize), (usize, usize)) {
        let capacity = self.capacity();
        let end = self.front + self.len;
        if end <= capacity {
            ((self.front, end), (0, 0))
        } else {
            ((self.front, capacity), (0, end - capacity))
        }
    }

    pub fn layout(&self) -> Vec<SlotState> {
        (0..self.capacity())
            .map(|slot| {
                let logical = self.logical_of(slot);
                if logical < self.len {
                    SlotState::Occupied { logical }
                } else {
                    SlotState::Vacant
                }
            })
            .collect()
    }
}

impl<T> Drop for RingStore<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> fmt::Debug for RingStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingStore")
            .field("front", &self.front)
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Tracked {
        drops: Rc<Cell<usize>>,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    fn wrap_primitives_agree() {
        let capacity = 8;
        for front in 0..capacity {
            for logical in 0..capacity {
                let slot = physical_slot(front, capacity, logical);
                assert_eq!(logical_rank(front, capacity, slot), logical);
            }
        }
        assert_eq!(wrap_offset(8, 0, -1), 7);
        assert_eq!(wrap_offset(8, 7, 1), 0);
        assert_eq!(wrap_offset(8, 3, -11), 0);
        assert_eq!(wrap_offset(8, 3, 21), 0);
        assert_eq!(wrap_offset(8, 5, 0), 5);
        // 2^63 is 2 mod 3 either way round.
        assert_eq!(wrap_offset(3, 0, isize::MIN), 1);
        assert_eq!(advance_slot(3, 0, isize::MIN.unsigned_abs()), 2);
        assert_eq!(retreat_slot(3, 0, isize::MIN.unsigned_abs()), 1);
    }

    #[test]
    fn push_front_wraps_to_last_slot() {
        let mut store = RingStore::new(4, false);
        store.push_back(1);
        store.push_front(0);
        assert_eq!(store.front(), 3);
        assert_eq!(store.capacity(), 4);
        assert_eq!(
            store.layout(),
            vec![
                SlotState::Occupied { logical: 1 },
                SlotState::Vacant,
                SlotState::Vacant,
                SlotState::Occupied { logical: 0 },
            ]
        );
        let (head, tail) = store.as_slices();
        assert_eq!(head, &[0]);
        assert_eq!(tail, &[1]);
    }

    #[test]
    fn growth_recenters_window() {
        let mut store = RingStore::new(2, false);
        store.push_back(10);
        assert_eq!(store.capacity(), 2);
        store.push_front(9);
        assert_eq!(store.capacity(), 4);
        assert_eq!(store.front(), 3);
        store.push_front(8);
        store.push_back(11);
        assert_eq!(store.capacity(), 8);
        assert_eq!(store.front(), 0);
        let collected: Vec<_> = (0..store.len()).map(|i| *store.get(i).unwrap()).collect();
        assert_eq!(collected, vec![8, 9, 10, 11]);
    }

    #[test]
    fn generation_moves_on_structural_change_only() {
        let mut store = RingStore::new(4, false);
        let g0 = store.generation();
        store.push_back(1);
        let g1 = store.generation();
        assert_ne!(g0, g1);
        *store.get_mut(0).unwrap() = 5;
        assert_eq!(store.generation(), g1);
        store.pop_back();
        assert_ne!(store.generation(), g1);
    }

    #[test]
    fn clear_and_drop_destroy_each_element_once() {
        let drops = Rc::new(Cell::new(0));
        {
            let mut store = RingStore::new(2, false);
            for _ in 0..5 {
                store.push_front(Tracked {
                    drops: drops.clone(),
                });
            }
            store.clear();
            assert_eq!(drops.get(), 5);
            assert_eq!(store.len(), 0);
            for _ in 0..3 {
                store.push_back(Tracked {
                    drops: drops.clone(),
                });
            }
        }
        assert_eq!(drops.get(), 8);
    }

    #[test]
    fn clear_keeps_front_and_capacity() {
        let mut store = RingStore::new(4, false);
        store.push_back(1);
        store.push_back(2);
        store.pop_front();
        let (front, capacity) = (store.front(), store.capacity());
        store.clear();
        assert_eq!(store.front(), front);
        assert_eq!(store.capacity(), capacity);
    }

    #[test]
    fn try_reserve_doubles_until_fit() {
        let mut store: RingStore<u8> = RingStore::new(2, false);
        store.try_reserve(5).unwrap();
        assert_eq!(store.capacity(), 8);
        store.try_reserve(7).unwrap();
        assert_eq!(store.capacity(), 8);
        assert_eq!(
            store.try_reserve(usize::MAX),
            Err(BufferError::CapacityOverflow(8))
        );
        assert_eq!(store.capacity(), 8);
    }

    #[test]
    fn failed_allocation_leaves_store_untouched() {
        let mut store: RingStore<[u8; 1 << 16]> = RingStore::new(2, false);
        store.push_back([7; 1 << 16]);
        let (front, generation) = (store.front(), store.generation());
        assert_eq!(
            store.try_reserve(1 << 48),
            Err(BufferError::AllocFailed { slots: 1 << 49 })
        );
        assert_eq!(store.capacity(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.front(), front);
        assert_eq!(store.generation(), generation);
        assert_eq!(store.get(0).map(|block| block[0]), Some(7));
    }

    #[test]
    fn max_capacity_stops_growth() {
        let mut store = RingStore::new(4, false).with_max_capacity(4);
        store.push_back(2);
        store.push_front(1);
        store.push_front(0);
        assert_eq!(store.front(), 2);
        let generation = store.generation();

        assert_eq!(store.try_push_back(3), Err(BufferError::CapacityOverflow(4)));
        assert_eq!(store.try_push_front(-1), Err(BufferError::CapacityOverflow(4)));
        assert_eq!(store.try_reserve(1), Err(BufferError::CapacityOverflow(4)));
        assert_eq!(store.capacity(), 4);
        assert_eq!(store.front(), 2);
        assert_eq!(store.generation(), generation);
        assert_eq!(store.as_slices(), (&[0, 1][..], &[2][..]));

        store.pop_back();
        assert_eq!(store.try_push_back(5).copied(), Ok(5));
    }

    #[test]
    fn swap_outside_window_panics() {
        let mut store = RingStore::new(4, false);
        store.push_back(1);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.swap_slots(0, 2);
        }));
        assert!(result.is_err());
    }

    #[test]
    fn zero_sized_elements() {
        let mut store = RingStore::new(2, false);
        for _ in 0..100 {
            store.push_back(());
        }
        assert_eq!(store.len(), 100);
        assert_eq!(store.capacity(), 128);
        assert_eq!(store.pop_front(), Some(()));
    }
}

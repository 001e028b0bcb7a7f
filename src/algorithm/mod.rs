//! Sequence algorithms that only see a half-open cursor range.
//!
//! Nothing here knows about wraparound: positions are produced by cursor
//! arithmetic (`first + i`), compared with `<`, and measured with `last - first`.

use std::cmp::Ordering;
use std::ops::{Add, Sub};

use crate::buffer::{Buffer, RingIter};

/// Ranges shorter than this are sorted by insertion instead of heapsort.
const INSERTION_SORT_THRESHOLD: isize = 16;

pub trait RandomAccessCursor:
    Copy + Ord + Add<isize, Output = Self> + Sub<isize, Output = Self> + Sub<Self, Output = isize>
{
}

impl<C> RandomAccessCursor for C where
    C: Copy + Ord + Add<isize, Output = C> + Sub<isize, Output = C> + Sub<C, Output = isize>
{
}

/// A container whose elements can be read and exchanged through cursors.
pub trait CursorAccess {
    type Item;
    type Cursor: RandomAccessCursor;

    fn at(&self, cursor: Self::Cursor) -> &Self::Item;

    fn swap_at(&mut self, a: Self::Cursor, b: Self::Cursor);
}

impl<T> CursorAccess for Buffer<T> {
    type Item = T;
    type Cursor = RingIter;

    fn at(&self, cursor: RingIter) -> &T {
        Buffer::at(self, cursor)
    }

    fn swap_at(&mut self, a: RingIter, b: RingIter) {
        Buffer::swap_at(self, a, b)
    }
}

pub fn distance<C: RandomAccessCursor>(first: C, last: C) -> isize {
    last - first
}

/// Sorts `[first, last)` ascending. Not stable.
pub fn sort<S>(seq: &mut S, first: S::Cursor, last: S::Cursor)
where
    S: CursorAccess + ?Sized,
    S::Item: Ord,
{
    sort_by(seq, first, last, |a, b| a.cmp(b));
}

pub fn sort_by<S, F>(seq: &mut S, first: S::Cursor, last: S::Cursor, mut compare: F)
where
    S: CursorAccess + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    let len = distance(first, last);
    if len < 2 {
        return;
    }
    if len <= INSERTION_SORT_THRESHOLD {
        insertion_sort(seq, first, len, &mut compare);
    } else {
        heap_sort(seq, first, len, &mut compare);
    }
}

pub fn sort_by_key<S, K, F>(seq: &mut S, first: S::Cursor, last: S::Cursor, mut key: F)
where
    S: CursorAccess + ?Sized,
    K: Ord,
    F: FnMut(&S::Item) -> K,
{
    sort_by(seq, first, last, |a, b| key(a).cmp(&key(b)));
}

fn insertion_sort<S, F>(seq: &mut S, first: S::Cursor, len: isize, compare: &mut F)
where
    S: CursorAccess + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    for i in 1..len {
        let mut j = i;
        while j > 0 && compare(seq.at(first + (j - 1)), seq.at(first + j)) == Ordering::Greater {
            seq.swap_at(first + (j - 1), first + j);
            j -= 1;
        }
    }
}

fn heap_sort<S, F>(seq: &mut S, first: S::Cursor, len: isize, compare: &mut F)
where
    S: CursorAccess + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    for root in (0..len / 2).rev() {
        sift_down(seq, first, root, len, compare);
    }
    for end in (1..len).rev() {
        seq.swap_at(first, first + end);
        sift_down(seq, first, 0, end, compare);
    }
}

fn sift_down<S, F>(seq: &mut S, first: S::Cursor, mut root: isize, end: isize, compare: &mut F)
where
    S: CursorAccess + ?Sized,
    F: FnMut(&S::Item, &S::Item) -> Ordering,
{
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            break;
        }
        if child + 1 < end
            && compare(seq.at(first + child), seq.at(first + (child + 1))) == Ordering::Less
        {
            child += 1;
        }
        if compare(seq.at(first + root), seq.at(first + child)) != Ordering::Less {
            break;
        }
        seq.swap_at(first + root, first + child);
        root = child;
    }
}

/// Reverses `[first, last)` in place.
pub fn reverse<S>(seq: &mut S, first: S::Cursor, last: S::Cursor)
where
    S: CursorAccess + ?Sized,
{
    let (mut lo, mut hi) = (first, last);
    while lo < hi {
        hi = hi - 1isize;
        if lo < hi {
            seq.swap_at(lo, hi);
            lo = lo + 1isize;
        }
    }
}

/// First cursor in `[first, last)` whose element equals `value`, or `last`.
pub fn find<S>(seq: &S, first: S::Cursor, last: S::Cursor, value: &S::Item) -> S::Cursor
where
    S: CursorAccess + ?Sized,
    S::Item: PartialEq,
{
    find_if(seq, first, last, |item| item == value)
}

pub fn find_if<S, P>(seq: &S, first: S::Cursor, last: S::Cursor, mut pred: P) -> S::Cursor
where
    S: CursorAccess + ?Sized,
    P: FnMut(&S::Item) -> bool,
{
    let mut it = first;
    while it < last {
        if pred(seq.at(it)) {
            return it;
        }
        it = it + 1isize;
    }
    last
}

pub fn is_sorted<S>(seq: &S, first: S::Cursor, last: S::Cursor) -> bool
where
    S: CursorAccess + ?Sized,
    S::Item: Ord,
{
    let len = distance(first, last);
    (1..len).all(|i| seq.at(first + (i - 1)) <= seq.at(first + i))
}

/// First cursor in the sorted range `[first, last)` whose element is not less
/// than `value`, found by bisecting with cursor offsets.
pub fn lower_bound<S>(seq: &S, first: S::Cursor, last: S::Cursor, value: &S::Item) -> S::Cursor
where
    S: CursorAccess + ?Sized,
    S::Item: Ord,
{
    let (mut lo, mut count) = (first, distance(first, last));
    while count > 0 {
        let step = count / 2;
        let mid = lo + step;
        if seq.at(mid) < value {
            lo = mid + 1isize;
            count -= step + 1;
        } else {
            count = step;
        }
    }
    lo
}

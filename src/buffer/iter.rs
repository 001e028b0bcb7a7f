use std::iter::FusedIterator;
use std::slice;

use crate::buffer::Buffer;

/// Borrowing iterator over a buffer in logical order.
#[derive(Debug)]
pub struct Iter<'a, T> {
    head: slice::Iter<'a, T>,
    tail: slice::Iter<'a, T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            tail: self.tail.clone(),
        }
    }
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new((head, tail): (&'a [T], &'a [T])) -> Self {
        Self {
            head: head.iter(),
            tail: tail.iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.head.next().or_else(|| self.tail.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.head.len() + self.tail.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tail.next_back().or_else(|| self.head.next_back())
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable iterator over a buffer in logical order.
#[derive(Debug)]
pub struct IterMut<'a, T> {
    head: slice::IterMut<'a, T>,
    tail: slice::IterMut<'a, T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new((head, tail): (&'a mut [T], &'a mut [T])) -> Self {
        Self {
            head: head.iter_mut(),
            tail: tail.iter_mut(),
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        self.head.next().or_else(|| self.tail.next())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.head.len() + self.tail.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.tail.next_back().or_else(|| self.head.next_back())
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator; pops from the front (or back) of the consumed buffer.
#[derive(Debug)]
pub struct IntoIter<T> {
    buffer: Buffer<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(buffer: Buffer<T>) -> Self {
        Self { buffer }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.buffer.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.buffer.len(), Some(self.buffer.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.buffer.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use crate::buffer::Buffer;

    fn wrapped() -> Buffer<i32> {
        // capacity 8, front at slot 6: [3 4 5 * * * 1 2]
        let mut buf = Buffer::with_capacity(7);
        for v in [3, 4, 5] {
            buf.push_back(v);
        }
        buf.push_front(2);
        buf.push_front(1);
        buf
    }

    #[test]
    fn iterates_in_logical_order_across_wrap() {
        let buf = wrapped();
        let forward: Vec<_> = buf.iter().copied().collect();
        assert_eq!(forward, vec![1, 2, 3, 4, 5]);
        let backward: Vec<_> = buf.iter().rev().copied().collect();
        assert_eq!(backward, vec![5, 4, 3, 2, 1]);
        assert_eq!(buf.iter().len(), 5);
    }

    #[test]
    fn meet_in_the_middle() {
        let buf = wrapped();
        let mut it = buf.iter();
        assert_eq!(it.next(), Some(&1));
        assert_eq!(it.next_back(), Some(&5));
        assert_eq!(it.next(), Some(&2));
        assert_eq!(it.next_back(), Some(&4));
        assert_eq!(it.next(), Some(&3));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    #[test]
    fn iter_mut_updates_in_place() {
        let mut buf = wrapped();
        for v in buf.iter_mut() {
            *v *= 10;
        }
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![10, 20, 30, 40, 50]);
    }

    #[test]
    fn into_iter_drains_from_both_ends() {
        let buf = wrapped();
        let mut it = buf.into_iter();
        assert_eq!(it.len(), 5);
        assert_eq!(it.next_back(), Some(5));
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.collect::<Vec<_>>(), vec![2, 3, 4]);
    }

    #[test]
    fn iter_clones_without_clone_elements() {
        #[derive(Debug, PartialEq)]
        struct Token(u8);

        let mut buf = Buffer::with_capacity(3);
        buf.push_back(Token(2));
        buf.push_front(Token(1));
        let mut it = buf.iter();
        assert_eq!(it.next(), Some(&Token(1)));
        let rest = it.clone();
        assert_eq!(it.next(), Some(&Token(2)));
        assert_eq!(rest.collect::<Vec<_>>(), vec![&Token(2)]);
    }
}

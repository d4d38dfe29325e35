// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use num_traits::PrimInt;
use std::cmp::{max, min};

/// A half-open interval `[start, end)` over slot indices.
///
/// Berth occupancy is expressed with this type: a vessel that starts at slot
/// `s`, occupies `d` slots and leaves a turnover gap of `g` slots covers
/// `[s, s + d + g)`. Two such intervals on the same berth are compatible
/// exactly when they do not intersect.
///
/// # Invariants
/// `start_inclusive` must always be less than or equal to `end_exclusive`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClosedOpenInterval<T>
where
    T: PrimInt,
{
    start_inclusive: T,
    end_exclusive: T,
}

impl<T> ClosedOpenInterval<T>
where
    T: PrimInt,
{
    /// Creates a new `ClosedOpenInterval`.
    ///
    /// # Panics
    ///
    /// Panics if `start_inclusive > end_exclusive`.
    #[inline]
    pub fn new(start_inclusive: T, end_exclusive: T) -> Self {
        assert!(
            start_inclusive <= end_exclusive,
            "called `ClosedOpenInterval::new` with start greater than end"
        );
        Self {
            start_inclusive,
            end_exclusive,
        }
    }

    /// Creates a new `ClosedOpenInterval`, returning `None` if
    /// `start_inclusive > end_exclusive`.
    #[inline]
    pub fn try_new(start_inclusive: T, end_exclusive: T) -> Option<Self> {
        if start_inclusive > end_exclusive {
            return None;
        }
        Some(Self {
            start_inclusive,
            end_exclusive,
        })
    }

    /// Creates the interval `[start, start + length)`, returning `None`
    /// on a negative length or on overflow.
    #[inline]
    pub fn with_length(start: T, length: T) -> Option<Self> {
        if length < T::zero() {
            return None;
        }
        let end = start.checked_add(&length)?;
        Some(Self {
            start_inclusive: start,
            end_exclusive: end,
        })
    }

    /// Creates the interval covering the closed range `[low, high]`,
    /// or `None` if the range is empty or `high + 1` overflows.
    #[inline]
    pub fn from_inclusive(low: T, high: T) -> Option<Self> {
        if low > high {
            return None;
        }
        let end = high.checked_add(&T::one())?;
        Some(Self {
            start_inclusive: low,
            end_exclusive: end,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> T {
        self.start_inclusive
    }

    #[inline(always)]
    pub fn end(&self) -> T {
        self.end_exclusive
    }

    /// Returns the number of slots covered by the interval.
    #[inline(always)]
    pub fn len(&self) -> T {
        self.end_exclusive - self.start_inclusive
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.start_inclusive == self.end_exclusive
    }

    /// Returns `true` if `point` lies in `[start, end)`.
    #[inline]
    pub fn contains(&self, point: T) -> bool {
        self.start_inclusive <= point && point < self.end_exclusive
    }

    /// Returns `true` if both intervals share at least one slot.
    ///
    /// Touching intervals such as `[0, 5)` and `[5, 8)` do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.start_inclusive < other.end_exclusive && other.start_inclusive < self.end_exclusive
    }

    /// Returns the common part of both intervals, if any.
    #[inline]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = max(self.start_inclusive, other.start_inclusive);
        let end = min(self.end_exclusive, other.end_exclusive);
        if start < end {
            Some(Self {
                start_inclusive: start,
                end_exclusive: end,
            })
        } else {
            None
        }
    }

    /// Returns this interval with its start raised to at least `floor`,
    /// or `None` if nothing remains.
    #[inline]
    pub fn clamp_start(&self, floor: T) -> Option<Self> {
        let start = max(self.start_inclusive, floor);
        if start < self.end_exclusive {
            Some(Self {
                start_inclusive: start,
                end_exclusive: self.end_exclusive,
            })
        } else {
            None
        }
    }
}

impl<T> std::fmt::Debug for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}, {:?})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T> std::fmt::Display for ClosedOpenInterval<T>
where
    T: PrimInt + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start_inclusive, self.end_exclusive)
    }
}

impl<T> From<ClosedOpenInterval<T>> for std::ops::Range<T>
where
    T: PrimInt,
{
    fn from(interval: ClosedOpenInterval<T>) -> Self {
        interval.start_inclusive..interval.end_exclusive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    #[test]
    fn test_new_and_accessors() {
        let iv = ClosedOpenInterval::<IntegerType>::new(3, 9);
        assert_eq!(iv.start(), 3);
        assert_eq!(iv.end(), 9);
        assert_eq!(iv.len(), 6);
        assert!(!iv.is_empty());
    }

    #[test]
    #[should_panic(expected = "start greater than end")]
    fn test_new_panics_on_reversed_bounds() {
        let _ = ClosedOpenInterval::<IntegerType>::new(5, 4);
    }

    #[test]
    fn test_try_new_rejects_reversed_bounds() {
        assert!(ClosedOpenInterval::<IntegerType>::try_new(5, 4).is_none());
        assert!(ClosedOpenInterval::<IntegerType>::try_new(4, 4).is_some());
    }

    #[test]
    fn test_with_length_and_overflow() {
        let iv = ClosedOpenInterval::<IntegerType>::with_length(10, 7).unwrap();
        assert_eq!(iv, ClosedOpenInterval::new(10, 17));
        assert!(ClosedOpenInterval::<IntegerType>::with_length(IntegerType::MAX, 1).is_none());
        assert!(ClosedOpenInterval::<IntegerType>::with_length(0, -1).is_none());
    }

    #[test]
    fn test_from_inclusive() {
        let iv = ClosedOpenInterval::<IntegerType>::from_inclusive(2, 2).unwrap();
        assert_eq!(iv.len(), 1);
        assert!(iv.contains(2));
        assert!(ClosedOpenInterval::<IntegerType>::from_inclusive(3, 2).is_none());
    }

    #[test]
    fn test_touching_intervals_do_not_intersect() {
        let a = ClosedOpenInterval::<IntegerType>::new(0, 5);
        let b = ClosedOpenInterval::<IntegerType>::new(5, 8);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
        assert!(a.intersection(&b).is_none());
    }

    #[test]
    fn test_overlapping_intervals_intersect() {
        let a = ClosedOpenInterval::<IntegerType>::new(0, 6);
        let b = ClosedOpenInterval::<IntegerType>::new(5, 8);
        assert!(a.intersects(&b));
        assert_eq!(a.intersection(&b), Some(ClosedOpenInterval::new(5, 6)));
    }

    #[test]
    fn test_clamp_start() {
        let iv = ClosedOpenInterval::<IntegerType>::new(2, 10);
        assert_eq!(iv.clamp_start(0), Some(iv));
        assert_eq!(iv.clamp_start(7), Some(ClosedOpenInterval::new(7, 10)));
        assert_eq!(iv.clamp_start(10), None);
    }

    #[test]
    fn test_display_and_range_conversion() {
        let iv = ClosedOpenInterval::<IntegerType>::new(1, 4);
        assert_eq!(format!("{}", iv), "[1, 4)");
        assert_eq!(format!("{:?}", iv), "[1, 4)");
        let range: std::ops::Range<IntegerType> = iv.into();
        assert_eq!(range.collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}

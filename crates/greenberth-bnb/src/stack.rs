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

//! Frame-structured decision stack.
//!
//! Decisions of all open levels live in one vector; `frames[i]` is the index
//! where level `i` begins. The search pops decisions from the top level and
//! drops a whole level at once on backtrack.

use crate::branching::decision::Decision;

#[derive(Debug, Clone)]
pub struct SearchStack<T> {
    entries: Vec<Decision<T>>,
    frames: Vec<usize>,
}

impl<T> Default for SearchStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchStack<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a stack sized for the given problem.
    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_vessels.saturating_mul(num_berths)),
            frames: Vec::with_capacity(num_vessels.saturating_add(1)),
        }
    }

    #[inline]
    pub fn ensure_capacity(&mut self, num_berths: usize, num_vessels: usize) {
        let entry_capacity = num_vessels.saturating_mul(num_berths);
        let frame_capacity = num_vessels.saturating_add(1);
        self.entries
            .reserve(entry_capacity.saturating_sub(self.entries.len()));
        self.frames
            .reserve(frame_capacity.saturating_sub(self.frames.len()));
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of open levels.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Opens a new level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Closes the current level and drops its remaining decisions.
    #[inline]
    pub fn pop_frame(&mut self) -> Option<()> {
        let start = self.frames.pop()?;
        self.entries.truncate(start);
        Some(())
    }

    /// Pushes the decisions onto the current level so that they are popped in
    /// the order the iterator yields them. Returns how many were pushed.
    #[inline]
    pub fn extend_in_order<I>(&mut self, iter: I) -> usize
    where
        I: IntoIterator<Item = Decision<T>>,
    {
        let start = self.entries.len();
        self.entries.extend(iter);
        self.entries[start..].reverse();
        self.entries.len() - start
    }

    /// Pops the next decision of the top level.
    #[inline]
    pub fn pop(&mut self) -> Option<Decision<T>> {
        match self.frames.last() {
            Some(&start) if self.entries.len() > start => self.entries.pop(),
            _ => None,
        }
    }

    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        match self.frames.last() {
            Some(&start) => self.entries.len() == start,
            None => true,
        }
    }

    /// Returns the decisions still pending on the top level, next one last.
    #[inline]
    pub fn current_frame_entries(&self) -> &[Decision<T>] {
        match self.frames.last() {
            Some(&start) => &self.entries[start..],
            None => &[],
        }
    }

    /// Clears all entries and frames, keeping the allocations.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenberth_model::index::{BerthIndex, VesselIndex};

    type IntegerType = i64;

    fn d(vessel: usize, start: IntegerType) -> Decision<IntegerType> {
        Decision::new(VesselIndex::new(vessel), BerthIndex::new(0), start, 0)
    }

    #[test]
    fn test_pops_in_iteration_order() {
        let mut stack = SearchStack::new();
        stack.push_frame();
        assert_eq!(stack.extend_in_order([d(0, 0), d(1, 1), d(2, 2)]), 3);
        assert_eq!(stack.pop(), Some(d(0, 0)));
        assert_eq!(stack.pop(), Some(d(1, 1)));
        assert_eq!(stack.current_frame_entries(), &[d(2, 2)]);
    }

    #[test]
    fn test_levels_are_isolated() {
        let mut stack = SearchStack::preallocated(1, 3);
        stack.push_frame();
        stack.extend_in_order([d(0, 0), d(1, 0)]);
        stack.pop();

        stack.push_frame();
        assert!(stack.is_current_level_empty());
        assert_eq!(stack.pop(), None, "must not pop the parent level");
        stack.extend_in_order([d(2, 5)]);
        assert_eq!(stack.depth(), 2);

        stack.pop_frame();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.pop(), Some(d(1, 0)));
        assert!(stack.is_current_level_empty());
    }

    #[test]
    fn test_reset() {
        let mut stack = SearchStack::new();
        stack.push_frame();
        stack.extend_in_order([d(0, 0)]);
        stack.reset();
        assert!(stack.is_empty());
        assert_eq!(stack.num_entries(), 0);
        assert!(stack.is_current_level_empty());
        assert_eq!(stack.pop_frame(), None);
    }
}

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

//! A complete assignment of every vessel to a berth and a start slot.

use crate::index::{BerthIndex, VesselIndex};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Solution<T> {
    objective_value: T,
    berths: Vec<BerthIndex>,
    start_slots: Vec<T>,
}

impl<T> Solution<T>
where
    T: Copy,
{
    /// Creates a solution from per-vessel berths and start slots.
    ///
    /// # Panics
    ///
    /// Panics if `berths` and `start_slots` differ in length.
    #[inline]
    pub fn new(objective_value: T, berths: Vec<BerthIndex>, start_slots: Vec<T>) -> Self {
        assert_eq!(
            berths.len(),
            start_slots.len(),
            "called `Solution::new` with mismatched berth and start slot vectors"
        );
        Self {
            objective_value,
            berths,
            start_slots,
        }
    }

    #[inline]
    pub fn objective_value(&self) -> T {
        self.objective_value
    }

    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.berths.len()
    }

    #[inline]
    pub fn berths(&self) -> &[BerthIndex] {
        &self.berths
    }

    #[inline]
    pub fn start_slots(&self) -> &[T] {
        &self.start_slots
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn berth_for_vessel(&self, vessel_index: VesselIndex) -> BerthIndex {
        self.berths[vessel_index.get()]
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn start_slot_for_vessel(&self, vessel_index: VesselIndex) -> T {
        self.start_slots[vessel_index.get()]
    }

    /// Iterates `(vessel, berth, start_slot)` in vessel order.
    pub fn iter(&self) -> impl Iterator<Item = (VesselIndex, BerthIndex, T)> + '_ {
        self.berths
            .iter()
            .zip(self.start_slots.iter())
            .enumerate()
            .map(|(i, (&b, &s))| (VesselIndex::new(i), b, s))
    }
}

impl<T> std::fmt::Display for Solution<T>
where
    T: Copy + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution(objective: {})", self.objective_value)?;
        for (vessel, berth, start) in self.iter() {
            writeln!(f, "  {} -> {} @ {}", vessel, berth, start)?;
        }
        Ok(())
    }
}

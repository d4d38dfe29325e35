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

//! The mutable state of one search worker.
//!
//! `SearchState` records which vessels are fixed, where and when, the
//! objective accumulated by those assignments and the [`StartDomains`] they
//! induce. It is only ever changed through the trail, so every change can be
//! undone on backtrack.

use crate::constraint::StartDomains;
use fixedbitset::FixedBitSet;
use greenberth_model::{
    index::{BerthIndex, VesselIndex},
    solution::Solution,
};
use num_traits::{PrimInt, Signed};

#[derive(Debug, Clone)]
pub struct SearchState<T> {
    domains: StartDomains<T>,
    assigned: FixedBitSet,
    vessel_berths: Vec<BerthIndex>,
    vessel_starts: Vec<T>,
    num_assigned_vessels: usize,
    current_objective: T,
}

impl<T> SearchState<T>
where
    T: PrimInt + Signed,
{
    pub fn new(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            domains: StartDomains::new(num_berths),
            assigned: FixedBitSet::with_capacity(num_vessels),
            vessel_berths: vec![BerthIndex::new(0); num_vessels],
            vessel_starts: vec![T::zero(); num_vessels],
            num_assigned_vessels: 0,
            current_objective: T::zero(),
        }
    }

    #[inline]
    pub fn num_berths(&self) -> usize {
        self.domains.num_berths()
    }

    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.vessel_starts.len()
    }

    #[inline]
    pub fn num_assigned_vessels(&self) -> usize {
        self.num_assigned_vessels
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.num_assigned_vessels == self.num_vessels()
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn is_vessel_assigned(&self, vessel_index: VesselIndex) -> bool {
        self.assigned.contains(vessel_index.get())
    }

    /// Returns the berth and start slot of an assigned vessel.
    #[inline]
    pub fn vessel_assignment(&self, vessel_index: VesselIndex) -> Option<(BerthIndex, T)> {
        let i = vessel_index.get();
        self.assigned
            .contains(i)
            .then(|| (self.vessel_berths[i], self.vessel_starts[i]))
    }

    /// Iterates over the vessels not yet assigned, in index order.
    #[inline]
    pub fn unassigned_vessels(&self) -> impl Iterator<Item = VesselIndex> + '_ {
        self.assigned.zeroes().map(VesselIndex::new)
    }

    /// Returns the cost of the assignments made so far.
    #[inline]
    pub fn current_objective(&self) -> T {
        self.current_objective
    }

    #[inline]
    pub fn domains(&self) -> &StartDomains<T> {
        &self.domains
    }

    /// Returns the complete assignment as a solution, or `None` while some
    /// vessel is still unassigned.
    pub fn to_solution(&self) -> Option<Solution<T>> {
        self.is_complete().then(|| {
            Solution::new(
                self.current_objective,
                self.vessel_berths.clone(),
                self.vessel_starts.clone(),
            )
        })
    }

    #[inline]
    pub(crate) fn domains_mut(&mut self) -> &mut StartDomains<T> {
        &mut self.domains
    }

    #[inline]
    pub(crate) fn set_current_objective(&mut self, objective: T) {
        self.current_objective = objective;
    }

    #[inline]
    pub(crate) fn assign_vessel(&mut self, vessel_index: VesselIndex, berth_index: BerthIndex, start_slot: T) {
        let i = vessel_index.get();
        debug_assert!(!self.assigned.contains(i), "{} assigned twice", vessel_index);
        self.assigned.insert(i);
        self.vessel_berths[i] = berth_index;
        self.vessel_starts[i] = start_slot;
        self.num_assigned_vessels += 1;
    }

    #[inline]
    pub(crate) fn unassign_vessel(&mut self, vessel_index: VesselIndex) {
        let i = vessel_index.get();
        debug_assert!(self.assigned.contains(i), "{} was not assigned", vessel_index);
        self.assigned.set(i, false);
        self.num_assigned_vessels -= 1;
    }

    pub(crate) fn reset(&mut self) {
        self.domains.reset();
        self.assigned.clear();
        self.num_assigned_vessels = 0;
        self.current_objective = T::zero();
    }
}

impl<T> std::fmt::Display for SearchState<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState({}/{} assigned, objective {})",
            self.num_assigned_vessels,
            self.num_vessels(),
            self.current_objective
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn v(i: usize) -> VesselIndex {
        VesselIndex::new(i)
    }

    fn b(i: usize) -> BerthIndex {
        BerthIndex::new(i)
    }

    #[test]
    fn test_assign_and_unassign() {
        let mut state = SearchState::<IntegerType>::new(2, 3);
        assert_eq!(state.num_berths(), 2);
        assert!(!state.is_complete());
        assert_eq!(state.unassigned_vessels().count(), 3);

        state.assign_vessel(v(1), b(1), 7);
        assert!(state.is_vessel_assigned(v(1)));
        assert_eq!(state.vessel_assignment(v(1)), Some((b(1), 7)));
        assert_eq!(state.vessel_assignment(v(0)), None);
        assert_eq!(
            state.unassigned_vessels().collect::<Vec<_>>(),
            vec![v(0), v(2)]
        );

        state.unassign_vessel(v(1));
        assert_eq!(state.num_assigned_vessels(), 0);
        assert!(!state.is_vessel_assigned(v(1)));
    }

    #[test]
    fn test_solution_only_when_complete() {
        let mut state = SearchState::<IntegerType>::new(1, 2);
        state.assign_vessel(v(0), b(0), 7);
        assert!(state.to_solution().is_none());
        state.assign_vessel(v(1), b(0), 0);
        state.set_current_objective(1162);

        let solution = state.to_solution().unwrap();
        assert_eq!(solution.objective_value(), 1162);
        assert_eq!(solution.start_slots(), &[7, 0]);
        assert_eq!(state.to_string(), "SearchState(2/2 assigned, objective 1162)");
    }

    #[test]
    fn test_reset() {
        let mut state = SearchState::<IntegerType>::new(1, 1);
        state.assign_vessel(v(0), b(0), 3);
        state.domains_mut().set_berth_tail(b(0), 10);
        state.set_current_objective(5);
        state.reset();
        assert_eq!(state.num_assigned_vessels(), 0);
        assert_eq!(state.current_objective(), 0);
        assert_eq!(state.domains().berth_tail(b(0)), 0);
    }
}

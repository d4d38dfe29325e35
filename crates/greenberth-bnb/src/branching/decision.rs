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

use crate::{eval::evaluator::ObjectiveEvaluator, state::SearchState};
use greenberth_model::{
    index::{BerthIndex, VesselIndex},
    model::ScheduleModel,
};
use num_traits::{PrimInt, Signed};
use std::iter::FusedIterator;

/// Fixes one vessel on one berth at one start slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decision<T> {
    start_slot: T,
    /// Objective increase caused by this assignment.
    cost_delta: T,
    vessel_index: VesselIndex,
    berth_index: BerthIndex,
}

impl<T> Decision<T>
where
    T: Copy,
{
    #[inline]
    pub fn new(
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
        start_slot: T,
        cost_delta: T,
    ) -> Self {
        Self {
            start_slot,
            cost_delta,
            vessel_index,
            berth_index,
        }
    }

    #[inline]
    pub fn vessel_index(&self) -> VesselIndex {
        self.vessel_index
    }

    #[inline]
    pub fn berth_index(&self) -> BerthIndex {
        self.berth_index
    }

    #[inline]
    pub fn start_slot(&self) -> T {
        self.start_slot
    }

    #[inline]
    pub fn cost_delta(&self) -> T {
        self.cost_delta
    }
}

impl<T> std::fmt::Display for Decision<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decision(vessel: {}, berth: {}, start_slot: {}, cost_delta: {})",
            self.vessel_index, self.berth_index, self.start_slot, self.cost_delta
        )
    }
}

/// Produces the children of a search node.
///
/// The iterator yields decisions in exploration order: the first one is
/// explored first. It must be deterministic for a given state.
pub trait DecisionBuilder<T, E>
where
    T: PrimInt + Signed,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>: Iterator<Item = Decision<T>> + FusedIterator + 'a
    where
        Self: 'a,
        T: 'a,
        E: 'a;

    fn name(&self) -> &str;

    fn next_decision<'a>(
        &'a mut self,
        evaluator: &'a mut E,
        model: &'a ScheduleModel<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a>;
}

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

use crate::state::SearchState;
use greenberth_model::{index::VesselIndex, model::ScheduleModel};
use num_traits::{PrimInt, Signed};

/// Scores decisions and bounds the cost of completing a partial assignment.
///
/// The solver calls `evaluate_vessel_assignment` for the cost delta of every
/// decision it considers and `lower_bound` once per expanded node. A bound of
/// `None` marks the node as impossible to complete.
pub trait ObjectiveEvaluator<T>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str;

    /// Returns the objective increase of starting `vessel_index` at `start_slot`.
    ///
    /// # Panics
    ///
    /// Panics if `vessel_index` is not within `0..model.num_vessels()`.
    fn evaluate_vessel_assignment(
        &mut self,
        model: &ScheduleModel<T>,
        vessel_index: VesselIndex,
        start_slot: T,
    ) -> T;

    /// Returns a lower bound on the cost of the vessels not yet assigned, or
    /// `None` if one of them can no longer be placed.
    ///
    /// The estimate must never exceed the cost of any feasible completion.
    fn estimate_remaining_cost(
        &mut self,
        model: &ScheduleModel<T>,
        state: &SearchState<T>,
    ) -> Option<T>;

    /// Returns a lower bound on the objective of every complete assignment
    /// below this node: the cost already incurred plus the estimate.
    #[inline]
    fn lower_bound(&mut self, model: &ScheduleModel<T>, state: &SearchState<T>) -> Option<T> {
        let remaining = self.estimate_remaining_cost(model, state)?;
        Some(state.current_objective().saturating_add(remaining))
    }
}

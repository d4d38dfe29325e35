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

//! The waiting-plus-emission objective.
//!
//! Assigning a vessel costs its fixed cost (emission cost minus compliance
//! bonus) plus the waiting penalty for every slot between its arrival and its
//! start. The remaining-cost estimate charges each unassigned vessel as if it
//! started at the earliest slot its start domain still allows on any berth,
//! ignoring the other unassigned vessels. Waiting cost never decreases with a
//! later start, so this never overestimates.

use crate::{eval::evaluator::ObjectiveEvaluator, state::SearchState};
use greenberth_model::{index::VesselIndex, model::ScheduleModel};
use num_traits::{PrimInt, Signed};

#[derive(Debug, Clone, Copy, Default)]
pub struct WaitCostEvaluator;

impl WaitCostEvaluator {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> ObjectiveEvaluator<T> for WaitCostEvaluator
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "WaitCostEvaluator"
    }

    #[inline]
    fn evaluate_vessel_assignment(
        &mut self,
        model: &ScheduleModel<T>,
        vessel_index: VesselIndex,
        start_slot: T,
    ) -> T {
        model
            .cost()
            .assignment_cost(vessel_index, model.eta_offset(vessel_index), start_slot)
    }

    fn estimate_remaining_cost(
        &mut self,
        model: &ScheduleModel<T>,
        state: &SearchState<T>,
    ) -> Option<T> {
        let domains = state.domains();
        let mut total = T::zero();
        for vessel_index in state.unassigned_vessels() {
            let earliest = domains.earliest_start_any(model, vessel_index)?;
            let cost = model.cost().assignment_cost(
                vessel_index,
                model.eta_offset(vessel_index),
                earliest,
            );
            total = total.saturating_add(cost);
        }
        Some(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{branching::decision::Decision, trail::SearchTrail};
    use chrono::{TimeZone, Utc};
    use greenberth_model::{
        config::{EngineConfig, PlanningRequest},
        index::BerthIndex,
        model::ScheduleModelBuilder,
        vessel::{ComplianceRating, Vessel},
    };

    type IntegerType = i64;

    fn v(i: usize) -> VesselIndex {
        VesselIndex::new(i)
    }

    fn b(i: usize) -> BerthIndex {
        BerthIndex::new(i)
    }

    fn model() -> ScheduleModel<IntegerType> {
        let eta = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let vessels = vec![
            Vessel::new("a", eta, 2.0, 0.0, ComplianceRating::E),
            Vessel::new("b", eta, 1.0, 0.0, ComplianceRating::E),
        ];
        ScheduleModelBuilder::new(&PlanningRequest::new(1), &EngineConfig::default())
            .build(&vessels)
            .unwrap()
    }

    #[test]
    fn test_assignment_cost_is_wait_plus_fixed() {
        let model = model();
        let mut eval = WaitCostEvaluator::new();
        assert_eq!(eval.evaluate_vessel_assignment(&model, v(0), 0), 0);
        assert_eq!(eval.evaluate_vessel_assignment(&model, v(0), 7), 7 * 166);
    }

    #[test]
    fn test_root_bound_is_zero_without_waiting() {
        let model = model();
        let state = SearchState::new(1, 2);
        let mut eval = WaitCostEvaluator::new();
        assert_eq!(eval.lower_bound(&model, &state), Some(0));
    }

    #[test]
    fn test_bound_follows_berth_tail() {
        let model = model();
        let mut state = SearchState::new(1, 2);
        let mut trail = SearchTrail::new();
        let mut eval = WaitCostEvaluator::new();

        trail.push_frame(&state);
        trail.apply_assignment(&mut state, &model, &Decision::new(v(1), b(0), 0, 0));
        // `a` cannot start before slot 7.
        assert_eq!(eval.estimate_remaining_cost(&model, &state), Some(7 * 166));
        assert_eq!(eval.lower_bound(&model, &state), Some(7 * 166));
    }

    #[test]
    fn test_bound_is_none_when_a_vessel_cannot_fit() {
        let model = model();
        let mut state = SearchState::new(1, 2);
        let mut trail = SearchTrail::new();
        let mut eval = WaitCostEvaluator::new();

        let late = model.latest_start(v(1));
        trail.push_frame(&state);
        trail.apply_assignment(&mut state, &model, &Decision::new(v(1), b(0), late, 0));
        assert_eq!(eval.lower_bound(&model, &state), None);
    }
}

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

//! Earliest-arrival branching.
//!
//! For every unassigned vessel, in arrival order (ties by lowest index), and
//! for every berth that is not interchangeable with a lower berth, the builder
//! proposes starting the vessel at the earliest slot of its start domain on
//! that berth. Per vessel, the berths giving the earliest start come first,
//! ties by lowest berth index.
//!
//! Only the earliest start of each domain is branched on. Every schedule can be
//! shifted left until each vessel starts at its arrival or right after the
//! previous occupant of its berth, without raising the objective, and such a
//! left-shifted schedule is reached by fixing its vessels in start order.
//! So the search still finds an optimum.

use crate::{
    branching::decision::{Decision, DecisionBuilder},
    eval::evaluator::ObjectiveEvaluator,
    state::SearchState,
};
use greenberth_model::{index::BerthIndex, model::ScheduleModel};
use num_traits::{PrimInt, Signed};

#[derive(Debug, Clone, Default)]
pub struct EarliestArrivalBuilder<T> {
    candidates: Vec<Decision<T>>,
    berths: Vec<BerthIndex>,
}

impl<T> EarliestArrivalBuilder<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            berths: Vec::new(),
        }
    }

    /// Creates a builder whose buffers hold one decision per vessel and berth.
    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            candidates: Vec::with_capacity(num_berths.saturating_mul(num_vessels)),
            berths: Vec::with_capacity(num_berths),
        }
    }
}

impl<T, E> DecisionBuilder<T, E> for EarliestArrivalBuilder<T>
where
    T: PrimInt + Signed,
    E: ObjectiveEvaluator<T>,
{
    type DecisionIterator<'a>
        = std::iter::Copied<std::slice::Iter<'a, Decision<T>>>
    where
        T: 'a,
        E: 'a,
        Self: 'a;

    fn name(&self) -> &str {
        "EarliestArrivalBuilder"
    }

    fn next_decision<'a>(
        &'a mut self,
        evaluator: &'a mut E,
        model: &'a ScheduleModel<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a> {
        self.candidates.clear();
        self.berths.clear();

        let domains = state.domains();
        self.berths.extend(
            BerthIndex::range(model.num_berths())
                .filter(|&berth_index| !domains.has_equivalent_lower_berth(berth_index)),
        );

        for &vessel_index in model.vessels_by_arrival() {
            if state.is_vessel_assigned(vessel_index) {
                continue;
            }

            let first = self.candidates.len();
            for &berth_index in &self.berths {
                let Some(start_slot) = domains.earliest_start(model, vessel_index, berth_index)
                else {
                    continue;
                };
                let cost_delta =
                    evaluator.evaluate_vessel_assignment(model, vessel_index, start_slot);
                self.candidates.push(Decision::new(
                    vessel_index,
                    berth_index,
                    start_slot,
                    cost_delta,
                ));
            }
            self.candidates[first..].sort_by_key(|d| (d.start_slot(), d.berth_index()));
        }

        self.candidates.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{eval::wait::WaitCostEvaluator, trail::SearchTrail};
    use chrono::{DateTime, TimeZone, Utc};
    use greenberth_model::{
        config::{EngineConfig, PlanningRequest},
        index::VesselIndex,
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

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, h, 0, 0).unwrap()
    }

    fn model(etas: &[u32], num_berths: usize) -> ScheduleModel<IntegerType> {
        let vessels: Vec<Vessel> = etas
            .iter()
            .enumerate()
            .map(|(i, &h)| Vessel::new(format!("v{i}"), at(h), 1.0, 0.0, ComplianceRating::E))
            .collect();
        ScheduleModelBuilder::new(&PlanningRequest::new(num_berths), &EngineConfig::default())
            .build(&vessels)
            .unwrap()
    }

    fn children(
        builder: &mut EarliestArrivalBuilder<IntegerType>,
        model: &ScheduleModel<IntegerType>,
        state: &SearchState<IntegerType>,
    ) -> Vec<Decision<IntegerType>> {
        let mut eval = WaitCostEvaluator::new();
        builder.next_decision(&mut eval, model, state).collect()
    }

    #[test]
    fn test_root_branches_once_per_vessel_on_identical_berths() {
        let model = model(&[10, 8, 8], 3);
        let state = SearchState::new(3, 3);
        let mut builder = EarliestArrivalBuilder::preallocated(3, 3);

        let decisions = children(&mut builder, &model, &state);
        assert_eq!(
            decisions,
            vec![
                Decision::new(v(1), b(0), 0, 0),
                Decision::new(v(2), b(0), 0, 0),
                Decision::new(v(0), b(0), 12, 0),
            ]
        );
    }

    #[test]
    fn test_berths_ordered_by_earliest_start() {
        let model = model(&[8, 8, 8], 2);
        let mut state = SearchState::new(2, 3);
        let mut trail = SearchTrail::new();
        trail.push_frame(&state);
        trail.apply_assignment(&mut state, &model, &Decision::new(v(1), b(0), 0, 0));

        let mut builder = EarliestArrivalBuilder::new();
        let decisions = children(&mut builder, &model, &state);

        // `v0` has a lower index than the last fixed vessel, so it may not
        // share slot 0 with it.
        assert_eq!(
            decisions,
            vec![
                Decision::new(v(0), b(1), 1, 166),
                Decision::new(v(0), b(0), 7, 7 * 166),
                Decision::new(v(2), b(1), 0, 0),
                Decision::new(v(2), b(0), 7, 7 * 166),
            ]
        );
    }

    #[test]
    fn test_assigned_and_unplaceable_vessels_are_skipped() {
        let model = model(&[8, 8], 1);
        let mut state = SearchState::new(1, 2);
        let mut trail = SearchTrail::new();
        trail.push_frame(&state);
        let late = model.latest_start(v(0));
        trail.apply_assignment(&mut state, &model, &Decision::new(v(0), b(0), late, 0));

        let mut builder = EarliestArrivalBuilder::new();
        assert!(children(&mut builder, &model, &state).is_empty());
    }
}

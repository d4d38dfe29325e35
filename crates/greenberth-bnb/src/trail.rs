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

//! Undo log for the search state.
//!
//! `SearchTrail` records every assignment applied to a [`SearchState`] together
//! with frame markers, so that backtracking a frame undoes exactly the
//! assignments made since it was pushed. Usage:
//!
//! 1. `push_frame(state)` before descending into a child,
//! 2. `apply_assignment(...)` for the child's decision,
//! 3. `backtrack(state)` to restore the state at the start of the frame.
//!
//! Each frame also saves the chronological floor, which every assignment moves.

use crate::{branching::decision::Decision, state::SearchState};
use greenberth_model::{
    index::{BerthIndex, VesselIndex},
    model::ScheduleModel,
};
use num_traits::{PrimInt, Signed};

/// What is needed to undo one assignment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrailEntry<T> {
    old_berth_tail: T,
    old_objective: T,
    berth_index: BerthIndex,
    vessel_index: VesselIndex,
}

impl<T> TrailEntry<T>
where
    T: Copy,
{
    #[inline]
    pub fn old_berth_tail(&self) -> T {
        self.old_berth_tail
    }

    #[inline]
    pub fn old_objective(&self) -> T {
        self.old_objective
    }

    #[inline]
    pub fn berth_index(&self) -> BerthIndex {
        self.berth_index
    }

    #[inline]
    pub fn vessel_index(&self) -> VesselIndex {
        self.vessel_index
    }
}

impl<T> std::fmt::Display for TrailEntry<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrailEntry(berth: {}, vessel: {}, old_tail: {}, old_obj: {})",
            self.berth_index.get(),
            self.vessel_index.get(),
            self.old_berth_tail,
            self.old_objective
        )
    }
}

/// Marks the start of a decision level on the trail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FrameEntry<T> {
    previous_floor_slot: T,
    previous_floor_vessel: Option<VesselIndex>,
    entry_start_index: usize,
}

impl<T> FrameEntry<T>
where
    T: Copy,
{
    #[inline]
    pub fn previous_floor_slot(&self) -> T {
        self.previous_floor_slot
    }

    #[inline]
    pub fn previous_floor_vessel(&self) -> Option<VesselIndex> {
        self.previous_floor_vessel
    }

    #[inline]
    pub fn entry_start_index(&self) -> usize {
        self.entry_start_index
    }
}

#[derive(Debug, Clone)]
pub struct SearchTrail<T> {
    entries: Vec<TrailEntry<T>>,
    frames: Vec<FrameEntry<T>>,
}

impl<T> Default for SearchTrail<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchTrail<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a trail sized for a search over `num_vessels` vessels.
    #[inline]
    pub fn preallocated(num_vessels: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_vessels),
            frames: Vec::with_capacity(num_vessels.saturating_add(1)),
        }
    }

    #[inline]
    pub fn ensure_capacity(&mut self, num_vessels: usize) {
        self.entries
            .reserve(num_vessels.saturating_sub(self.entries.len()));
        self.frames
            .reserve(num_vessels.saturating_add(1).saturating_sub(self.frames.len()));
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty() && self.entries.is_empty()
    }

    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }
}

impl<T> SearchTrail<T>
where
    T: PrimInt + Signed,
{
    /// Opens a new frame at the current state.
    #[inline]
    pub fn push_frame(&mut self, state: &SearchState<T>) {
        let (previous_floor_slot, previous_floor_vessel) = state.domains().floor();
        self.frames.push(FrameEntry {
            previous_floor_slot,
            previous_floor_vessel,
            entry_start_index: self.entries.len(),
        });
    }

    /// Fixes the decision's vessel on its berth and start and records how to
    /// undo it.
    ///
    /// The berth tail moves to the end of the vessel's buffered interval, the
    /// floor moves to the decision's start and the objective grows by the
    /// decision's cost delta, saturating.
    pub fn apply_assignment(
        &mut self,
        state: &mut SearchState<T>,
        model: &ScheduleModel<T>,
        decision: &Decision<T>,
    ) {
        let (vessel_index, berth_index) = (decision.vessel_index(), decision.berth_index());
        let start_slot = decision.start_slot();

        let old_objective = state.current_objective();
        let new_tail = start_slot.saturating_add(model.occupancy_length(vessel_index));
        let old_berth_tail = state.domains_mut().set_berth_tail(berth_index, new_tail);
        state
            .domains_mut()
            .set_floor(start_slot, Some(vessel_index));
        state.assign_vessel(vessel_index, berth_index, start_slot);
        state.set_current_objective(old_objective.saturating_add(decision.cost_delta()));

        self.entries.push(TrailEntry {
            old_berth_tail,
            old_objective,
            berth_index,
            vessel_index,
        });
    }

    /// Undoes every assignment of the current frame and pops it.
    ///
    /// Returns `false` if there was no frame to pop.
    pub fn backtrack(&mut self, state: &mut SearchState<T>) -> bool {
        let Some(frame) = self.frames.pop() else {
            return false;
        };

        while self.entries.len() > frame.entry_start_index {
            let Some(entry) = self.entries.pop() else {
                break;
            };
            state.unassign_vessel(entry.vessel_index);
            state
                .domains_mut()
                .set_berth_tail(entry.berth_index, entry.old_berth_tail);
            state.set_current_objective(entry.old_objective);
        }

        state
            .domains_mut()
            .set_floor(frame.previous_floor_slot, frame.previous_floor_vessel);
        true
    }
}

impl<T> std::fmt::Display for SearchTrail<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(depth: {}, entries: {})",
            self.frames.len(),
            self.entries.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use greenberth_model::{
        config::{EngineConfig, PlanningRequest},
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
        ScheduleModelBuilder::new(&PlanningRequest::new(2), &EngineConfig::default())
            .build(&vessels)
            .unwrap()
    }

    #[test]
    fn test_apply_then_backtrack_restores_state() {
        let model = model();
        let mut state = SearchState::new(2, 2);
        let mut trail = SearchTrail::preallocated(2);

        trail.push_frame(&state);
        trail.apply_assignment(&mut state, &model, &Decision::new(v(1), b(0), 0, 0));
        assert_eq!(state.domains().berth_tail(b(0)), 7);
        assert_eq!(state.domains().floor(), (0, Some(v(1))));

        trail.push_frame(&state);
        trail.apply_assignment(&mut state, &model, &Decision::new(v(0), b(0), 7, 1162));
        assert_eq!(state.domains().berth_tail(b(0)), 20);
        assert_eq!(state.current_objective(), 1162);
        assert!(state.is_complete());
        assert_eq!(trail.depth(), 2);
        assert_eq!(trail.num_entries(), 2);

        assert!(trail.backtrack(&mut state));
        assert_eq!(state.domains().berth_tail(b(0)), 7);
        assert_eq!(state.current_objective(), 0);
        assert!(!state.is_vessel_assigned(v(0)));
        assert_eq!(state.domains().floor(), (0, Some(v(1))));

        assert!(trail.backtrack(&mut state));
        assert_eq!(state.domains().floor(), (0, None));
        assert_eq!(state.num_assigned_vessels(), 0);
        assert!(trail.is_empty());
        assert!(!trail.backtrack(&mut state));
    }

    #[test]
    fn test_frame_can_hold_several_assignments() {
        let model = model();
        let mut state = SearchState::new(2, 2);
        let mut trail = SearchTrail::new();

        trail.push_frame(&state);
        trail.apply_assignment(&mut state, &model, &Decision::new(v(0), b(0), 0, 0));
        trail.apply_assignment(&mut state, &model, &Decision::new(v(1), b(1), 0, 0));
        assert_eq!(state.domains().berth_tails(), &[13, 7]);

        trail.backtrack(&mut state);
        assert_eq!(state.domains().berth_tails(), &[0, 0]);
        assert_eq!(state.num_assigned_vessels(), 0);
    }
}

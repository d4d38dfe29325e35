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

//! The schedule model consumed by the search.
//!
//! `ScheduleModel<T>` stores, per vessel, the quantities that define its
//! decision variables on every berth:
//!
//! - `eta_offset`: first admissible start slot,
//! - `duration`: occupied slots, rounded up,
//! - `latest_start = horizon_slots - duration - gap`,
//!
//! so that the start domain of vessel `v` on any berth is
//! `[eta_offset(v), latest_start(v)]` and a start `s` occupies
//! `[s, s + duration(v) + gap)`. Berths are homogeneous, so the initial
//! domain does not depend on the berth.
//!
//! Vectors are laid out struct-of-arrays and indexed by `VesselIndex`, which
//! follows the order of the vessel feed. `vessels_by_arrival` lists vessels by
//! `(eta_offset, index)`, the branching order of the optimizer.
//!
//! Building fails with `INFEASIBLE_HORIZON` when a vessel's `duration + gap`
//! exceeds `horizon_slots - eta_offset`. This is a structural precondition,
//! checked before any search.

use crate::{
    config::{EngineConfig, PlanningRequest},
    cost::CostModel,
    err::{InfeasibleHorizonError, InputError, ModelError},
    horizon::{Horizon, HorizonBuilder},
    index::VesselIndex,
    vessel::Vessel,
};
use greenberth_core::math::interval::ClosedOpenInterval;
use num_traits::{PrimInt, Signed};
use rustc_hash::FxHashSet;

#[derive(Debug, Clone)]
pub struct ScheduleModel<T>
where
    T: PrimInt + Signed,
{
    horizon: Horizon,
    num_berths: usize,
    horizon_slots: T,
    gap_slots: T,
    vessel_ids: Vec<String>,
    eta_offsets: Vec<T>,
    durations: Vec<T>,
    latest_starts: Vec<T>,
    vessels_by_arrival: Vec<VesselIndex>,
    cost: CostModel<T>,
}

impl<T> ScheduleModel<T>
where
    T: PrimInt + Signed,
{
    #[inline]
    pub fn horizon(&self) -> &Horizon {
        &self.horizon
    }

    #[inline]
    pub fn num_berths(&self) -> usize {
        self.num_berths
    }

    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.eta_offsets.len()
    }

    #[inline]
    pub fn horizon_slots(&self) -> T {
        self.horizon_slots
    }

    #[inline]
    pub fn gap_slots(&self) -> T {
        self.gap_slots
    }

    #[inline]
    pub fn cost(&self) -> &CostModel<T> {
        &self.cost
    }

    #[inline]
    pub fn vessel_ids(&self) -> &[String] {
        &self.vessel_ids
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn vessel_id(&self, vessel_index: VesselIndex) -> &str {
        &self.vessel_ids[vessel_index.get()]
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn eta_offset(&self, vessel_index: VesselIndex) -> T {
        self.eta_offsets[vessel_index.get()]
    }

    #[inline]
    pub fn eta_offsets(&self) -> &[T] {
        &self.eta_offsets
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn duration(&self, vessel_index: VesselIndex) -> T {
        self.durations[vessel_index.get()]
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn latest_start(&self, vessel_index: VesselIndex) -> T {
        self.latest_starts[vessel_index.get()]
    }

    /// Returns the slots a vessel blocks on its berth, service plus gap.
    #[inline]
    pub fn occupancy_length(&self, vessel_index: VesselIndex) -> T {
        self.durations[vessel_index.get()] + self.gap_slots
    }

    /// Returns the initial start domain `[eta_offset, latest_start]` as a
    /// half-open interval.
    #[inline]
    pub fn start_domain(&self, vessel_index: VesselIndex) -> ClosedOpenInterval<T> {
        let i = vessel_index.get();
        ClosedOpenInterval::new(self.eta_offsets[i], self.latest_starts[i] + T::one())
    }

    /// Returns the buffered interval occupied when the vessel starts at `start_slot`.
    #[inline]
    pub fn occupied_interval(
        &self,
        vessel_index: VesselIndex,
        start_slot: T,
    ) -> ClosedOpenInterval<T> {
        ClosedOpenInterval::new(start_slot, start_slot + self.occupancy_length(vessel_index))
    }

    /// Vessels ordered by arrival slot, ties by lowest index.
    #[inline]
    pub fn vessels_by_arrival(&self) -> &[VesselIndex] {
        &self.vessels_by_arrival
    }

    /// Returns the objective of a complete assignment given as start slots
    /// indexed by vessel, or `None` on overflow.
    #[inline]
    pub fn objective(&self, start_slots: &[T]) -> Option<T> {
        self.cost.objective(&self.eta_offsets, start_slots)
    }
}

/// Builds a [`ScheduleModel`] from a vessel snapshot and a planning request.
#[derive(Debug, Clone)]
pub struct ScheduleModelBuilder<'a> {
    request: &'a PlanningRequest,
    config: &'a EngineConfig,
}

impl<'a> ScheduleModelBuilder<'a> {
    #[inline]
    pub fn new(request: &'a PlanningRequest, config: &'a EngineConfig) -> Self {
        Self { request, config }
    }

    /// Validates the input, sizes the horizon and derives the per-vessel domains
    /// and costs.
    ///
    /// # Errors
    ///
    /// - `ModelError::Input` on an invalid request, configuration or vessel,
    ///   or on duplicate vessel ids.
    /// - `ModelError::InfeasibleHorizon` if some vessel cannot fit after its
    ///   arrival.
    pub fn build<T>(&self, vessels: &[Vessel]) -> Result<ScheduleModel<T>, ModelError>
    where
        T: PrimInt + Signed,
    {
        self.request.validate()?;
        self.config.validate()?;

        let horizon =
            HorizonBuilder::from_config(self.config).build(vessels, self.request.num_berths)?;

        let mut seen = FxHashSet::default();
        for vessel in vessels {
            if !seen.insert(vessel.id.as_str()) {
                return Err(InputError::DuplicateVesselId(vessel.id.clone()).into());
            }
        }

        let horizon_slots = cast::<T>(horizon.horizon_slots(), "horizon slots")?;
        let gap_slots = cast::<T>(self.config.gap_slots as i64, "gap slots")?;

        let n = vessels.len();
        let mut eta_offsets = Vec::with_capacity(n);
        let mut durations = Vec::with_capacity(n);
        let mut latest_starts = Vec::with_capacity(n);

        for (i, vessel) in vessels.iter().enumerate() {
            let eta_offset = horizon.eta_offset_slots(vessel.eta);
            let duration = horizon.duration_slots(vessel.predicted_turnaround_hours);
            let required = duration + self.config.gap_slots as i64;
            let available = horizon.horizon_slots() - eta_offset;
            if required > available {
                return Err(InfeasibleHorizonError {
                    vessel_index: VesselIndex::new(i),
                    vessel_id: vessel.id.clone(),
                    required_slots: required,
                    available_slots: available,
                }
                .into());
            }

            let eta_offset = cast::<T>(eta_offset, "arrival offset")?;
            let duration = cast::<T>(duration, "service duration")?;
            eta_offsets.push(eta_offset);
            durations.push(duration);
            latest_starts.push(horizon_slots - duration - gap_slots);
        }

        let mut vessels_by_arrival: Vec<VesselIndex> = VesselIndex::range(n).collect();
        vessels_by_arrival.sort_by_key(|&v| (eta_offsets[v.get()], v));

        let cost = CostModel::new(vessels, self.request, self.config)?;

        tracing::debug!(
            "{}: {} vessels, {} berths, gap {} slots",
            horizon,
            n,
            self.request.num_berths,
            self.config.gap_slots
        );

        Ok(ScheduleModel {
            horizon,
            num_berths: self.request.num_berths,
            horizon_slots,
            gap_slots,
            vessel_ids: vessels.iter().map(|v| v.id.clone()).collect(),
            eta_offsets,
            durations,
            latest_starts,
            vessels_by_arrival,
            cost,
        })
    }
}

fn cast<T>(value: i64, what: &'static str) -> Result<T, InputError>
where
    T: PrimInt,
{
    <T as num_traits::NumCast>::from(value).ok_or(InputError::Overflow(what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vessel::ComplianceRating;
    use chrono::{DateTime, TimeZone, Utc};

    type IntegerType = i64;

    fn v(i: usize) -> VesselIndex {
        VesselIndex::new(i)
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, h, m, 0).unwrap()
    }

    fn vessel(id: &str, eta: DateTime<Utc>, hours: f64) -> Vessel {
        Vessel::new(id, eta, hours, 0.0, ComplianceRating::E)
    }

    fn build(
        vessels: &[Vessel],
        request: &PlanningRequest,
        config: &EngineConfig,
    ) -> Result<ScheduleModel<IntegerType>, ModelError> {
        ScheduleModelBuilder::new(request, config).build(vessels)
    }

    #[test]
    fn test_domains_follow_horizon() {
        let vessels = vec![vessel("a", at(8, 0), 2.0), vessel("b", at(8, 25), 1.0)];
        let model = build(&vessels, &PlanningRequest::new(1), &EngineConfig::default()).unwrap();

        assert_eq!(model.num_vessels(), 2);
        assert_eq!(model.num_berths(), 1);
        assert_eq!(model.horizon_slots(), 51 * 6);
        assert_eq!(model.gap_slots(), 1);

        assert_eq!(model.eta_offset(v(0)), 0);
        assert_eq!(model.duration(v(0)), 12);
        assert_eq!(model.latest_start(v(0)), 306 - 12 - 1);

        assert_eq!(model.eta_offset(v(1)), 3);
        assert_eq!(model.duration(v(1)), 6);
        assert_eq!(model.start_domain(v(1)), ClosedOpenInterval::new(3, 306 - 6 - 1 + 1));
        assert_eq!(model.occupied_interval(v(1), 10), ClosedOpenInterval::new(10, 17));
    }

    #[test]
    fn test_arrival_order_breaks_ties_by_index() {
        let vessels = vec![
            vessel("late", at(10, 0), 1.0),
            vessel("early-b", at(8, 0), 1.0),
            vessel("early-a", at(8, 0), 1.0),
        ];
        let model = build(&vessels, &PlanningRequest::new(2), &EngineConfig::default()).unwrap();
        assert_eq!(model.vessels_by_arrival(), &[v(1), v(2), v(0)]);
    }

    #[test]
    fn test_vessel_longer_than_horizon_is_infeasible() {
        // 3 berths: horizon = 302h / 3 + 0h margin, far shorter than 300h.
        let vessels = vec![
            vessel("small-1", at(8, 0), 1.0),
            vessel("huge", at(8, 0), 300.0),
            vessel("small-2", at(8, 0), 1.0),
        ];
        let config = EngineConfig::default().with_margin_hours(0.0);
        let err = build(&vessels, &PlanningRequest::new(3), &config).unwrap_err();
        match err {
            ModelError::InfeasibleHorizon(e) => {
                assert_eq!(e.vessel_id, "huge");
                assert_eq!(e.vessel_index, v(1));
                assert_eq!(e.required_slots, 1801);
                assert!(e.available_slots < e.required_slots);
            }
            other => panic!("expected infeasible horizon, got {other}"),
        }
    }

    #[test]
    fn test_late_arrival_without_margin_is_infeasible() {
        let vessels = vec![vessel("first", at(8, 0), 1.0), vessel("second", at(9, 30), 1.0)];
        let config = EngineConfig::default().with_margin_hours(0.0);
        let err = build(&vessels, &PlanningRequest::new(1), &config).unwrap_err();
        assert!(matches!(err, ModelError::InfeasibleHorizon(_)));
    }

    #[test]
    fn test_gap_only_overflow_is_infeasible() {
        // The service alone fills the horizon; the mandatory gap does not fit.
        let vessels = vec![vessel("a", at(8, 0), 1.0)];
        let config = EngineConfig::default().with_margin_hours(0.0);
        assert!(matches!(
            build(&vessels, &PlanningRequest::new(1), &config),
            Err(ModelError::InfeasibleHorizon(_))
        ));

        let config = config.with_gap_slots(0);
        let model = build(&vessels, &PlanningRequest::new(1), &config).unwrap();
        assert_eq!(model.latest_start(v(0)), 0);
    }

    #[test]
    fn test_input_errors_surface_before_horizon() {
        let err = build(&[], &PlanningRequest::new(1), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, ModelError::Input(InputError::EmptyFleet)));

        let vessels = vec![vessel("a", at(8, 0), 1.0)];
        let err = build(&vessels, &PlanningRequest::new(0), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, ModelError::Input(InputError::NonPositiveBerthCount)));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let vessels = vec![vessel("dup", at(8, 0), 1.0), vessel("dup", at(9, 0), 1.0)];
        let err = build(&vessels, &PlanningRequest::new(1), &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, ModelError::Input(InputError::DuplicateVesselId(id)) if id == "dup"));
    }

    #[test]
    fn test_objective_uses_model_offsets() {
        let vessels = vec![vessel("a", at(8, 0), 2.0), vessel("b", at(8, 0), 1.0)];
        let model = build(&vessels, &PlanningRequest::new(1), &EngineConfig::default()).unwrap();
        assert_eq!(model.objective(&[7, 0]), Some(7 * 166));
    }
}

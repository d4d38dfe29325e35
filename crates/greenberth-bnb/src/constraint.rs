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

//! # Start-Domain Propagation
//!
//! Vessels are fixed in non-decreasing start order. Under that discipline the
//! occupied part of each berth is a prefix `[0, tail)`, where `tail` is the end
//! of the last buffered interval placed on it, and the set of starts still
//! admissible for an unassigned vessel `v` on berth `b` is the single interval
//!
//! ```text
//! [max(eta(v), tail(b), floor(v)), latest_start(v)]
//! ```
//!
//! `floor(v)` is the start of the most recently fixed vessel, plus one slot if
//! `v` has a lower index than that vessel. The extra slot breaks the symmetry
//! between orderings of vessels that start in the same slot, so every schedule
//! is replayed by exactly one chronological sequence of decisions.
//!
//! [`StartDomains`] holds the berth tails and the floor. Propagation is
//! incremental: fixing a vessel moves one tail and the floor, which narrows
//! every other domain at once. A node where some unassigned vessel has an
//! empty domain on every berth cannot be completed and is pruned.
//!
//! [`validate_assignment`] is the independent checker for complete
//! assignments, used on every solution the optimizer returns.

use greenberth_core::math::interval::ClosedOpenInterval;
use greenberth_model::{
    index::{BerthIndex, VesselIndex},
    model::ScheduleModel,
};
use num_traits::{PrimInt, Signed};

/// Berth tails and the chronological floor of a partial assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartDomains<T> {
    berth_tails: Vec<T>,
    floor_slot: T,
    floor_vessel: Option<VesselIndex>,
}

impl<T> StartDomains<T>
where
    T: PrimInt + Signed,
{
    /// Creates the domains of an empty assignment: every berth free from slot zero.
    #[inline]
    pub fn new(num_berths: usize) -> Self {
        Self {
            berth_tails: vec![T::zero(); num_berths],
            floor_slot: T::zero(),
            floor_vessel: None,
        }
    }

    #[inline]
    pub fn num_berths(&self) -> usize {
        self.berth_tails.len()
    }

    /// Returns the first slot not occupied by the vessels fixed on `berth_index`.
    ///
    /// # Panics
    ///
    /// Panics if `berth_index` is out of bounds.
    #[inline]
    pub fn berth_tail(&self, berth_index: BerthIndex) -> T {
        self.berth_tails[berth_index.get()]
    }

    #[inline]
    pub fn berth_tails(&self) -> &[T] {
        &self.berth_tails
    }

    /// Returns the smallest berth tail, or zero without berths.
    #[inline]
    pub fn min_tail(&self) -> T {
        self.berth_tails
            .iter()
            .copied()
            .min()
            .unwrap_or_else(T::zero)
    }

    /// Returns the start of the most recently fixed vessel and that vessel.
    #[inline]
    pub fn floor(&self) -> (T, Option<VesselIndex>) {
        (self.floor_slot, self.floor_vessel)
    }

    /// Returns the earliest start allowed for `vessel_index` by the order in
    /// which vessels are fixed.
    #[inline]
    pub fn floor_for(&self, vessel_index: VesselIndex) -> T {
        match self.floor_vessel {
            Some(last) if vessel_index < last => self.floor_slot + T::one(),
            _ => self.floor_slot,
        }
    }

    /// Returns `true` if a lower berth has the same tail as `berth_index`.
    ///
    /// Berths are interchangeable, so two berths with the same tail lead to
    /// identical subtrees and only the lowest of them needs to be branched on.
    #[inline]
    pub fn has_equivalent_lower_berth(&self, berth_index: BerthIndex) -> bool {
        let i = berth_index.get();
        let tail = self.berth_tails[i];
        self.berth_tails[..i].contains(&tail)
    }

    /// Returns the earliest admissible start of `vessel_index` on
    /// `berth_index`, or `None` if its domain there is empty.
    #[inline]
    pub fn earliest_start(
        &self,
        model: &ScheduleModel<T>,
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
    ) -> Option<T> {
        self.earliest_start_after(model, vessel_index, self.berth_tail(berth_index))
    }

    /// Returns the earliest admissible start of `vessel_index` on any berth.
    /// `None` means the vessel can no longer be placed anywhere.
    #[inline]
    pub fn earliest_start_any(
        &self,
        model: &ScheduleModel<T>,
        vessel_index: VesselIndex,
    ) -> Option<T> {
        self.earliest_start_after(model, vessel_index, self.min_tail())
    }

    /// Returns the current start domain of `vessel_index` on `berth_index` as
    /// a half-open interval, or `None` if it is empty.
    pub fn domain(
        &self,
        model: &ScheduleModel<T>,
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
    ) -> Option<ClosedOpenInterval<T>> {
        let lo = self.earliest_start(model, vessel_index, berth_index)?;
        Some(ClosedOpenInterval::new(
            lo,
            model.latest_start(vessel_index) + T::one(),
        ))
    }

    #[inline]
    fn earliest_start_after(
        &self,
        model: &ScheduleModel<T>,
        vessel_index: VesselIndex,
        tail: T,
    ) -> Option<T> {
        let lo = model
            .eta_offset(vessel_index)
            .max(tail)
            .max(self.floor_for(vessel_index));
        (lo <= model.latest_start(vessel_index)).then_some(lo)
    }

    /// Moves the tail of `berth_index` and returns the previous one.
    #[inline]
    pub(crate) fn set_berth_tail(&mut self, berth_index: BerthIndex, tail: T) -> T {
        std::mem::replace(&mut self.berth_tails[berth_index.get()], tail)
    }

    #[inline]
    pub(crate) fn set_floor(&mut self, slot: T, vessel_index: Option<VesselIndex>) {
        self.floor_slot = slot;
        self.floor_vessel = vessel_index;
    }

    pub(crate) fn reset(&mut self) {
        self.berth_tails.fill(T::zero());
        self.floor_slot = T::zero();
        self.floor_vessel = None;
    }
}

/// A reason a complete assignment is not a valid schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation<T> {
    /// The assignment does not cover every vessel of the model.
    LengthMismatch { expected: usize, found: usize },
    /// The vessel is placed on a berth that does not exist.
    UnknownBerth {
        vessel_index: VesselIndex,
        berth_index: BerthIndex,
    },
    /// The vessel starts before it arrives.
    StartBeforeArrival {
        vessel_index: VesselIndex,
        start_slot: T,
        eta_offset: T,
    },
    /// The vessel and its gap do not end inside the horizon.
    StartAfterLatest {
        vessel_index: VesselIndex,
        start_slot: T,
        latest_start: T,
    },
    /// Two buffered intervals on the same berth intersect.
    Overlap {
        berth_index: BerthIndex,
        first: VesselIndex,
        second: VesselIndex,
    },
}

impl<T> std::fmt::Display for ConstraintViolation<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintViolation::LengthMismatch { expected, found } => write!(
                f,
                "assignment covers {} vessels, model has {}",
                found, expected
            ),
            ConstraintViolation::UnknownBerth {
                vessel_index,
                berth_index,
            } => write!(f, "{} assigned to unknown {}", vessel_index, berth_index),
            ConstraintViolation::StartBeforeArrival {
                vessel_index,
                start_slot,
                eta_offset,
            } => write!(
                f,
                "{} starts at slot {} before its arrival at slot {}",
                vessel_index, start_slot, eta_offset
            ),
            ConstraintViolation::StartAfterLatest {
                vessel_index,
                start_slot,
                latest_start,
            } => write!(
                f,
                "{} starts at slot {} after its latest start {}",
                vessel_index, start_slot, latest_start
            ),
            ConstraintViolation::Overlap {
                berth_index,
                first,
                second,
            } => write!(f, "{} and {} overlap on {}", first, second, berth_index),
        }
    }
}

impl<T> std::error::Error for ConstraintViolation<T> where T: std::fmt::Debug + std::fmt::Display {}

/// Checks a complete assignment against the model.
///
/// `berths[i]` and `start_slots[i]` belong to vessel `i`. Every vessel must
/// start inside its domain on an existing berth, and the buffered intervals
/// `[start, start + duration + gap)` of two vessels on the same berth must
/// not intersect.
pub fn validate_assignment<T>(
    model: &ScheduleModel<T>,
    berths: &[BerthIndex],
    start_slots: &[T],
) -> Result<(), ConstraintViolation<T>>
where
    T: PrimInt + Signed,
{
    let n = model.num_vessels();
    for found in [berths.len(), start_slots.len()] {
        if found != n {
            return Err(ConstraintViolation::LengthMismatch { expected: n, found });
        }
    }

    for vessel_index in VesselIndex::range(n) {
        let i = vessel_index.get();
        let berth_index = berths[i];
        if berth_index.get() >= model.num_berths() {
            return Err(ConstraintViolation::UnknownBerth {
                vessel_index,
                berth_index,
            });
        }
        let start_slot = start_slots[i];
        let eta_offset = model.eta_offset(vessel_index);
        if start_slot < eta_offset {
            return Err(ConstraintViolation::StartBeforeArrival {
                vessel_index,
                start_slot,
                eta_offset,
            });
        }
        let latest_start = model.latest_start(vessel_index);
        if start_slot > latest_start {
            return Err(ConstraintViolation::StartAfterLatest {
                vessel_index,
                start_slot,
                latest_start,
            });
        }
    }

    // Per berth, sorted by start: overlaps can only occur between neighbours.
    let mut order: Vec<VesselIndex> = VesselIndex::range(n).collect();
    order.sort_by_key(|&v| (berths[v.get()], start_slots[v.get()], v));
    for pair in order.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        let berth_index = berths[first.get()];
        if berth_index != berths[second.get()] {
            continue;
        }
        let a = model.occupied_interval(first, start_slots[first.get()]);
        let b = model.occupied_interval(second, start_slots[second.get()]);
        if a.intersects(&b) {
            return Err(ConstraintViolation::Overlap {
                berth_index,
                first,
                second,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
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

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, h, m, 0).unwrap()
    }

    // a: eta 0, 12 slots. b: eta 6, 6 slots. c: eta 0, 6 slots.
    fn model(num_berths: usize) -> ScheduleModel<IntegerType> {
        let vessels = vec![
            Vessel::new("a", at(8, 0), 2.0, 0.0, ComplianceRating::E),
            Vessel::new("b", at(9, 0), 1.0, 0.0, ComplianceRating::E),
            Vessel::new("c", at(8, 0), 1.0, 0.0, ComplianceRating::E),
        ];
        ScheduleModelBuilder::new(&PlanningRequest::new(num_berths), &EngineConfig::default())
            .build(&vessels)
            .unwrap()
    }

    #[test]
    fn test_empty_assignment_starts_at_arrival() {
        let model = model(2);
        let domains = StartDomains::new(2);
        assert_eq!(domains.earliest_start(&model, v(0), b(1)), Some(0));
        assert_eq!(domains.earliest_start(&model, v(1), b(0)), Some(6));
        assert_eq!(
            domains.domain(&model, v(1), b(0)),
            Some(ClosedOpenInterval::new(6, model.latest_start(v(1)) + 1))
        );
        assert!(domains.has_equivalent_lower_berth(b(1)));
        assert!(!domains.has_equivalent_lower_berth(b(0)));
    }

    #[test]
    fn test_tail_and_floor_narrow_domains() {
        let model = model(2);
        let mut domains = StartDomains::new(2);

        // Fix `b` on berth 0 at slot 6: tail 6 + 6 + 1.
        domains.set_berth_tail(b(0), 13);
        domains.set_floor(6, Some(v(1)));

        assert_eq!(domains.earliest_start(&model, v(2), b(0)), Some(13));
        // Lower index than the last fixed vessel: strictly after its start.
        assert_eq!(domains.earliest_start(&model, v(0), b(1)), Some(7));
        assert_eq!(domains.earliest_start_any(&model, v(0)), Some(7));
        assert_eq!(domains.min_tail(), 0);
        assert!(!domains.has_equivalent_lower_berth(b(1)));
    }

    #[test]
    fn test_floor_ties_allowed_for_higher_index() {
        let mut domains = StartDomains::<IntegerType>::new(1);
        domains.set_floor(4, Some(v(1)));
        assert_eq!(domains.floor_for(v(2)), 4);
        assert_eq!(domains.floor_for(v(0)), 5);
        assert_eq!(domains.floor(), (4, Some(v(1))));
    }

    #[test]
    fn test_domain_empties_past_latest_start() {
        let model = model(1);
        let mut domains = StartDomains::new(1);
        let beyond = model.latest_start(v(0)) + 1;
        domains.set_berth_tail(b(0), beyond);
        assert_eq!(domains.earliest_start(&model, v(0), b(0)), None);
        assert_eq!(domains.domain(&model, v(0), b(0)), None);
        assert_eq!(domains.earliest_start_any(&model, v(0)), None);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut domains = StartDomains::<IntegerType>::new(2);
        assert_eq!(domains.set_berth_tail(b(1), 9), 0);
        domains.set_floor(3, Some(v(0)));
        domains.reset();
        assert_eq!(domains, StartDomains::new(2));
    }

    #[test]
    fn test_validate_accepts_feasible_schedule() {
        let model = model(1);
        // c [0, 7), a [7, 20), b [20, 27).
        assert_eq!(
            validate_assignment(&model, &[b(0), b(0), b(0)], &[7, 20, 0]),
            Ok(())
        );
        // Touching intervals are fine.
        assert_eq!(
            validate_assignment(&model, &[b(0), b(0), b(0)], &[0, 13, 20]),
            Ok(())
        );
    }

    #[test]
    fn test_validate_reports_violations() {
        let model = model(2);
        assert_eq!(
            validate_assignment(&model, &[b(0), b(0)], &[0, 13]),
            Err(ConstraintViolation::LengthMismatch {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            validate_assignment(&model, &[b(0), b(2), b(1)], &[0, 6, 0]),
            Err(ConstraintViolation::UnknownBerth {
                vessel_index: v(1),
                berth_index: b(2)
            })
        );
        assert_eq!(
            validate_assignment(&model, &[b(0), b(1), b(1)], &[0, 5, 0]),
            Err(ConstraintViolation::StartBeforeArrival {
                vessel_index: v(1),
                start_slot: 5,
                eta_offset: 6
            })
        );
        let late = model.latest_start(v(2)) + 1;
        assert!(matches!(
            validate_assignment(&model, &[b(0), b(1), b(1)], &[0, 6, late]),
            Err(ConstraintViolation::StartAfterLatest { vessel_index, .. }) if vessel_index == v(2)
        ));
        // The gap slot after `a` is still blocked at 12.
        assert_eq!(
            validate_assignment(&model, &[b(0), b(1), b(0)], &[0, 6, 12]),
            Err(ConstraintViolation::Overlap {
                berth_index: b(0),
                first: v(0),
                second: v(2)
            })
        );
    }
}

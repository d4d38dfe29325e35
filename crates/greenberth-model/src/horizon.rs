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

//! Discretized planning window.
//!
//! The horizon starts at the earliest arrival floored to the full hour and
//! spans the average berth workload plus a configurable safety margin:
//!
//! ```text
//! start = floor_hour(min eta)
//! end   = start + sum(turnaround_hours) / num_berths + margin_hours
//! slots = ceil((end - start) in minutes / slot_minutes)
//! ```
//!
//! A margin that is too small makes staggered arrivals unschedulable, one
//! that is too large only costs search effort. The builder never widens the
//! horizon on its own; fit problems are reported by the model.

use crate::{config::EngineConfig, err::InputError, index::VesselIndex, vessel::Vessel};
use chrono::{DateTime, TimeDelta, Timelike, Utc};

/// Upper bound on any span handled by the planner, one century in hours.
pub const MAX_SUPPORTED_HOURS: f64 = 24.0 * 365.0 * 100.0;

// Absorbs floating point noise such as `0.5 * 60.0 / 10.0 = 3.0000000000000004`.
const SLOT_ROUNDING_TOLERANCE: f64 = 1e-9;

const MILLIS_PER_MINUTE: i64 = 60_000;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// The planning window of one run, discretized into fixed-size slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    slot_minutes: u32,
    horizon_slots: i64,
}

impl Horizon {
    #[inline]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[inline]
    pub fn slot_minutes(&self) -> u32 {
        self.slot_minutes
    }

    #[inline]
    pub fn horizon_slots(&self) -> i64 {
        self.horizon_slots
    }

    /// Returns the wall-clock length of `slots` slots.
    #[inline]
    pub fn slots_to_delta(&self, slots: i64) -> Option<TimeDelta> {
        TimeDelta::try_minutes(slots.checked_mul(self.slot_minutes as i64)?)
    }

    /// Returns the timestamp at which slot `slot` begins.
    #[inline]
    pub fn slot_to_time(&self, slot: i64) -> Option<DateTime<Utc>> {
        self.start.checked_add_signed(self.slots_to_delta(slot)?)
    }

    /// Converts a slot count to hours.
    #[inline]
    pub fn slots_to_hours(&self, slots: i64) -> f64 {
        slots as f64 * self.slot_minutes as f64 / 60.0
    }

    /// Returns the first slot at or after `eta`, i.e. the ceiling of the
    /// offset from the horizon start in slots. Arrivals before the start map
    /// to slot 0.
    pub fn eta_offset_slots(&self, eta: DateTime<Utc>) -> i64 {
        let millis = (eta - self.start).num_milliseconds();
        if millis <= 0 {
            return 0;
        }
        let slot_millis = self.slot_minutes as i64 * MILLIS_PER_MINUTE;
        (millis + slot_millis - 1) / slot_millis
    }

    /// Returns the number of slots a service of `hours` occupies, rounded up.
    /// Positive durations always occupy at least one slot.
    pub fn duration_slots(&self, hours: f64) -> i64 {
        let raw = hours * 60.0 / self.slot_minutes as f64;
        (raw - SLOT_ROUNDING_TOLERANCE).ceil().max(1.0) as i64
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Horizon({} .. {}, {} slots of {} min)",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M"),
            self.horizon_slots,
            self.slot_minutes
        )
    }
}

/// Derives a [`Horizon`] from a vessel snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizonBuilder {
    slot_minutes: u32,
    margin_hours: f64,
}

impl Default for HorizonBuilder {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl HorizonBuilder {
    #[inline]
    pub fn new(slot_minutes: u32, margin_hours: f64) -> Self {
        Self {
            slot_minutes,
            margin_hours,
        }
    }

    #[inline]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.slot_minutes, config.margin_hours)
    }

    /// Builds the horizon for `vessels` sharing `num_berths` berths.
    ///
    /// # Errors
    ///
    /// Returns an `InputError` on an empty snapshot, zero berths, a zero slot
    /// length, an invalid margin, a vessel with a non-positive or non-finite
    /// turnaround or fuel rate, or a horizon too large to represent.
    pub fn build(&self, vessels: &[Vessel], num_berths: usize) -> Result<Horizon, InputError> {
        if vessels.is_empty() {
            return Err(InputError::EmptyFleet);
        }
        if num_berths == 0 {
            return Err(InputError::NonPositiveBerthCount);
        }
        if self.slot_minutes == 0 {
            return Err(InputError::invalid_parameter("slot_minutes", 0.0));
        }
        if !self.margin_hours.is_finite()
            || self.margin_hours < 0.0
            || self.margin_hours > MAX_SUPPORTED_HOURS
        {
            return Err(InputError::invalid_parameter(
                "margin_hours",
                self.margin_hours,
            ));
        }

        let mut total_turnaround_hours = 0.0;
        for (i, vessel) in vessels.iter().enumerate() {
            validate_vessel(VesselIndex::new(i), vessel)?;
            total_turnaround_hours += vessel.predicted_turnaround_hours;
        }

        let earliest = vessels
            .iter()
            .map(|v| v.eta)
            .min()
            .ok_or(InputError::EmptyFleet)?;
        let start = floor_to_hour(earliest).ok_or(InputError::Overflow("horizon start"))?;

        let span_hours = total_turnaround_hours / num_berths as f64 + self.margin_hours;
        if span_hours > MAX_SUPPORTED_HOURS {
            return Err(InputError::Overflow("horizon length"));
        }
        let span_millis = (span_hours * MILLIS_PER_HOUR).round() as i64;
        let span = TimeDelta::try_milliseconds(span_millis)
            .ok_or(InputError::Overflow("horizon length"))?;
        let end = start
            .checked_add_signed(span)
            .ok_or(InputError::Overflow("horizon end"))?;

        let slot_millis = self.slot_minutes as i64 * MILLIS_PER_MINUTE;
        let horizon_slots = (span_millis + slot_millis - 1) / slot_millis;

        Ok(Horizon {
            start,
            end,
            slot_minutes: self.slot_minutes,
            horizon_slots,
        })
    }
}

fn validate_vessel(index: VesselIndex, vessel: &Vessel) -> Result<(), InputError> {
    let hours = vessel.predicted_turnaround_hours;
    if !hours.is_finite() || hours <= 0.0 {
        return Err(InputError::invalid_vessel(
            index,
            vessel.id.as_str(),
            "predicted turnaround must be a positive number of hours",
        ));
    }
    if hours > MAX_SUPPORTED_HOURS {
        return Err(InputError::invalid_vessel(
            index,
            vessel.id.as_str(),
            "predicted turnaround exceeds the supported range",
        ));
    }
    let fuel = vessel.fuel_consumption_rate;
    if !fuel.is_finite() || fuel < 0.0 {
        return Err(InputError::invalid_vessel(
            index,
            vessel.id.as_str(),
            "fuel consumption rate must be a non-negative number",
        ));
    }
    Ok(())
}

fn floor_to_hour(t: DateTime<Utc>) -> Option<DateTime<Utc>> {
    t.with_minute(0)?.with_second(0)?.with_nanosecond(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vessel::ComplianceRating;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, h, m, 0).unwrap()
    }

    fn vessel(id: &str, eta: DateTime<Utc>, hours: f64) -> Vessel {
        Vessel::new(id, eta, hours, 20.0, ComplianceRating::C)
    }

    #[test]
    fn test_start_is_floored_and_length_follows_workload() {
        let vessels = vec![vessel("a", at(9, 5), 1.0), vessel("b", at(8, 20), 2.0)];
        let horizon = HorizonBuilder::new(10, 48.0).build(&vessels, 1).unwrap();

        assert_eq!(horizon.start(), at(8, 0));
        assert_eq!(horizon.end(), at(8, 0) + TimeDelta::hours(51));
        assert_eq!(horizon.horizon_slots(), 51 * 6);
    }

    #[test]
    fn test_more_berths_shrink_the_horizon() {
        let vessels = vec![vessel("a", at(8, 0), 1.0), vessel("b", at(8, 0), 2.0)];
        let horizon = HorizonBuilder::new(10, 48.0).build(&vessels, 2).unwrap();
        // 3h / 2 + 48h = 49.5h
        assert_eq!(horizon.horizon_slots(), 297);
    }

    #[test]
    fn test_horizon_slots_round_up() {
        let vessels = vec![vessel("a", at(8, 0), 0.25)];
        let horizon = HorizonBuilder::new(10, 0.0).build(&vessels, 1).unwrap();
        // 15 minutes in 10 minute slots
        assert_eq!(horizon.horizon_slots(), 2);
    }

    #[test]
    fn test_empty_fleet_and_zero_berths_are_input_errors() {
        let builder = HorizonBuilder::default();
        assert!(matches!(builder.build(&[], 1), Err(InputError::EmptyFleet)));
        let vessels = vec![vessel("a", at(8, 0), 1.0)];
        assert!(matches!(
            builder.build(&vessels, 0),
            Err(InputError::NonPositiveBerthCount)
        ));
    }

    #[test]
    fn test_invalid_turnaround_is_rejected() {
        let vessels = vec![vessel("ok", at(8, 0), 1.0), vessel("bad", at(8, 0), 0.0)];
        let err = HorizonBuilder::default().build(&vessels, 1).unwrap_err();
        match err {
            InputError::InvalidVessel {
                vessel_index,
                vessel_id,
                ..
            } => {
                assert_eq!(vessel_index.get(), 1);
                assert_eq!(vessel_id, "bad");
            }
            other => panic!("unexpected error: {other}"),
        }

        let vessels = vec![vessel("nan", at(8, 0), f64::NAN)];
        assert!(HorizonBuilder::default().build(&vessels, 1).is_err());
    }

    #[test]
    fn test_negative_margin_is_rejected() {
        let vessels = vec![vessel("a", at(8, 0), 1.0)];
        let err = HorizonBuilder::new(10, -1.0).build(&vessels, 1).unwrap_err();
        assert!(matches!(
            err,
            InputError::InvalidParameter {
                name: "margin_hours",
                ..
            }
        ));
    }

    #[test]
    fn test_eta_offset_is_ceiling() {
        let vessels = vec![vessel("a", at(8, 0), 1.0)];
        let horizon = HorizonBuilder::new(10, 48.0).build(&vessels, 1).unwrap();
        assert_eq!(horizon.eta_offset_slots(at(8, 0)), 0);
        assert_eq!(horizon.eta_offset_slots(at(8, 1)), 1);
        assert_eq!(horizon.eta_offset_slots(at(8, 10)), 1);
        assert_eq!(horizon.eta_offset_slots(at(8, 11)), 2);
        assert_eq!(horizon.eta_offset_slots(at(7, 0)), 0);
    }

    #[test]
    fn test_duration_slots_is_ceiling_with_minimum_one() {
        let vessels = vec![vessel("a", at(8, 0), 1.0)];
        let horizon = HorizonBuilder::new(10, 48.0).build(&vessels, 1).unwrap();
        assert_eq!(horizon.duration_slots(2.0), 12);
        assert_eq!(horizon.duration_slots(0.5), 3);
        assert_eq!(horizon.duration_slots(1.05), 7);
        assert_eq!(horizon.duration_slots(0.01), 1);
    }

    #[test]
    fn test_slot_conversions() {
        let vessels = vec![vessel("a", at(8, 0), 1.0)];
        let horizon = HorizonBuilder::new(10, 48.0).build(&vessels, 1).unwrap();
        assert_eq!(horizon.slot_to_time(9), Some(at(9, 30)));
        assert_eq!(horizon.slots_to_hours(9), 1.5);
    }
}

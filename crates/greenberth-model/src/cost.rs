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

//! Objective terms.
//!
//! For a vessel `v` served from slot `s`:
//!
//! ```text
//! wait_cost(v, s)     = (s - eta_offset(v)) * wait_rate_per_slot
//! emission_cost(v)    = turnaround_hours(v) * co2_rate_tph(v) * co2_price_per_tonne
//! compliance_bonus(v) = score(rating(v)) * cii_weight
//! cost(v, s)          = wait_cost(v, s) + emission_cost(v) - compliance_bonus(v)
//! ```
//!
//! Money amounts are truncated to integers once, when the model is built, so
//! the search works on exact integer sums. With the default weights this gives
//! a wait rate of `trunc(1000 * 10 / 60) = 166` per slot.
//!
//! Only the wait term depends on the chosen start. Emission and bonus are
//! charged once per vessel regardless of the berth, and are kept together as
//! the vessel's fixed cost.

use crate::{
    config::{EngineConfig, PlanningRequest},
    err::InputError,
    index::VesselIndex,
    vessel::Vessel,
};
use num_traits::{PrimInt, Signed};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostModel<T> {
    wait_rate_per_slot: T,
    emission_costs: Vec<T>,
    compliance_bonuses: Vec<T>,
    fixed_costs: Vec<T>,
}

impl<T> CostModel<T>
where
    T: PrimInt + Signed,
{
    /// Derives the integer cost terms for `vessels`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Overflow` if a truncated term does not fit `T`.
    pub fn new(
        vessels: &[Vessel],
        request: &PlanningRequest,
        config: &EngineConfig,
    ) -> Result<Self, InputError> {
        let wait_rate_per_slot = truncate::<T>(
            request.wait_penalty_per_hour * config.slot_minutes as f64 / 60.0,
            "wait rate",
        )?;

        let mut emission_costs = Vec::with_capacity(vessels.len());
        let mut compliance_bonuses = Vec::with_capacity(vessels.len());
        let mut fixed_costs = Vec::with_capacity(vessels.len());
        for vessel in vessels {
            let co2_rate =
                vessel.co2_rate_tph(config.alongside_fuel_fraction, config.co2_emission_factor);
            let emission = truncate::<T>(
                vessel.predicted_turnaround_hours * co2_rate * request.co2_price_per_tonne,
                "emission cost",
            )?;
            let bonus = truncate::<T>(
                vessel.compliance_rating.score() as f64 * request.cii_weight,
                "compliance bonus",
            )?;
            let fixed = emission
                .checked_sub(&bonus)
                .ok_or(InputError::Overflow("vessel cost"))?;

            emission_costs.push(emission);
            compliance_bonuses.push(bonus);
            fixed_costs.push(fixed);
        }

        Ok(Self {
            wait_rate_per_slot,
            emission_costs,
            compliance_bonuses,
            fixed_costs,
        })
    }

    #[inline]
    pub fn num_vessels(&self) -> usize {
        self.fixed_costs.len()
    }

    #[inline]
    pub fn wait_rate_per_slot(&self) -> T {
        self.wait_rate_per_slot
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn emission_cost(&self, vessel_index: VesselIndex) -> T {
        self.emission_costs[vessel_index.get()]
    }

    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn compliance_bonus(&self, vessel_index: VesselIndex) -> T {
        self.compliance_bonuses[vessel_index.get()]
    }

    /// Returns `emission_cost - compliance_bonus` of the vessel.
    ///
    /// # Panics
    ///
    /// Panics if `vessel_index` is out of bounds.
    #[inline]
    pub fn fixed_cost(&self, vessel_index: VesselIndex) -> T {
        self.fixed_costs[vessel_index.get()]
    }

    /// Returns the waiting cost of starting at `start_slot` for a vessel that
    /// arrives at `eta_offset`. Saturates at `T::max_value()`.
    #[inline]
    pub fn wait_cost(&self, eta_offset: T, start_slot: T) -> T {
        let waited = start_slot.saturating_sub(eta_offset);
        waited
            .checked_mul(&self.wait_rate_per_slot)
            .unwrap_or_else(T::max_value)
    }

    /// Returns the full cost contribution of serving `vessel_index` from
    /// `start_slot`.
    #[inline]
    pub fn assignment_cost(&self, vessel_index: VesselIndex, eta_offset: T, start_slot: T) -> T {
        self.wait_cost(eta_offset, start_slot)
            .saturating_add(self.fixed_cost(vessel_index))
    }

    /// Returns the objective of a complete assignment, or `None` on overflow.
    ///
    /// `eta_offsets[i]` and `start_slots[i]` belong to vessel `i`; every vessel
    /// is present exactly once, so its fixed cost is charged once.
    pub fn objective(&self, eta_offsets: &[T], start_slots: &[T]) -> Option<T> {
        debug_assert_eq!(eta_offsets.len(), self.num_vessels());
        debug_assert_eq!(start_slots.len(), self.num_vessels());

        let mut total = T::zero();
        for (i, (&eta, &start)) in eta_offsets.iter().zip(start_slots).enumerate() {
            let waited = start.checked_sub(&eta)?;
            let wait = waited.checked_mul(&self.wait_rate_per_slot)?;
            total = total
                .checked_add(&wait)?
                .checked_add(&self.fixed_costs[i])?;
        }
        Some(total)
    }
}

fn truncate<T>(value: f64, what: &'static str) -> Result<T, InputError>
where
    T: PrimInt,
{
    if !value.is_finite() {
        return Err(InputError::Overflow(what));
    }
    <T as num_traits::NumCast>::from(value.trunc()).ok_or(InputError::Overflow(what))
}

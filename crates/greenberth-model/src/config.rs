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

//! Planning request and engine configuration.
//!
//! `PlanningRequest` carries what a caller decides per run: berth count, time
//! budget and the cost weights. `EngineConfig` carries the discretization and
//! emission constants that rarely change between runs. Both deserialize from
//! JSON with every optional field defaulted.

use crate::err::InputError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TIME_BUDGET_SECONDS: f64 = 10.0;
pub const DEFAULT_WAIT_PENALTY_PER_HOUR: f64 = 1000.0;
pub const DEFAULT_CO2_PRICE_PER_TONNE: f64 = 80.0;
pub const DEFAULT_CII_WEIGHT: f64 = 100.0;

pub const DEFAULT_SLOT_MINUTES: u32 = 10;
pub const DEFAULT_GAP_SLOTS: u32 = 1;
pub const DEFAULT_MARGIN_HOURS: f64 = 48.0;
pub const DEFAULT_ALONGSIDE_FUEL_FRACTION: f64 = 0.15;
/// Tonnes of CO₂ emitted per tonne of heavy fuel oil burnt.
pub const DEFAULT_CO2_EMISSION_FACTOR: f64 = 3.114;
pub const DEFAULT_CLOCK_CHECK_MASK: u64 = 63;

fn default_time_budget_seconds() -> f64 {
    DEFAULT_TIME_BUDGET_SECONDS
}

fn default_wait_penalty_per_hour() -> f64 {
    DEFAULT_WAIT_PENALTY_PER_HOUR
}

fn default_co2_price_per_tonne() -> f64 {
    DEFAULT_CO2_PRICE_PER_TONNE
}

fn default_cii_weight() -> f64 {
    DEFAULT_CII_WEIGHT
}

/// Per-run planning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningRequest {
    pub num_berths: usize,
    #[serde(default = "default_time_budget_seconds")]
    pub time_budget_seconds: f64,
    #[serde(default = "default_wait_penalty_per_hour")]
    pub wait_penalty_per_hour: f64,
    #[serde(default = "default_co2_price_per_tonne")]
    pub co2_price_per_tonne: f64,
    #[serde(default = "default_cii_weight")]
    pub cii_weight: f64,
}

impl PlanningRequest {
    /// Creates a request for `num_berths` berths with default budget and weights.
    pub fn new(num_berths: usize) -> Self {
        Self {
            num_berths,
            time_budget_seconds: DEFAULT_TIME_BUDGET_SECONDS,
            wait_penalty_per_hour: DEFAULT_WAIT_PENALTY_PER_HOUR,
            co2_price_per_tonne: DEFAULT_CO2_PRICE_PER_TONNE,
            cii_weight: DEFAULT_CII_WEIGHT,
        }
    }

    #[inline]
    pub fn with_time_budget_seconds(mut self, seconds: f64) -> Self {
        self.time_budget_seconds = seconds;
        self
    }

    #[inline]
    pub fn with_wait_penalty_per_hour(mut self, penalty: f64) -> Self {
        self.wait_penalty_per_hour = penalty;
        self
    }

    #[inline]
    pub fn with_co2_price_per_tonne(mut self, price: f64) -> Self {
        self.co2_price_per_tonne = price;
        self
    }

    #[inline]
    pub fn with_cii_weight(mut self, weight: f64) -> Self {
        self.cii_weight = weight;
        self
    }

    /// Returns the wall-clock budget of the search.
    ///
    /// Only meaningful after [`PlanningRequest::validate`] succeeded.
    #[inline]
    pub fn time_budget(&self) -> Duration {
        Duration::from_secs_f64(self.time_budget_seconds)
    }

    /// Checks the request, returning the first violated rule.
    ///
    /// A zero time budget is accepted: the search then stops before its
    /// first node and reports that no solution was found.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.num_berths == 0 {
            return Err(InputError::NonPositiveBerthCount);
        }
        // Upper bound keeps `Duration::from_secs_f64` from panicking.
        if !self.time_budget_seconds.is_finite()
            || self.time_budget_seconds < 0.0
            || self.time_budget_seconds > u32::MAX as f64
        {
            return Err(InputError::invalid_parameter(
                "time_budget_seconds",
                self.time_budget_seconds,
            ));
        }
        check_non_negative("wait_penalty_per_hour", self.wait_penalty_per_hour)?;
        check_non_negative("co2_price_per_tonne", self.co2_price_per_tonne)?;
        if !self.cii_weight.is_finite() {
            return Err(InputError::invalid_parameter("cii_weight", self.cii_weight));
        }
        Ok(())
    }
}

/// Discretization, emission and search settings of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of one horizon slot in minutes.
    pub slot_minutes: u32,
    /// Idle slots a berth must stay empty after each departure.
    pub gap_slots: u32,
    /// Safety margin added to the workload-based horizon, in hours.
    pub margin_hours: f64,
    /// Share of the daily sea consumption burnt while alongside.
    pub alongside_fuel_fraction: f64,
    /// Tonnes of CO₂ per tonne of fuel.
    pub co2_emission_factor: f64,
    /// Number of search workers. `None` uses the available parallelism.
    pub num_workers: Option<usize>,
    /// The deadline and cancellation are checked every `mask + 1` nodes.
    /// Must be one less than a power of two.
    pub clock_check_mask: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            slot_minutes: DEFAULT_SLOT_MINUTES,
            gap_slots: DEFAULT_GAP_SLOTS,
            margin_hours: DEFAULT_MARGIN_HOURS,
            alongside_fuel_fraction: DEFAULT_ALONGSIDE_FUEL_FRACTION,
            co2_emission_factor: DEFAULT_CO2_EMISSION_FACTOR,
            num_workers: None,
            clock_check_mask: DEFAULT_CLOCK_CHECK_MASK,
        }
    }
}

impl EngineConfig {
    #[inline]
    pub fn with_margin_hours(mut self, hours: f64) -> Self {
        self.margin_hours = hours;
        self
    }

    #[inline]
    pub fn with_num_workers(mut self, workers: usize) -> Self {
        self.num_workers = Some(workers);
        self
    }

    #[inline]
    pub fn with_gap_slots(mut self, gap: u32) -> Self {
        self.gap_slots = gap;
        self
    }

    /// Resolves the worker count, falling back to the machine's parallelism.
    pub fn resolved_num_workers(&self) -> usize {
        self.num_workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.slot_minutes == 0 {
            return Err(InputError::invalid_parameter("slot_minutes", 0.0));
        }
        check_non_negative("margin_hours", self.margin_hours)?;
        check_non_negative("alongside_fuel_fraction", self.alongside_fuel_fraction)?;
        check_non_negative("co2_emission_factor", self.co2_emission_factor)?;
        if self.num_workers == Some(0) {
            return Err(InputError::invalid_parameter("num_workers", 0.0));
        }
        if (self.clock_check_mask & self.clock_check_mask.wrapping_add(1)) != 0 {
            return Err(InputError::invalid_parameter(
                "clock_check_mask",
                self.clock_check_mask as f64,
            ));
        }
        Ok(())
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InputError::invalid_parameter(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_apply_to_missing_fields() {
        let req: PlanningRequest = serde_json::from_str(r#"{ "num_berths": 3 }"#).unwrap();
        assert_eq!(req, PlanningRequest::new(3));
        assert_eq!(req.time_budget_seconds, 10.0);
        assert_eq!(req.wait_penalty_per_hour, 1000.0);
        assert_eq!(req.co2_price_per_tonne, 80.0);
        assert_eq!(req.cii_weight, 100.0);
    }

    #[test]
    fn test_request_requires_berth_count() {
        let res: Result<PlanningRequest, _> = serde_json::from_str(r#"{ "cii_weight": 5 }"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_zero_berths_is_rejected() {
        let err = PlanningRequest::new(0).validate().unwrap_err();
        assert!(matches!(err, InputError::NonPositiveBerthCount));
    }

    #[test]
    fn test_zero_budget_is_accepted_negative_is_not() {
        assert!(PlanningRequest::new(1)
            .with_time_budget_seconds(0.0)
            .validate()
            .is_ok());
        let err = PlanningRequest::new(1)
            .with_time_budget_seconds(-1.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            InputError::InvalidParameter {
                name: "time_budget_seconds",
                ..
            }
        ));
        assert!(PlanningRequest::new(1)
            .with_time_budget_seconds(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_negative_wait_penalty_is_rejected() {
        let err = PlanningRequest::new(2)
            .with_wait_penalty_per_hour(-5.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            InputError::InvalidParameter {
                name: "wait_penalty_per_hour",
                ..
            }
        ));
    }

    #[test]
    fn test_engine_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.slot_minutes, 10);
        assert_eq!(cfg.gap_slots, 1);
        assert_eq!(cfg.margin_hours, 48.0);
        assert!(cfg.validate().is_ok());

        let parsed: EngineConfig = serde_json::from_str(r#"{ "margin_hours": 12 }"#).unwrap();
        assert_eq!(parsed.margin_hours, 12.0);
        assert_eq!(parsed.slot_minutes, 10);
    }

    #[test]
    fn test_engine_rejects_bad_values() {
        let cfg = EngineConfig {
            slot_minutes: 0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = EngineConfig::default().with_num_workers(0);
        assert!(cfg.validate().is_err());

        let cfg = EngineConfig {
            clock_check_mask: 10,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = EngineConfig {
            clock_check_mask: 0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_resolved_workers_prefers_explicit_value() {
        assert_eq!(
            EngineConfig::default()
                .with_num_workers(3)
                .resolved_num_workers(),
            3
        );
        assert!(EngineConfig::default().resolved_num_workers() >= 1);
    }
}

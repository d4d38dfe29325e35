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

//! # Planning Entry Point
//!
//! [`plan`] runs one planning request end to end:
//!
//! 1. validate the request and start the wall-clock budget,
//! 2. build the horizon and `ScheduleModel` (input and horizon errors surface
//!    here, before any search),
//! 3. run the `Optimizer` under the deadline and the optional cancellation
//!    token,
//! 4. decode and validate the winner with `SolutionReporter`.
//!
//! A run keeps no state. [`Planner`] only carries the engine configuration
//! and a cancellation token, so it can be reused for any number of requests.

use crate::{
    error::PlanningError,
    optimizer::Optimizer,
    report::{PlanningResult, SolutionReporter},
};
use greenberth_model::{
    config::{EngineConfig, PlanningRequest},
    model::{ScheduleModel, ScheduleModelBuilder},
    vessel::Vessel,
};
use greenberth_search::monitor::{
    cancellation::CancellationToken, deadline::Deadline, stop_condition::StopCondition,
};
use std::time::Instant;

/// Plans `vessels` with the default engine configuration.
///
/// # Errors
///
/// See [`PlanningError`] for the failure modes and their codes.
pub fn plan(
    vessels: &[Vessel],
    request: &PlanningRequest,
) -> Result<PlanningResult, PlanningError> {
    Planner::default().plan(vessels, request)
}

#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: EngineConfig,
    cancellation: Option<CancellationToken>,
}

impl Planner {
    #[inline]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            cancellation: None,
        }
    }

    /// Lets the caller stop a running plan. A cancelled run behaves like one
    /// whose budget ran out.
    #[inline]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, vessels, request),
        fields(vessels = vessels.len(), berths = request.num_berths)
    )]
    pub fn plan(
        &self,
        vessels: &[Vessel],
        request: &PlanningRequest,
    ) -> Result<PlanningResult, PlanningError> {
        let start_time = Instant::now();
        request.validate()?;
        let deadline = Deadline::after(request.time_budget());

        tracing::info!(
            "Planning {} vessels on {} berths with a {:.1}s budget",
            vessels.len(),
            request.num_berths,
            request.time_budget_seconds
        );

        let model: ScheduleModel<i64> =
            ScheduleModelBuilder::new(request, &self.config).build(vessels)?;

        let mut stop = StopCondition::new(deadline);
        if let Some(token) = &self.cancellation {
            stop = stop.with_cancellation(token.clone());
        }

        let outcome = Optimizer::new(&self.config, &stop).optimize(&model)?;
        tracing::debug!("{}", outcome.statistics());

        let result = SolutionReporter::new(&model).report(outcome.result());
        match &result {
            Ok(result) => tracing::info!(
                "Planning finished in {:.2?}: {} with objective {}",
                start_time.elapsed(),
                result.status,
                result.objective_value
            ),
            Err(e) => tracing::info!(
                "Planning finished in {:.2?} without a schedule: {}",
                start_time.elapsed(),
                e.code()
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::PlanningStatus;
    use chrono::{DateTime, TimeZone, Utc};
    use greenberth_model::{err::InputError, vessel::ComplianceRating};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, h, m, 0).unwrap()
    }

    fn vessel(id: &str, eta: DateTime<Utc>, hours: f64) -> Vessel {
        Vessel::new(id, eta, hours, 0.0, ComplianceRating::E)
    }

    #[test]
    fn test_single_vessel_starts_on_arrival() {
        let result = plan(&[vessel("SOLO", at(8, 20), 3.0)], &PlanningRequest::new(1)).unwrap();
        assert_eq!(result.status, PlanningStatus::Optimal);
        assert_eq!(result.objective_value, 0);
        let entry = result.entry("SOLO").unwrap();
        assert_eq!(entry.start, at(8, 20));
        assert_eq!(entry.end, at(11, 20));
        assert_eq!(entry.wait_hours, 0.0);
    }

    #[test]
    fn test_back_to_back_on_one_berth() {
        let vessels = [vessel("A", at(8, 0), 2.0), vessel("B", at(8, 0), 1.0)];
        let result = plan(&vessels, &PlanningRequest::new(1)).unwrap();
        let order: Vec<_> = result.entries.iter().map(|e| e.vessel_id.as_str()).collect();
        assert_eq!(order, ["B", "A"]);
        assert_eq!(result.entries[1].start, at(9, 10));
        assert_eq!(result.objective_value, 7 * 166);
    }

    #[test]
    fn test_ties_go_to_the_lower_id() {
        let vessels = [vessel("A", at(8, 0), 1.0), vessel("B", at(8, 0), 1.0)];
        let result = plan(&vessels, &PlanningRequest::new(1)).unwrap();
        assert_eq!(result.entries[0].vessel_id, "A");
        assert_eq!(result.entries[1].vessel_id, "B");
    }

    #[test]
    fn test_zero_budget_is_no_solution() {
        let vessels = [vessel("A", at(8, 0), 2.0), vessel("B", at(8, 30), 1.0)];
        let request = PlanningRequest::new(1).with_time_budget_seconds(0.0);
        let err = plan(&vessels, &request).unwrap_err();
        assert_eq!(err.code(), "NO_SOLUTION");
    }

    #[test]
    fn test_cancelled_planner_is_no_solution() {
        let token = CancellationToken::new();
        token.cancel();
        let planner = Planner::new(EngineConfig::default()).with_cancellation(token);
        let err = planner
            .plan(&[vessel("A", at(8, 0), 1.0)], &PlanningRequest::new(1))
            .unwrap_err();
        assert!(matches!(err, PlanningError::NoSolution));
    }

    #[test]
    fn test_input_errors_come_before_search() {
        let err = plan(&[], &PlanningRequest::new(1)).unwrap_err();
        assert!(matches!(err, PlanningError::Input(InputError::EmptyFleet)));

        let err = plan(&[vessel("A", at(8, 0), 1.0)], &PlanningRequest::new(0)).unwrap_err();
        assert!(matches!(err, PlanningError::Input(InputError::NonPositiveBerthCount)));

        let request = PlanningRequest::new(1).with_time_budget_seconds(-1.0);
        let err = plan(&[vessel("A", at(8, 0), 1.0)], &request).unwrap_err();
        assert_eq!(err.code(), "INPUT_ERROR");
    }

    #[test]
    fn test_late_vessel_outside_horizon_is_infeasible_horizon() {
        // Two hours of work give a two hour horizon; B arrives after one.
        let config = EngineConfig::default().with_margin_hours(0.0);
        let vessels = [vessel("A", at(8, 0), 1.0), vessel("B", at(9, 0), 1.0)];
        let err = Planner::new(config)
            .plan(&vessels, &PlanningRequest::new(1))
            .unwrap_err();
        assert_eq!(err.code(), "INFEASIBLE_HORIZON");
    }

    #[test]
    fn test_exhausted_search_without_schedule_is_unschedulable() {
        // Each vessel fits alone, but the gap leaves no room for both.
        let config = EngineConfig::default().with_margin_hours(0.0);
        let vessels = [vessel("A", at(8, 0), 1.0), vessel("B", at(8, 0), 1.0)];
        let err = Planner::new(config)
            .plan(&vessels, &PlanningRequest::new(1))
            .unwrap_err();
        assert!(matches!(err, PlanningError::Unschedulable));
    }
}

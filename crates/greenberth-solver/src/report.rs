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

//! Decoding of solver output into a schedule.
//!
//! `SolutionReporter` maps a slot-level assignment back to wall-clock time:
//!
//! - `start = horizon.start + start_slot * slot_minutes`
//! - `end = start + duration_slots * slot_minutes` (turnover gap excluded)
//! - `wait_hours = (start_slot - eta_offset) * slot_minutes / 60`
//!
//! Before anything is emitted the assignment is checked against the model
//! and its objective is recomputed. A schedule that fails either check is a
//! `SOLVER_INTERNAL` error, never a result.

use crate::error::PlanningError;
use chrono::{DateTime, Utc};
use greenberth_bnb::constraint::validate_assignment;
use greenberth_model::{model::ScheduleModel, solution::Solution};
use greenberth_search::{num::SolverNumeric, result::SolverResult};
use serde::Serialize;

/// How good the reported schedule is known to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanningStatus {
    /// The search finished; no schedule is cheaper.
    Optimal,
    /// The best schedule found before the budget ran out.
    Feasible,
}

impl std::fmt::Display for PlanningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanningStatus::Optimal => write!(f, "OPTIMAL"),
            PlanningStatus::Feasible => write!(f, "FEASIBLE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub vessel_id: String,
    /// Zero-based berth number.
    pub berth_id: usize,
    pub start: DateTime<Utc>,
    /// End of service. The berth stays blocked for the turnover gap after it.
    pub end: DateTime<Utc>,
    pub wait_hours: f64,
}

/// A validated berth schedule, ordered by berth and then start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningResult {
    pub entries: Vec<ScheduleEntry>,
    pub objective_value: i64,
    pub status: PlanningStatus,
}

impl PlanningResult {
    /// Returns the entry of the vessel with the given id.
    pub fn entry(&self, vessel_id: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.vessel_id == vessel_id)
    }

    /// Sum of all waits, in hours.
    pub fn total_wait_hours(&self) -> f64 {
        self.entries.iter().map(|e| e.wait_hours).sum()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the result as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for PlanningResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            writeln!(
                f,
                "Vessel {} assigned to Berth {}: Start={}, End={}, Wait={:.2} hours",
                entry.vessel_id,
                entry.berth_id,
                entry.start.format("%Y-%m-%d %H:%M"),
                entry.end.format("%Y-%m-%d %H:%M"),
                entry.wait_hours
            )?;
        }
        write!(
            f,
            "Objective value: {} ({})",
            self.objective_value, self.status
        )
    }
}

pub struct SolutionReporter<'a, T>
where
    T: SolverNumeric,
{
    model: &'a ScheduleModel<T>,
}

impl<'a, T> SolutionReporter<'a, T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new(model: &'a ScheduleModel<T>) -> Self {
        Self { model }
    }

    /// Turns a search result into a schedule or the matching error.
    ///
    /// # Errors
    ///
    /// - `Unschedulable` for a proven infeasible search.
    /// - `NoSolution` if the search stopped without a solution.
    /// - `SolverInternal` if the solution fails validation.
    pub fn report(&self, result: &SolverResult<T>) -> Result<PlanningResult, PlanningError> {
        match result {
            SolverResult::Optimal(solution) => self.decode(solution, PlanningStatus::Optimal),
            SolverResult::Feasible(solution) => self.decode(solution, PlanningStatus::Feasible),
            SolverResult::Infeasible => Err(PlanningError::Unschedulable),
            SolverResult::Unknown => Err(PlanningError::NoSolution),
        }
    }

    /// Validates and decodes a single solution.
    pub fn decode(
        &self,
        solution: &Solution<T>,
        status: PlanningStatus,
    ) -> Result<PlanningResult, PlanningError> {
        let model = self.model;
        validate_assignment(model, solution.berths(), solution.start_slots())
            .map_err(|violation| PlanningError::internal(violation.to_string()))?;

        let recomputed = model
            .objective(solution.start_slots())
            .ok_or_else(|| PlanningError::internal("objective overflow while validating"))?;
        if recomputed != solution.objective_value() {
            return Err(PlanningError::internal(format!(
                "reported objective {} differs from recomputed objective {}",
                solution.objective_value(),
                recomputed
            )));
        }
        let objective_value = to_i64(solution.objective_value())?;

        let horizon = model.horizon();
        let mut order: Vec<_> = solution.iter().collect();
        order.sort_unstable_by_key(|&(v, b, start)| (b, start, v));

        let mut entries = Vec::with_capacity(order.len());
        for (v, b, start) in order {
            let start = to_i64(start)?;
            let end = start + to_i64(model.duration(v))?;
            let wait = start - to_i64(model.eta_offset(v))?;
            entries.push(ScheduleEntry {
                vessel_id: model.vessel_id(v).to_string(),
                berth_id: b.get(),
                start: slot_time(model, start)?,
                end: slot_time(model, end)?,
                wait_hours: horizon.slots_to_hours(wait),
            });
        }

        Ok(PlanningResult {
            entries,
            objective_value,
            status,
        })
    }
}

fn to_i64<T>(value: T) -> Result<i64, PlanningError>
where
    T: SolverNumeric,
{
    value
        .to_i64()
        .ok_or_else(|| PlanningError::internal(format!("value {} does not fit in i64", value)))
}

fn slot_time<T>(model: &ScheduleModel<T>, slot: i64) -> Result<DateTime<Utc>, PlanningError>
where
    T: SolverNumeric,
{
    model
        .horizon()
        .slot_to_time(slot)
        .ok_or_else(|| PlanningError::internal(format!("slot {} is not a valid timestamp", slot)))
}

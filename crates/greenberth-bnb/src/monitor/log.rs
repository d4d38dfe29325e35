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

//! Progress reporting through `tracing`.
//!
//! Search start and end, and every improving solution, are logged at `debug`.
//! Every `log_interval` (checked when `steps & clock_check_mask == 0`) a
//! progress line with nodes, depth, best objective and pruning counts is
//! logged at `info`. Descents and prunes are logged at `trace`.

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use greenberth_model::{model::ScheduleModel, solution::Solution};
use num_traits::{PrimInt, Signed};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct LogMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_objective: Option<T>,
}

impl<T> LogMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            best_objective: None,
        }
    }

    fn log_progress(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        let now = Instant::now();
        let best = match self.best_objective {
            Some(objective) => objective.to_string(),
            None => "none".to_string(),
        };
        tracing::info!(
            "{:.1}s | nodes {} | depth {} | best {} | current {} | pruned {}/{}",
            now.duration_since(self.start_time).as_secs_f32(),
            statistics.nodes_explored,
            state.num_assigned_vessels(),
            best,
            state.current_objective(),
            statistics.prunings_bound,
            statistics.prunings_infeasible
        );
        self.last_log_time = now;
    }
}

impl<T> Default for LogMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {:?}, clock_check_mask: {})",
            self.log_interval, self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogMonitor<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, model: &ScheduleModel<T>, _: &BnbSolverStatistics) {
        let now = Instant::now();
        self.start_time = now;
        self.last_log_time = now;
        self.best_objective = None;
        tracing::debug!(
            "Search started: {} vessels, {} berths, {} slots",
            model.num_vessels(),
            model.num_berths(),
            model.horizon_slots()
        );
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        tracing::debug!(
            "Search finished after {:.2?}: {} nodes, {} solutions",
            statistics.time_total,
            statistics.nodes_explored,
            statistics.solutions_found
        );
    }

    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        if statistics.steps & self.clock_check_mask != 0 {
            return;
        }
        if self.last_log_time.elapsed() >= self.log_interval {
            self.log_progress(state, statistics);
        }
    }

    fn on_lower_bound_computed(&mut self, _: &SearchState<T>, _: T, _: &BnbSolverStatistics) {}

    fn on_prune(&mut self, state: &SearchState<T>, reason: PruneReason, _: &BnbSolverStatistics) {
        tracing::trace!(
            "Pruned at depth {} ({})",
            state.num_assigned_vessels(),
            reason
        );
    }

    fn on_decisions_enqueued(&mut self, _: &SearchState<T>, _: usize, _: &BnbSolverStatistics) {}

    fn on_descend(&mut self, _: &SearchState<T>, decision: Decision<T>, _: &BnbSolverStatistics) {
        tracing::trace!("Descend: {}", decision);
    }

    fn on_backtrack(&mut self, _: &SearchState<T>, _: &BnbSolverStatistics) {}

    fn on_solution_found(&mut self, solution: &Solution<T>, statistics: &BnbSolverStatistics) {
        self.best_objective = Some(solution.objective_value());
        tracing::debug!(
            "New incumbent {} after {} nodes",
            solution.objective_value(),
            statistics.nodes_explored
        );
    }
}

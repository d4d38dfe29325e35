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

//! # Parallel Subtree Optimizer
//!
//! The children of the root node are the tasks of a run. Scoped worker
//! threads take tasks from an atomic cursor in exploration order and solve
//! each subtree with their own `BnbSolver`, pruning against one
//! `SharedIncumbent` bound that every worker tightens.
//!
//! ## Determinism
//!
//! Workers prune only nodes whose bound is strictly above the shared bound,
//! so the first optimal leaf of every subtree that contains one is always
//! reached. The coordinator keeps the solution with the lowest objective and,
//! on ties, the lowest task index. The winner is therefore the solution a
//! sequential depth-first search would report, whatever the thread timing.
//!
//! ## Termination
//!
//! The `StopCondition` is checked before each task and, through
//! `StopConditionMonitor`, every `clock_check_mask + 1` steps inside it.
//! If every task was exhausted the result is `Optimal`, or `Infeasible`
//! without a solution. Otherwise the best solution seen is `Feasible`, or the
//! result is `Unknown`.

use crate::error::PlanningError;
use greenberth_bnb::{
    bnb::{BnbSolver, root_decisions},
    branching::{arrival::EarliestArrivalBuilder, decision::Decision},
    eval::wait::WaitCostEvaluator,
    monitor::{
        composite::CompositeTreeSearchMonitor, log::LogMonitor, stop::StopConditionMonitor,
    },
    result::BnbSolverOutcome,
    stats::BnbSolverStatistics,
};
use greenberth_model::{config::EngineConfig, model::ScheduleModel, solution::Solution};
use greenberth_search::{
    incumbent::SharedIncumbent,
    monitor::stop_condition::StopCondition,
    num::SolverNumeric,
    result::{SolverResult, StopReason, TerminationReason},
};
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

const LOG_INTERVAL: Duration = Duration::from_secs(1);

/// The merged result of all workers.
#[derive(Debug, Clone)]
pub struct OptimizerOutcome<T> {
    result: SolverResult<T>,
    termination_reason: TerminationReason,
    statistics: BnbSolverStatistics,
    num_tasks: usize,
    num_tasks_exhausted: usize,
    num_workers: usize,
}

impl<T> OptimizerOutcome<T>
where
    T: Copy,
{
    #[inline]
    pub fn result(&self) -> &SolverResult<T> {
        &self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> TerminationReason {
        self.termination_reason
    }

    /// Counters summed over all tasks. `time_total` is the wall time of the
    /// whole run.
    #[inline]
    pub fn statistics(&self) -> &BnbSolverStatistics {
        &self.statistics
    }

    /// Number of root subtrees.
    #[inline]
    pub fn num_tasks(&self) -> usize {
        self.num_tasks
    }

    /// Number of root subtrees searched to the end.
    #[inline]
    pub fn num_tasks_exhausted(&self) -> usize {
        self.num_tasks_exhausted
    }

    #[inline]
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }
}

impl<T> std::fmt::Display for OptimizerOutcome<T>
where
    T: SolverNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Optimizer Outcome")?;
        writeln!(f, "  Result:      {}", self.result)?;
        writeln!(f, "  Termination: {}", self.termination_reason)?;
        writeln!(
            f,
            "  Tasks:       {}/{} exhausted on {} workers",
            self.num_tasks_exhausted, self.num_tasks, self.num_workers
        )?;
        write!(f, "{}", self.statistics)
    }
}

struct TaskReport<T> {
    task_index: usize,
    outcome: BnbSolverOutcome<T>,
}

/// Runs one planning search over a model.
#[derive(Debug, Clone, Copy)]
pub struct Optimizer<'a> {
    config: &'a EngineConfig,
    stop: &'a StopCondition,
}

impl<'a> Optimizer<'a> {
    #[inline]
    pub fn new(config: &'a EngineConfig, stop: &'a StopCondition) -> Self {
        Self { config, stop }
    }

    /// Searches `model` until every subtree is exhausted or the stop
    /// condition fires.
    ///
    /// # Errors
    ///
    /// `PlanningError::SolverInternal` if a worker thread panicked.
    pub fn optimize<T>(
        &self,
        model: &ScheduleModel<T>,
    ) -> Result<OptimizerOutcome<T>, PlanningError>
    where
        T: SolverNumeric,
    {
        let start_time = Instant::now();
        let tasks = root_decisions(
            model,
            &mut EarliestArrivalBuilder::preallocated(model.num_berths(), model.num_vessels()),
            &mut WaitCostEvaluator::new(),
        );
        let num_workers = self.config.resolved_num_workers().min(tasks.len()).max(1);
        tracing::debug!(
            "Searching {} root subtrees on {} workers",
            tasks.len(),
            num_workers
        );

        let incumbent = SharedIncumbent::new();
        let cursor = AtomicUsize::new(0);
        let mut reports = if num_workers == 1 {
            self.run_worker(0, model, &tasks, &cursor, &incumbent)
        } else {
            self.run_parallel(num_workers, model, &tasks, &cursor, &incumbent)?
        };
        reports.sort_unstable_by_key(|report| report.task_index);

        let outcome = self.reduce(reports, tasks.len(), num_workers, start_time);
        if let TerminationReason::Aborted(reason) = outcome.termination_reason {
            tracing::warn!(
                "Search stopped early ({}) with {} of {} subtrees exhausted",
                reason,
                outcome.num_tasks_exhausted,
                outcome.num_tasks
            );
        }
        Ok(outcome)
    }

    fn run_parallel<T>(
        &self,
        num_workers: usize,
        model: &ScheduleModel<T>,
        tasks: &[Decision<T>],
        cursor: &AtomicUsize,
        incumbent: &SharedIncumbent,
    ) -> Result<Vec<TaskReport<T>>, PlanningError>
    where
        T: SolverNumeric,
    {
        let joined: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..num_workers)
                .map(|worker_id| {
                    scope.spawn(move || {
                        self.run_worker(worker_id, model, tasks, cursor, incumbent)
                    })
                })
                .collect();
            handles.into_iter().map(|handle| handle.join()).collect()
        });

        let mut reports = Vec::with_capacity(tasks.len());
        for worker_reports in joined {
            match worker_reports {
                Ok(worker_reports) => reports.extend(worker_reports),
                Err(_) => return Err(PlanningError::internal("a search worker panicked")),
            }
        }
        Ok(reports)
    }

    fn run_worker<T>(
        &self,
        worker_id: usize,
        model: &ScheduleModel<T>,
        tasks: &[Decision<T>],
        cursor: &AtomicUsize,
        incumbent: &SharedIncumbent,
    ) -> Vec<TaskReport<T>>
    where
        T: SolverNumeric,
    {
        let (num_berths, num_vessels) = (model.num_berths(), model.num_vessels());
        let mut solver = BnbSolver::preallocated(num_berths, num_vessels);
        let mut builder = EarliestArrivalBuilder::preallocated(num_berths, num_vessels);
        let mut evaluator = WaitCostEvaluator::new();
        let mask = self.config.clock_check_mask;

        let mut reports = Vec::new();
        loop {
            let task_index = cursor.fetch_add(1, Ordering::Relaxed);
            let Some(task) = tasks.get(task_index) else {
                break;
            };
            if self.stop.check().is_some() {
                break;
            }

            let mut monitor = CompositeTreeSearchMonitor::with_capacity(2)
                .with_monitor(StopConditionMonitor::new(self.stop, mask))
                .with_monitor(LogMonitor::new(LOG_INTERVAL, mask));
            let outcome = solver.solve_with_fixed(
                model,
                std::slice::from_ref(task),
                &mut builder,
                &mut evaluator,
                &mut monitor,
                incumbent,
            );

            let exhausted = outcome.termination_reason().is_exhaustive();
            reports.push(TaskReport {
                task_index,
                outcome,
            });
            if !exhausted {
                break;
            }
        }

        tracing::debug!(
            "Worker {} finished {} subtrees (shared bound {})",
            worker_id,
            reports.len(),
            incumbent.upper_bound()
        );
        reports
    }

    fn reduce<T>(
        &self,
        reports: Vec<TaskReport<T>>,
        num_tasks: usize,
        num_workers: usize,
        start_time: Instant,
    ) -> OptimizerOutcome<T>
    where
        T: SolverNumeric,
    {
        let mut statistics = BnbSolverStatistics::default();
        let mut best: Option<Solution<T>> = None;
        let mut abort_reason: Option<StopReason> = None;
        let mut num_tasks_exhausted = 0;

        for report in reports {
            let (result, termination_reason, task_statistics) = report.outcome.into_parts();
            statistics.merge(&task_statistics);
            match termination_reason {
                TerminationReason::Aborted(reason) => {
                    abort_reason.get_or_insert(reason);
                }
                _ => num_tasks_exhausted += 1,
            }
            if let Some(solution) = result.into_solution() {
                let improves = best
                    .as_ref()
                    .is_none_or(|b| solution.objective_value() < b.objective_value());
                if improves {
                    best = Some(solution);
                }
            }
        }
        statistics.set_total_time(start_time.elapsed());

        let exhausted = num_tasks_exhausted == num_tasks;
        let result = SolverResult::classify(best, exhausted);
        let termination_reason = match &result {
            SolverResult::Optimal(_) => TerminationReason::OptimalityProven,
            SolverResult::Infeasible => TerminationReason::InfeasibilityProven,
            SolverResult::Feasible(_) | SolverResult::Unknown => TerminationReason::Aborted(
                abort_reason
                    .or_else(|| self.stop.check())
                    .unwrap_or(StopReason::DeadlineReached),
            ),
        };

        OptimizerOutcome {
            result,
            termination_reason,
            statistics,
            num_tasks,
            num_tasks_exhausted,
            num_workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use greenberth_model::{
        config::PlanningRequest,
        index::{BerthIndex, VesselIndex},
        model::ScheduleModelBuilder,
        vessel::{ComplianceRating, Vessel},
    };
    use greenberth_search::monitor::{cancellation::CancellationToken, deadline::Deadline};

    type IntegerType = i64;

    fn b(i: usize) -> BerthIndex {
        BerthIndex::new(i)
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, h, m, 0).unwrap()
    }

    fn vessel(id: &str, eta: DateTime<Utc>, hours: f64) -> Vessel {
        Vessel::new(id, eta, hours, 0.0, ComplianceRating::E)
    }

    fn build(vessels: &[Vessel], num_berths: usize) -> ScheduleModel<IntegerType> {
        ScheduleModelBuilder::new(&PlanningRequest::new(num_berths), &EngineConfig::default())
            .build(vessels)
            .unwrap()
    }

    fn generous() -> StopCondition {
        StopCondition::new(Deadline::after(Duration::from_secs(60)))
    }

    fn optimize(
        model: &ScheduleModel<IntegerType>,
        workers: usize,
        stop: &StopCondition,
    ) -> OptimizerOutcome<IntegerType> {
        let config = EngineConfig::default().with_num_workers(workers);
        Optimizer::new(&config, stop).optimize(model).unwrap()
    }

    #[test]
    fn test_single_berth_runs_shorter_vessel_first() {
        let model = build(&[vessel("A", at(8, 0), 2.0), vessel("B", at(8, 0), 1.0)], 1);
        for workers in [1, 2, 4] {
            let outcome = optimize(&model, workers, &generous());
            assert_eq!(outcome.termination_reason(), TerminationReason::OptimalityProven);
            let solution = outcome.result().solution().unwrap();
            assert_eq!(solution.objective_value(), 7 * 166);
            assert_eq!(solution.start_slots(), &[7, 0]);
            assert_eq!(outcome.num_tasks(), 2);
            assert_eq!(outcome.num_tasks_exhausted(), 2);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let vessels = [
            vessel("A", at(8, 0), 1.0),
            vessel("B", at(8, 0), 1.0),
            vessel("C", at(8, 0), 1.0),
        ];
        let model = build(&vessels, 2);
        let sequential = optimize(&model, 1, &generous());
        let parallel = optimize(&model, 3, &generous());

        assert_eq!(sequential.num_workers(), 1);
        assert_eq!(parallel.num_workers(), 3);
        assert_eq!(sequential.result(), parallel.result());

        let solution = sequential.result().solution().unwrap();
        assert_eq!(solution.objective_value(), 7 * 166);
        assert_eq!(solution.berths(), &[b(0), b(1), b(0)]);
        assert_eq!(solution.start_slots(), &[0, 0, 7]);
        assert_eq!(solution.berth_for_vessel(VesselIndex::new(1)), b(1));
    }

    #[test]
    fn test_workers_are_capped_at_task_count() {
        let model = build(&[vessel("A", at(8, 0), 1.0)], 3);
        let outcome = optimize(&model, 16, &generous());
        assert_eq!(outcome.num_tasks(), 1);
        assert_eq!(outcome.num_workers(), 1);
        assert_eq!(outcome.result().solution().unwrap().start_slots(), &[0]);
    }

    #[test]
    fn test_expired_budget_returns_unknown() {
        let model = build(&[vessel("A", at(8, 0), 2.0), vessel("B", at(8, 0), 1.0)], 1);
        let stop = StopCondition::new(Deadline::after(Duration::ZERO));
        let outcome = optimize(&model, 2, &stop);
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(
            outcome.termination_reason(),
            TerminationReason::Aborted(StopReason::DeadlineReached)
        );
        assert_eq!(outcome.num_tasks_exhausted(), 0);
        assert_eq!(outcome.statistics().nodes_explored, 0);
    }

    #[test]
    fn test_cancelled_run_reports_cancellation() {
        let model = build(&[vessel("A", at(8, 0), 2.0), vessel("B", at(9, 0), 1.0)], 1);
        let token = CancellationToken::new();
        token.cancel();
        let stop = generous().with_cancellation(token);
        let outcome = optimize(&model, 1, &stop);
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(
            outcome.termination_reason(),
            TerminationReason::Aborted(StopReason::Cancelled)
        );
    }
}

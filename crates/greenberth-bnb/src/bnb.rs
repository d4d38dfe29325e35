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

//! # Branch-and-Bound Solver
//!
//! `BnbSolver` runs a depth-first branch-and-bound over berth assignments.
//! A search session owns the mutable `SearchState`; the solver keeps the
//! reusable trail and decision stack so repeated solves do not reallocate.
//!
//! Per node the session:
//!
//! 1. asks the monitor whether to continue,
//! 2. pops the next decision of the current level, or backtracks when the
//!    level is exhausted,
//! 3. prunes the child if its accumulated cost, plus the compliance credit
//!    still available to the unassigned vessels, cannot beat the incumbent,
//! 4. applies the decision and, unless the assignment is complete, computes
//!    the node's lower bound and enqueues its children.
//!
//! A session prunes a node when its bound is at least its own best objective
//! or strictly above the shared incumbent, if one is attached. Solutions only
//! replace the session's best when they are strictly better, so each session
//! returns the first minimum in its exploration order.
//!
//! Sessions may start from a prefix of fixed decisions. The parallel optimizer
//! uses this to give each worker the subtree below one root decision.

use crate::{
    branching::decision::{Decision, DecisionBuilder},
    eval::evaluator::ObjectiveEvaluator,
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    result::BnbSolverOutcome,
    stack::SearchStack,
    state::SearchState,
    stats::BnbSolverStatistics,
    trail::SearchTrail,
};
use greenberth_model::{index::VesselIndex, model::ScheduleModel, solution::Solution};
use greenberth_search::{
    incumbent::SharedIncumbent, monitor::search_command::SearchCommand, num::SolverNumeric,
    result::TerminationReason,
};

#[derive(Debug, Clone)]
pub struct BnbSolver<T> {
    trail: SearchTrail<T>,
    stack: SearchStack<T>,
}

impl<T> Default for BnbSolver<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T>
where
    T: SolverNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
        }
    }

    /// Creates a solver whose buffers fit a problem of the given size.
    #[inline]
    pub fn preallocated(num_berths: usize, num_vessels: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_vessels),
            stack: SearchStack::preallocated(num_berths, num_vessels),
        }
    }

    /// Solves the whole model on the calling thread.
    pub fn solve<B, E, S>(
        &mut self,
        model: &ScheduleModel<T>,
        builder: &mut B,
        evaluator: &mut E,
        monitor: &mut S,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
    {
        self.solve_internal(
            model,
            &[],
            builder,
            evaluator,
            monitor,
            NoSharedIncumbent::new(),
        )
    }

    /// Solves the whole model, pruning against and publishing to `incumbent`.
    pub fn solve_with_incumbent<B, E, S>(
        &mut self,
        model: &ScheduleModel<T>,
        builder: &mut B,
        evaluator: &mut E,
        monitor: &mut S,
        incumbent: &SharedIncumbent,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
    {
        self.solve_internal(
            model,
            &[],
            builder,
            evaluator,
            monitor,
            SharedIncumbentAdapter::new(incumbent),
        )
    }

    /// Solves the subtree below the decisions in `fixed`, applied in order.
    ///
    /// Each fixed start must lie in the vessel's start domain at the moment
    /// it is applied; otherwise the subtree is reported infeasible. Cost deltas
    /// are recomputed by `evaluator`.
    pub fn solve_with_fixed<B, E, S>(
        &mut self,
        model: &ScheduleModel<T>,
        fixed: &[Decision<T>],
        builder: &mut B,
        evaluator: &mut E,
        monitor: &mut S,
        incumbent: &SharedIncumbent,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
    {
        self.solve_internal(
            model,
            fixed,
            builder,
            evaluator,
            monitor,
            SharedIncumbentAdapter::new(incumbent),
        )
    }

    fn solve_internal<B, E, S, I>(
        &mut self,
        model: &ScheduleModel<T>,
        fixed: &[Decision<T>],
        builder: &mut B,
        evaluator: &mut E,
        monitor: &mut S,
        incumbent: I,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T, E>,
        E: ObjectiveEvaluator<T>,
        S: TreeSearchMonitor<T>,
        I: IncumbentStore<T>,
    {
        self.reset();
        let outcome =
            BnbSolverSearchSession::new(self, model, fixed, builder, evaluator, monitor, incumbent)
                .run();
        self.reset();

        tracing::trace!(
            "BnB session with {} fixed decisions ended: {} ({} nodes)",
            fixed.len(),
            outcome.termination_reason(),
            outcome.statistics().nodes_explored
        );
        outcome
    }

    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
    }
}

/// Returns the children of the root node in exploration order.
pub fn root_decisions<T, B, E>(
    model: &ScheduleModel<T>,
    builder: &mut B,
    evaluator: &mut E,
) -> Vec<Decision<T>>
where
    T: SolverNumeric,
    B: DecisionBuilder<T, E>,
    E: ObjectiveEvaluator<T>,
{
    let state = SearchState::new(model.num_berths(), model.num_vessels());
    builder.next_decision(evaluator, model, &state).collect()
}

struct BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: SolverNumeric,
    I: IncumbentStore<T>,
{
    solver: &'a mut BnbSolver<T>,
    model: &'a ScheduleModel<T>,
    fixed: &'a [Decision<T>],
    builder: &'a mut B,
    evaluator: &'a mut E,
    monitor: &'a mut S,
    incumbent: I,
    state: SearchState<T>,
    best_objective: T,
    best_solution: Option<Solution<T>>,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<'a, T, B, E, S, I> BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: SolverNumeric,
    B: DecisionBuilder<T, E>,
    E: ObjectiveEvaluator<T>,
    S: TreeSearchMonitor<T>,
    I: IncumbentStore<T>,
{
    fn new(
        solver: &'a mut BnbSolver<T>,
        model: &'a ScheduleModel<T>,
        fixed: &'a [Decision<T>],
        builder: &'a mut B,
        evaluator: &'a mut E,
        monitor: &'a mut S,
        incumbent: I,
    ) -> Self {
        Self {
            solver,
            model,
            fixed,
            builder,
            evaluator,
            monitor,
            incumbent,
            state: SearchState::new(model.num_berths(), model.num_vessels()),
            best_objective: T::max_value(),
            best_solution: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbSolverOutcome<T> {
        self.monitor.on_enter_search(self.model, &self.stats);

        if !self.initialize() {
            self.stats.set_total_time(self.start_time.elapsed());
            self.monitor.on_exit_search(&self.stats);
            return BnbSolverOutcome::infeasible(self.stats);
        }

        let termination_reason = loop {
            if let SearchCommand::Terminate(reason) =
                self.monitor.search_command(&self.state, &self.stats)
            {
                break TerminationReason::Aborted(reason);
            }
            self.monitor.on_step(&self.state, &self.stats);
            self.stats.on_step();

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    break if self.best_solution.is_some() {
                        TerminationReason::OptimalityProven
                    } else {
                        TerminationReason::InfeasibilityProven
                    };
                }
                self.backtrack_step();
            } else {
                self.process_next_decision();
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination_reason)
    }

    fn finalize_result(self, reason: TerminationReason) -> BnbSolverOutcome<T> {
        match (reason, self.best_solution) {
            (TerminationReason::Aborted(stop), solution) => {
                BnbSolverOutcome::aborted(solution, stop, self.stats)
            }
            (_, Some(solution)) => BnbSolverOutcome::optimal(solution, self.stats),
            (_, None) => BnbSolverOutcome::infeasible(self.stats),
        }
    }

    /// Applies the fixed prefix and opens the root level.
    ///
    /// Returns `false` if a fixed decision is not admissible.
    fn initialize(&mut self) -> bool {
        self.solver.trail.ensure_capacity(self.model.num_vessels());
        self.solver
            .stack
            .ensure_capacity(self.model.num_berths(), self.model.num_vessels());

        self.solver.trail.push_frame(&self.state);
        for decision in self.fixed {
            let (vessel_index, berth_index) = (decision.vessel_index(), decision.berth_index());
            if vessel_index.get() >= self.model.num_vessels()
                || berth_index.get() >= self.model.num_berths()
                || self.state.is_vessel_assigned(vessel_index)
            {
                return false;
            }

            let start_slot = decision.start_slot();
            let admissible = self
                .state
                .domains()
                .domain(self.model, vessel_index, berth_index)
                .is_some_and(|domain| domain.contains(start_slot));
            if !admissible {
                return false;
            }

            let cost_delta =
                self.evaluator
                    .evaluate_vessel_assignment(self.model, vessel_index, start_slot);
            let decision = Decision::new(vessel_index, berth_index, start_slot, cost_delta);
            self.solver
                .trail
                .apply_assignment(&mut self.state, self.model, &decision);
        }

        self.solver.trail.push_frame(&self.state);
        self.solver.stack.push_frame();
        self.stats.on_node_explored();
        self.stats.on_depth_update(1);

        if self.state.is_complete() {
            self.handle_complete_solution();
        } else {
            self.expand_current_node();
        }
        true
    }

    #[inline]
    fn is_pruned(&self, bound: T) -> bool {
        bound >= self.best_objective || self.incumbent.is_dominated(bound)
    }

    /// Sum of the negative fixed costs of the unassigned vessels other than
    /// `skip`.
    fn unassigned_credit(&self, skip: VesselIndex) -> T {
        let cost = self.model.cost();
        self.state
            .unassigned_vessels()
            .filter(|&vessel_index| vessel_index != skip)
            .map(|vessel_index| cost.fixed_cost(vessel_index).min(T::zero()))
            .fold(T::zero(), |acc, credit| acc.saturating_add(credit))
    }

    #[inline]
    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);

        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
    }

    #[inline]
    fn process_next_decision(&mut self) {
        let Some(decision) = self.solver.stack.pop() else {
            return;
        };
        self.stats.on_decision_generated();

        // Clean vessels carry a negative fixed cost, so the partial objective
        // alone can overestimate the subtree. Credit them before comparing.
        let child_bound = self
            .state
            .current_objective()
            .saturating_add(decision.cost_delta())
            .saturating_add(self.unassigned_credit(decision.vessel_index()));
        if self.is_pruned(child_bound) {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return;
        }

        self.descend(decision);
    }

    fn descend(&mut self, decision: Decision<T>) {
        self.solver.trail.push_frame(&self.state);
        self.solver
            .trail
            .apply_assignment(&mut self.state, self.model, &decision);
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats
            .on_depth_update(self.solver.stack.depth() as u64);
        self.monitor.on_descend(&self.state, decision, &self.stats);

        if self.state.is_complete() {
            // Leaf: its level stays empty and the next step backtracks.
            self.handle_complete_solution();
            return;
        }

        if self.expand_current_node() {
            self.backtrack_step();
        }
    }

    fn handle_complete_solution(&mut self) {
        let objective = self.state.current_objective();
        if !self.is_pruned(objective)
            && let Some(solution) = self.state.to_solution()
        {
            debug_assert!(
                crate::constraint::validate_assignment(
                    self.model,
                    solution.berths(),
                    solution.start_slots()
                )
                .is_ok(),
                "search produced an invalid schedule"
            );
            self.best_objective = objective;
            self.incumbent.on_solution_found(&solution);
            self.stats.on_solution_found();
            self.monitor.on_solution_found(&solution, &self.stats);
            self.best_solution = Some(solution);
        } else {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
        }
    }

    /// Bounds the current node and enqueues its children.
    ///
    /// Returns `true` if the node was pruned and the caller must backtrack.
    fn expand_current_node(&mut self) -> bool {
        let Some(lower_bound) = self.evaluator.lower_bound(self.model, &self.state) else {
            self.stats.on_pruning_infeasible();
            self.monitor
                .on_prune(&self.state, PruneReason::Infeasible, &self.stats);
            return true;
        };

        if self.solver.stack.depth() == 1
            && let Some(bound) = lower_bound.to_i64()
        {
            self.stats.set_root_lower_bound(bound);
        }
        self.monitor
            .on_lower_bound_computed(&self.state, lower_bound, &self.stats);

        if self.is_pruned(lower_bound) {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return true;
        }

        let decisions = self
            .builder
            .next_decision(self.evaluator, self.model, &self.state);
        let count = self.solver.stack.extend_in_order(decisions);
        self.monitor
            .on_decisions_enqueued(&self.state, count, &self.stats);

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        branching::arrival::EarliestArrivalBuilder,
        eval::wait::WaitCostEvaluator,
        monitor::{log::LogMonitor, no_op::NoOperationMonitor, stop::StopConditionMonitor},
    };
    use chrono::{DateTime, TimeZone, Utc};
    use greenberth_model::{
        config::{EngineConfig, PlanningRequest},
        index::{BerthIndex, VesselIndex},
        model::ScheduleModelBuilder,
        vessel::{ComplianceRating, Vessel},
    };
    use greenberth_search::{
        monitor::{deadline::Deadline, stop_condition::StopCondition},
        result::{SolverResult, StopReason},
    };
    use std::time::Duration;

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

    fn build(vessels: &[Vessel], num_berths: usize) -> ScheduleModel<IntegerType> {
        ScheduleModelBuilder::new(&PlanningRequest::new(num_berths), &EngineConfig::default())
            .build(vessels)
            .unwrap()
    }

    fn vessel(id: &str, eta: DateTime<Utc>, hours: f64) -> Vessel {
        Vessel::new(id, eta, hours, 0.0, ComplianceRating::E)
    }

    fn solve(model: &ScheduleModel<IntegerType>) -> BnbSolverOutcome<IntegerType> {
        let mut solver = BnbSolver::new();
        let mut builder = EarliestArrivalBuilder::new();
        let mut evaluator = WaitCostEvaluator::new();
        let mut monitor = NoOperationMonitor::new();
        solver.solve(model, &mut builder, &mut evaluator, &mut monitor)
    }

    #[test]
    fn test_short_vessel_goes_first() {
        // `a` takes 12 slots, `b` 6; both arrive at the horizon start.
        let model = build(&[vessel("a", at(8, 0), 2.0), vessel("b", at(8, 0), 1.0)], 1);
        let outcome = solve(&model);

        assert_eq!(outcome.termination_reason(), TerminationReason::OptimalityProven);
        let SolverResult::Optimal(solution) = outcome.result() else {
            panic!("expected optimal result, got {}", outcome.result());
        };
        assert_eq!(solution.objective_value(), 7 * 166);
        assert_eq!(solution.start_slot_for_vessel(v(1)), 0);
        assert_eq!(solution.start_slot_for_vessel(v(0)), 7);
        assert_eq!(solution.berths(), &[b(0), b(0)]);
        assert!(outcome.statistics().solutions_found >= 1);
        assert_eq!(outcome.statistics().root_lower_bound, Some(0));
    }

    #[test]
    fn test_equal_vessels_tie_breaks_by_index() {
        let model = build(&[vessel("a", at(8, 0), 1.0), vessel("b", at(8, 0), 1.0)], 1);
        let outcome = solve(&model);
        let solution = outcome.result().solution().unwrap();
        assert_eq!(solution.objective_value(), 7 * 166);
        assert_eq!(solution.start_slots(), &[0, 7]);
    }

    #[test]
    fn test_three_vessels_two_berths() {
        let model = build(
            &[
                vessel("a", at(8, 0), 1.0),
                vessel("b", at(8, 0), 1.0),
                vessel("c", at(8, 0), 1.0),
            ],
            2,
        );
        let outcome = solve(&model);
        let solution = outcome.result().solution().unwrap();
        assert_eq!(solution.objective_value(), 7 * 166);
        assert_eq!(solution.berths(), &[b(0), b(1), b(0)]);
        assert_eq!(solution.start_slots(), &[0, 0, 7]);
    }

    #[test]
    fn test_compliance_credit_keeps_cheaper_order() {
        // `c` is clean and earns a 400 bonus long after the others. Taking
        // `b` first costs 12 waiting slots against 13 for `a` first; only
        // the credit of `c` brings that order under the first leaf found.
        let model = build(
            &[
                vessel("a", at(8, 0), 2.0),
                vessel("b", at(8, 0), 110.0 / 60.0),
                Vessel::new("c", at(20, 0), 1.0, 0.0, ComplianceRating::A),
            ],
            1,
        );
        assert_eq!(model.cost().fixed_cost(v(2)), -400);

        let outcome = solve(&model);
        assert_eq!(outcome.termination_reason(), TerminationReason::OptimalityProven);
        let solution = outcome.result().solution().unwrap();
        assert_eq!(solution.objective_value(), 12 * 166 - 400);
        assert_eq!(solution.start_slots(), &[12, 0, 72]);
        assert!(outcome.statistics().solutions_found >= 2);
    }

    #[test]
    fn test_no_waiting_when_arrivals_are_spread() {
        let model = build(
            &[
                vessel("late", at(12, 0), 1.0),
                vessel("early", at(8, 0), 1.0),
                vessel("mid", at(10, 0), 1.0),
            ],
            1,
        );
        let outcome = solve(&model);
        let solution = outcome.result().solution().unwrap();
        assert_eq!(solution.objective_value(), 0);
        assert_eq!(solution.start_slots(), &[24, 0, 12]);
    }

    #[test]
    fn test_fixed_prefix_restricts_subtree() {
        let model = build(&[vessel("a", at(8, 0), 2.0), vessel("b", at(8, 0), 1.0)], 1);
        let mut builder = EarliestArrivalBuilder::new();
        let mut evaluator = WaitCostEvaluator::new();
        let roots = root_decisions(&model, &mut builder, &mut evaluator);
        assert_eq!(
            roots,
            vec![Decision::new(v(0), b(0), 0, 0), Decision::new(v(1), b(0), 0, 0)]
        );

        let mut solver = BnbSolver::preallocated(1, 2);
        let mut monitor = NoOperationMonitor::new();

        // `a` first forces `b` to wait for 13 slots.
        let independent = SharedIncumbent::new();
        let a_first = solver.solve_with_fixed(
            &model,
            &roots[..1],
            &mut builder,
            &mut evaluator,
            &mut monitor,
            &independent,
        );
        assert_eq!(
            a_first.result().solution().map(|s| s.objective_value()),
            Some(13 * 166)
        );
        assert_eq!(independent.upper_bound(), 13 * 166);

        // With a better bound published, the same subtree has nothing to offer.
        let shared = SharedIncumbent::new();
        let b_first = solver.solve_with_fixed(
            &model,
            &roots[1..],
            &mut builder,
            &mut evaluator,
            &mut monitor,
            &shared,
        );
        assert_eq!(
            b_first.result().solution().map(|s| s.objective_value()),
            Some(7 * 166)
        );
        let pruned = solver.solve_with_fixed(
            &model,
            &roots[..1],
            &mut builder,
            &mut evaluator,
            &mut monitor,
            &shared,
        );
        assert_eq!(pruned.result(), &SolverResult::Infeasible);
        assert!(pruned.statistics().prunings_bound > 0);
    }

    #[test]
    fn test_equal_shared_bound_is_not_pruned() {
        let model = build(&[vessel("a", at(8, 0), 1.0), vessel("b", at(8, 0), 1.0)], 1);
        let shared = SharedIncumbent::new();
        shared.tighten(7 * 166);

        let mut solver = BnbSolver::new();
        let outcome = solver.solve_with_incumbent(
            &model,
            &mut EarliestArrivalBuilder::new(),
            &mut WaitCostEvaluator::new(),
            &mut NoOperationMonitor::new(),
            &shared,
        );
        assert_eq!(
            outcome.result(),
            &SolverResult::Optimal(Solution::new(7 * 166, vec![b(0), b(0)], vec![0, 7]))
        );
    }

    #[test]
    fn test_inadmissible_fixed_decision_is_infeasible() {
        let model = build(&[vessel("a", at(8, 0), 1.0), vessel("b", at(9, 0), 1.0)], 1);
        let shared = SharedIncumbent::new();
        let mut solver = BnbSolver::new();
        // `b` arrives at slot 6 and cannot start at 2.
        let outcome = solver.solve_with_fixed(
            &model,
            &[Decision::new(v(1), b(0), 2, 0)],
            &mut EarliestArrivalBuilder::new(),
            &mut WaitCostEvaluator::new(),
            &mut NoOperationMonitor::new(),
            &shared,
        );
        assert_eq!(outcome.result(), &SolverResult::Infeasible);
        assert_eq!(
            outcome.termination_reason(),
            TerminationReason::InfeasibilityProven
        );
    }

    #[test]
    fn test_complete_fixed_prefix_is_returned() {
        let model = build(&[vessel("a", at(8, 0), 1.0)], 1);
        let shared = SharedIncumbent::new();
        let mut solver = BnbSolver::new();
        let outcome = solver.solve_with_fixed(
            &model,
            &[Decision::new(v(0), b(0), 3, 0)],
            &mut EarliestArrivalBuilder::new(),
            &mut WaitCostEvaluator::new(),
            &mut NoOperationMonitor::new(),
            &shared,
        );
        assert_eq!(
            outcome.result(),
            &SolverResult::Optimal(Solution::new(3 * 166, vec![b(0)], vec![3]))
        );
    }

    #[test]
    fn test_expired_deadline_aborts_before_first_node() {
        let model = build(&[vessel("a", at(8, 0), 2.0), vessel("b", at(8, 0), 1.0)], 1);
        let condition = StopCondition::new(Deadline::after(Duration::ZERO));
        let mut monitor = StopConditionMonitor::new(&condition, 63);

        let mut solver = BnbSolver::new();
        let outcome = solver.solve(
            &model,
            &mut EarliestArrivalBuilder::new(),
            &mut WaitCostEvaluator::new(),
            &mut monitor,
        );
        assert_eq!(outcome.result(), &SolverResult::Unknown);
        assert_eq!(
            outcome.termination_reason(),
            TerminationReason::Aborted(StopReason::DeadlineReached)
        );
        assert_eq!(outcome.statistics().steps, 0);
    }

    #[test]
    fn test_solver_is_reusable() {
        let model = build(
            &[
                vessel("a", at(8, 0), 3.0),
                vessel("b", at(8, 30), 1.5),
                vessel("c", at(9, 0), 2.0),
                vessel("d", at(9, 10), 0.5),
            ],
            2,
        );
        let mut solver = BnbSolver::new();
        let mut builder = EarliestArrivalBuilder::new();
        let mut evaluator = WaitCostEvaluator::new();
        let mut monitor = LogMonitor::default();

        let first = solver.solve(&model, &mut builder, &mut evaluator, &mut monitor);
        let second = solver.solve(&model, &mut builder, &mut evaluator, &mut monitor);
        assert_eq!(first.result(), second.result());
        assert_eq!(
            first.statistics().nodes_explored,
            second.statistics().nodes_explored
        );

        let solution = first.result().solution().unwrap();
        assert_eq!(
            model.objective(solution.start_slots()),
            Some(solution.objective_value())
        );
    }
}

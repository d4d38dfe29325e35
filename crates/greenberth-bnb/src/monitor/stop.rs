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

//! Stops a search on the planning deadline or on cancellation.
//!
//! Reading the clock on every node is measurable, so the condition is only
//! checked when `steps & clock_check_mask == 0`. The mask must be `2^k - 1`;
//! step zero is always checked, so an expired budget stops the search before
//! its first node.

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use greenberth_model::{model::ScheduleModel, solution::Solution};
use greenberth_search::monitor::{search_command::SearchCommand, stop_condition::StopCondition};
use num_traits::{PrimInt, Signed};

#[derive(Debug, Clone, Copy)]
pub struct StopConditionMonitor<'a> {
    condition: &'a StopCondition,
    clock_check_mask: u64,
}

impl<'a> StopConditionMonitor<'a> {
    #[inline]
    pub fn new(condition: &'a StopCondition, clock_check_mask: u64) -> Self {
        debug_assert!(
            clock_check_mask.wrapping_add(1).is_power_of_two() || clock_check_mask == u64::MAX,
            "called `StopConditionMonitor::new` with a mask that is not 2^k - 1: {}",
            clock_check_mask
        );
        Self {
            condition,
            clock_check_mask,
        }
    }
}

impl<'a, T> TreeSearchMonitor<T> for StopConditionMonitor<'a>
where
    T: PrimInt + Signed,
{
    fn name(&self) -> &str {
        "StopConditionMonitor"
    }

    fn on_enter_search(&mut self, _: &ScheduleModel<T>, _: &BnbSolverStatistics) {}

    fn on_exit_search(&mut self, _: &BnbSolverStatistics) {}

    #[inline]
    fn search_command(
        &mut self,
        _: &SearchState<T>,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        if statistics.steps & self.clock_check_mask == 0 {
            self.condition.check().into()
        } else {
            SearchCommand::Continue
        }
    }

    fn on_step(&mut self, _: &SearchState<T>, _: &BnbSolverStatistics) {}

    fn on_lower_bound_computed(&mut self, _: &SearchState<T>, _: T, _: &BnbSolverStatistics) {}

    fn on_prune(&mut self, _: &SearchState<T>, _: PruneReason, _: &BnbSolverStatistics) {}

    fn on_decisions_enqueued(&mut self, _: &SearchState<T>, _: usize, _: &BnbSolverStatistics) {}

    fn on_descend(&mut self, _: &SearchState<T>, _: Decision<T>, _: &BnbSolverStatistics) {}

    fn on_backtrack(&mut self, _: &SearchState<T>, _: &BnbSolverStatistics) {}

    fn on_solution_found(&mut self, _: &Solution<T>, _: &BnbSolverStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenberth_search::{
        monitor::{cancellation::CancellationToken, deadline::Deadline},
        result::StopReason,
    };
    use std::time::Duration;

    type IntegerType = i64;

    fn command(
        monitor: &mut StopConditionMonitor<'_>,
        steps: u64,
    ) -> SearchCommand {
        let state = SearchState::<IntegerType>::new(1, 1);
        let statistics = BnbSolverStatistics {
            steps,
            ..Default::default()
        };
        monitor.search_command(&state, &statistics)
    }

    #[test]
    fn test_zero_budget_stops_at_first_step() {
        let condition = StopCondition::new(Deadline::after(Duration::ZERO));
        let mut monitor = StopConditionMonitor::new(&condition, 63);
        assert_eq!(
            command(&mut monitor, 0),
            SearchCommand::Terminate(StopReason::DeadlineReached)
        );
        // Off-mask steps do not look at the clock.
        assert_eq!(command(&mut monitor, 5), SearchCommand::Continue);
        assert_eq!(
            command(&mut monitor, 64),
            SearchCommand::Terminate(StopReason::DeadlineReached)
        );
    }

    #[test]
    fn test_cancellation_is_reported() {
        let token = CancellationToken::new();
        let condition =
            StopCondition::new(Deadline::after(Duration::from_secs(3600))).with_cancellation(token.clone());
        let mut monitor = StopConditionMonitor::new(&condition, 0);
        assert_eq!(command(&mut monitor, 3), SearchCommand::Continue);
        token.cancel();
        assert_eq!(
            command(&mut monitor, 4),
            SearchCommand::Terminate(StopReason::Cancelled)
        );
    }
}

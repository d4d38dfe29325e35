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

use greenberth_model::solution::Solution;
use num_traits::{PrimInt, Signed};

/// Why a search stopped before exhausting its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    DeadlineReached,
    Cancelled,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::DeadlineReached => write!(f, "deadline reached"),
            StopReason::Cancelled => write!(f, "cancelled by caller"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResult<T> {
    /// The whole tree was explored without finding a complete assignment.
    Infeasible,
    /// The whole tree was explored; the solution is optimal.
    Optimal(Solution<T>),
    /// The search stopped early with a solution in hand.
    Feasible(Solution<T>),
    /// The search stopped early without any solution.
    Unknown,
}

impl<T> SolverResult<T>
where
    T: Copy,
{
    /// Returns the solution, if the search found one.
    #[inline]
    pub fn solution(&self) -> Option<&Solution<T>> {
        match self {
            SolverResult::Optimal(s) | SolverResult::Feasible(s) => Some(s),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }

    #[inline]
    pub fn into_solution(self) -> Option<Solution<T>> {
        match self {
            SolverResult::Optimal(s) | SolverResult::Feasible(s) => Some(s),
            SolverResult::Infeasible | SolverResult::Unknown => None,
        }
    }

    /// Classifies a finished search from its best solution and whether the
    /// tree was exhausted.
    #[inline]
    pub fn classify(solution: Option<Solution<T>>, exhausted: bool) -> Self {
        match (solution, exhausted) {
            (Some(s), true) => SolverResult::Optimal(s),
            (Some(s), false) => SolverResult::Feasible(s),
            (None, true) => SolverResult::Infeasible,
            (None, false) => SolverResult::Unknown,
        }
    }
}

impl<T> std::fmt::Display for SolverResult<T>
where
    T: PrimInt + Signed + std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverResult::Infeasible => write!(f, "Infeasible"),
            SolverResult::Optimal(solution) => {
                write!(f, "Optimal(objective={})", solution.objective_value())
            }
            SolverResult::Feasible(solution) => {
                write!(f, "Feasible(objective={})", solution.objective_value())
            }
            SolverResult::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// The tree was exhausted and the best solution is optimal.
    OptimalityProven,
    /// The tree was exhausted without a solution.
    InfeasibilityProven,
    /// A stop condition fired before the tree was exhausted.
    Aborted(StopReason),
}

impl TerminationReason {
    #[inline]
    pub fn is_exhaustive(&self) -> bool {
        !matches!(self, TerminationReason::Aborted(_))
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::OptimalityProven => write!(f, "Optimality Proven"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

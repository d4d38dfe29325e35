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

//! Incumbent backing for a search session.
//!
//! A session always prunes against its own best solution. With a shared
//! incumbent it also prunes nodes whose bound is strictly above the best
//! objective any worker has published. Equal bounds are kept, so every worker
//! still finds its own first minimum and the coordinator can pick among equal
//! objectives deterministically.

use greenberth_model::solution::Solution;
use greenberth_search::{incumbent::SharedIncumbent, num::SolverNumeric};
use std::marker::PhantomData;

pub trait IncumbentStore<T>
where
    T: SolverNumeric,
{
    /// Returns `true` if a node with lower bound `bound` cannot improve on
    /// the incumbent of another worker.
    fn is_dominated(&self, bound: T) -> bool;

    /// Publishes a solution found by this session.
    fn on_solution_found(&self, solution: &Solution<T>);
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy)]
pub struct NoSharedIncumbent<T>(PhantomData<T>);

impl<T> Default for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> IncumbentStore<T> for NoSharedIncumbent<T>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn is_dominated(&self, _: T) -> bool {
        false
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Solution<T>) {}
}

#[repr(transparent)]
#[derive(Debug, Clone, Copy)]
pub struct SharedIncumbentAdapter<'a> {
    inner: &'a SharedIncumbent,
}

impl<'a> SharedIncumbentAdapter<'a> {
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent) -> Self {
        Self { inner }
    }
}

impl<'a, T> IncumbentStore<T> for SharedIncumbentAdapter<'a>
where
    T: SolverNumeric,
{
    #[inline(always)]
    fn is_dominated(&self, bound: T) -> bool {
        // Bounds beyond `i64` cannot beat any published objective.
        bound
            .to_i64()
            .is_none_or(|bound| bound > self.inner.upper_bound())
    }

    #[inline(always)]
    fn on_solution_found(&self, solution: &Solution<T>) {
        self.inner.tighten_with(solution.objective_value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenberth_model::index::BerthIndex;

    type IntegerType = i64;

    fn solution(objective: IntegerType) -> Solution<IntegerType> {
        Solution::new(objective, vec![BerthIndex::new(0)], vec![0])
    }

    #[test]
    fn test_no_shared_incumbent_never_prunes() {
        let store = NoSharedIncumbent::<IntegerType>::new();
        store.on_solution_found(&solution(1));
        assert!(!store.is_dominated(IntegerType::MAX));
    }

    #[test]
    fn test_adapter_prunes_strictly_above_shared_bound() {
        let shared = SharedIncumbent::new();
        let adapter = SharedIncumbentAdapter::new(&shared);
        assert!(!IncumbentStore::<IntegerType>::is_dominated(&adapter, 1_000_000));

        adapter.on_solution_found(&solution(120));
        assert_eq!(shared.upper_bound(), 120);
        assert!(!IncumbentStore::<IntegerType>::is_dominated(&adapter, 119));
        assert!(!IncumbentStore::<IntegerType>::is_dominated(&adapter, 120));
        assert!(IncumbentStore::<IntegerType>::is_dominated(&adapter, 121));

        // A worse solution never loosens the bound.
        adapter.on_solution_found(&solution(500));
        assert_eq!(shared.upper_bound(), 120);
    }
}

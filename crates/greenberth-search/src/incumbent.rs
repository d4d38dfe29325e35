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

//! # Shared Incumbent Bound
//!
//! The objective of the best solution found by any worker, kept in a single
//! `AtomicI64`. Workers read it to prune subtrees that cannot beat another
//! worker's solution and publish their own improvements through
//! [`SharedIncumbent::tighten`], a compare-and-set loop that only ever lowers
//! the stored value.
//!
//! Only the bound is shared. Solutions stay with the worker that found them
//! and are handed to the coordinator when the worker finishes, so no solution
//! data crosses threads while the search runs.
//!
//! `i64::MAX` means "no incumbent yet".
//!
//! ```rust
//! use greenberth_search::incumbent::SharedIncumbent;
//!
//! let inc = SharedIncumbent::new();
//! assert!(inc.tighten(120));
//! assert!(!inc.tighten(150));
//! assert_eq!(inc.upper_bound(), 120);
//! ```

use crate::num::SolverNumeric;
use std::sync::atomic::{AtomicI64, Ordering};

#[derive(Debug)]
pub struct SharedIncumbent {
    upper_bound: AtomicI64,
}

impl Default for SharedIncumbent {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedIncumbent {
    /// Creates an empty incumbent with bound `i64::MAX`.
    #[inline]
    pub fn new() -> Self {
        Self {
            upper_bound: AtomicI64::new(i64::MAX),
        }
    }

    /// Returns the current bound. `i64::MAX` if nothing was published.
    #[inline]
    pub fn upper_bound(&self) -> i64 {
        self.upper_bound.load(Ordering::Acquire)
    }

    /// Returns the current bound converted to `T`, or `None` if no incumbent
    /// exists or the bound does not fit `T`.
    #[inline]
    pub fn upper_bound_as<T>(&self) -> Option<T>
    where
        T: SolverNumeric,
    {
        match self.upper_bound() {
            i64::MAX => None,
            bound => T::from_i64(bound),
        }
    }

    #[inline]
    pub fn has_incumbent(&self) -> bool {
        self.upper_bound() != i64::MAX
    }

    /// Lowers the bound to `candidate` if it is strictly better.
    ///
    /// Returns `true` if this call changed the bound. Concurrent callers can
    /// only make the bound smaller; the final value is the minimum of all
    /// candidates.
    pub fn tighten(&self, candidate: i64) -> bool {
        let mut current = self.upper_bound.load(Ordering::Acquire);
        while candidate < current {
            match self.upper_bound.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
        false
    }

    /// Typed variant of [`SharedIncumbent::tighten`]. Values that cannot be
    /// represented as `i64` are ignored.
    #[inline]
    pub fn tighten_with<T>(&self, objective: T) -> bool
    where
        T: SolverNumeric,
    {
        objective
            .to_i64()
            .is_some_and(|candidate| self.tighten(candidate))
    }
}

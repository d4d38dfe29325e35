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

//! # Green Berth Branch-and-Bound
//!
//! A single-worker, depth-first branch-and-bound over berth assignments.
//!
//! The engine (`bnb::BnbSolver`) only drives the search: it keeps an undo
//! trail and a frame-structured decision stack, prunes on bounds and asks
//! its monitors whether to continue at every node boundary. What to branch
//! on comes from a `DecisionBuilder`, what things cost from an
//! `ObjectiveEvaluator`, and which starts are still admissible from the
//! `StartDomains` in `constraint`.
//!
//! ## Search space
//!
//! Each decision fixes one vessel to one berth at the earliest start in its
//! current domain. Vessels are fixed in non-decreasing start order, so the
//! occupied part of every berth is a prefix ending at the berth's tail and
//! each start domain stays a single interval. Because waiting cost never
//! decreases with a later start, every optimal schedule can be shifted left
//! and replayed this way, which keeps the search exact.
//!
//! Modules:
//! - `constraint`: start-domain propagation and the assignment checker.
//! - `state`, `trail`, `stack`: search state and its undo machinery.
//! - `branching`: decisions and the earliest-arrival decision builder.
//! - `eval`: objective evaluation and lower bounds.
//! - `incumbent`: local or shared incumbent bound backing.
//! - `monitor`: tree-search monitors (stop conditions, tracing, composition).
//! - `stats`, `result`: counters and outcomes.

pub mod bnb;
pub mod branching;
pub mod constraint;
pub mod eval;
pub mod incumbent;
pub mod monitor;
pub mod result;
pub mod stack;
pub mod state;
pub mod stats;
pub mod trail;

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

//! # Green Berth Solver
//!
//! Turns a vessel snapshot and a planning request into a berth schedule.
//!
//! ## Modules
//!
//! - `error`: `PlanningError`, the error taxonomy of a planning run, with
//!   stable codes.
//! - `optimizer`: splits the search tree at the root and explores the
//!   subtrees on scoped worker threads that share one incumbent bound.
//! - `report`: decodes and validates the winning assignment into a
//!   `PlanningResult`.
//! - `planner`: the `plan` entry point tying the pieces together.
//!
//! ```rust,no_run
//! use greenberth_model::{config::PlanningRequest, loading::load_vessels_from_path};
//! use greenberth_solver::planner::plan;
//!
//! let vessels = load_vessels_from_path("vessels.json").unwrap();
//! let result = plan(&vessels, &PlanningRequest::new(2)).unwrap();
//! println!("{}", result);
//! ```

pub mod error;
pub mod optimizer;
pub mod planner;
pub mod report;

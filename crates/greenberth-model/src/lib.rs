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

//! # Green Berth Model
//!
//! Everything the optimizer needs to know about one planning run, and nothing
//! about how it searches.
//!
//! - `vessel`: the vessel feed record and the compliance rating table.
//! - `config`: the planning request and the engine configuration, both with
//!   documented defaults.
//! - `horizon`: `HorizonBuilder` and the discretized `Horizon`.
//! - `cost`: `CostModel`, the integer objective terms.
//! - `model`: `ScheduleModel`, the struct-of-arrays view of start domains and
//!   costs consumed by the search.
//! - `solution`: a complete vessel to `(berth, start_slot)` assignment.
//! - `loading`: JSON loading of feeds, requests and configuration.
//! - `err`: input and horizon errors.

pub mod config;
pub mod cost;
pub mod err;
pub mod horizon;
pub mod index;
pub mod loading;
pub mod model;
pub mod solution;
pub mod vessel;

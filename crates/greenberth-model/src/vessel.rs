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

//! Vessel feed records.
//!
//! A `Vessel` is one row of the pre-validated feed handed to the planner:
//! arrival time, predicted turnaround, fuel burn and compliance grade. The
//! turnaround comes from an external prediction service and is trusted as is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered carbon-intensity compliance grade, `A` being the cleanest.
///
/// Grades map to bonus scores through an explicit table, see
/// [`ComplianceRating::score`]. Anything outside `A..=E` is `Unrated` and
/// scores like the lowest grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComplianceRating {
    A,
    B,
    C,
    D,
    E,
    #[default]
    Unrated,
}

impl ComplianceRating {
    /// Returns the bonus score of the grade.
    ///
    /// | grade | score |
    /// |-------|-------|
    /// | A     | 4     |
    /// | B     | 3     |
    /// | C     | 2     |
    /// | D     | 1     |
    /// | E     | 0     |
    /// | other | 0     |
    #[inline]
    pub const fn score(self) -> u8 {
        match self {
            ComplianceRating::A => 4,
            ComplianceRating::B => 3,
            ComplianceRating::C => 2,
            ComplianceRating::D => 1,
            ComplianceRating::E => 0,
            ComplianceRating::Unrated => 0,
        }
    }

    /// Parses a grade, ignoring surrounding whitespace and case.
    /// Unrecognised input yields `Unrated`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => ComplianceRating::A,
            "B" => ComplianceRating::B,
            "C" => ComplianceRating::C,
            "D" => ComplianceRating::D,
            "E" => ComplianceRating::E,
            _ => ComplianceRating::Unrated,
        }
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            ComplianceRating::A => "A",
            ComplianceRating::B => "B",
            ComplianceRating::C => "C",
            ComplianceRating::D => "D",
            ComplianceRating::E => "E",
            ComplianceRating::Unrated => "UNRATED",
        }
    }
}

impl std::fmt::Display for ComplianceRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ComplianceRating {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for ComplianceRating {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<ComplianceRating> for String {
    fn from(rating: ComplianceRating) -> Self {
        rating.as_str().to_string()
    }
}

/// A vessel of the planning snapshot. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    /// External identifier, unique within a snapshot.
    pub id: String,
    /// Earliest time the vessel can start service.
    pub eta: DateTime<Utc>,
    /// Predicted time alongside, in hours. Must be positive.
    pub predicted_turnaround_hours: f64,
    /// Fuel consumption at sea, in tonnes per day.
    pub fuel_consumption_rate: f64,
    #[serde(default, alias = "cii_rating")]
    pub compliance_rating: ComplianceRating,
}

impl Vessel {
    #[inline]
    pub fn new(
        id: impl Into<String>,
        eta: DateTime<Utc>,
        predicted_turnaround_hours: f64,
        fuel_consumption_rate: f64,
        compliance_rating: ComplianceRating,
    ) -> Self {
        Self {
            id: id.into(),
            eta,
            predicted_turnaround_hours,
            fuel_consumption_rate,
            compliance_rating,
        }
    }

    /// Returns the CO₂ emission rate while alongside, in tonnes per hour.
    ///
    /// `fuel_consumption_rate / 24 * alongside_fuel_fraction * emission_factor`
    #[inline]
    pub fn co2_rate_tph(&self, alongside_fuel_fraction: f64, emission_factor: f64) -> f64 {
        self.fuel_consumption_rate / 24.0 * alongside_fuel_fraction * emission_factor
    }
}

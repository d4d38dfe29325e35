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

use crate::index::VesselIndex;

/// Rejected planning input. Raised before a horizon is built.
#[derive(Debug)]
pub enum InputError {
    /// The vessel snapshot is empty.
    EmptyFleet,
    /// The request asks for zero berths.
    NonPositiveBerthCount,
    /// Two vessels share the same identifier.
    DuplicateVesselId(String),
    /// A vessel field is outside its admissible range.
    InvalidVessel {
        vessel_index: VesselIndex,
        vessel_id: String,
        reason: &'static str,
    },
    /// A request or configuration parameter is outside its admissible range.
    InvalidParameter { name: &'static str, value: f64 },
    /// The horizon or a cost term does not fit the numeric types in use.
    Overflow(&'static str),
    /// Reading an input source failed.
    Io(std::io::Error),
    /// An input document is not valid JSON or has malformed fields
    /// (including timestamps).
    Json(serde_json::Error),
}

impl InputError {
    #[inline]
    pub fn invalid_parameter(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }

    #[inline]
    pub fn invalid_vessel(
        vessel_index: VesselIndex,
        vessel_id: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidVessel {
            vessel_index,
            vessel_id: vessel_id.into(),
            reason,
        }
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFleet => write!(f, "The vessel set is empty"),
            Self::NonPositiveBerthCount => write!(f, "The number of berths must be positive"),
            Self::DuplicateVesselId(id) => write!(f, "Vessel id '{}' occurs more than once", id),
            Self::InvalidVessel {
                vessel_index,
                vessel_id,
                reason,
            } => write!(
                f,
                "Vessel '{}' ({}) is invalid: {}",
                vessel_id, vessel_index, reason
            ),
            Self::InvalidParameter { name, value } => {
                write!(f, "Parameter '{}' has invalid value {}", name, value)
            }
            Self::Overflow(what) => write!(f, "Numeric overflow while computing {}", what),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Json(e) => write!(f, "Malformed input document: {}", e),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InputError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for InputError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// A vessel whose service plus turnover gap cannot fit between its arrival
/// and the end of the horizon, on any berth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfeasibleHorizonError {
    pub vessel_index: VesselIndex,
    pub vessel_id: String,
    /// `duration_slots + gap_slots` of the vessel.
    pub required_slots: i64,
    /// `horizon_slots - eta_offset_slots` of the vessel.
    pub available_slots: i64,
}

impl std::fmt::Display for InfeasibleHorizonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Vessel '{}' ({}) needs {} slots but only {} remain in the horizon after its arrival",
            self.vessel_id, self.vessel_index, self.required_slots, self.available_slots
        )
    }
}

impl std::error::Error for InfeasibleHorizonError {}

/// Failure while turning a snapshot into a `ScheduleModel`.
#[derive(Debug)]
pub enum ModelError {
    Input(InputError),
    InfeasibleHorizon(InfeasibleHorizonError),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(e) => write!(f, "Input error: {}", e),
            Self::InfeasibleHorizon(e) => write!(f, "Infeasible horizon: {}", e),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            Self::InfeasibleHorizon(e) => Some(e),
        }
    }
}

impl From<InputError> for ModelError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<InfeasibleHorizonError> for ModelError {
    fn from(e: InfeasibleHorizonError) -> Self {
        Self::InfeasibleHorizon(e)
    }
}

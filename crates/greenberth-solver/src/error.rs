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

use greenberth_model::err::{InfeasibleHorizonError, InputError, ModelError};

/// Everything that can end a planning run without a schedule.
#[derive(Debug)]
pub enum PlanningError {
    /// The snapshot, request or configuration was rejected.
    Input(InputError),
    /// Some vessel cannot fit in the horizon after its arrival.
    InfeasibleHorizon(InfeasibleHorizonError),
    /// The time budget ran out, or the run was cancelled, before any
    /// feasible assignment was found.
    NoSolution,
    /// The search finished and proved that no assignment fits the horizon.
    Unschedulable,
    /// The decoded schedule broke an invariant of the model.
    SolverInternal(String),
}

impl PlanningError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Input(_) => "INPUT_ERROR",
            Self::InfeasibleHorizon(_) => "INFEASIBLE_HORIZON",
            Self::NoSolution => "NO_SOLUTION",
            Self::Unschedulable => "UNSCHEDULABLE",
            Self::SolverInternal(_) => "SOLVER_INTERNAL",
        }
    }

    #[inline]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::SolverInternal(message.into())
    }
}

impl std::fmt::Display for PlanningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(e) => write!(f, "{}: {}", self.code(), e),
            Self::InfeasibleHorizon(e) => write!(f, "{}: {}", self.code(), e),
            Self::NoSolution => write!(
                f,
                "{}: no feasible schedule was found within the time budget",
                self.code()
            ),
            Self::Unschedulable => write!(
                f,
                "{}: no schedule fits the planning horizon",
                self.code()
            ),
            Self::SolverInternal(message) => write!(f, "{}: {}", self.code(), message),
        }
    }
}

impl std::error::Error for PlanningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            Self::InfeasibleHorizon(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InputError> for PlanningError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

impl From<InfeasibleHorizonError> for PlanningError {
    fn from(e: InfeasibleHorizonError) -> Self {
        Self::InfeasibleHorizon(e)
    }
}

impl From<ModelError> for PlanningError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Input(e) => Self::Input(e),
            ModelError::InfeasibleHorizon(e) => Self::InfeasibleHorizon(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenberth_model::index::VesselIndex;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            PlanningError::from(InputError::EmptyFleet).code(),
            "INPUT_ERROR"
        );
        assert_eq!(PlanningError::NoSolution.code(), "NO_SOLUTION");
        assert_eq!(PlanningError::Unschedulable.code(), "UNSCHEDULABLE");
        assert_eq!(PlanningError::internal("x").code(), "SOLVER_INTERNAL");
    }

    #[test]
    fn test_model_errors_keep_their_kind() {
        let horizon = ModelError::InfeasibleHorizon(InfeasibleHorizonError {
            vessel_index: VesselIndex::new(0),
            vessel_id: "A".to_string(),
            required_slots: 13,
            available_slots: 12,
        });
        let err = PlanningError::from(horizon);
        assert_eq!(err.code(), "INFEASIBLE_HORIZON");
        assert!(err.to_string().starts_with("INFEASIBLE_HORIZON: Vessel 'A'"));
        assert!(std::error::Error::source(&err).is_some());

        let input = PlanningError::from(ModelError::Input(InputError::NonPositiveBerthCount));
        assert!(matches!(input, PlanningError::Input(InputError::NonPositiveBerthCount)));
    }
}

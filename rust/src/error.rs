//! Error taxonomy shared by the traffic model, evaluators and solver.

use thiserror::Error;

/// Errors that can occur while evaluating a queue or searching for a headcount.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StaffingError {
    /// An input violates a documented domain constraint.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// The Erlang A iteration did not stabilise within its budget.
    #[error("Erlang A did not converge after {iterations} iterations (last delta {delta:e})")]
    Convergence { iterations: u32, delta: f64 },
    /// No agent count up to the cap satisfies the target.
    #[error("Target {target} cannot be met with at most {max_agents} agents")]
    Infeasible { target: String, max_agents: u32 },
}

pub type EngineResult<T> = Result<T, StaffingError>;

/// Shorthand used by the validation helpers.
pub(crate) fn invalid(msg: impl Into<String>) -> StaffingError {
    StaffingError::InvalidParameter(msg.into())
}

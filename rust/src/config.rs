//! Configuration for the evaluators and the staffing solver.

use pyo3::prelude::*;

use crate::error::{invalid, EngineResult};

/// Limits and diagnostics shared by the Erlang A evaluator and the solver.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct StaffingConfig {
    /// Largest headcount the solver will try before declaring a target infeasible
    #[pyo3(get, set)]
    pub max_agents: u32,
    /// Iteration budget for the Erlang A evaluation
    #[pyo3(get, set)]
    pub max_iterations: u32,
    /// Erlang A stops once successive wait probabilities differ by less than this
    #[pyo3(get, set)]
    pub tolerance: f64,
    /// Verbosity level: 0=silent, 1=results, 2=search, 3=debug
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for StaffingConfig {
    fn default() -> Self {
        Self {
            max_agents: 100_000,
            max_iterations: 50,
            tolerance: 1e-9,
            verbosity: 0,
        }
    }
}

impl StaffingConfig {
    /// Reject limits that would make every search or iteration meaningless.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_agents == 0 {
            return Err(invalid("max_agents must be > 0"));
        }
        if self.max_iterations == 0 {
            return Err(invalid("max_iterations must be > 0"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(invalid(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

#[pymethods]
impl StaffingConfig {
    #[new]
    #[pyo3(signature = (
        max_agents=None,
        max_iterations=None,
        tolerance=None,
        verbosity=None
    ))]
    fn new(
        max_agents: Option<u32>,
        max_iterations: Option<u32>,
        tolerance: Option<f64>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            max_agents: max_agents.unwrap_or(defaults.max_agents),
            max_iterations: max_iterations.unwrap_or(defaults.max_iterations),
            tolerance: tolerance.unwrap_or(defaults.tolerance),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "StaffingConfig(max_agents={}, max_iterations={}, tolerance={:e}, verbosity={})",
            self.max_agents, self.max_iterations, self.tolerance, self.verbosity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaffingConfig::default();
        assert_eq!(config.max_agents, 100_000);
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.tolerance, 1e-9);
        assert_eq!(config.verbosity, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = StaffingConfig {
            max_agents: 0,
            ..StaffingConfig::default()
        };
        assert!(config.validate().is_err());

        let config = StaffingConfig {
            tolerance: 0.0,
            ..StaffingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

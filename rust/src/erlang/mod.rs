//! Queueing models used to predict call-center performance.
//!
//! - `erlang_c`: delay queue, callers wait forever
//! - `erlang_a`: delay queue with exponential abandonment

mod erlang_a;
mod erlang_c;

pub use erlang_a::evaluate_a;
pub use erlang_c::{
    average_speed_of_answer, erlang_b, erlang_c, evaluate_c, occupancy, service_level,
};

use crate::config::StaffingConfig;
use crate::error::EngineResult;
use crate::models::{PerformanceResult, QueueParameters};

/// Queueing model selected for an evaluation or a staffing search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum QueueModel {
    ErlangC,
    /// Mean patience in handling-time units.
    ErlangA { mean_patience: f64 },
}

impl QueueModel {
    /// Erlang A when a patience is given, Erlang C otherwise.
    pub fn from_patience(mean_patience: Option<f64>) -> Self {
        match mean_patience {
            Some(mean_patience) => Self::ErlangA { mean_patience },
            None => Self::ErlangC,
        }
    }

    /// Smallest headcount worth evaluating for a positive load.
    ///
    /// Below the load Erlang C is saturated; abandonment keeps every headcount defined.
    pub fn lowest_useful_agents(&self, intensity: f64) -> u32 {
        match self {
            Self::ErlangC => (intensity.ceil() as u32).max(1),
            Self::ErlangA { .. } => 1,
        }
    }

    pub fn evaluate(
        &self,
        params: &QueueParameters,
        config: &StaffingConfig,
    ) -> EngineResult<PerformanceResult> {
        match *self {
            Self::ErlangC => evaluate_c(params),
            Self::ErlangA { mean_patience } => evaluate_a(params, mean_patience, config),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ErlangC => "erlang_c",
            Self::ErlangA { .. } => "erlang_a",
        }
    }
}

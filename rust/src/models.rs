//! Core data types for the staffing engine.

use chrono::NaiveDateTime;
use pyo3::prelude::*;
use std::fmt;

use crate::error::{invalid, EngineResult};
use crate::traffic::{check_handle_time, TrafficIntensity};

/// Inputs for one queue evaluation.
///
/// `target_answer_time` and `average_handle_time` must share a unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueueParameters {
    pub agents: u32,
    pub intensity: TrafficIntensity,
    pub target_answer_time: f64,
    pub average_handle_time: f64,
}

impl QueueParameters {
    pub fn new(
        agents: u32,
        intensity: TrafficIntensity,
        target_answer_time: f64,
        average_handle_time: f64,
    ) -> Self {
        Self {
            agents,
            intensity,
            target_answer_time,
            average_handle_time,
        }
    }

    /// Same parameters with a different headcount.
    pub fn with_agents(&self, agents: u32) -> Self {
        Self { agents, ..*self }
    }

    pub(crate) fn validate(&self) -> EngineResult<()> {
        check_handle_time(self.average_handle_time)?;
        if !self.target_answer_time.is_finite() || self.target_answer_time < 0.0 {
            return Err(invalid(format!(
                "target_answer_time must be a finite number >= 0, got {}",
                self.target_answer_time
            )));
        }
        if self.agents == 0 && self.intensity.is_zero() {
            return Err(invalid("agents must be > 0 when there is no traffic"));
        }
        Ok(())
    }
}

/// Predicted performance of a queue at a given headcount.
#[pyclass]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformanceResult {
    #[pyo3(get)]
    pub agents: u32,
    #[pyo3(get)]
    pub service_level: f64,
    #[pyo3(get)]
    pub probability_wait: f64,
    /// `f64::INFINITY` when the queue grows without bound.
    #[pyo3(get)]
    pub average_speed_of_answer: f64,
    #[pyo3(get)]
    pub occupancy: f64,
    /// Always 0 under Erlang C.
    #[pyo3(get)]
    pub abandonment_rate: f64,
}

impl PerformanceResult {
    /// No traffic: nobody waits and nobody is busy.
    pub(crate) fn idle(agents: u32) -> Self {
        Self {
            agents,
            service_level: 1.0,
            probability_wait: 0.0,
            average_speed_of_answer: 0.0,
            occupancy: 0.0,
            abandonment_rate: 0.0,
        }
    }

    /// Offered load at or above capacity without abandonment.
    pub(crate) fn saturated(agents: u32) -> Self {
        Self {
            agents,
            service_level: 0.0,
            probability_wait: 1.0,
            average_speed_of_answer: f64::INFINITY,
            occupancy: 1.0,
            abandonment_rate: 0.0,
        }
    }
}

#[pymethods]
impl PerformanceResult {
    /// Share of calls answered without waiting.
    #[getter]
    pub fn immediate_answer(&self) -> f64 {
        crate::traffic::immediate_answer(self.probability_wait)
    }

    /// Whether the average speed of answer diverges.
    pub fn is_unbounded(&self) -> bool {
        self.average_speed_of_answer.is_infinite()
    }

    fn __repr__(&self) -> String {
        format!(
            "PerformanceResult(agents={}, service_level={:.4}, probability_wait={:.4}, asa={}, occupancy={:.4}, abandonment_rate={:.4})",
            self.agents,
            self.service_level,
            self.probability_wait,
            self.average_speed_of_answer,
            self.occupancy,
            self.abandonment_rate
        )
    }
}

/// Constraint the solver must satisfy. Thresholds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StaffingTarget {
    /// Service level must be at least this share (0-1).
    MinServiceLevel(f64),
    /// Average speed of answer must be at most this, in handling-time units.
    MaxAverageSpeedOfAnswer(f64),
    /// Occupancy must be at most this share (0-1).
    MaxOccupancy(f64),
}

impl StaffingTarget {
    /// Build a target from its Python-facing name.
    pub fn from_name(kind: &str, threshold: f64) -> EngineResult<Self> {
        let target = match kind {
            "service_level" => Self::MinServiceLevel(threshold),
            "asa" | "average_speed_of_answer" => Self::MaxAverageSpeedOfAnswer(threshold),
            "occupancy" => Self::MaxOccupancy(threshold),
            other => return Err(invalid(format!("unknown staffing target: {}", other))),
        };
        target.validate()?;
        Ok(target)
    }

    pub fn threshold(&self) -> f64 {
        match *self {
            Self::MinServiceLevel(t)
            | Self::MaxAverageSpeedOfAnswer(t)
            | Self::MaxOccupancy(t) => t,
        }
    }

    pub fn validate(&self) -> EngineResult<()> {
        let t = self.threshold();
        let ok = match self {
            Self::MinServiceLevel(_) | Self::MaxOccupancy(_) => (0.0..=1.0).contains(&t),
            Self::MaxAverageSpeedOfAnswer(_) => t >= 0.0 && !t.is_nan(),
        };
        if !ok {
            return Err(invalid(format!("threshold out of range for {}", self)));
        }
        Ok(())
    }

    pub fn is_met(&self, result: &PerformanceResult) -> bool {
        match *self {
            Self::MinServiceLevel(t) => result.service_level >= t,
            Self::MaxAverageSpeedOfAnswer(t) => result.average_speed_of_answer <= t,
            Self::MaxOccupancy(t) => result.occupancy <= t,
        }
    }
}

impl fmt::Display for StaffingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinServiceLevel(t) => write!(f, "service_level >= {}", t),
            Self::MaxAverageSpeedOfAnswer(t) => write!(f, "average_speed_of_answer <= {}", t),
            Self::MaxOccupancy(t) => write!(f, "occupancy <= {}", t),
        }
    }
}

/// Inputs of a full staffing calculation for one interval.
///
/// All durations (`aht`, `target_answer_time`, `mean_patience`) share `aht_unit`.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct StaffingRequest {
    #[pyo3(get, set)]
    pub calls_per_hour: f64,
    #[pyo3(get, set)]
    pub aht: f64,
    /// "sec", "min" or "hour"
    #[pyo3(get, set)]
    pub aht_unit: String,
    #[pyo3(get, set)]
    pub target_answer_time: f64,
    #[pyo3(get, set)]
    pub target_service_level: f64,
    #[pyo3(get, set)]
    pub max_occupancy: Option<f64>,
    /// Fixed headcount to evaluate instead of solving for one
    #[pyo3(get, set)]
    pub agents: Option<u32>,
    #[pyo3(get, set)]
    pub shrinkage: f64,
    /// Selects Erlang A when set, Erlang C otherwise
    #[pyo3(get, set)]
    pub mean_patience: Option<f64>,
}

impl Default for StaffingRequest {
    fn default() -> Self {
        Self {
            calls_per_hour: 0.0,
            aht: 180.0,
            aht_unit: "sec".to_string(),
            target_answer_time: 20.0,
            target_service_level: 0.8,
            max_occupancy: Some(0.85),
            agents: None,
            shrinkage: 0.0,
            mean_patience: None,
        }
    }
}

#[pymethods]
impl StaffingRequest {
    #[new]
    #[pyo3(signature = (
        calls_per_hour,
        aht,
        aht_unit=None,
        target_answer_time=None,
        target_service_level=None,
        max_occupancy=Some(0.85),
        agents=None,
        shrinkage=None,
        mean_patience=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        calls_per_hour: f64,
        aht: f64,
        aht_unit: Option<String>,
        target_answer_time: Option<f64>,
        target_service_level: Option<f64>,
        max_occupancy: Option<f64>,
        agents: Option<u32>,
        shrinkage: Option<f64>,
        mean_patience: Option<f64>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            calls_per_hour,
            aht,
            aht_unit: aht_unit.unwrap_or(defaults.aht_unit),
            target_answer_time: target_answer_time.unwrap_or(defaults.target_answer_time),
            target_service_level: target_service_level.unwrap_or(defaults.target_service_level),
            max_occupancy,
            agents,
            shrinkage: shrinkage.unwrap_or(defaults.shrinkage),
            mean_patience,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "StaffingRequest(calls_per_hour={}, aht={} {}, target_service_level={})",
            self.calls_per_hour, self.aht, self.aht_unit, self.target_service_level
        )
    }
}

/// Outcome of a full staffing calculation.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct StaffingResult {
    #[pyo3(get)]
    pub agents: u32,
    #[pyo3(get)]
    pub traffic_intensity: f64,
    #[pyo3(get)]
    pub wait_probability: f64,
    #[pyo3(get)]
    pub immediate_answer: f64,
    #[pyo3(get)]
    pub service_level: f64,
    #[pyo3(get)]
    pub average_speed_of_answer: f64,
    #[pyo3(get)]
    pub occupancy: f64,
    #[pyo3(get)]
    pub abandonment_rate: f64,
    /// Headcount to schedule once shrinkage is accounted for
    #[pyo3(get)]
    pub agents_with_shrinkage: u32,
}

#[pymethods]
impl StaffingResult {
    fn __repr__(&self) -> String {
        format!(
            "StaffingResult(agents={}, agents_with_shrinkage={}, service_level={:.4}, occupancy={:.4})",
            self.agents, self.agents_with_shrinkage, self.service_level, self.occupancy
        )
    }
}

/// Forecast call volume for one dated interval.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalForecast {
    pub start: NaiveDateTime,
    pub calls_per_hour: f64,
}

/// Staffing outcome for one forecast interval.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalPlan {
    #[pyo3(get)]
    pub start: NaiveDateTime,
    #[pyo3(get)]
    pub result: StaffingResult,
}

#[pymethods]
impl IntervalPlan {
    fn __repr__(&self) -> String {
        format!(
            "IntervalPlan(start={}, agents={})",
            self.start, self.result.agents
        )
    }
}

//! Rust implementation of the call-center staffing engine.
//!
//! Erlang C and Erlang A queue evaluation, the inverse staffing search and the
//! interval staffing plan, exposed to Python as the `rust` extension module.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDateTime;
use pyo3::exceptions::{PyArithmeticError, PyValueError};
use pyo3::prelude::*;

mod config;
pub mod erlang;
mod error;
pub mod logging;
mod models;
pub mod staffing;
pub mod traffic;

pub use config::StaffingConfig;
pub use erlang::{evaluate_a, evaluate_c, QueueModel};
pub use error::{EngineResult, StaffingError};
pub use models::{
    IntervalForecast, IntervalPlan, PerformanceResult, QueueParameters, StaffingRequest,
    StaffingResult, StaffingTarget,
};
pub use staffing::{calc_staffing, minimum_agents, optimise_occupancy, plan_intervals};
pub use traffic::{intensity, intensity_from_calls, TimeUnit, TrafficIntensity};

pyo3::create_exception!(rust, InvalidParameterError, PyValueError);
pyo3::create_exception!(rust, ConvergenceError, PyArithmeticError);
pyo3::create_exception!(rust, StaffingInfeasible, PyValueError);

impl From<StaffingError> for PyErr {
    fn from(err: StaffingError) -> Self {
        match err {
            StaffingError::InvalidParameter(_) => InvalidParameterError::new_err(err.to_string()),
            StaffingError::Convergence { .. } => ConvergenceError::new_err(err.to_string()),
            StaffingError::Infeasible { .. } => StaffingInfeasible::new_err(err.to_string()),
        }
    }
}

/// Python passes headcounts as plain ints; negative ones are a parameter error.
fn agents_from_py(agents: i64) -> EngineResult<u32> {
    u32::try_from(agents).map_err(|_| {
        StaffingError::InvalidParameter(format!("agents must be in 0..=4294967295, got {}", agents))
    })
}

/// Traffic intensity in erlangs for an hourly call volume.
///
/// # Arguments
/// * `calls_per_hour` - Calls offered per hour
/// * `aht` - Average handling time
/// * `aht_unit` - "sec", "min" or "hour"
#[pyfunction]
#[pyo3(name = "traffic_intensity", signature = (calls_per_hour, aht, aht_unit="sec"))]
fn py_traffic_intensity(calls_per_hour: f64, aht: f64, aht_unit: &str) -> PyResult<f64> {
    let unit = TimeUnit::parse(aht_unit)?;
    Ok(intensity_from_calls(calls_per_hour, aht, unit)?.value())
}

/// Erlang B blocking probability.
#[pyfunction]
#[pyo3(name = "erlang_b")]
fn py_erlang_b(intensity: f64, agents: i64) -> PyResult<f64> {
    let intensity = TrafficIntensity::new(intensity)?;
    Ok(erlang::erlang_b(intensity.value(), agents_from_py(agents)?))
}

/// Erlang C wait probability (1 once the load reaches the headcount).
#[pyfunction]
#[pyo3(name = "erlang_c")]
fn py_erlang_c(intensity: f64, agents: i64) -> PyResult<f64> {
    let intensity = TrafficIntensity::new(intensity)?;
    Ok(erlang::erlang_c(intensity.value(), agents_from_py(agents)?))
}

/// Evaluate a queue without abandonment.
///
/// `target_answer_time` and `aht` must share a unit.
#[pyfunction]
#[pyo3(name = "evaluate_c")]
fn py_evaluate_c(
    agents: i64,
    intensity: f64,
    target_answer_time: f64,
    aht: f64,
) -> PyResult<PerformanceResult> {
    let params = QueueParameters::new(
        agents_from_py(agents)?,
        TrafficIntensity::new(intensity)?,
        target_answer_time,
        aht,
    );
    Ok(evaluate_c(&params)?)
}

/// Evaluate a queue whose callers abandon after `mean_patience` on average.
#[pyfunction]
#[pyo3(name = "evaluate_a", signature = (agents, intensity, target_answer_time, aht, mean_patience, config=None))]
fn py_evaluate_a(
    agents: i64,
    intensity: f64,
    target_answer_time: f64,
    aht: f64,
    mean_patience: f64,
    config: Option<StaffingConfig>,
) -> PyResult<PerformanceResult> {
    let params = QueueParameters::new(
        agents_from_py(agents)?,
        TrafficIntensity::new(intensity)?,
        target_answer_time,
        aht,
    );
    Ok(evaluate_a(
        &params,
        mean_patience,
        &config.unwrap_or_default(),
    )?)
}

/// Smallest headcount meeting a target.
///
/// # Arguments
/// * `intensity` - Offered load in erlangs
/// * `target` - "service_level", "asa" or "occupancy"
/// * `threshold` - Minimum service level, or maximum ASA / occupancy
/// * `target_answer_time` - Answer-time goal, same unit as `aht`
/// * `aht` - Average handling time
/// * `mean_patience` - Selects Erlang A when given
///
/// # Raises
/// * InvalidParameterError for out-of-range inputs
/// * StaffingInfeasible if no headcount up to `config.max_agents` works
/// * ConvergenceError if an Erlang A evaluation fails to converge
#[pyfunction]
#[pyo3(name = "minimum_agents", signature = (intensity, target, threshold, target_answer_time, aht, mean_patience=None, config=None))]
#[allow(clippy::too_many_arguments)]
fn py_minimum_agents(
    intensity: f64,
    target: &str,
    threshold: f64,
    target_answer_time: f64,
    aht: f64,
    mean_patience: Option<f64>,
    config: Option<StaffingConfig>,
) -> PyResult<u32> {
    let target = StaffingTarget::from_name(target, threshold)?;
    Ok(minimum_agents(
        TrafficIntensity::new(intensity)?,
        target,
        QueueModel::from_patience(mean_patience),
        target_answer_time,
        aht,
        &config.unwrap_or_default(),
    )?)
}

/// Full staffing calculation for one interval.
#[pyfunction]
#[pyo3(name = "calc_staffing", signature = (request, config=None))]
fn py_calc_staffing(
    request: StaffingRequest,
    config: Option<StaffingConfig>,
) -> PyResult<StaffingResult> {
    Ok(calc_staffing(&request, &config.unwrap_or_default())?)
}

/// Staff a list of `(start, calls_per_hour)` intervals.
#[pyfunction]
#[pyo3(name = "plan_intervals", signature = (intervals, request, config=None))]
fn py_plan_intervals(
    intervals: Vec<(NaiveDateTime, f64)>,
    request: StaffingRequest,
    config: Option<StaffingConfig>,
) -> PyResult<Vec<IntervalPlan>> {
    let forecasts: Vec<IntervalForecast> = intervals
        .into_iter()
        .map(|(start, calls_per_hour)| IntervalForecast {
            start,
            calls_per_hour,
        })
        .collect();
    Ok(plan_intervals(
        &forecasts,
        &request,
        &config.unwrap_or_default(),
    )?)
}

/// Raise a headcount until occupancy is within `max_occupancy`.
///
/// # Returns
/// * `(agents, occupancy)`
#[pyfunction]
#[pyo3(name = "optimise_occupancy")]
fn py_optimise_occupancy(intensity: f64, agents: i64, max_occupancy: f64) -> PyResult<(u32, f64)> {
    Ok(optimise_occupancy(
        intensity,
        agents_from_py(agents)?,
        max_occupancy,
    )?)
}

/// Headcount to schedule so that `agents` remain after shrinkage.
#[pyfunction]
#[pyo3(name = "add_shrinkage")]
fn py_add_shrinkage(agents: i64, shrinkage: f64) -> PyResult<u32> {
    Ok(traffic::add_shrinkage(agents_from_py(agents)?, shrinkage)?)
}

/// The staffing.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Result and request types
    m.add_class::<PerformanceResult>()?;
    m.add_class::<StaffingRequest>()?;
    m.add_class::<StaffingResult>()?;
    m.add_class::<IntervalPlan>()?;

    // Config types
    m.add_class::<StaffingConfig>()?;

    // Errors
    let py = m.py();
    m.add("InvalidParameterError", py.get_type_bound::<InvalidParameterError>())?;
    m.add("ConvergenceError", py.get_type_bound::<ConvergenceError>())?;
    m.add("StaffingInfeasible", py.get_type_bound::<StaffingInfeasible>())?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_traffic_intensity, m)?)?;
    m.add_function(wrap_pyfunction!(py_erlang_b, m)?)?;
    m.add_function(wrap_pyfunction!(py_erlang_c, m)?)?;
    m.add_function(wrap_pyfunction!(py_evaluate_c, m)?)?;
    m.add_function(wrap_pyfunction!(py_evaluate_a, m)?)?;
    m.add_function(wrap_pyfunction!(py_minimum_agents, m)?)?;
    m.add_function(wrap_pyfunction!(py_calc_staffing, m)?)?;
    m.add_function(wrap_pyfunction!(py_plan_intervals, m)?)?;
    m.add_function(wrap_pyfunction!(py_optimise_occupancy, m)?)?;
    m.add_function(wrap_pyfunction!(py_add_shrinkage, m)?)?;

    Ok(())
}

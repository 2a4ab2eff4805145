//! Full staffing calculation for an interval and for a day of intervals.

use crate::config::StaffingConfig;
use crate::erlang::QueueModel;
use crate::error::{invalid, EngineResult};
use crate::log_results;
use crate::models::{
    IntervalForecast, IntervalPlan, QueueParameters, StaffingRequest, StaffingResult,
    StaffingTarget,
};
use crate::traffic::{add_shrinkage, intensity_from_calls, TimeUnit};

use super::solver::minimum_agents;

fn check_max_occupancy(max_occupancy: f64) -> EngineResult<()> {
    if !(max_occupancy > 0.0 && max_occupancy <= 1.0) {
        return Err(invalid(format!(
            "max_occupancy must be in (0, 1], got {}",
            max_occupancy
        )));
    }
    Ok(())
}

/// Raise `agents` until plain occupancy `intensity / agents` is within `max_occupancy`.
///
/// Returns the headcount and its occupancy. Headcounts already under the ceiling
/// are kept.
pub fn optimise_occupancy(
    intensity: f64,
    agents: u32,
    max_occupancy: f64,
) -> EngineResult<(u32, f64)> {
    check_max_occupancy(max_occupancy)?;
    if !intensity.is_finite() || intensity < 0.0 {
        return Err(invalid(format!(
            "intensity must be a finite number >= 0, got {}",
            intensity
        )));
    }
    let occupancy_of = |n: u32| if n == 0 { 1.0 } else { intensity / n as f64 };

    if agents > 0 && occupancy_of(agents) <= max_occupancy {
        return Ok((agents, occupancy_of(agents)));
    }
    let mut needed = (intensity / max_occupancy).ceil().max(1.0) as u32;
    // ceil can overshoot by one on an inexact quotient
    if needed > 1 && occupancy_of(needed - 1) <= max_occupancy {
        needed -= 1;
    }
    let needed = needed.max(agents);
    Ok((needed, occupancy_of(needed)))
}

/// Staff one interval: solve (or take) the headcount, apply the occupancy
/// ceiling, evaluate it and add shrinkage.
pub fn calc_staffing(
    request: &StaffingRequest,
    config: &StaffingConfig,
) -> EngineResult<StaffingResult> {
    let unit = TimeUnit::parse(&request.aht_unit)?;
    let intensity = intensity_from_calls(request.calls_per_hour, request.aht, unit)?;
    let model = QueueModel::from_patience(request.mean_patience);
    let a = intensity.value();

    let agents = match request.agents {
        Some(agents) => agents,
        None => {
            let for_service_level = minimum_agents(
                intensity,
                StaffingTarget::MinServiceLevel(request.target_service_level),
                model,
                request.target_answer_time,
                request.aht,
                config,
            )?;
            match request.max_occupancy {
                Some(max_occupancy) => {
                    check_max_occupancy(max_occupancy)?;
                    let for_occupancy = minimum_agents(
                        intensity,
                        StaffingTarget::MaxOccupancy(max_occupancy),
                        model,
                        request.target_answer_time,
                        request.aht,
                        config,
                    )?;
                    for_service_level.max(for_occupancy)
                }
                None => for_service_level,
            }
        }
    };

    let params = QueueParameters::new(agents, intensity, request.target_answer_time, request.aht);
    let performance = model.evaluate(&params, config)?;
    let agents_with_shrinkage = add_shrinkage(agents, request.shrinkage)?;

    log_results!(
        config.verbosity,
        "{} calls/h, {:.3} E ({}): {} agents, {} with shrinkage, sl={:.4}",
        request.calls_per_hour,
        a,
        model.name(),
        agents,
        agents_with_shrinkage,
        performance.service_level
    );

    Ok(StaffingResult {
        agents,
        traffic_intensity: a,
        wait_probability: performance.probability_wait,
        immediate_answer: performance.immediate_answer(),
        service_level: performance.service_level,
        average_speed_of_answer: performance.average_speed_of_answer,
        occupancy: performance.occupancy,
        abandonment_rate: performance.abandonment_rate,
        agents_with_shrinkage,
    })
}

/// Staff a sequence of forecast intervals with the same service parameters.
///
/// Intervals must be in strictly increasing start order. The request's own
/// `calls_per_hour` is replaced by each interval's volume.
pub fn plan_intervals(
    forecasts: &[IntervalForecast],
    request: &StaffingRequest,
    config: &StaffingConfig,
) -> EngineResult<Vec<IntervalPlan>> {
    if let Some(pair) = forecasts.windows(2).find(|w| w[1].start <= w[0].start) {
        return Err(invalid(format!(
            "interval starts must increase: {} is not after {}",
            pair[1].start, pair[0].start
        )));
    }

    let mut plans = Vec::with_capacity(forecasts.len());
    for forecast in forecasts {
        let interval_request = StaffingRequest {
            calls_per_hour: forecast.calls_per_hour,
            ..request.clone()
        };
        let result = calc_staffing(&interval_request, config)?;
        log_results!(
            config.verbosity,
            "interval {}: {} agents",
            forecast.start,
            result.agents
        );
        plans.push(IntervalPlan {
            start: forecast.start,
            result,
        });
    }
    Ok(plans)
}

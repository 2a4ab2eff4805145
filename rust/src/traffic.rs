//! Offered load and the small input conversions around it.

use crate::error::{invalid, EngineResult};

/// Offered load in erlangs.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TrafficIntensity(f64);

impl TrafficIntensity {
    /// Wrap a load that is already expressed in erlangs.
    pub fn new(erlangs: f64) -> EngineResult<Self> {
        if !erlangs.is_finite() || erlangs < 0.0 {
            return Err(invalid(format!(
                "intensity must be a finite number >= 0, got {}",
                erlangs
            )));
        }
        Ok(Self(erlangs))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

/// Unit of an average handling time, with its divisor to hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    #[default]
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    /// How many of this unit fit in one hour.
    pub fn per_hour(self) -> f64 {
        match self {
            Self::Seconds => 3600.0,
            Self::Minutes => 60.0,
            Self::Hours => 1.0,
        }
    }

    pub fn parse(name: &str) -> EngineResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sec" | "s" | "seconds" => Ok(Self::Seconds),
            "min" | "m" | "minutes" => Ok(Self::Minutes),
            "hour" | "h" | "hours" => Ok(Self::Hours),
            other => Err(invalid(format!("unknown time unit: {}", other))),
        }
    }
}

/// Offered load for an arrival rate and handling time in compatible units.
pub fn intensity(arrival_rate: f64, average_handle_time: f64) -> EngineResult<TrafficIntensity> {
    if !arrival_rate.is_finite() || arrival_rate < 0.0 {
        return Err(invalid(format!(
            "arrival_rate must be a finite number >= 0, got {}",
            arrival_rate
        )));
    }
    check_handle_time(average_handle_time)?;
    TrafficIntensity::new(arrival_rate * average_handle_time)
}

/// Offered load for an hourly call volume and a handling time in `unit`.
///
/// 100 calls per hour at 72 seconds each is 2 erlangs.
pub fn intensity_from_calls(
    calls_per_hour: f64,
    average_handle_time: f64,
    unit: TimeUnit,
) -> EngineResult<TrafficIntensity> {
    check_handle_time(average_handle_time)?;
    intensity(calls_per_hour, average_handle_time / unit.per_hour())
}

pub(crate) fn check_handle_time(average_handle_time: f64) -> EngineResult<()> {
    if !average_handle_time.is_finite() || average_handle_time <= 0.0 {
        return Err(invalid(format!(
            "average_handle_time must be a finite number > 0, got {}",
            average_handle_time
        )));
    }
    Ok(())
}

/// Share of calls answered without waiting.
pub fn immediate_answer(probability_wait: f64) -> f64 {
    1.0 - probability_wait
}

/// Headcount needed so that `agents` remain available after `shrinkage`.
pub fn add_shrinkage(agents: u32, shrinkage: f64) -> EngineResult<u32> {
    if !(0.0..1.0).contains(&shrinkage) {
        return Err(invalid(format!(
            "shrinkage must be in [0, 1), got {}",
            shrinkage
        )));
    }
    let scheduled = (agents as f64 / (1.0 - shrinkage)).ceil();
    if scheduled > u32::MAX as f64 {
        return Err(invalid(format!(
            "{} agents at shrinkage {} overflows the headcount range",
            agents, shrinkage
        )));
    }
    Ok(scheduled as u32)
}

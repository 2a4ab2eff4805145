//! Erlang B and Erlang C formulas.
//!
//! Both are evaluated with the Erlang B recursion instead of factorials and powers,
//! so headcounts in the tens of thousands stay finite.

use crate::error::EngineResult;
use crate::models::{PerformanceResult, QueueParameters};

/// Blocking probability of a loss system with `agents` servers.
///
/// B(0) = 1, B(k) = a·B(k-1) / (k + a·B(k-1)).
pub fn erlang_b(intensity: f64, agents: u32) -> f64 {
    let mut b = 1.0;
    for k in 1..=agents {
        let ab = intensity * b;
        b = ab / (k as f64 + ab);
    }
    b
}

/// Probability that an arriving call has to wait.
///
/// Returns 1 once the offered load reaches the headcount.
pub fn erlang_c(intensity: f64, agents: u32) -> f64 {
    let n = agents as f64;
    if intensity <= 0.0 {
        return 0.0;
    }
    if intensity >= n {
        return 1.0;
    }
    let b = erlang_b(intensity, agents);
    let p = n * b / (n - intensity * (1.0 - b));
    p.min(1.0)
}

/// Share of calls answered within `target_answer_time`.
pub fn service_level(
    intensity: f64,
    agents: u32,
    probability_wait: f64,
    target_answer_time: f64,
    average_handle_time: f64,
) -> f64 {
    let exponent = -((agents as f64 - intensity) * target_answer_time / average_handle_time).abs();
    (1.0 - probability_wait * exponent.exp()).clamp(0.0, 1.0)
}

/// Mean wait before answer, in handling-time units. Infinite when saturated.
pub fn average_speed_of_answer(
    intensity: f64,
    agents: u32,
    probability_wait: f64,
    average_handle_time: f64,
) -> f64 {
    let spare = agents as f64 - intensity;
    if spare <= 0.0 {
        return f64::INFINITY;
    }
    probability_wait * average_handle_time / spare
}

/// Share of agent capacity spent on calls, capped at 1.
pub fn occupancy(intensity: f64, agents: u32) -> f64 {
    if agents == 0 {
        return if intensity > 0.0 { 1.0 } else { 0.0 };
    }
    (intensity / agents as f64).min(1.0)
}

/// Evaluate a queue without abandonment.
pub fn evaluate_c(params: &QueueParameters) -> EngineResult<PerformanceResult> {
    params.validate()?;
    let a = params.intensity.value();
    let agents = params.agents;

    if a == 0.0 {
        return Ok(PerformanceResult::idle(agents));
    }
    if a >= agents as f64 {
        return Ok(PerformanceResult::saturated(agents));
    }

    let probability_wait = erlang_c(a, agents);
    Ok(PerformanceResult {
        agents,
        service_level: service_level(
            a,
            agents,
            probability_wait,
            params.target_answer_time,
            params.average_handle_time,
        ),
        probability_wait,
        average_speed_of_answer: average_speed_of_answer(
            a,
            agents,
            probability_wait,
            params.average_handle_time,
        ),
        occupancy: occupancy(a, agents),
        abandonment_rate: 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StaffingError;
    use crate::traffic::TrafficIntensity;

    fn params(agents: u32, a: f64, t: f64, aht: f64) -> QueueParameters {
        QueueParameters::new(agents, TrafficIntensity::new(a).unwrap(), t, aht)
    }

    #[test]
    fn test_erlang_b() {
        assert!((erlang_b(123.0, 132) - 0.0312).abs() < 1e-4);
        assert_eq!(erlang_b(5.0, 0), 1.0);
    }

    #[test]
    fn test_erlang_c_reference_values() {
        assert_eq!(erlang_c(1.0, 1), 1.0);
        assert!((erlang_c(123.0, 132) - 0.3211).abs() < 1e-4);
        assert!((erlang_c(12345.0, 12421) - 0.3812).abs() < 1e-4);
        assert_eq!(erlang_c(1000.0, 900), 1.0);
    }

    #[test]
    fn test_component_formulas() {
        let sl = service_level(123.0, 130, 0.4244, 20.0, 300.0);
        assert!((sl - 0.7339).abs() < 1e-4);
        assert!((service_level(123.0, 130, 1.0, 0.0, 300.0)).abs() < 1e-12);
        assert!((service_level(123.0, 130, 0.0, 1.0, 300.0) - 1.0).abs() < 1e-12);

        let asa = average_speed_of_answer(123.0, 130, 0.4244, 300.0);
        assert!((asa - 18.19).abs() < 5e-3);

        assert!((occupancy(123.0, 130) - 0.946).abs() < 5e-4);
        assert_eq!(occupancy(150.0, 130), 1.0);
    }

    #[test]
    fn test_zero_traffic() {
        for agents in [1, 2, 10, 500] {
            let r = evaluate_c(&params(agents, 0.0, 20.0, 300.0)).unwrap();
            assert_eq!(r.service_level, 1.0);
            assert_eq!(r.probability_wait, 0.0);
            assert_eq!(r.average_speed_of_answer, 0.0);
            assert_eq!(r.occupancy, 0.0);
        }
    }

    #[test]
    fn test_saturated_queue_is_a_result_not_an_error() {
        let r = evaluate_c(&params(1, 5.0, 20.0, 300.0)).unwrap();
        assert_eq!(r.probability_wait, 1.0);
        assert_eq!(r.service_level, 0.0);
        assert!(r.is_unbounded());
        assert_eq!(r.occupancy, 1.0);

        // rho exactly 1
        let r = evaluate_c(&params(10, 10.0, 20.0, 300.0)).unwrap();
        assert_eq!(r.probability_wait, 1.0);
        assert!(r.is_unbounded());
    }

    #[test]
    fn test_no_agents_with_traffic() {
        let r = evaluate_c(&params(0, 2.0, 20.0, 300.0)).unwrap();
        assert_eq!(r.probability_wait, 1.0);
        assert_eq!(r.service_level, 0.0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            evaluate_c(&params(5, 2.0, 20.0, 0.0)),
            Err(StaffingError::InvalidParameter(_))
        ));
        assert!(matches!(
            evaluate_c(&params(5, 2.0, -1.0, 300.0)),
            Err(StaffingError::InvalidParameter(_))
        ));
        assert!(matches!(
            evaluate_c(&params(0, 0.0, 20.0, 300.0)),
            Err(StaffingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_zero_answer_time() {
        let r = evaluate_c(&params(12, 10.0, 0.0, 300.0)).unwrap();
        assert!((r.service_level - (1.0 - r.probability_wait)).abs() < 1e-12);
    }

    #[test]
    fn test_bounds_when_stable() {
        let a = 37.5;
        for agents in 38..120 {
            let r = evaluate_c(&params(agents, a, 20.0, 180.0)).unwrap();
            assert!((0.0..=1.0).contains(&r.probability_wait));
            assert!((0.0..=1.0).contains(&r.service_level));
            assert!((0.0..=1.0).contains(&r.occupancy));
            assert!(r.average_speed_of_answer >= 0.0);
        }
    }

    #[test]
    fn test_monotone_in_agents() {
        let a = 42.0;
        let mut previous = evaluate_c(&params(1, a, 20.0, 240.0)).unwrap();
        for agents in 2..150 {
            let r = evaluate_c(&params(agents, a, 20.0, 240.0)).unwrap();
            assert!(r.service_level >= previous.service_level);
            assert!(r.probability_wait <= previous.probability_wait);
            assert!(r.average_speed_of_answer <= previous.average_speed_of_answer);
            previous = r;
        }
    }

    #[test]
    fn test_large_headcount_stays_finite() {
        let r = evaluate_c(&params(50_000, 49_800.0, 20.0, 300.0)).unwrap();
        assert!(r.probability_wait.is_finite());
        assert!((0.0..=1.0).contains(&r.probability_wait));
    }
}

//! Inverse staffing: the smallest headcount that meets a target.
//!
//! Service level, ASA and occupancy all improve with more agents, so the search
//! doubles an upper bound until the target is met and then bisects the bracket.

use rustc_hash::FxHashMap;

use crate::config::StaffingConfig;
use crate::erlang::QueueModel;
use crate::error::{EngineResult, StaffingError};
use crate::models::{PerformanceResult, QueueParameters, StaffingTarget};
use crate::traffic::TrafficIntensity;
use crate::{log_results, log_search};

/// A single staffing search over one queue.
///
/// Evaluations are memoised per headcount.
pub struct AgentSearch<'a> {
    model: QueueModel,
    target: StaffingTarget,
    params: QueueParameters,
    config: &'a StaffingConfig,
    evaluated: FxHashMap<u32, PerformanceResult>,
}

impl<'a> AgentSearch<'a> {
    pub fn new(
        model: QueueModel,
        target: StaffingTarget,
        intensity: TrafficIntensity,
        target_answer_time: f64,
        average_handle_time: f64,
        config: &'a StaffingConfig,
    ) -> EngineResult<Self> {
        config.validate()?;
        target.validate()?;
        let params = QueueParameters::new(1, intensity, target_answer_time, average_handle_time);
        params.validate()?;
        Ok(Self {
            model,
            target,
            params,
            config,
            evaluated: FxHashMap::default(),
        })
    }

    fn infeasible(&self) -> StaffingError {
        StaffingError::Infeasible {
            target: self.target.to_string(),
            max_agents: self.config.max_agents,
        }
    }

    /// Evaluate `agents` (once) and report whether the target is met.
    fn probe(&mut self, agents: u32) -> EngineResult<bool> {
        let result = match self.evaluated.get(&agents).copied() {
            Some(result) => result,
            None => {
                let result = self
                    .model
                    .evaluate(&self.params.with_agents(agents), self.config)?;
                self.evaluated.insert(agents, result);
                result
            }
        };
        let met = self.target.is_met(&result);
        log_search!(
            self.config.verbosity,
            "  probe agents={} sl={:.4} asa={:.3} occ={:.4} -> {}",
            agents,
            result.service_level,
            result.average_speed_of_answer,
            result.occupancy,
            if met { "met" } else { "missed" }
        );
        Ok(met)
    }

    /// Targets that no finite headcount can reach while there is traffic.
    fn is_structurally_infeasible(&self) -> bool {
        if self.params.intensity.is_zero() {
            return false;
        }
        match self.target {
            StaffingTarget::MinServiceLevel(t) => t >= 1.0,
            StaffingTarget::MaxAverageSpeedOfAnswer(t) => t <= 0.0,
            StaffingTarget::MaxOccupancy(t) => t <= 0.0,
        }
    }

    /// Find `(lower, upper)` where `upper` meets the target and `lower` is either
    /// equal to it or the largest probed headcount that misses it.
    pub fn bracket(&mut self) -> EngineResult<(u32, u32)> {
        if self.is_structurally_infeasible() {
            log_search!(
                self.config.verbosity,
                "target {} is unreachable with traffic {}",
                self.target,
                self.params.intensity.value()
            );
            return Err(self.infeasible());
        }

        let cap = self.config.max_agents;
        let lower = self
            .model
            .lowest_useful_agents(self.params.intensity.value());
        if lower > cap {
            return Err(self.infeasible());
        }
        if self.probe(lower)? {
            return Ok((lower, lower));
        }

        let mut missed = lower;
        loop {
            if missed >= cap {
                return Err(self.infeasible());
            }
            let upper = missed.saturating_mul(2).min(cap);
            log_search!(self.config.verbosity, "bracket ({}, {}]", missed, upper);
            if self.probe(upper)? {
                return Ok((missed, upper));
            }
            missed = upper;
        }
    }

    /// Smallest headcount meeting the target.
    pub fn solve(&mut self) -> EngineResult<u32> {
        let (mut missed, mut met) = self.bracket()?;
        if missed == met {
            return Ok(met);
        }
        // invariant: `missed` fails the target, `met` satisfies it
        while met - missed > 1 {
            let mid = missed + (met - missed) / 2;
            if self.probe(mid)? {
                met = mid;
            } else {
                missed = mid;
            }
        }
        log_results!(
            self.config.verbosity,
            "{} with {}: {} agents ({} evaluations)",
            self.target,
            self.model.name(),
            met,
            self.evaluated.len()
        );
        Ok(met)
    }

    /// Performance at a headcount this search already evaluated.
    pub fn evaluated(&self, agents: u32) -> Option<&PerformanceResult> {
        self.evaluated.get(&agents)
    }
}

/// Smallest headcount whose predicted performance meets `target`.
///
/// # Returns
/// * `Ok(agents)` with `agents - 1` failing the target (when `agents > 1`)
/// * `Err(StaffingError::Infeasible)` if no headcount up to `config.max_agents` works
/// * `Err(StaffingError::Convergence)` if an Erlang A evaluation fails to converge
pub fn minimum_agents(
    intensity: TrafficIntensity,
    target: StaffingTarget,
    model: QueueModel,
    target_answer_time: f64,
    average_handle_time: f64,
    config: &StaffingConfig,
) -> EngineResult<u32> {
    AgentSearch::new(
        model,
        target,
        intensity,
        target_answer_time,
        average_handle_time,
        config,
    )?
    .solve()
}

/// Search bracket `(lower, upper)` the solver would bisect.
pub fn agent_bracket(
    intensity: TrafficIntensity,
    target: StaffingTarget,
    model: QueueModel,
    target_answer_time: f64,
    average_handle_time: f64,
    config: &StaffingConfig,
) -> EngineResult<(u32, u32)> {
    AgentSearch::new(
        model,
        target,
        intensity,
        target_answer_time,
        average_handle_time,
        config,
    )?
    .bracket()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::erlang::{evaluate_a, evaluate_c};

    fn erlangs(a: f64) -> TrafficIntensity {
        TrafficIntensity::new(a).unwrap()
    }

    fn solve_c(a: f64, target: StaffingTarget) -> EngineResult<u32> {
        minimum_agents(
            erlangs(a),
            target,
            QueueModel::ErlangC,
            20.0,
            300.0,
            &StaffingConfig::default(),
        )
    }

    #[test]
    fn test_service_level_scenario() {
        let agents = solve_c(10.0, StaffingTarget::MinServiceLevel(0.8)).unwrap();
        assert_eq!(agents, 14);

        let at = evaluate_c(&QueueParameters::new(agents, erlangs(10.0), 20.0, 300.0)).unwrap();
        let below =
            evaluate_c(&QueueParameters::new(agents - 1, erlangs(10.0), 20.0, 300.0)).unwrap();
        assert!(at.service_level >= 0.8);
        assert!(below.service_level < 0.8);
    }

    #[test]
    fn test_idempotent() {
        let first = solve_c(37.3, StaffingTarget::MinServiceLevel(0.9)).unwrap();
        let second = solve_c(37.3, StaffingTarget::MinServiceLevel(0.9)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_asa_target() {
        let agents = solve_c(10.0, StaffingTarget::MaxAverageSpeedOfAnswer(20.0)).unwrap();
        assert_eq!(agents, 14);
    }

    #[test]
    fn test_occupancy_target() {
        assert_eq!(solve_c(10.0, StaffingTarget::MaxOccupancy(0.85)).unwrap(), 12);
        assert_eq!(solve_c(10.0, StaffingTarget::MaxOccupancy(1.0)).unwrap(), 10);
    }

    #[test]
    fn test_zero_traffic_needs_one_agent() {
        assert_eq!(solve_c(0.0, StaffingTarget::MinServiceLevel(0.99)).unwrap(), 1);
        assert_eq!(
            solve_c(0.0, StaffingTarget::MaxAverageSpeedOfAnswer(0.0)).unwrap(),
            1
        );
    }

    #[test]
    fn test_minimality_across_loads() {
        let target = StaffingTarget::MinServiceLevel(0.8);
        for a in [0.4, 1.0, 3.7, 25.0, 120.5, 800.0] {
            let agents = solve_c(a, target).unwrap();
            let at = evaluate_c(&QueueParameters::new(agents, erlangs(a), 20.0, 300.0)).unwrap();
            assert!(target.is_met(&at));
            if agents > 1 {
                let below =
                    evaluate_c(&QueueParameters::new(agents - 1, erlangs(a), 20.0, 300.0)).unwrap();
                assert!(!target.is_met(&below));
            }
        }
    }

    #[test]
    fn test_erlang_a_needs_fewer_agents() {
        let config = StaffingConfig::default();
        let model = QueueModel::ErlangA { mean_patience: 60.0 };
        let target = StaffingTarget::MinServiceLevel(0.8);
        let agents = minimum_agents(erlangs(10.0), target, model, 20.0, 300.0, &config).unwrap();
        assert_eq!(agents, 12);
        assert!(agents < solve_c(10.0, target).unwrap());

        let at = evaluate_a(
            &QueueParameters::new(agents, erlangs(10.0), 20.0, 300.0),
            60.0,
            &config,
        )
        .unwrap();
        let below = evaluate_a(
            &QueueParameters::new(agents - 1, erlangs(10.0), 20.0, 300.0),
            60.0,
            &config,
        )
        .unwrap();
        assert!(at.service_level >= 0.8);
        assert!(below.service_level < 0.8);
    }

    #[test]
    fn test_structurally_infeasible_targets() {
        assert!(matches!(
            solve_c(10.0, StaffingTarget::MinServiceLevel(1.0)),
            Err(StaffingError::Infeasible { .. })
        ));
        assert!(matches!(
            solve_c(10.0, StaffingTarget::MaxAverageSpeedOfAnswer(0.0)),
            Err(StaffingError::Infeasible { .. })
        ));
        assert!(matches!(
            solve_c(10.0, StaffingTarget::MaxOccupancy(0.0)),
            Err(StaffingError::Infeasible { .. })
        ));
    }

    #[test]
    fn test_cap_exhausted() {
        let config = StaffingConfig {
            max_agents: 13,
            ..StaffingConfig::default()
        };
        let result = minimum_agents(
            erlangs(10.0),
            StaffingTarget::MinServiceLevel(0.8),
            QueueModel::ErlangC,
            20.0,
            300.0,
            &config,
        );
        assert_eq!(
            result,
            Err(StaffingError::Infeasible {
                target: "service_level >= 0.8".to_string(),
                max_agents: 13,
            })
        );

        // the load alone exceeds the cap
        let result = minimum_agents(
            erlangs(200.0),
            StaffingTarget::MinServiceLevel(0.8),
            QueueModel::ErlangC,
            20.0,
            300.0,
            &config,
        );
        assert!(matches!(result, Err(StaffingError::Infeasible { .. })));
    }

    #[test]
    fn test_invalid_target() {
        assert!(matches!(
            solve_c(10.0, StaffingTarget::MinServiceLevel(1.2)),
            Err(StaffingError::InvalidParameter(_))
        ));
        assert!(matches!(
            solve_c(10.0, StaffingTarget::MaxAverageSpeedOfAnswer(-3.0)),
            Err(StaffingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_bracket() {
        let bracket = agent_bracket(
            erlangs(8.0),
            StaffingTarget::MinServiceLevel(0.8),
            QueueModel::ErlangC,
            20.0,
            300.0,
            &StaffingConfig::default(),
        )
        .unwrap();
        assert_eq!(bracket, (8, 16));
    }

    #[test]
    fn test_search_memoises_evaluations() {
        let config = StaffingConfig::default();
        let mut search = AgentSearch::new(
            QueueModel::ErlangC,
            StaffingTarget::MinServiceLevel(0.8),
            erlangs(10.0),
            20.0,
            300.0,
            &config,
        )
        .unwrap();
        let agents = search.solve().unwrap();
        assert!(search.evaluated(agents).is_some());
        assert!(search.evaluated(agents - 1).is_some());
        // a second solve only reuses cached evaluations
        assert_eq!(search.solve().unwrap(), agents);
    }
}

//! Erlang A: a delay queue whose callers abandon after an exponential patience.
//!
//! With N agents, load a and θ = AHT / mean patience, the stationary distribution
//! above N follows the tail series
//!
//! ```text
//! A = Σ_{k≥0} t_k,   t_0 = 1,   t_k = t_{k-1} · a / (N + k·θ)
//! ```
//!
//! and with B = ErlangB(N, a) the wait probability is `A·B / (1 - B + A·B)`.
//! The series is extended in doubling chunks; each chunk yields a new wait
//! probability estimate, and evaluation stops once estimates agree and the
//! remaining tail is provably below tolerance.

use crate::config::StaffingConfig;
use crate::error::{invalid, EngineResult, StaffingError};
use crate::log_debug;
use crate::models::{PerformanceResult, QueueParameters};

use super::erlang_c::{erlang_b, erlang_c};

/// Hard limit on tail terms, reached only for vanishing abandonment with heavy overload.
const MAX_TAIL_TERMS: u64 = 1 << 26;

/// Terms are rescaled by this factor before they can overflow.
const RESCALE: f64 = 1e200;

/// Running partial sums of the queue-length tail.
///
/// `term`, `sum` and `weighted` share the scale factor `exp(log_scale)`.
struct TailSeries {
    intensity: f64,
    agents: f64,
    theta: f64,
    depth: u64,
    term: f64,
    sum: f64,
    weighted: f64,
    log_scale: f64,
}

impl TailSeries {
    fn new(intensity: f64, agents: u32, theta: f64) -> Self {
        Self {
            intensity,
            agents: agents as f64,
            theta,
            depth: 0,
            term: 1.0,
            sum: 1.0,
            weighted: 0.0,
            log_scale: 0.0,
        }
    }

    fn ratio(&self, k: u64) -> f64 {
        self.intensity / (self.agents + k as f64 * self.theta)
    }

    fn extend_to(&mut self, depth: u64) {
        while self.depth < depth {
            self.depth += 1;
            self.term *= self.ratio(self.depth);
            self.sum += self.term;
            self.weighted += self.depth as f64 * self.term;
            if self.term > RESCALE {
                self.term /= RESCALE;
                self.sum /= RESCALE;
                self.weighted /= RESCALE;
                self.log_scale += RESCALE.ln();
            }
        }
    }

    fn ln_sum(&self) -> f64 {
        self.sum.ln() + self.log_scale
    }

    /// Upper bound on the omitted tail relative to the partial sum.
    ///
    /// Infinite while the terms are still growing.
    fn relative_remainder(&self) -> f64 {
        let next = self.ratio(self.depth + 1);
        if next >= 1.0 {
            return f64::INFINITY;
        }
        self.term * next / (1.0 - next) / self.sum
    }

    /// Mean number of queued callers given that all agents are busy.
    fn mean_queue_given_wait(&self) -> f64 {
        self.weighted / self.sum
    }
}

/// Wait probability from the Erlang B term and the tail sum, in log space.
fn wait_probability(ln_b: f64, ln_not_b: f64, ln_tail: f64) -> f64 {
    let x = ln_not_b - ln_tail - ln_b;
    1.0 / (1.0 + x.exp())
}

/// Evaluate a queue whose callers abandon after `mean_patience` on average.
///
/// `mean_patience` is in the same unit as the handling time.
pub fn evaluate_a(
    params: &QueueParameters,
    mean_patience: f64,
    config: &StaffingConfig,
) -> EngineResult<PerformanceResult> {
    params.validate()?;
    config.validate()?;
    if !mean_patience.is_finite() || mean_patience <= 0.0 {
        return Err(invalid(format!(
            "mean_patience must be a finite number > 0, got {}",
            mean_patience
        )));
    }
    if params.agents == 0 {
        return Err(invalid("agents must be > 0 for Erlang A"));
    }

    let a = params.intensity.value();
    let agents = params.agents;
    if a == 0.0 {
        return Ok(PerformanceResult::idle(agents));
    }

    let n = agents as f64;
    let aht = params.average_handle_time;
    let theta = aht / mean_patience;

    let b = erlang_b(a, agents);
    let ln_b = b.ln();
    let ln_not_b = (-b).ln_1p();

    let mut tail = TailSeries::new(a, agents, theta);
    let mut previous = erlang_c(a, agents);
    let mut delta = f64::INFINITY;
    let mut depth: u64 = 1;

    for iteration in 1..=config.max_iterations {
        tail.extend_to(depth);
        let probability_wait = wait_probability(ln_b, ln_not_b, tail.ln_sum());
        delta = (probability_wait - previous).abs();
        let remainder = tail.relative_remainder();

        log_debug!(
            config.verbosity,
            "erlang_a agents={} iter={} depth={} p_wait={:.12} delta={:e} remainder={:e}",
            agents,
            iteration,
            depth,
            probability_wait,
            delta,
            remainder
        );

        if delta < config.tolerance && remainder < config.tolerance {
            let expected_queue = probability_wait * tail.mean_queue_given_wait();
            let abandonment_rate = (theta * expected_queue / a).clamp(0.0, 1.0);
            let occupancy = (a * (1.0 - abandonment_rate) / n).clamp(0.0, 1.0);
            let decay = n * (1.0 - occupancy) * params.target_answer_time / aht;
            let service_level = (1.0 - probability_wait * (-decay).exp()).clamp(0.0, 1.0);

            return Ok(PerformanceResult {
                agents,
                service_level,
                probability_wait,
                average_speed_of_answer: expected_queue * aht / a,
                occupancy,
                abandonment_rate,
            });
        }

        if depth >= MAX_TAIL_TERMS {
            return Err(StaffingError::Convergence {
                iterations: iteration,
                delta,
            });
        }
        previous = probability_wait;
        depth = (depth * 2).min(MAX_TAIL_TERMS);
    }

    Err(StaffingError::Convergence {
        iterations: config.max_iterations,
        delta,
    })
}

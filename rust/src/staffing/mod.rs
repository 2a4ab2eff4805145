//! Inverse staffing: headcount search and full interval plans.
//!
//! The solver finds the smallest headcount meeting one target; the plan layer
//! combines a service-level target, an occupancy ceiling and shrinkage the way
//! workforce planners quote a staffing number.

mod plan;
mod solver;

pub use plan::{calc_staffing, optimise_occupancy, plan_intervals};
pub use solver::{agent_bracket, minimum_agents, AgentSearch};

//! Grid-world environments for tabular RL solvers
//!
//! This crate provides the classic deterministic grid world as a
//! [`tabular_rl_core::MarkovDecisionProcess`] instance, plus text
//! rendering of solved policies.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod gridworld;
pub mod render;

// Re-export environments
pub use gridworld::{GridAction, GridState, GridWorld, GridWorldConfig};
pub use render::render_policy;

// Re-export core types
pub use tabular_rl_core::{MarkovDecisionProcess, Policy, Reward, TabularPolicy, Transition};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{render_policy, GridAction, GridState, GridWorld, GridWorldConfig};
    pub use tabular_rl_core::prelude::*;
}

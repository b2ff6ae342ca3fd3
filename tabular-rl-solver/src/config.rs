//! Solver configuration

use serde::{Deserialize, Serialize};

/// Configuration for [`crate::PolicyIteration`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyIterationConfig {
    /// Cap on outer evaluate-improve iterations
    pub max_iterations: usize,
    /// Convergence threshold for the evaluation phase's value delta
    pub theta: f64,
    /// Discount factor, in `[0, 1)`
    pub gamma: f64,
}

impl Default for PolicyIterationConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            theta: 1e-3,
            gamma: 0.9,
        }
    }
}

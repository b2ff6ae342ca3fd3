//! Error types for the RL core library

use thiserror::Error;

/// Core error type for RL operations
#[derive(Error, Debug)]
pub enum RLError {
    /// MDP structure errors
    #[error("MDP error: {0}")]
    Mdp(String),

    /// Policy-related errors
    #[error("Policy error: {0}")]
    Policy(String),

    /// Solver configuration errors
    #[error("Solver error: {0}")]
    Solver(String),

    /// Invalid action
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Invalid state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Transition probabilities that do not form a distribution
    #[error("Invalid transition distribution for {context}: probabilities sum to {sum}")]
    InvalidDistribution {
        /// The (state, action) pair the distribution belongs to
        context: String,
        /// The actual probability mass
        sum: f64,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for RL operations
pub type Result<T> = std::result::Result<T, RLError>;

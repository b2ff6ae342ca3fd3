//! Tabular state-value functions

use std::collections::HashMap;

use crate::{MarkovDecisionProcess, State};

/// State-value function V(s) backed by a hash map.
///
/// Entries are only ever overwritten, never removed; states without an
/// entry read as `default_value`.
#[derive(Debug, Clone)]
pub struct TabularValueFunction<S> {
    values: HashMap<S, f64>,
    default_value: f64,
}

impl<S: State> TabularValueFunction<S> {
    /// Create an empty value function defaulting to 0.0
    #[must_use]
    pub fn new() -> Self {
        Self::with_default(0.0)
    }

    /// Create an empty value function with a custom default for unseen
    /// states
    #[must_use]
    pub fn with_default(default_value: f64) -> Self {
        Self {
            values: HashMap::new(),
            default_value,
        }
    }

    /// Current estimate for `state`
    #[must_use]
    pub fn value(&self, state: &S) -> f64 {
        self.values
            .get(state)
            .copied()
            .unwrap_or(self.default_value)
    }

    /// Overwrite the estimate for `state`
    pub fn set(&mut self, state: S, value: f64) {
        self.values.insert(state, value);
    }

    /// Number of states with an explicit estimate
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no state has an explicit estimate yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One-step Bellman backup for a (state, action) pair under the
    /// current estimates:
    ///
    /// `Q(s, a) = Σ_s' P(s' | s, a) · (R(s, a, s') + γ · V(s'))`
    ///
    /// This is the fundamental operation of both policy evaluation and
    /// policy improvement.
    pub fn action_value<M>(&self, mdp: &M, state: &S, action: &M::Action, gamma: f64) -> f64
    where
        M: MarkovDecisionProcess<State = S>,
    {
        let mut q_value = 0.0;
        for transition in mdp.transitions(state, action) {
            let reward = mdp.reward(state, action, &transition.next_state);
            q_value +=
                transition.probability * (reward.0 + gamma * self.value(&transition.next_state));
        }
        q_value
    }
}

impl<S: State> Default for TabularValueFunction<S> {
    fn default() -> Self {
        Self::new()
    }
}

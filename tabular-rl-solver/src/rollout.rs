//! Seeded episode simulation under a fixed policy

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use tabular_rl_core::{MarkovDecisionProcess, Policy, Result, Reward, RLError};

/// One step of a simulated episode.
#[derive(Debug, Clone)]
pub struct RolloutStep<S, A> {
    /// State the step started in
    pub state: S,
    /// Action the policy chose
    pub action: A,
    /// Reward collected
    pub reward: Reward,
    /// Successor state
    pub next_state: S,
}

/// Walks episodes through an MDP under a fixed policy, sampling
/// successors from the transition distribution with a seeded generator.
///
/// The solver itself never samples; rollouts exist to exercise a solved
/// policy, and a fixed seed makes them reproducible.
#[derive(Debug, Clone)]
pub struct Rollout {
    seed: u64,
    max_steps: usize,
}

impl Rollout {
    /// Create a simulator with the given seed and a step cap of 1000
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_steps: 1000,
        }
    }

    /// Replace the step cap
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Simulate one episode from `start`, stopping at a terminal state or
    /// the step cap.
    ///
    /// # Errors
    ///
    /// [`RLError::Policy`] when `policy` cannot resolve an action,
    /// [`RLError::Mdp`] when a transition distribution cannot be sampled.
    pub fn episode<M, P>(
        &self,
        mdp: &M,
        policy: &P,
        start: M::State,
    ) -> Result<Vec<RolloutStep<M::State, M::Action>>>
    where
        M: MarkovDecisionProcess,
        P: Policy<State = M::State, Action = M::Action>,
    {
        let rng = &mut StdRng::seed_from_u64(self.seed);
        let mut steps = Vec::new();
        let mut state = start;

        while steps.len() < self.max_steps {
            let actions = mdp.actions(&state);
            if actions.is_empty() {
                break;
            }

            let action = policy.select(&state, &actions)?;
            let transitions = mdp.transitions(&state, &action);
            let weights = WeightedIndex::new(transitions.iter().map(|t| t.probability))
                .map_err(|e| RLError::Mdp(format!("unsampleable transitions for {state:?}: {e}")))?;
            let transition = &transitions[weights.sample(rng)];

            let reward = mdp.reward(&state, &action, &transition.next_state);
            steps.push(RolloutStep {
                state: state.clone(),
                action,
                reward,
                next_state: transition.next_state.clone(),
            });
            state = transition.next_state.clone();
        }

        Ok(steps)
    }
}

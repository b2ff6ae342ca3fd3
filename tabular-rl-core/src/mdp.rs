//! The Markov Decision Process contract

use serde::{Deserialize, Serialize};

use crate::{Action, Result, Reward, RLError, State};

/// Tolerance for probability mass checks.
const PROBABILITY_EPSILON: f64 = 1e-9;

/// One weighted successor of a (state, action) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<S> {
    /// Successor state
    pub next_state: S,
    /// Probability of reaching it
    pub probability: f64,
}

impl<S> Transition<S> {
    /// Create a new transition
    #[must_use]
    pub fn new(next_state: S, probability: f64) -> Self {
        Self {
            next_state,
            probability,
        }
    }
}

/// Contract an environment must satisfy to be solvable by dynamic
/// programming.
///
/// All four operations must be pure functions of their inputs: the
/// convergence guarantees of the solvers rest on repeated calls returning
/// identical results. `states` must enumerate in a stable order within a
/// run.
pub trait MarkovDecisionProcess: Send + Sync {
    /// State type
    type State: State;
    /// Action type
    type Action: Action;

    /// Enumerate every state of the process.
    fn states(&self) -> Vec<Self::State>;

    /// Legal actions in `state`. Empty exactly for terminal states.
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Successor distribution for taking `action` in `state`.
    ///
    /// Terminal states must self-absorb: `[(state, 1.0)]` regardless of
    /// the action argument, which is only ever supplied defensively since
    /// terminals have no legal actions.
    fn transitions(&self, state: &Self::State, action: &Self::Action)
        -> Vec<Transition<Self::State>>;

    /// Reward for one transition step.
    fn reward(
        &self,
        state: &Self::State,
        action: &Self::Action,
        next_state: &Self::State,
    ) -> Reward;

    /// A state is terminal exactly when it has no legal actions.
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.actions(state).is_empty()
    }
}

/// Check that every (state, action) pair of `mdp` carries a proper
/// probability distribution over successors.
///
/// Solvers call this up front so a malformed process fails fast instead of
/// silently converging to wrong values.
///
/// # Errors
///
/// [`RLError::Mdp`] when a pair has no transitions at all,
/// [`RLError::InvalidDistribution`] when its probabilities do not sum to 1.
pub fn validate_mdp<M: MarkovDecisionProcess>(mdp: &M) -> Result<()> {
    for state in mdp.states() {
        for action in mdp.actions(&state) {
            let transitions = mdp.transitions(&state, &action);
            if transitions.is_empty() {
                return Err(RLError::Mdp(format!(
                    "no transitions for {state:?} / {action:?}"
                )));
            }
            let sum: f64 = transitions.iter().map(|t| t.probability).sum();
            if (sum - 1.0).abs() > PROBABILITY_EPSILON {
                return Err(RLError::InvalidDistribution {
                    context: format!("{state:?} / {action:?}"),
                    sum,
                });
            }
        }
    }
    Ok(())
}

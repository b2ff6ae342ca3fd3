//! Policy abstractions for action selection

use std::collections::HashMap;

use crate::{Action, Result, RLError, State};

/// Core policy trait: a mapping from state to chosen action.
pub trait Policy: Send + Sync {
    /// State type
    type State: State;
    /// Action type
    type Action: Action;

    /// The chosen action for `state`.
    ///
    /// `legal_actions` must be non-empty when `state` is non-terminal; for
    /// terminal states it may be empty, in which case only a stored or
    /// configured fallback can resolve.
    ///
    /// # Errors
    ///
    /// [`RLError::Policy`] when nothing is stored for `state`, no default
    /// is configured, and `legal_actions` is empty.
    fn select(&self, state: &Self::State, legal_actions: &[Self::Action]) -> Result<Self::Action>;

    /// Overwrite the stored action for `state`.
    fn update(&mut self, state: Self::State, action: Self::Action);
}

/// Deterministic policy backed by a hash map, with an optional default
/// action for states without an entry.
///
/// Selection resolves explicitly: stored entry, then the configured
/// default, then the first legal action.
#[derive(Debug, Clone)]
pub struct TabularPolicy<S, A> {
    table: HashMap<S, A>,
    default_action: Option<A>,
}

impl<S: State, A: Action> TabularPolicy<S, A> {
    /// Create an empty policy with no default action
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
            default_action: None,
        }
    }

    /// Create an empty policy that falls back to `default_action`
    #[must_use]
    pub fn with_default(default_action: A) -> Self {
        Self {
            table: HashMap::new(),
            default_action: Some(default_action),
        }
    }

    /// The stored action for `state`, if any
    #[must_use]
    pub fn action(&self, state: &S) -> Option<&A> {
        self.table.get(state)
    }

    /// Number of states with a stored action
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no state has a stored action yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<S: State, A: Action> Default for TabularPolicy<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, A: Action> Policy for TabularPolicy<S, A> {
    type State = S;
    type Action = A;

    fn select(&self, state: &S, legal_actions: &[A]) -> Result<A> {
        if let Some(action) = self.table.get(state) {
            return Ok(action.clone());
        }
        if let Some(action) = &self.default_action {
            return Ok(action.clone());
        }
        legal_actions
            .first()
            .cloned()
            .ok_or_else(|| RLError::Policy(format!("no action available for {state:?}")))
    }

    fn update(&mut self, state: S, action: A) {
        self.table.insert(state, action);
    }
}

//! Tabular action-value tables

use std::collections::HashMap;

use crate::{Action, Result, RLError, State};

/// Action-value table Q(s, a) backed by a hash map keyed on the
/// (state, action) pair.
///
/// Unstored pairs read as `default_q_value`. During policy improvement a
/// fresh table is built per state, so entries never leak between states.
#[derive(Debug, Clone)]
pub struct QTable<S, A> {
    q_values: HashMap<(S, A), f64>,
    default_q_value: f64,
}

impl<S: State, A: Action> QTable<S, A> {
    /// Create an empty table defaulting to 0.0
    #[must_use]
    pub fn new() -> Self {
        Self::with_default(0.0)
    }

    /// Create an empty table with a custom default for unstored pairs
    #[must_use]
    pub fn with_default(default_q_value: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            default_q_value,
        }
    }

    /// Store or overwrite the value for a (state, action) pair
    pub fn update(&mut self, state: S, action: A, value: f64) {
        self.q_values.insert((state, action), value);
    }

    /// Current value for a (state, action) pair
    #[must_use]
    pub fn value(&self, state: &S, action: &A) -> f64 {
        self.q_values
            .get(&(state.clone(), action.clone()))
            .copied()
            .unwrap_or(self.default_q_value)
    }

    /// The action with the highest stored value for `state`.
    ///
    /// Ties break to the first action in `actions` order: the comparison
    /// is strict, so a later equal value never displaces an earlier
    /// winner.
    ///
    /// # Errors
    ///
    /// [`RLError::Policy`] when `actions` is empty.
    pub fn argmax(&self, state: &S, actions: &[A]) -> Result<A> {
        let mut best_action = actions.first().cloned().ok_or_else(|| {
            RLError::Policy(format!("argmax over empty action set for {state:?}"))
        })?;
        let mut best_value = f64::NEG_INFINITY;
        for action in actions {
            let q_value = self.value(state, action);
            if q_value > best_value {
                best_value = q_value;
                best_action = action.clone();
            }
        }
        Ok(best_action)
    }
}

impl<S: State, A: Action> Default for QTable<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn unstored_pairs_read_the_default() {
        let mut table: QTable<u32, &'static str> = QTable::new();
        assert_relative_eq!(table.value(&0, &"up"), 0.0);

        table.update(0, "up", 1.5);
        assert_relative_eq!(table.value(&0, &"up"), 1.5);

        table.update(0, "up", -0.5);
        assert_relative_eq!(table.value(&0, &"up"), -0.5);
    }

    #[test]
    fn argmax_picks_the_highest_value() {
        let mut table = QTable::new();
        table.update(0u32, "up", 0.1);
        table.update(0u32, "down", 0.7);
        table.update(0u32, "left", 0.3);

        let best = table.argmax(&0, &["up", "down", "left"]).unwrap();
        assert_eq!(best, "down");
    }

    #[test]
    fn argmax_ties_break_to_the_first_action() {
        let mut table = QTable::new();
        table.update(0u32, "up", 0.5);
        table.update(0u32, "down", 0.5);

        let best = table.argmax(&0, &["up", "down"]).unwrap();
        assert_eq!(best, "up");

        // Input order decides, not the order updates arrived in.
        let best = table.argmax(&0, &["down", "up"]).unwrap();
        assert_eq!(best, "down");
    }

    #[test]
    fn argmax_over_no_actions_is_an_error() {
        let table: QTable<u32, &'static str> = QTable::new();
        assert!(table.argmax(&0, &[]).is_err());
    }

    proptest! {
        #[test]
        fn argmax_returns_a_member_with_maximal_value(
            q_values in proptest::collection::vec(-100.0f64..100.0, 1..8)
        ) {
            let actions: Vec<usize> = (0..q_values.len()).collect();
            let mut table = QTable::new();
            for (action, q) in actions.iter().zip(&q_values) {
                table.update(0u32, *action, *q);
            }

            let best = table.argmax(&0, &actions).unwrap();
            prop_assert!(actions.contains(&best));

            let best_value = table.value(&0, &best);
            for action in &actions {
                prop_assert!(best_value >= table.value(&0, action));
            }
        }
    }
}

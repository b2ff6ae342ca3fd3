//! Opaque action keys for tabular MDPs

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for actions in a finite MDP.
///
/// Like [`crate::State`], actions are opaque hashable keys drawn from a
/// finite, state-dependent legal set. An empty legal set marks a terminal
/// state.
pub trait Action: Clone + Debug + Eq + Hash + Send + Sync {}

impl<T> Action for T where T: Clone + Debug + Eq + Hash + Send + Sync {}

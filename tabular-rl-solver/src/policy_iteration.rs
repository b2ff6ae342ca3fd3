//! The policy iteration engine

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use tabular_rl_core::{
    validate_mdp, MarkovDecisionProcess, Policy, QTable, Result, RLError, TabularValueFunction,
};

use crate::PolicyIterationConfig;

/// How a solve run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The improvement phase changed no action: the policy is optimal.
    Converged,
    /// `max_iterations` was exhausted before the policy stabilised.
    IterationLimit,
}

/// Outcome of a solve run.
///
/// `iterations` is the 1-indexed outer iteration at which the policy
/// stabilised, or `max_iterations` when the cap bound first. Comparing
/// the count against the cap detects non-convergence; `termination`
/// names the same outcome for callers who prefer matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveSummary {
    /// Outer iterations executed
    pub iterations: usize,
    /// Total evaluation sweeps across all iterations
    pub sweeps: usize,
    /// Why the run stopped
    pub termination: Termination,
}

/// Policy iteration over a finite MDP.
///
/// Alternates fixed-point evaluation of the current policy (Bellman
/// expectation backups until the largest value change drops below
/// `theta`) with greedy improvement (one-step lookahead argmax per
/// state), until an improvement pass changes nothing.
///
/// For finite MDPs with `gamma < 1` this terminates at an optimal policy
/// after finitely many iterations; `max_iterations` is a safety bound
/// that should not normally bind.
#[derive(Debug, Clone)]
pub struct PolicyIteration {
    config: PolicyIterationConfig,
}

impl PolicyIteration {
    /// Create a solver with the given configuration
    #[must_use]
    pub fn new(config: PolicyIterationConfig) -> Self {
        Self { config }
    }

    /// The solver's configuration
    #[must_use]
    pub fn config(&self) -> &PolicyIterationConfig {
        &self.config
    }

    /// Run policy iteration on `mdp`, mutating `policy` in place.
    ///
    /// `policy` is typically empty with a configured default action; an
    /// MDP with terminal states requires that default (or pre-stored
    /// entries) so the defensive lookups on terminals can resolve.
    ///
    /// # Errors
    ///
    /// [`RLError::Solver`] for an out-of-range configuration,
    /// [`RLError::Mdp`] / [`RLError::InvalidDistribution`] for a
    /// malformed process, [`RLError::Policy`] when an action cannot be
    /// resolved for some state.
    pub fn solve<M, P>(&self, mdp: &M, policy: &mut P) -> Result<SolveSummary>
    where
        M: MarkovDecisionProcess,
        P: Policy<State = M::State, Action = M::Action>,
    {
        self.check_config()?;
        validate_mdp(mdp)?;

        let mut values = TabularValueFunction::new();
        let mut sweeps = 0;

        for iteration in 1..=self.config.max_iterations {
            sweeps += self.evaluate(mdp, policy, &mut values)?;
            let changed = self.improve(mdp, policy, &values)?;
            debug!(iteration, changed, "improvement pass finished");

            if !changed {
                info!(iterations = iteration, sweeps, "policy iteration converged");
                return Ok(SolveSummary {
                    iterations: iteration,
                    sweeps,
                    termination: Termination::Converged,
                });
            }
        }

        info!(
            iterations = self.config.max_iterations,
            sweeps, "iteration limit reached before the policy stabilised"
        );
        Ok(SolveSummary {
            iterations: self.config.max_iterations,
            sweeps,
            termination: Termination::IterationLimit,
        })
    }

    /// Evaluate `policy` to its value fixed point, overwriting `values`
    /// in place. Returns the number of sweeps taken.
    ///
    /// Each sweep backs up every state under the action the *current*
    /// policy selects (Bellman expectation, not a max over actions);
    /// sweeps repeat until the largest absolute value change falls below
    /// `theta`. States without legal actions are absorbing and take their
    /// one-step payout with no discounted continuation, so their value
    /// pins after the first sweep.
    ///
    /// # Errors
    ///
    /// [`RLError::Policy`] when `policy` cannot resolve an action.
    pub fn evaluate<M, P>(
        &self,
        mdp: &M,
        policy: &P,
        values: &mut TabularValueFunction<M::State>,
    ) -> Result<usize>
    where
        M: MarkovDecisionProcess,
        P: Policy<State = M::State, Action = M::Action>,
    {
        let states = mdp.states();
        let mut sweeps = 0;
        loop {
            let mut delta = 0.0_f64;
            for state in &states {
                let actions = mdp.actions(state);
                let action = policy.select(state, &actions)?;
                let gamma = if actions.is_empty() {
                    0.0
                } else {
                    self.config.gamma
                };

                let old_value = values.value(state);
                let new_value = values.action_value(mdp, state, &action, gamma);
                values.set(state.clone(), new_value);
                delta = delta.max((old_value - new_value).abs());
            }
            sweeps += 1;
            trace!(sweep = sweeps, delta, "evaluation sweep finished");

            if delta < self.config.theta {
                return Ok(sweeps);
            }
        }
    }

    /// One greedy improvement pass over all non-terminal states.
    ///
    /// For each state a fresh action-value table is filled from one-step
    /// lookahead under `values`, and the argmax becomes the policy's new
    /// action (applied even when unchanged). Returns whether any state's
    /// action actually changed.
    ///
    /// # Errors
    ///
    /// [`RLError::Policy`] when `policy` cannot resolve a prior action to
    /// compare against.
    pub fn improve<M, P>(
        &self,
        mdp: &M,
        policy: &mut P,
        values: &TabularValueFunction<M::State>,
    ) -> Result<bool>
    where
        M: MarkovDecisionProcess,
        P: Policy<State = M::State, Action = M::Action>,
    {
        let mut changed = false;
        for state in mdp.states() {
            let actions = mdp.actions(&state);
            if actions.is_empty() {
                continue;
            }

            let old_action = policy.select(&state, &actions)?;

            // Fresh table per state: lookahead results never carry over
            // between states or iterations.
            let mut q_table = QTable::new();
            for action in &actions {
                let q_value = values.action_value(mdp, &state, action, self.config.gamma);
                q_table.update(state.clone(), action.clone(), q_value);
            }

            let new_action = q_table.argmax(&state, &actions)?;
            if new_action != old_action {
                changed = true;
            }
            policy.update(state, new_action);
        }
        Ok(changed)
    }

    fn check_config(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.config.gamma) {
            return Err(RLError::Solver(format!(
                "discount factor must lie in [0, 1), got {}",
                self.config.gamma
            )));
        }
        if self.config.theta <= 0.0 {
            return Err(RLError::Solver(format!(
                "convergence threshold must be positive, got {}",
                self.config.theta
            )));
        }
        Ok(())
    }
}

impl Default for PolicyIteration {
    fn default() -> Self {
        Self::new(PolicyIterationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tabular_rl_core::TabularPolicy;
    use tabular_rl_env::{GridAction, GridState, GridWorld, GridWorldConfig};

    fn classic() -> GridWorld {
        GridWorld::new(GridWorldConfig::default()).unwrap()
    }

    fn fresh_policy() -> TabularPolicy<GridState, GridAction> {
        TabularPolicy::with_default(GridAction::Up)
    }

    #[test]
    fn classic_grid_converges_to_the_textbook_policy() {
        let world = classic();
        let mut policy = fresh_policy();
        let solver = PolicyIteration::default();

        let summary = solver.solve(&world, &mut policy).unwrap();
        assert_eq!(summary.termination, Termination::Converged);
        assert!(summary.iterations <= 5, "took {} iterations", summary.iterations);

        // Next to the +1 exit, head straight for it.
        assert_eq!(policy.action(&GridState::new(2, 2)), Some(&GridAction::Right));
        // The cell below the -1 exit must not walk into it.
        assert_ne!(policy.action(&GridState::new(3, 0)), Some(&GridAction::Up));
        // The far corner heads away from the -1 exit, up or along the
        // bottom row.
        let corner = policy.action(&GridState::new(0, 0)).copied().unwrap();
        assert!(
            matches!(corner, GridAction::Up | GridAction::Right),
            "unexpected corner action {corner:?}"
        );
    }

    #[test]
    fn terminal_states_never_get_policy_entries() {
        let world = classic();
        let mut policy = fresh_policy();
        PolicyIteration::default().solve(&world, &mut policy).unwrap();

        assert!(policy.action(&GridState::new(3, 2)).is_none());
        assert!(policy.action(&GridState::new(3, 1)).is_none());
        // Every non-terminal state got one.
        assert_eq!(policy.len(), 9);
    }

    #[test]
    fn solving_again_is_idempotent() {
        let world = classic();
        let mut policy = fresh_policy();
        let solver = PolicyIteration::default();
        solver.solve(&world, &mut policy).unwrap();

        let before: Vec<_> = world
            .states()
            .iter()
            .filter_map(|s| policy.action(s).copied())
            .collect();

        let summary = solver.solve(&world, &mut policy).unwrap();
        assert_eq!(summary.iterations, 1);
        assert_eq!(summary.termination, Termination::Converged);

        let after: Vec<_> = world
            .states()
            .iter()
            .filter_map(|s| policy.action(s).copied())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn iteration_cap_is_reported_as_a_count() {
        let world = classic();
        let mut policy = fresh_policy();
        let solver = PolicyIteration::new(PolicyIterationConfig {
            max_iterations: 1,
            ..PolicyIterationConfig::default()
        });

        let summary = solver.solve(&world, &mut policy).unwrap();
        assert_eq!(summary.iterations, 1);
        assert_eq!(summary.termination, Termination::IterationLimit);
        // The single improvement pass was still applied.
        assert_eq!(policy.len(), 9);
    }

    #[test]
    fn terminal_values_pin_at_their_payout_after_one_sweep() {
        let world = classic();
        let policy = fresh_policy();
        let solver = PolicyIteration::default();

        let mut values = TabularValueFunction::new();
        solver.evaluate(&world, &policy, &mut values).unwrap();
        assert_relative_eq!(values.value(&GridState::new(3, 2)), 1.0);
        assert_relative_eq!(values.value(&GridState::new(3, 1)), -1.0);

        // Further evaluation leaves them untouched.
        solver.evaluate(&world, &policy, &mut values).unwrap();
        assert_relative_eq!(values.value(&GridState::new(3, 2)), 1.0);
        assert_relative_eq!(values.value(&GridState::new(3, 1)), -1.0);
    }

    #[test]
    fn evaluation_reaches_the_theta_fixed_point() {
        let world = classic();
        let policy = fresh_policy();
        let solver = PolicyIteration::default();

        let mut values = TabularValueFunction::new();
        let sweeps = solver.evaluate(&world, &policy, &mut values).unwrap();
        assert!(sweeps >= 1);

        // Re-evaluating moves every value by at most the geometric tail
        // left below theta: theta * gamma / (1 - gamma) = 0.009.
        let before: Vec<_> = world.states().iter().map(|s| values.value(s)).collect();
        solver.evaluate(&world, &policy, &mut values).unwrap();
        for (state, old) in world.states().iter().zip(before) {
            assert!((values.value(state) - old).abs() < 1e-2);
        }
    }

    #[test]
    fn out_of_range_config_is_rejected() {
        let world = classic();
        let mut policy = fresh_policy();

        let solver = PolicyIteration::new(PolicyIterationConfig {
            gamma: 1.0,
            ..PolicyIterationConfig::default()
        });
        assert!(solver.solve(&world, &mut policy).is_err());

        let solver = PolicyIteration::new(PolicyIterationConfig {
            theta: 0.0,
            ..PolicyIterationConfig::default()
        });
        assert!(solver.solve(&world, &mut policy).is_err());
    }

    #[test]
    fn summary_serialises_for_reporting() {
        let world = classic();
        let mut policy = fresh_policy();
        let summary = PolicyIteration::default().solve(&world, &mut policy).unwrap();

        let json = serde_json::to_string(&summary).unwrap();
        let back: SolveSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}

//! Example: solving the classic 4x3 grid world with policy iteration

use tabular_rl_core::TabularPolicy;
use tabular_rl_env::{render_policy, GridAction, GridState, GridWorld, GridWorldConfig};
use tabular_rl_solver::{PolicyIteration, PolicyIterationConfig, Rollout};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // The textbook world: +1 and -1 exits, one obstacle, -0.04 per step.
    let world = GridWorld::new(GridWorldConfig::default())?;
    let mut policy = TabularPolicy::with_default(GridAction::Up);

    let solver = PolicyIteration::new(PolicyIterationConfig::default());
    let summary = solver.solve(&world, &mut policy)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    println!("\n{}\n", render_policy(&world, &policy)?);

    // Walk the solved policy from the far corner.
    let episode = Rollout::new(7).episode(&world, &policy, GridState::new(0, 0))?;
    let total: f64 = episode.iter().map(|step| step.reward.0).sum();
    println!("episode: {} steps, return {:.2}", episode.len(), total);

    Ok(())
}

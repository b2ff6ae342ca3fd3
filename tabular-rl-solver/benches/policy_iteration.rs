use criterion::{criterion_group, criterion_main, Criterion};
use tabular_rl_core::TabularPolicy;
use tabular_rl_env::{GridAction, GridState, GridWorld, GridWorldConfig};
use tabular_rl_solver::{PolicyIteration, PolicyIterationConfig};

fn classic_grid(c: &mut Criterion) {
    let world = GridWorld::new(GridWorldConfig::default()).unwrap();
    let solver = PolicyIteration::new(PolicyIterationConfig::default());

    c.bench_function("policy_iteration_4x3", |b| {
        b.iter(|| {
            let mut policy = TabularPolicy::with_default(GridAction::Up);
            solver.solve(&world, &mut policy).unwrap()
        });
    });
}

fn large_grid(c: &mut Criterion) {
    let config = GridWorldConfig {
        width: 12,
        height: 12,
        terminals: vec![
            (GridState::new(11, 11), 1.0),
            (GridState::new(11, 10), -1.0),
        ],
        obstacles: vec![
            GridState::new(3, 3),
            GridState::new(3, 4),
            GridState::new(7, 8),
            GridState::new(8, 8),
        ],
        living_reward: -0.04,
    };
    let world = GridWorld::new(config).unwrap();
    let solver = PolicyIteration::new(PolicyIterationConfig::default());

    c.bench_function("policy_iteration_12x12", |b| {
        b.iter(|| {
            let mut policy = TabularPolicy::with_default(GridAction::Up);
            solver.solve(&world, &mut policy).unwrap()
        });
    });
}

criterion_group!(benches, classic_grid, large_grid);
criterion_main!(benches);

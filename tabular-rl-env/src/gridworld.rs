//! The classic deterministic grid world

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tabular_rl_core::{MarkovDecisionProcess, Result, Reward, RLError, Transition};

/// A cell coordinate in the grid. `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridState {
    /// Column, 0-based from the left
    pub x: i32,
    /// Row, 0-based from the bottom
    pub y: i32,
}

impl GridState {
    /// Create a new cell coordinate
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The four cardinal moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridAction {
    /// Move one cell up (`y + 1`)
    Up,
    /// Move one cell down (`y - 1`)
    Down,
    /// Move one cell left (`x - 1`)
    Left,
    /// Move one cell right (`x + 1`)
    Right,
}

impl GridAction {
    /// All moves, in the order used for greedy tie-breaking.
    pub const ALL: [GridAction; 4] = [
        GridAction::Up,
        GridAction::Down,
        GridAction::Left,
        GridAction::Right,
    ];

    /// Directional glyph for rendering
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            GridAction::Up => '↑',
            GridAction::Down => '↓',
            GridAction::Left => '←',
            GridAction::Right => '→',
        }
    }

    fn apply(self, state: GridState) -> GridState {
        match self {
            GridAction::Up => GridState::new(state.x, state.y + 1),
            GridAction::Down => GridState::new(state.x, state.y - 1),
            GridAction::Left => GridState::new(state.x - 1, state.y),
            GridAction::Right => GridState::new(state.x + 1, state.y),
        }
    }
}

/// Configuration for grid worlds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridWorldConfig {
    /// Number of columns
    pub width: i32,
    /// Number of rows
    pub height: i32,
    /// Terminal cells and their payout
    pub terminals: Vec<(GridState, f64)>,
    /// Blocked cells
    pub obstacles: Vec<GridState>,
    /// Reward for every non-terminal transition
    pub living_reward: f64,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        // The textbook 4x3 world: +1 and -1 exits on the right edge, one
        // obstacle in the middle.
        Self {
            width: 4,
            height: 3,
            terminals: vec![
                (GridState::new(3, 2), 1.0),
                (GridState::new(3, 1), -1.0),
            ],
            obstacles: vec![GridState::new(1, 1)],
            living_reward: -0.04,
        }
    }
}

/// A rectangular grid of cells with terminal payouts and obstacles.
///
/// Movement is deterministic; a move off the grid or into an obstacle
/// leaves the agent in place. Terminal cells have no legal actions and
/// self-absorb.
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: i32,
    height: i32,
    terminals: HashMap<GridState, f64>,
    obstacles: HashSet<GridState>,
    living_reward: f64,
}

impl GridWorld {
    /// Build a grid world from `config`.
    ///
    /// # Errors
    ///
    /// [`RLError::Mdp`] for non-positive dimensions,
    /// [`RLError::InvalidState`] for terminals or obstacles that lie out
    /// of bounds or overlap each other.
    pub fn new(config: GridWorldConfig) -> Result<Self> {
        if config.width <= 0 || config.height <= 0 {
            return Err(RLError::Mdp(format!(
                "grid dimensions must be positive, got {}x{}",
                config.width, config.height
            )));
        }

        let world = Self {
            width: config.width,
            height: config.height,
            terminals: config.terminals.into_iter().collect(),
            obstacles: config.obstacles.into_iter().collect(),
            living_reward: config.living_reward,
        };

        for state in world.terminals.keys() {
            if !world.in_bounds(*state) {
                return Err(RLError::InvalidState(format!(
                    "terminal {state:?} lies outside the {}x{} grid",
                    world.width, world.height
                )));
            }
            if world.obstacles.contains(state) {
                return Err(RLError::InvalidState(format!(
                    "cell {state:?} is both a terminal and an obstacle"
                )));
            }
        }
        for state in &world.obstacles {
            if !world.in_bounds(*state) {
                return Err(RLError::InvalidState(format!(
                    "obstacle {state:?} lies outside the {}x{} grid",
                    world.width, world.height
                )));
            }
        }

        Ok(world)
    }

    /// Number of columns
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// The payout of a terminal cell, if `state` is one
    #[must_use]
    pub fn terminal_reward(&self, state: &GridState) -> Option<f64> {
        self.terminals.get(state).copied()
    }

    /// Whether `state` is a blocked cell
    #[must_use]
    pub fn is_obstacle(&self, state: &GridState) -> bool {
        self.obstacles.contains(state)
    }

    fn in_bounds(&self, state: GridState) -> bool {
        state.x >= 0 && state.x < self.width && state.y >= 0 && state.y < self.height
    }
}

impl MarkovDecisionProcess for GridWorld {
    type State = GridState;
    type Action = GridAction;

    fn states(&self) -> Vec<GridState> {
        let mut states = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                let state = GridState::new(x, y);
                if !self.obstacles.contains(&state) {
                    states.push(state);
                }
            }
        }
        states
    }

    fn actions(&self, state: &GridState) -> Vec<GridAction> {
        if self.terminals.contains_key(state) {
            return Vec::new();
        }
        GridAction::ALL.to_vec()
    }

    fn transitions(&self, state: &GridState, action: &GridAction) -> Vec<Transition<GridState>> {
        if self.terminals.contains_key(state) {
            return vec![Transition::new(*state, 1.0)];
        }

        let mut next_state = action.apply(*state);
        // Stay in place when hitting a wall or obstacle.
        if !self.in_bounds(next_state) || self.obstacles.contains(&next_state) {
            next_state = *state;
        }
        vec![Transition::new(next_state, 1.0)]
    }

    fn reward(&self, _state: &GridState, _action: &GridAction, next_state: &GridState) -> Reward {
        Reward(
            self.terminals
                .get(next_state)
                .copied()
                .unwrap_or(self.living_reward),
        )
    }
}

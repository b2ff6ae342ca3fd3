//! Text rendering of solved policies

use tabular_rl_core::{MarkovDecisionProcess, Policy, Result};

use crate::{GridAction, GridState, GridWorld};

/// Render `policy` as a text grid, one cell per grid position.
///
/// Terminal cells show their payout, obstacles an `X`, every other cell
/// the glyph of the chosen action. Rows are emitted top row first (highest
/// `y` coordinate), cells joined by `" | "`.
///
/// # Errors
///
/// Propagates [`tabular_rl_core::RLError::Policy`] when `policy` cannot
/// resolve an action for a non-terminal cell.
pub fn render_policy<P>(world: &GridWorld, policy: &P) -> Result<String>
where
    P: Policy<State = GridState, Action = GridAction>,
{
    let mut rows = Vec::new();
    for y in (0..world.height()).rev() {
        let mut cells = Vec::new();
        for x in 0..world.width() {
            let state = GridState::new(x, y);
            let cell = if let Some(payout) = world.terminal_reward(&state) {
                format!("{payout}")
            } else if world.is_obstacle(&state) {
                "X".to_string()
            } else {
                let action = policy.select(&state, &world.actions(&state))?;
                action.glyph().to_string()
            };
            cells.push(cell);
        }
        rows.push(cells.join(" | "));
    }
    Ok(rows.join("\n"))
}

//! Selection scores and rollout policies.
//!
//! - `uct_score`: plain MCTS selection, from win fractions
//! - `puct_score`: prior-weighted selection used by MCTS-Zero
//! - `SimulationPolicy`: how a rollout picks moves to the end of the game

use crate::core::{GameRng, RulesError, Verbosity};
use crate::game::{Faction, GameState};
use crate::rules::{apply_move, final_result, legal_moves};

// =============================================================================
// Selection
// =============================================================================

/// UCT: `w/n + c * sqrt(ln N / n)`. Unvisited children score infinity.
#[must_use]
pub fn uct_score(win_fraction: f64, visits: u32, parent_visits: u32, temperature: f64) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    let ln_parent = f64::from(parent_visits.max(1)).ln();
    win_fraction + temperature * (ln_parent / f64::from(visits)).sqrt()
}

/// PUCT: `Q + c * P * sqrt(N) / (n + 1)`.
#[must_use]
pub fn puct_score(q: f64, prior: f64, visits: u32, parent_visits: u32, c_puct: f64) -> f64 {
    q + c_puct * prior * f64::from(parent_visits).sqrt() / (f64::from(visits) + 1.0)
}

// =============================================================================
// Simulation
// =============================================================================

/// How a rollout ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rollout {
    /// Winning faction, `None` on a tie.
    pub winner: Option<Faction>,
    /// Moves played, null moves included.
    pub moves: u32,
}

/// Plays a game out from a leaf.
pub trait SimulationPolicy: Send + Sync {
    /// Play from `state` until the game ends or `limit` moves have been made
    /// (0 = no limit). A capped rollout is scored as the game stands.
    fn simulate(
        &self,
        state: GameState,
        rng: &mut GameRng,
        limit: u32,
    ) -> Result<Rollout, RulesError>;
}

/// Uniformly random legal moves, replayed silently through the interpreter.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSimulation;

impl SimulationPolicy for RandomSimulation {
    fn simulate(
        &self,
        mut state: GameState,
        rng: &mut GameRng,
        limit: u32,
    ) -> Result<Rollout, RulesError> {
        let mut moves = 0;
        while !state.is_over() {
            if limit > 0 && moves >= limit {
                return Ok(Rollout {
                    winner: final_result(&state).winner,
                    moves,
                });
            }
            let options = legal_moves(&state);
            let mv = rng.choose(&options).copied();
            state = apply_move(&state, mv, Verbosity::Silent)?;
            moves += 1;
        }
        Ok(Rollout {
            winner: state.winner(),
            moves,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;

    #[test]
    fn test_uct_prefers_unvisited() {
        assert_eq!(uct_score(0.0, 0, 10, 1.4), f64::INFINITY);
        let low = uct_score(0.2, 5, 10, 1.4);
        let high = uct_score(0.8, 5, 10, 1.4);
        assert!(high > low);
    }

    #[test]
    fn test_uct_without_exploration_is_win_fraction() {
        assert!((uct_score(0.75, 4, 100, 0.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_puct_prior_matters() {
        let weak = puct_score(0.5, 0.1, 0, 16, 1.0);
        let strong = puct_score(0.5, 0.9, 0, 16, 1.0);
        assert!(strong > weak);
        assert!((strong - (0.5 + 0.9 * 4.0)).abs() < 1e-9);
    }

    #[test]
    fn test_capped_rollout_scores_position() {
        let state = GameState::new(GameConfig::default());
        let mut rng = GameRng::new(3);
        let rollout = RandomSimulation
            .simulate(state, &mut rng, 5)
            .expect("legal playout");
        assert!(rollout.moves <= 5);
    }

    #[test]
    fn test_short_game_rollout_finishes() {
        let state = GameState::new(GameConfig::default().with_turn_limit(4));
        let mut rng = GameRng::new(11);
        let rollout = RandomSimulation
            .simulate(state, &mut rng, 0)
            .expect("legal playout");
        assert!(rollout.moves > 0);
    }
}

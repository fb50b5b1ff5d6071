//! Self-play episodes for generating training data.
//!
//! Both seats are played by the same MCTS-Zero search. Every decision with
//! two or more legal moves is recorded with its root visit counts; forced
//! and null moves are applied without a record.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerMap, SearchError, Verbosity};
use crate::game::GameState;
use crate::nn::Evaluator;
use crate::rules::{apply_move, deciding_player, legal_moves};
use crate::zero::{terminal_values, ZeroConfig, ZeroSearch};

use super::trajectory::{Step, Trajectory};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelfPlayConfig {
    /// Search settings. The seed is replaced per episode.
    pub zero: ZeroConfig,

    /// Moves per episode before it is cut off (0 = no cap).
    pub max_moves: usize,

    /// Added to the episode index to derive search seeds.
    pub seed_offset: u64,

    pub verbosity: Verbosity,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            zero: ZeroConfig::default(),
            max_moves: 0,
            seed_offset: 0,
            verbosity: Verbosity::Silent,
        }
    }
}

impl SelfPlayConfig {
    pub fn with_zero(mut self, zero: ZeroConfig) -> Self {
        self.zero = zero;
        self
    }

    pub fn with_max_moves(mut self, max: usize) -> Self {
        self.max_moves = max;
        self
    }

    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

/// Runs self-play episodes against one evaluator.
pub struct SelfPlayWorker<E: Evaluator> {
    config: SelfPlayConfig,
    search: ZeroSearch<E>,
}

impl<E: Evaluator> SelfPlayWorker<E> {
    pub fn new(config: SelfPlayConfig, evaluator: E) -> Self {
        Self {
            search: ZeroSearch::new(config.zero.clone(), evaluator),
            config,
        }
    }

    /// Play episode `index` from `state` to the end or the move cap.
    pub fn play_episode(
        &mut self,
        mut state: GameState,
        index: u64,
    ) -> Result<Trajectory, SearchError> {
        let seed = self.config.seed_offset.wrapping_add(index);
        self.search.reseed(seed);
        let mut trajectory = Trajectory::new(seed);
        self.play(&mut state, &mut trajectory)?;

        if state.is_over() {
            trajectory.outcome = terminal_values(&state);
            trajectory.winner = state.winner();
            trajectory.scores = state.result().map(|r| r.scores.clone());
        } else {
            trajectory.outcome = PlayerMap::with_value(0.5);
        }

        if self.config.verbosity.turns() {
            log::info!(
                "episode {}: {} moves, {} recorded, winner {}",
                index,
                trajectory.game_length,
                trajectory.len(),
                trajectory
                    .winner
                    .map_or_else(|| "none".to_string(), |f| f.to_string())
            );
        }
        Ok(trajectory)
    }

    fn play(
        &mut self,
        state: &mut GameState,
        trajectory: &mut Trajectory,
    ) -> Result<(), SearchError> {
        let cap = self.config.max_moves;
        while let Some(seat) = deciding_player(state) {
            if cap > 0 && trajectory.game_length >= cap {
                break;
            }
            let move_number = trajectory.game_length;
            let mv = if legal_moves(state).len() > 1 {
                let decision = self.search.search(state)?;
                if let Some(chosen) = decision.mv {
                    let (board, aux) = self.search.encoder().encode(state, seat);
                    trajectory.push(Step {
                        board,
                        aux,
                        visits: decision.visits,
                        chosen,
                        player: seat,
                        move_number,
                    });
                }
                decision.mv
            } else {
                legal_moves(state).first().copied()
            };
            *state = apply_move(state, mv, self.config.verbosity)?;
            trajectory.game_length += 1;
        }
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }
}

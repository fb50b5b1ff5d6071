//! Move-choice surface shared by every player.

use crate::core::{GameRng, SearchError};
use crate::game::{GameMove, GameState};
use crate::mcts::{MCTSConfig, MCTSSearch};
use crate::nn::Evaluator;
use crate::rules::legal_moves;
use crate::zero::{ZeroConfig, ZeroSearch};

/// Picks moves for the pending choice.
///
/// `None` is returned exactly when the choice has no legal options or the
/// game is over.
pub trait Agent: Send {
    fn select_move(&mut self, state: &GameState) -> Result<Option<GameMove>, SearchError>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

/// Uniformly random legal moves.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: GameRng,
}

impl RandomAgent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, state: &GameState) -> Result<Option<GameMove>, SearchError> {
        let moves = legal_moves(state);
        Ok(self.rng.choose(&moves).copied())
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Plain MCTS with random rollouts.
pub struct MctsAgent {
    search: MCTSSearch,
}

impl MctsAgent {
    #[must_use]
    pub fn new(config: MCTSConfig) -> Self {
        Self {
            search: MCTSSearch::new(config),
        }
    }

    #[must_use]
    pub fn search(&self) -> &MCTSSearch {
        &self.search
    }
}

impl Agent for MctsAgent {
    fn select_move(&mut self, state: &GameState) -> Result<Option<GameMove>, SearchError> {
        self.search.search(state)
    }

    fn name(&self) -> &'static str {
        "mcts"
    }
}

/// MCTS-Zero with an evaluator; plays the move sampled from root visits.
pub struct ZeroAgent<E: Evaluator> {
    search: ZeroSearch<E>,
}

impl<E: Evaluator> ZeroAgent<E> {
    pub fn new(config: ZeroConfig, evaluator: E) -> Self {
        Self {
            search: ZeroSearch::new(config, evaluator),
        }
    }

    #[must_use]
    pub fn search(&self) -> &ZeroSearch<E> {
        &self.search
    }
}

impl<E: Evaluator> Agent for ZeroAgent<E> {
    fn select_move(&mut self, state: &GameState) -> Result<Option<GameMove>, SearchError> {
        Ok(self.search.search(state)?.mv)
    }

    fn name(&self) -> &'static str {
        "zero"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::nn::UniformEvaluator;

    #[test]
    fn test_agents_pick_legal_moves() {
        let state = GameState::new(GameConfig::default());
        let legal = legal_moves(&state);
        let mut agents: Vec<Box<dyn Agent>> = vec![
            Box::new(RandomAgent::new(1)),
            Box::new(MctsAgent::new(
                MCTSConfig::default().with_iterations(6).with_rollout_limit(8),
            )),
            Box::new(ZeroAgent::new(
                ZeroConfig::default().with_simulations_per_move(1).with_min_simulations(4),
                UniformEvaluator,
            )),
        ];
        for agent in &mut agents {
            let mv = agent.select_move(&state).unwrap();
            assert!(mv.is_some_and(|m| legal.contains(&m)), "{}", agent.name());
        }
    }

    #[test]
    fn test_random_agent_is_seeded() {
        let state = GameState::new(GameConfig::default());
        let picks = |seed| {
            let mut agent = RandomAgent::new(seed);
            (0..8)
                .map(|_| agent.select_move(&state).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(5), picks(5));
    }
}

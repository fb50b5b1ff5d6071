//! Policy/value-guided search.
//!
//! The tree has the same shape as plain MCTS, but each move out of a node is
//! a `Branch` carrying the evaluator's prior with its visit count and value
//! total. There are no rollouts: a new node for an unfinished game is valued
//! by the evaluator, a finished one by its winner (1 win, 0 loss, 0.5 tie).
//!
//! Every simulation passes through exactly one root branch, so root visits
//! sum to the budget. The move played is sampled from those visits.

use std::time::Instant;

use crate::core::{GameRng, PlayerId, PlayerMap, SearchError, Verbosity};
use crate::game::{GameMove, GameState};
use crate::mcts::{puct_score, SearchStats};
use crate::nn::{EvaluationRequest, Evaluator, FeatureEncoder, StateEncoder};
use crate::rules::{apply_move, deciding_player, legal_moves, skip_empty_choices};

use super::config::ZeroConfig;

/// One candidate move out of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub mv: GameMove,
    pub prior: f32,
    pub visits: u32,
    /// Sum of backed-up values for the seat choosing at the parent.
    pub total_value: f64,
    /// Index of the child node once created.
    pub child: Option<usize>,
}

impl Branch {
    #[must_use]
    pub fn new(mv: GameMove, prior: f32) -> Self {
        Self {
            mv,
            prior,
            visits: 0,
            total_value: 0.0,
            child: None,
        }
    }

    /// Mean value; 0 before the first visit.
    #[must_use]
    pub fn q(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / f64::from(self.visits)
        }
    }
}

#[derive(Clone, Debug)]
pub struct ZeroNode {
    pub state: GameState,
    /// Seat choosing here, `None` once the game is over.
    pub seat: Option<PlayerId>,
    /// Value per seat from the evaluator or the result.
    pub values: PlayerMap<f32>,
    pub branches: Vec<Branch>,
}

impl ZeroNode {
    #[must_use]
    pub fn visits(&self) -> u32 {
        self.branches.iter().map(|b| b.visits).sum()
    }
}

/// Outcome of one search.
#[derive(Clone, Debug, PartialEq)]
pub struct ZeroDecision {
    /// Move to play; `None` when the game is over or the choice has no
    /// options.
    pub mv: Option<GameMove>,
    /// Root visits per legal move, in interpreter order. Empty when no
    /// search was run.
    pub visits: Vec<(GameMove, u32)>,
}

impl ZeroDecision {
    /// Root move with the most visits; the first one on ties.
    #[must_use]
    pub fn most_visited(&self) -> Option<GameMove> {
        let mut best: Option<(GameMove, u32)> = None;
        for &(mv, n) in &self.visits {
            if best.map_or(true, |(_, top)| n > top) {
                best = Some((mv, n));
            }
        }
        best.map(|(mv, _)| mv)
    }
}

/// Value per seat of a finished game.
#[must_use]
pub fn terminal_values(state: &GameState) -> PlayerMap<f32> {
    let winner = state.winner();
    PlayerMap::new(|seat| match winner {
        Some(f) if f == state.faction_of(seat) => 1.0,
        Some(_) => 0.0,
        None => 0.5,
    })
}

pub struct ZeroSearch<E: Evaluator> {
    config: ZeroConfig,
    evaluator: E,
    encoder: Box<dyn StateEncoder>,
    rng: GameRng,
    nodes: Vec<ZeroNode>,
    stats: SearchStats,
}

impl<E: Evaluator> ZeroSearch<E> {
    pub fn new(config: ZeroConfig, evaluator: E) -> Self {
        Self {
            rng: GameRng::new(config.seed),
            config,
            evaluator,
            encoder: Box::new(FeatureEncoder::new()),
            nodes: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// Restart the move-sampling stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.rng = GameRng::new(seed);
    }

    /// Use a different state encoder.
    #[must_use]
    pub fn with_encoder(mut self, encoder: Box<dyn StateEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Search the pending choice of `state`.
    ///
    /// Zero or one legal move skips the search. An evaluator answer whose
    /// priors do not match the legal moves aborts it.
    pub fn search(&mut self, state: &GameState) -> Result<ZeroDecision, SearchError> {
        self.stats.reset();
        self.nodes.clear();

        if state.is_over() {
            return Ok(ZeroDecision { mv: None, visits: Vec::new() });
        }
        let moves = legal_moves(state);
        if moves.len() <= 1 {
            return Ok(ZeroDecision {
                mv: moves.first().copied(),
                visits: Vec::new(),
            });
        }

        let start = Instant::now();
        let root = self.create_node(state.clone())?;
        self.nodes.push(root);

        let budget = self.config.budget(moves.len());
        for _ in 0..budget {
            self.simulate()?;
            self.stats.iterations += 1;
        }
        self.stats.finish_timer(start);

        let visits: Vec<(GameMove, u32)> = self.nodes[0]
            .branches
            .iter()
            .map(|b| (b.mv, b.visits))
            .collect();
        let weights: Vec<f64> = visits.iter().map(|&(_, n)| f64::from(n)).collect();
        let mv = self.rng.choose_weighted(&weights).map(|i| visits[i].0);

        if self.config.verbosity.turns() {
            log::debug!(
                "zero: {} simulations, {} nodes, playing {}",
                budget,
                self.nodes.len(),
                mv.map_or_else(|| "-".to_string(), |m| m.to_string())
            );
        }
        Ok(ZeroDecision { mv, visits })
    }

    /// Descend by PUCT to a missing child or a finished game, then back up
    /// the leaf's values.
    fn simulate(&mut self) -> Result<(), SearchError> {
        let mut path: Vec<(usize, usize)> = Vec::new();
        let mut id = 0;

        let values = loop {
            let node = &self.nodes[id];
            if node.branches.is_empty() {
                break node.values.clone();
            }
            let b = select_branch(node, self.config.c_puct);
            path.push((id, b));
            if let Some(child) = node.branches[b].child {
                id = child;
                continue;
            }

            let mv = node.branches[b].mv;
            let next = apply_move(&node.state, Some(mv), Verbosity::Silent)?;
            let next = skip_empty_choices(next, Verbosity::Silent)?;
            let child = self.create_node(next)?;
            let values = child.values.clone();
            self.nodes.push(child);
            let child_id = self.nodes.len() - 1;
            self.nodes[id].branches[b].child = Some(child_id);
            self.stats.nodes_expanded += 1;
            self.stats.reach_depth(path.len());
            break values;
        };

        for (node_id, b) in path {
            let node = &mut self.nodes[node_id];
            let Some(seat) = node.seat else { continue };
            let branch = &mut node.branches[b];
            branch.visits += 1;
            branch.total_value += f64::from(values[seat]);
        }
        Ok(())
    }

    /// Build a node, asking the evaluator when the game is not over.
    fn create_node(&mut self, state: GameState) -> Result<ZeroNode, SearchError> {
        let Some(seat) = deciding_player(&state) else {
            return Ok(ZeroNode {
                values: terminal_values(&state),
                state,
                seat: None,
                branches: Vec::new(),
            });
        };

        let moves = legal_moves(&state);
        let (board, aux) = self.encoder.encode(&state, seat);
        let request = EvaluationRequest {
            board,
            aux,
            legal_moves: moves.clone(),
            seat,
        };
        let evaluation = self.evaluator.evaluate(request)?;
        evaluation.validate(&moves)?;

        let total: f32 = evaluation.priors.iter().map(|(_, p)| p).sum();
        let uniform = 1.0 / moves.len().max(1) as f32;
        let branches = evaluation
            .priors
            .iter()
            .map(|&(mv, p)| Branch::new(mv, if total > 0.0 { p / total } else { uniform }))
            .collect();

        Ok(ZeroNode {
            state,
            seat: Some(seat),
            values: evaluation.values,
            branches,
        })
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Root of the latest search, if one was run.
    #[must_use]
    pub fn root(&self) -> Option<&ZeroNode> {
        self.nodes.first()
    }

    #[must_use]
    pub fn config(&self) -> &ZeroConfig {
        &self.config
    }

    /// Encoder used for evaluation requests.
    #[must_use]
    pub fn encoder(&self) -> &dyn StateEncoder {
        self.encoder.as_ref()
    }
}

/// Branch with the best PUCT score; the first one on ties.
fn select_branch(node: &ZeroNode, c_puct: f64) -> usize {
    let parent_visits = node.visits();
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, branch) in node.branches.iter().enumerate() {
        let score = puct_score(
            branch.q(),
            f64::from(branch.prior),
            branch.visits,
            parent_visits,
            c_puct,
        );
        if score > best_score {
            best = i;
            best_score = score;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Choice, StateChange};
    use crate::core::GameConfig;
    use crate::nn::{Evaluation, UniformEvaluator};
    use std::sync::Arc;

    fn one_decision() -> GameState {
        let mut state = GameState::new(GameConfig::default().with_turn_limit(1));
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        state.pop();
        state.push(
            Choice::Boolean {
                player: p0,
                yes: Arc::new(StateChange::GainCoins { player: p0, amount: 50 }.into()),
                no: Arc::new(StateChange::GainCoins { player: p1, amount: 50 }.into()),
            }
            .into(),
        );
        state
    }

    /// Answers with priors for a move that is never legal.
    struct Misaligned;

    impl Evaluator for Misaligned {
        fn evaluate(&mut self, request: EvaluationRequest) -> Result<Evaluation, SearchError> {
            Ok(Evaluation {
                values: PlayerMap::with_value(0.5),
                priors: request
                    .legal_moves
                    .iter()
                    .map(|_| (GameMove::Int(99), 1.0))
                    .collect(),
            })
        }
    }

    #[test]
    fn test_terminal_values() {
        let state = one_decision();
        let done = apply_move(&state, Some(GameMove::Bool(false)), Verbosity::Silent).unwrap();
        let values = terminal_values(&done);
        assert_eq!(values[PlayerId::new(0)], 0.0);
        assert_eq!(values[PlayerId::new(1)], 1.0);
    }

    #[test]
    fn test_root_visits_sum_to_budget() {
        let state = GameState::new(GameConfig::default());
        let config = ZeroConfig::default()
            .with_simulations_per_move(3)
            .with_min_simulations(5);
        let mut search = ZeroSearch::new(config, UniformEvaluator);
        let decision = search.search(&state).unwrap();

        let total: u32 = decision.visits.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 12);
        assert_eq!(search.stats().iterations, 12);
        let legal = legal_moves(&state);
        assert!(decision.mv.is_some_and(|m| legal.contains(&m)));
        assert_eq!(
            decision.visits.iter().map(|(m, _)| *m).collect::<Vec<_>>(),
            legal
        );
    }

    #[test]
    fn test_zero_budget_still_picks_a_move() {
        let state = GameState::new(GameConfig::default());
        let config = ZeroConfig::default()
            .with_simulations_per_move(0)
            .with_min_simulations(0);
        let mut search = ZeroSearch::new(config, UniformEvaluator);
        let decision = search.search(&state).unwrap();

        let legal = legal_moves(&state);
        assert!(legal.len() > 1);
        assert!(decision.mv.is_some_and(|m| legal.contains(&m)));
        assert_eq!(search.stats().iterations, 1);
    }

    #[test]
    fn test_prefers_winning_branch() {
        let state = one_decision();
        let config = ZeroConfig::default().with_min_simulations(20);
        let mut search = ZeroSearch::new(config, UniformEvaluator);
        let decision = search.search(&state).unwrap();

        assert_eq!(decision.most_visited(), Some(GameMove::Bool(true)));
        let root = search.root().unwrap();
        assert_eq!(root.visits(), 20);
        assert!((root.branches[0].q() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_prior_mismatch_is_fatal() {
        let state = GameState::new(GameConfig::default());
        let mut search = ZeroSearch::new(ZeroConfig::default(), Misaligned);
        assert_eq!(
            search.search(&state),
            Err(SearchError::PriorMismatch { expected: 4, got: 4 })
        );
    }

    #[test]
    fn test_finished_game_skips_search() {
        let state = one_decision();
        let done = apply_move(&state, Some(GameMove::Bool(true)), Verbosity::Silent).unwrap();
        let mut search = ZeroSearch::new(ZeroConfig::default(), UniformEvaluator);
        let decision = search.search(&done).unwrap();
        assert_eq!(decision.mv, None);
        assert!(decision.visits.is_empty());
        assert!(search.root().is_none());
    }

    #[test]
    fn test_most_visited_prefers_first_on_ties() {
        let decision = ZeroDecision {
            mv: None,
            visits: vec![(GameMove::Int(0), 3), (GameMove::Int(1), 5), (GameMove::Int(2), 5)],
        };
        assert_eq!(decision.most_visited(), Some(GameMove::Int(1)));
    }
}

//! Core MCTS search algorithm.
//!
//! Every iteration replays the interpreter from the stored node states:
//!
//! 1. **Select** children by UCT, scored from the win fraction of the
//!    faction deciding at the parent, until a node still has untried moves
//!    or the game is over there.
//! 2. **Expand** one untried move chosen at random. Choices with no options
//!    along the way are skipped with the null move.
//! 3. **Roll out** uniformly random moves to the end of the game.
//! 4. **Backpropagate** one visit to every ancestor, and one win for the
//!    rollout's winning faction.
//!
//! The move played is the root child with the highest win fraction for the
//! root's deciding faction; the earliest expanded child wins ties.

use std::time::Instant;

use crate::core::{GameRng, SearchError, Verbosity};
use crate::game::{Faction, GameMove, GameState};
use crate::rules::{apply_move, legal_moves, skip_empty_choices};

use super::config::MCTSConfig;
use super::node::{MCTSNode, NodeId};
use super::policy::{uct_score, RandomSimulation, SimulationPolicy};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Main MCTS search context.
///
/// Owns the configuration, the RNG and the tree of the latest search.
pub struct MCTSSearch {
    config: MCTSConfig,
    rng: GameRng,
    simulation: Box<dyn SimulationPolicy>,
    tree: Option<MCTSTree>,
    stats: SearchStats,
}

impl MCTSSearch {
    #[must_use]
    pub fn new(config: MCTSConfig) -> Self {
        Self {
            rng: GameRng::new(config.seed),
            config,
            simulation: Box::new(RandomSimulation),
            tree: None,
            stats: SearchStats::default(),
        }
    }

    /// Set a custom rollout policy.
    #[must_use]
    pub fn with_simulation<S: SimulationPolicy + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Pick a move for the pending choice of `state`.
    ///
    /// Returns `None` when the game is over or the choice has no options.
    /// With a single legal move the search is skipped.
    pub fn search(&mut self, state: &GameState) -> Result<Option<GameMove>, SearchError> {
        self.stats.reset();
        self.tree = None;

        if state.is_over() {
            return Ok(None);
        }
        let moves = legal_moves(state);
        if moves.len() <= 1 {
            return Ok(moves.first().copied());
        }

        let start = Instant::now();
        let capacity = self
            .config
            .max_nodes
            .min(self.config.iterations as usize + 1);
        let mut tree = MCTSTree::with_capacity(state.clone(), capacity);

        for _ in 0..self.config.iterations {
            self.iteration(&mut tree)?;
            self.stats.iterations += 1;
            if tree.len() >= self.config.max_nodes {
                break;
            }
        }
        self.stats.finish_timer(start);

        let decider = tree.root_node().decider;
        let best = best_child(&tree, decider)
            .map(|id| tree.get(id).mv)
            .unwrap_or_else(|| moves.first().copied());

        if self.config.verbosity.turns() {
            log::debug!(
                "mcts: {} iterations, {} nodes, {:.1} moves/rollout, playing {}",
                self.stats.iterations,
                tree.len(),
                self.stats.avg_rollout_length(),
                best.map_or_else(|| "-".to_string(), |m| m.to_string())
            );
        }

        self.tree = Some(tree);
        Ok(best)
    }

    /// Select, expand, roll out, backpropagate.
    fn iteration(&mut self, tree: &mut MCTSTree) -> Result<(), SearchError> {
        let mut id = tree.root();
        loop {
            let node = tree.get(id);
            if node.is_terminal() || !node.is_fully_expanded() || node.children.is_empty() {
                break;
            }
            id = select_child(tree, id, self.config.temperature);
        }

        if !tree.get(id).is_terminal() && !tree.get(id).is_fully_expanded() {
            id = self.expand(tree, id)?;
        }
        self.stats.reach_depth(usize::from(tree.get(id).depth));

        let rollout = self.simulation.simulate(
            tree.get(id).state.clone(),
            &mut self.rng,
            self.config.rollout_limit,
        )?;
        self.stats.rollouts += 1;
        self.stats.rollout_moves += u64::from(rollout.moves);

        let mut cursor = id;
        while !cursor.is_none() {
            let node = tree.get_mut(cursor);
            node.record(rollout.winner);
            cursor = node.parent;
        }
        Ok(())
    }

    /// Give one random untried move of `id` its own child.
    fn expand(&mut self, tree: &mut MCTSTree, id: NodeId) -> Result<NodeId, SearchError> {
        let node = tree.get_mut(id);
        let pick = self.rng.gen_range_usize(0..node.unexpanded.len());
        let mv = node.unexpanded.swap_remove(pick);
        let depth = node.depth.saturating_add(1);

        let next = apply_move(&tree.get(id).state, Some(mv), Verbosity::Silent)?;
        let next = skip_empty_choices(next, Verbosity::Silent)?;
        self.stats.nodes_expanded += 1;
        Ok(tree.alloc(MCTSNode::new(next, id, Some(mv), depth)))
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Tree of the latest search, if one was run.
    #[must_use]
    pub fn tree(&self) -> Option<&MCTSTree> {
        self.tree.as_ref()
    }

    /// Root move visit counts of the latest search, in expansion order.
    #[must_use]
    pub fn action_visits(&self) -> Vec<(GameMove, u32)> {
        let Some(tree) = &self.tree else {
            return Vec::new();
        };
        tree.children(tree.root())
            .filter_map(|child| child.mv.map(|mv| (mv, child.visits)))
            .collect()
    }

    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}

/// Child of `id` with the best UCT score; the first one on ties.
fn select_child(tree: &MCTSTree, id: NodeId, temperature: f64) -> NodeId {
    let node = tree.get(id);
    let mut best = NodeId::NONE;
    let mut best_score = f64::NEG_INFINITY;
    for &child_id in &node.children {
        let child = tree.get(child_id);
        let fraction = node.decider.map_or(0.0, |f| child.win_fraction(f));
        let score = uct_score(fraction, child.visits, node.visits, temperature);
        if best.is_none() || score > best_score {
            best = child_id;
            best_score = score;
        }
    }
    best
}

/// Root child with the highest win fraction for `decider`.
fn best_child(tree: &MCTSTree, decider: Option<Faction>) -> Option<NodeId> {
    let root = tree.root_node();
    let mut best: Option<(NodeId, f64)> = None;
    for &child_id in &root.children {
        let fraction = decider.map_or(0.0, |f| tree.get(child_id).win_fraction(f));
        match best {
            Some((_, top)) if fraction <= top => {}
            _ => best = Some((child_id, fraction)),
        }
    }
    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Choice, StateChange};
    use crate::core::{GameConfig, PlayerId};
    use crate::game::BottomAction;
    use std::sync::Arc;

    /// One decision: `yes` hands seat 0 the game, `no` hands it to seat 1.
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

    #[test]
    fn test_finished_game_has_no_move() {
        let state = one_decision();
        let done = apply_move(&state, Some(GameMove::Bool(true)), Verbosity::Silent)
            .expect("legal move");
        let mut search = MCTSSearch::new(MCTSConfig::default());
        assert_eq!(search.search(&done), Ok(None));
    }

    #[test]
    fn test_single_move_skips_search() {
        let mut state = GameState::new(GameConfig::default());
        let p = PlayerId::new(0);
        state.pop();
        for recruit in &BottomAction::ALL[..3] {
            state.player_mut(p).recruits.insert(*recruit);
        }
        state.push(Choice::ChooseRecruit { player: p }.into());

        let mut search = MCTSSearch::new(MCTSConfig::default());
        let mv = search.search(&state).expect("search");
        assert_eq!(mv, legal_moves(&state).first().copied());
        assert_eq!(search.stats().iterations, 0);
        assert!(search.tree().is_none());
    }

    #[test]
    fn test_finds_winning_branch() {
        let state = one_decision();
        let mut search = MCTSSearch::new(MCTSConfig::default().with_iterations(20));
        assert_eq!(search.search(&state), Ok(Some(GameMove::Bool(true))));

        let visits = search.action_visits();
        assert_eq!(visits.len(), 2);
        assert_eq!(visits.iter().map(|(_, v)| v).sum::<u32>(), 20);
    }

    #[test]
    fn test_search_is_deterministic() {
        let state = GameState::new(GameConfig::default());
        let config = MCTSConfig::default()
            .with_iterations(12)
            .with_rollout_limit(20)
            .with_seed(9);

        let mut a = MCTSSearch::new(config.clone());
        let mut b = MCTSSearch::new(config);
        assert_eq!(a.search(&state), b.search(&state));
        assert_eq!(a.action_visits(), b.action_visits());
    }

    #[test]
    fn test_search_stats_and_node_cap() {
        let state = GameState::new(GameConfig::default());
        let config = MCTSConfig::default()
            .with_iterations(50)
            .with_rollout_limit(10)
            .with_max_nodes(6);
        let mut search = MCTSSearch::new(config);
        let mv = search.search(&state).expect("search");

        assert!(mv.is_some_and(|m| legal_moves(&state).contains(&m)));
        let tree = search.tree().expect("tree kept");
        assert_eq!(tree.len(), 6);
        assert_eq!(search.stats().iterations, 5);
        assert_eq!(search.stats().nodes_expanded, 5);
        assert_eq!(tree.root_node().visits, 5);
    }
}

//! MCTS node structures.
//!
//! Nodes live in an arena (`MCTSTree`) and refer to each other by `NodeId`.
//! A parent link is a plain index, never an owning pointer.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::game::{Faction, GameMove, GameState};

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the search tree.
///
/// `state` is always either finished or awaiting a choice with at least one
/// legal move; choices without options are resolved before a node is built.
#[derive(Clone, Debug)]
pub struct MCTSNode {
    pub state: GameState,

    pub parent: NodeId,

    /// Move that led here from the parent (`None` at the root).
    pub mv: Option<GameMove>,

    pub visits: u32,

    /// Rollouts through this node won by each faction.
    pub wins: FxHashMap<Faction, u32>,

    pub children: SmallVec<[NodeId; 8]>,

    /// Legal moves not yet given a child.
    pub unexpanded: Vec<GameMove>,

    /// Faction choosing at this node, `None` when the game is over.
    pub decider: Option<Faction>,

    pub depth: u16,
}

impl MCTSNode {
    /// Build a node for `state`, which must already have its empty choices
    /// skipped.
    #[must_use]
    pub fn new(state: GameState, parent: NodeId, mv: Option<GameMove>, depth: u16) -> Self {
        let decider = crate::rules::deciding_player(&state).map(|p| state.faction_of(p));
        let unexpanded = crate::rules::legal_moves(&state);
        Self {
            state,
            parent,
            mv,
            visits: 0,
            wins: FxHashMap::default(),
            children: SmallVec::new(),
            unexpanded,
            decider,
            depth,
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state.is_over()
    }

    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.unexpanded.is_empty()
    }

    #[must_use]
    pub fn wins_for(&self, faction: Faction) -> u32 {
        self.wins.get(&faction).copied().unwrap_or(0)
    }

    /// Share of visits won by `faction`; 0 for an unvisited node.
    #[must_use]
    pub fn win_fraction(&self, faction: Faction) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            f64::from(self.wins_for(faction)) / f64::from(self.visits)
        }
    }

    /// Count one visit, and one win for `winner` if there is one.
    pub fn record(&mut self, winner: Option<Faction>) {
        self.visits += 1;
        if let Some(faction) = winner {
            *self.wins.entry(faction).or_insert(0) += 1;
        }
    }
}

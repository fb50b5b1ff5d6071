//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references, so parent links
//! never own their targets and the whole tree drops in one go.

use rustc_hash::FxHashMap;

use super::node::{MCTSNode, NodeId};
use crate::game::{Faction, GameState};

/// Arena-based MCTS tree. The root is always `NodeId(0)`.
#[derive(Clone, Debug)]
pub struct MCTSTree {
    nodes: Vec<MCTSNode>,
    root: NodeId,
}

impl MCTSTree {
    /// Create a tree whose root holds `state`.
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self::with_capacity(state, 1024)
    }

    #[must_use]
    pub fn with_capacity(state: GameState, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity);
        nodes.push(MCTSNode::new(state, NodeId::NONE, None, 0));
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.index()]
    }

    /// Add `node` as the last child of its parent.
    pub fn alloc(&mut self, node: MCTSNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        let parent = node.parent;
        self.nodes.push(node);
        if !parent.is_none() {
            self.get_mut(parent).children.push(id);
        }
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        self.get(self.root)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i as u32), node))
    }

    /// Children of `id` in creation order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &MCTSNode> {
        self.get(id).children.iter().map(move |&c| self.get(c))
    }

    /// Shape of the tree, for diagnostics.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            node_count: self.nodes.len(),
            ..TreeStats::default()
        };
        for node in &self.nodes {
            stats.max_depth = stats.max_depth.max(node.depth);
            stats.depth_total += u64::from(node.depth);
            stats.untried += node.unexpanded.len();
            match node.decider {
                Some(faction) => *stats.by_decider.entry(faction).or_insert(0) += 1,
                None => stats.finished += 1,
            }
        }
        stats
    }
}

#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    pub node_count: usize,
    pub max_depth: u16,

    /// Nodes holding a finished game.
    pub finished: usize,

    /// Legal moves not yet given a child.
    pub untried: usize,

    /// Nodes per faction deciding there.
    pub by_decider: FxHashMap<Faction, usize>,

    depth_total: u64,
}

impl TreeStats {
    #[must_use]
    pub fn mean_depth(&self) -> f64 {
        if self.node_count == 0 {
            return 0.0;
        }
        self.depth_total as f64 / self.node_count as f64
    }

    /// Nodes where `faction` decides.
    #[must_use]
    pub fn deciding(&self, faction: Faction) -> usize {
        self.by_decider.get(&faction).copied().unwrap_or(0)
    }
}

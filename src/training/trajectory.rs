//! Trajectory and experience buffer for training data collection.
//!
//! A trajectory records one self-play game: for every searched decision,
//! the encoded state, the root visit counts and the move played, plus the
//! final result for value targets.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, PlayerId, PlayerMap};
use crate::game::{Faction, GameMove};
use crate::nn::EncodedState;

/// One searched decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Board planes from the deciding seat's perspective.
    pub board: EncodedState,

    /// Scalar features from the same perspective.
    pub aux: EncodedState,

    /// Root visits per legal move.
    pub visits: Vec<(GameMove, u32)>,

    pub chosen: GameMove,

    pub player: PlayerId,

    /// Index of the move in the game, forced moves included.
    pub move_number: usize,
}

impl Step {
    /// Visit counts normalised to a distribution.
    #[must_use]
    pub fn policy(&self) -> Vec<f32> {
        let total: u32 = self.visits.iter().map(|(_, n)| n).sum();
        if total == 0 {
            return vec![0.0; self.visits.len()];
        }
        self.visits
            .iter()
            .map(|&(_, n)| n as f32 / total as f32)
            .collect()
    }

    /// Share of visits the chosen move received.
    #[must_use]
    pub fn chosen_share(&self) -> f32 {
        self.visits
            .iter()
            .position(|(mv, _)| *mv == self.chosen)
            .map_or(0.0, |i| self.policy()[i])
    }
}

/// A complete self-play game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub steps: Vec<Step>,

    /// Result per seat: 1 win, 0 loss, 0.5 tie or unfinished.
    pub outcome: PlayerMap<f32>,

    pub winner: Option<Faction>,

    /// Final scores, when the game was finished.
    pub scores: Option<PlayerMap<i32>>,

    /// Moves applied, forced and null moves included.
    pub game_length: usize,

    pub seed: u64,
}

impl Trajectory {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            steps: Vec::new(),
            outcome: PlayerMap::with_value(0.5),
            winner: None,
            scores: None,
            game_length: 0,
            seed,
        }
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn player_steps(&self, player: PlayerId) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(move |s| s.player == player)
    }

    /// One sample per step, valued from the step's seat.
    #[must_use]
    pub fn to_training_samples(&self) -> Vec<TrainingSample> {
        self.steps
            .iter()
            .map(|step| TrainingSample {
                board: step.board.clone(),
                aux: step.aux.clone(),
                policy: step.policy(),
                value: self.outcome[step.player],
                player: step.player,
            })
            .collect()
    }

    /// Compact binary encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// A single training sample extracted from a trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub board: EncodedState,
    pub aux: EncodedState,
    /// Target policy (root visit distribution).
    pub policy: Vec<f32>,
    /// Target value (game result for `player`).
    pub value: f32,
    pub player: PlayerId,
}

/// Bounded FIFO of training samples, filled one game at a time.
///
/// Once full, the oldest samples are dropped first.
#[derive(Clone, Debug)]
pub struct ExperienceBuffer {
    samples: VecDeque<TrainingSample>,
    capacity: usize,
    games: u64,
}

impl ExperienceBuffer {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            games: 0,
        }
    }

    /// Add every sample of `trajectory`.
    pub fn extend_from(&mut self, trajectory: &Trajectory) {
        for sample in trajectory.to_training_samples() {
            if self.samples.len() == self.capacity {
                self.samples.pop_front();
            }
            if self.capacity > 0 {
                self.samples.push_back(sample);
            }
        }
        self.games += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Trajectories added since creation, evicted ones included.
    #[must_use]
    pub fn games(&self) -> u64 {
        self.games
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrainingSample> {
        self.samples.iter()
    }

    /// Up to `batch_size` distinct samples, reproducibly from `seed`.
    #[must_use]
    pub fn sample_batch(&self, batch_size: usize, seed: u64) -> Vec<TrainingSample> {
        let mut order: Vec<usize> = (0..self.samples.len()).collect();
        GameRng::new(seed).shuffle(&mut order);
        order
            .into_iter()
            .take(batch_size)
            .map(|i| self.samples[i].clone())
            .collect()
    }
}

impl Default for ExperienceBuffer {
    fn default() -> Self {
        Self::new(50_000)
    }
}

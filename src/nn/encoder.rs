//! State encoding for evaluator input.
//!
//! Transforms a game state into board planes plus a scalar feature vector,
//! always from one seat's perspective: that seat's features come first.

use crate::board::{SpaceId, Terrain, COLS, ROWS};
use crate::core::PlayerId;
use crate::game::{GameState, PieceKind, MAX_POPULARITY, MAX_POWER, MAX_WORKERS, STAR_LIMIT};
use crate::nn::traits::EncodedState;

/// Encodes game states for an evaluator.
pub trait StateEncoder: Send + Sync {
    /// Encode `state` as seen by `perspective`: `(board, aux)`.
    fn encode(&self, state: &GameState, perspective: PlayerId) -> (EncodedState, EncodedState);

    /// Shape of the board tensor.
    fn board_shape(&self) -> Vec<usize>;

    /// Length of the aux vector.
    fn aux_len(&self) -> usize;
}

/// Baseline encoder: 7×7 planes and normalised player scalars.
///
/// Board planes, per seat (perspective first): workers, mechs, character,
/// structures. Then shared planes: resources on the space, tunnel, lake,
/// factory.
///
/// Aux features, per seat: coins, popularity, power, combat cards, stars,
/// upgrades, mechs, structures, recruits, workers. Then the fraction of
/// the turn limit used and whether the perspective seat is to play.
#[derive(Clone, Debug)]
pub struct FeatureEncoder {
    max_coins: f32,
    max_cards: f32,
}

const PIECE_PLANES: usize = 4;
const SHARED_PLANES: usize = 4;
const PLANES: usize = 2 * PIECE_PLANES + SHARED_PLANES;
const SEAT_FEATURES: usize = 10;
const AUX_LEN: usize = 2 * SEAT_FEATURES + 2;

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self {
            max_coins: 80.0,
            max_cards: 12.0,
        }
    }
}

impl FeatureEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coin count that normalises to 1.
    #[must_use]
    pub fn with_max_coins(mut self, max_coins: f32) -> Self {
        self.max_coins = max_coins;
        self
    }

    fn cell(plane: usize, space: SpaceId) -> Option<usize> {
        let (row, col) = space.coords()?;
        let area = usize::from(ROWS) * usize::from(COLS);
        Some(plane * area + usize::from(row) * usize::from(COLS) + usize::from(col))
    }

    fn seat_features(&self, state: &GameState, seat: PlayerId) -> [f32; SEAT_FEATURES] {
        let p = state.player(seat);
        let ratio = |n: f32, max: f32| (n / max).clamp(0.0, 1.0);
        [
            ratio(p.coins as f32, self.max_coins),
            ratio(f32::from(p.popularity), f32::from(MAX_POPULARITY)),
            ratio(f32::from(p.power), f32::from(MAX_POWER)),
            ratio(p.hand.len() as f32, self.max_cards),
            ratio(f32::from(p.stars.count()), f32::from(STAR_LIMIT)),
            ratio(p.upgrades.len() as f32, 6.0),
            ratio(p.mechs.len() as f32, 4.0),
            ratio(p.structures.len() as f32, 4.0),
            ratio(p.recruits.len() as f32, 4.0),
            ratio(p.workers.len() as f32, f32::from(MAX_WORKERS)),
        ]
    }
}

impl StateEncoder for FeatureEncoder {
    fn encode(&self, state: &GameState, perspective: PlayerId) -> (EncodedState, EncodedState) {
        let mut board = EncodedState::zeros(self.board_shape());
        let seats = [perspective, perspective.other()];

        for (offset, &seat) in seats.iter().enumerate() {
            let faction = state.faction_of(seat);
            for (piece, space) in state.pieces().filter(|(k, _)| k.faction == faction) {
                let kind = match piece.kind {
                    PieceKind::Worker => 0,
                    PieceKind::Mech => 1,
                    PieceKind::Character => 2,
                    PieceKind::Structure => 3,
                };
                if let Some(i) = Self::cell(offset * PIECE_PLANES + kind, space) {
                    board.set(i, board.get(i).unwrap_or(0.0) + 1.0);
                }
            }
        }

        let shared = 2 * PIECE_PLANES;
        for (space, resources) in state.resource_spaces() {
            if let Some(i) = Self::cell(shared, space) {
                board.set(i, resources.total() as f32 / 8.0);
            }
        }
        for space in state.board().grid() {
            let flags = [
                space.tunnel,
                space.terrain == Terrain::Lake,
                space.terrain == Terrain::Factory,
            ];
            for (k, flag) in flags.into_iter().enumerate() {
                if flag {
                    if let Some(i) = Self::cell(shared + 1 + k, space.id) {
                        board.set(i, 1.0);
                    }
                }
            }
        }

        let mut aux = Vec::with_capacity(AUX_LEN);
        for &seat in &seats {
            aux.extend(self.seat_features(state, seat));
        }
        let limit = state.config().turn_limit.max(1) as f32;
        aux.push((state.turn() as f32 / limit).clamp(0.0, 1.0));
        aux.push(if state.current() == perspective { 1.0 } else { 0.0 });

        (board, EncodedState::new(aux, vec![AUX_LEN]))
    }

    fn board_shape(&self) -> Vec<usize> {
        vec![PLANES, usize::from(ROWS), usize::from(COLS)]
    }

    fn aux_len(&self) -> usize {
        AUX_LEN
    }
}

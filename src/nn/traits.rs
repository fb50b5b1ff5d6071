//! Evaluator interface for value/prior prediction.
//!
//! An evaluator receives one encoded state plus the legal moves of its
//! pending choice and answers with a value per seat and a prior per move.
//! The priors must follow the request's moves exactly, in order.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap, SearchError};
use crate::game::GameMove;

/// Encoded game state as a flat tensor for network input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor (e.g., [planes, rows, cols] or [features]).
    pub shape: Vec<usize>,
}

impl EncodedState {
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        let size = shape.iter().product();
        Self {
            tensor: vec![0.0; size],
            shape,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }

    /// Set element at a flat index. Out-of-range writes are ignored.
    pub fn set(&mut self, index: usize, value: f32) {
        if let Some(slot) = self.tensor.get_mut(index) {
            *slot = value;
        }
    }
}

/// One state sent for evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Board planes.
    pub board: EncodedState,
    /// Scalar features.
    pub aux: EncodedState,
    /// Legal moves of the pending choice, in interpreter order.
    pub legal_moves: Vec<GameMove>,
    /// Seat deciding the pending choice.
    pub seat: PlayerId,
}

/// An evaluator's answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Expected result per seat, in `[0, 1]`.
    pub values: PlayerMap<f32>,
    /// Prior per legal move, aligned with the request.
    pub priors: Vec<(GameMove, f32)>,
}

impl Evaluation {
    /// Check this answer against the legal moves of its request.
    pub fn validate(&self, legal_moves: &[GameMove]) -> Result<(), SearchError> {
        let aligned = self.priors.len() == legal_moves.len()
            && self
                .priors
                .iter()
                .zip(legal_moves)
                .all(|((mv, _), legal)| mv == legal);
        if !aligned {
            return Err(SearchError::PriorMismatch {
                expected: legal_moves.len(),
                got: self.priors.len(),
            });
        }
        if let Some((mv, p)) = self.priors.iter().find(|(_, p)| !p.is_finite() || *p < 0.0) {
            return Err(SearchError::MalformedEvaluation(format!("prior {p} for move {mv}")));
        }
        if self.values.values().any(|v| !v.is_finite()) {
            return Err(SearchError::MalformedEvaluation("non-finite value".to_string()));
        }
        Ok(())
    }
}

/// Answers evaluation requests. Calls block until the answer is ready.
pub trait Evaluator: Send {
    fn evaluate(&mut self, request: EvaluationRequest) -> Result<Evaluation, SearchError>;
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn evaluate(&mut self, request: EvaluationRequest) -> Result<Evaluation, SearchError> {
        (**self).evaluate(request)
    }
}

/// Uniform priors and even values (baseline for testing).
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformEvaluator;

impl Evaluator for UniformEvaluator {
    fn evaluate(&mut self, request: EvaluationRequest) -> Result<Evaluation, SearchError> {
        let share = if request.legal_moves.is_empty() {
            0.0
        } else {
            1.0 / request.legal_moves.len() as f32
        };
        Ok(Evaluation {
            values: PlayerMap::with_value(0.5),
            priors: request.legal_moves.iter().map(|&mv| (mv, share)).collect(),
        })
    }
}

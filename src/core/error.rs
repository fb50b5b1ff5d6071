//! Error types for the interpreter and the searches.
//!
//! Defects in move generation (building on an occupied space, enlisting a
//! recruit twice) are assertions, not errors: they cannot be recovered from.
//! The types here cover API misuse, the game-over control transfer, and
//! evaluator contract violations.

use thiserror::Error;

use crate::game::{GameMove, GameState};

/// Errors returned by the interpreter's move-application contract.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RulesError {
    /// The game has been finalised; no further moves are accepted.
    #[error("game is already finished")]
    GameFinished,

    /// The action stack is empty.
    #[error("no pending choice on the action stack")]
    NoPendingChoice,

    /// The top of the stack is not a choice (interpreter invariant broken).
    #[error("top of the action stack is not a choice: {0}")]
    NotAChoice(&'static str),

    /// The supplied move is not one of the pending choice's legal options.
    #[error("illegal move {mv:?} for {action}")]
    IllegalMove {
        /// The rejected move.
        mv: Option<GameMove>,
        /// Name of the pending choice.
        action: &'static str,
    },
}

/// Non-local exit raised when a player reaches the star limit.
///
/// Carries the state at the moment the final star was placed; the remaining
/// continuations on its stack are abandoned and the game is finalised.
#[derive(Debug, Error)]
#[error("star limit reached on turn {}", .0.turn())]
pub struct GameOver(pub Box<GameState>);

/// Result of applying a single action: the next state or game over.
pub type Outcome = Result<GameState, GameOver>;

/// Errors that abort a search or a self-play episode.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    /// The interpreter rejected a move.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// The evaluator's prior keys do not match the legal moves it was sent.
    #[error("evaluator priors do not match the legal moves ({expected} expected, {got} received)")]
    PriorMismatch {
        /// Number of legal moves in the request.
        expected: usize,
        /// Number of priors in the response.
        got: usize,
    },

    /// The evaluator's value vector is malformed.
    #[error("evaluator returned a malformed evaluation: {0}")]
    MalformedEvaluation(String),

    /// The evaluator channel was closed while a request was pending.
    #[error("evaluator channel disconnected")]
    EvaluatorDisconnected,
}

//! Rules: the interpreter, cost payment and end-of-game scoring.
//!
//! The action catalogue in `crate::actions` says what each rule does; this
//! module decides when rules run and what a finished game is worth.

pub mod interpreter;
pub mod payment;
pub mod scoring;

pub use interpreter::{
    advance, apply_move, deciding_player, is_over, legal_moves, pending_choice, skip_empty_choices,
    winner,
};
pub use payment::{can_pay, charge};
pub use scoring::{final_result, score, StructureBonus};

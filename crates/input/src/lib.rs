//! Player input: actions, scripted sequences and their reduction to per-step intents.
//!
//! # Invariants
//! - The world sees only [`PlayerIntent`](tileworld_common::PlayerIntent) values.
//! - A held jump produces exactly one jump intent until it is released.

pub mod action;
pub mod controls;

pub use action::{Action, InputScript};
pub use controls::Controls;

/// Errors from parsing input scripts.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("unknown action symbol '{0}'")]
    UnknownSymbol(char),
}

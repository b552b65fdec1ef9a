//! Action model
//!
//! [`GameAction`] is the tagged sum type of atomic moves; a voter wraps
//! one in a [`ProposedAction`] with optional rationale, and the tally
//! layer groups proposals by their canonical [`ActionSignature`].

pub mod game_action;
pub mod proposal;

pub use game_action::GameAction;
pub use proposal::{ActionSignature, ProposedAction, is_legal};

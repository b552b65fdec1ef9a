//! Domain layer for gambit-quorum
//!
//! This crate contains the decision-engine core: the action model, vote
//! grouping, margin rules and winner selection. It has no dependencies on
//! async runtime, I/O or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Consensus round
//!
//! For each atomic move the automated player must make, a panel of voter
//! slots proposes actions. Proposals are grouped by canonical signature
//! (rationale never splits a vote), a margin rule may terminate the round
//! early, and the winner is chosen deterministically: count descending,
//! signature ascending, filtered by the externally supplied legal set.
//!
//! ## External collaborators
//!
//! The card-game rule engine and the decision-making backends live behind
//! ports in the application layer. This crate never interprets game rules;
//! it only aggregates, validates against an allow-list, and orders.

pub mod action;
pub mod core;
pub mod tally;

// Re-export commonly used types
pub use action::{ActionSignature, GameAction, ProposedAction, is_legal};
pub use core::{DomainError, PlayerId, Provider};
pub use tally::{
    ConsensusOutcome, MarginRule, TallyBoard, VoteGroup, VoterFailure, VoterResult, VoterSlot,
    VoterVerdict, assign_slots, rank_groups, select_winner,
};

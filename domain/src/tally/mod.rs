//! Tallying and winner selection
//!
//! The per-round flow: [`assign_slots`] produces the panel, every settled
//! voter lands on the [`TallyBoard`], the [`MarginRule`] decides when the
//! round may stop early, and [`select_winner`] turns the finished board
//! into a [`ConsensusOutcome`].

pub mod board;
pub mod margin;
pub mod selector;
pub mod slots;
pub mod vote;

pub use board::TallyBoard;
pub use margin::MarginRule;
pub use selector::{ConsensusOutcome, rank_groups, select_winner};
pub use slots::assign_slots;
pub use vote::{VoteGroup, VoterFailure, VoterResult, VoterSlot, VoterVerdict};

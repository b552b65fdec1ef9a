//! Voter slots, settled results and vote groups
//!
//! One dispatched voter unit produces exactly one [`VoterResult`];
//! successful results are grouped into [`VoteGroup`]s by signature.

use crate::action::{ActionSignature, ProposedAction};
use crate::core::provider::Provider;
use serde::{Deserialize, Serialize};

/// One configured voter slot in a panel
///
/// The same provider may occupy multiple slots; the slot index is what
/// identifies a voter within a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterSlot {
    /// Position in the panel (0-indexed)
    pub index: usize,
    /// Backend occupying this slot
    pub provider: Provider,
}

impl VoterSlot {
    pub fn new(index: usize, provider: Provider) -> Self {
        Self { index, provider }
    }
}

impl std::fmt::Display for VoterSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}:{}", self.index, self.provider)
    }
}

/// Why a voter failed to contribute a vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoterFailure {
    /// The per-voter deadline elapsed before the backend answered
    Timeout,
    /// The round was terminated while this voter was still pending
    Aborted,
    /// The invocation itself failed; cause preserved
    Invocation(String),
}

impl std::fmt::Display for VoterFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoterFailure::Timeout => write!(f, "timeout"),
            VoterFailure::Aborted => write!(f, "aborted"),
            VoterFailure::Invocation(cause) => write!(f, "failure: {}", cause),
        }
    }
}

/// How a voter unit settled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoterVerdict {
    /// The voter returned a proposal
    Proposed(ProposedAction),
    /// The voter settled without a proposal
    Failed(VoterFailure),
}

/// The settled result of one dispatched voter unit
///
/// Exactly one per slot per round; contributes at most one vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterResult {
    /// The slot this result settles
    pub slot: VoterSlot,
    /// Success or failure disposition
    pub verdict: VoterVerdict,
    /// Wall time between dispatch and settlement
    pub elapsed_ms: u64,
}

impl VoterResult {
    /// A successful settlement carrying a proposal
    pub fn proposed(slot: VoterSlot, proposal: ProposedAction, elapsed_ms: u64) -> Self {
        Self {
            slot,
            verdict: VoterVerdict::Proposed(proposal),
            elapsed_ms,
        }
    }

    /// A deadline settlement
    pub fn timeout(slot: VoterSlot, elapsed_ms: u64) -> Self {
        Self {
            slot,
            verdict: VoterVerdict::Failed(VoterFailure::Timeout),
            elapsed_ms,
        }
    }

    /// A cancellation settlement
    pub fn aborted(slot: VoterSlot, elapsed_ms: u64) -> Self {
        Self {
            slot,
            verdict: VoterVerdict::Failed(VoterFailure::Aborted),
            elapsed_ms,
        }
    }

    /// A generic invocation failure, cause preserved
    pub fn failed(slot: VoterSlot, cause: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            slot,
            verdict: VoterVerdict::Failed(VoterFailure::Invocation(cause.into())),
            elapsed_ms,
        }
    }

    /// The proposal, if this voter settled successfully
    pub fn proposal(&self) -> Option<&ProposedAction> {
        match &self.verdict {
            VoterVerdict::Proposed(p) => Some(p),
            VoterVerdict::Failed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.proposal().is_some()
    }
}

/// The voters behind one mutually identical proposal
///
/// Created on the first vote for a signature, mutated on repeats. Scoped
/// to one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteGroup {
    /// Shared canonical signature
    pub signature: ActionSignature,
    /// Representative action (first arrival's, rationale kept for display)
    pub action: ProposedAction,
    /// Slot indices in arrival order
    pub voters: Vec<usize>,
    /// Number of votes in this group
    pub count: usize,
}

impl VoteGroup {
    /// Open a new group with its first vote
    pub fn open(proposal: ProposedAction, slot_index: usize) -> Self {
        Self {
            signature: proposal.signature(),
            action: proposal,
            voters: vec![slot_index],
            count: 1,
        }
    }

    /// Append a repeat vote
    pub fn push(&mut self, slot_index: usize) {
        self.voters.push(slot_index);
        self.count += 1;
    }
}

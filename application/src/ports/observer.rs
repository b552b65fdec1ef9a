//! Consensus event stream port
//!
//! Structured events emitted while rounds and turns run. Implementations
//! live in the presentation layer (console, log sinks); the engine itself
//! only publishes.

use gambit_domain::{ConsensusOutcome, PlayerId, VoterFailure, VoterSlot, VoterVerdict};

/// How a voter unit settled, flattened for observability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Success,
    Timeout,
    Abort,
    Failure,
}

impl From<&VoterVerdict> for Disposition {
    fn from(verdict: &VoterVerdict) -> Self {
        match verdict {
            VoterVerdict::Proposed(_) => Disposition::Success,
            VoterVerdict::Failed(VoterFailure::Timeout) => Disposition::Timeout,
            VoterVerdict::Failed(VoterFailure::Aborted) => Disposition::Abort,
            VoterVerdict::Failed(VoterFailure::Invocation(_)) => Disposition::Failure,
        }
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Disposition::Success => "success",
            Disposition::Timeout => "timeout",
            Disposition::Abort => "abort",
            Disposition::Failure => "failure",
        };
        write!(f, "{}", s)
    }
}

/// One structured event from the engine
#[derive(Debug, Clone)]
pub enum ConsensusEvent {
    /// A round began fanning out to its panel
    RoundStart { round: usize, panel_size: usize },
    /// A voter unit was dispatched
    VoterPending { round: usize, slot: VoterSlot },
    /// A voter unit settled, exactly once
    VoterSettled {
        round: usize,
        slot: VoterSlot,
        disposition: Disposition,
        elapsed_ms: u64,
    },
    /// A round produced a winner; carries the full ranked breakdown
    RoundDecided {
        round: usize,
        outcome: ConsensusOutcome,
        required_margin: usize,
    },
    /// A turn finished normally
    TurnComplete { player: PlayerId, steps: usize },
    /// A turn halted defensively; already-applied actions stand
    TurnStalled {
        player: PlayerId,
        steps: usize,
        reason: String,
    },
}

/// Observer for the consensus event stream
pub trait ConsensusObserver: Send + Sync {
    fn on_event(&self, event: &ConsensusEvent);
}

/// No-op observer for when event reporting is not needed
pub struct NoObserver;

impl ConsensusObserver for NoObserver {
    fn on_event(&self, _event: &ConsensusEvent) {}
}

//! Run Round use case
//!
//! One full dispatch → aggregate → decide cycle producing one winning
//! action for one atomic decision. Fans out one cancellable, deadline-
//! bound unit per voter slot, tallies settlements as they arrive, stops
//! the round early once the margin rule fires, and hands the finished
//! board to the winner selector.

use crate::config::EngineParams;
use crate::ports::decision_gateway::{DecisionContext, DecisionGateway, GatewayError, VoterReply};
use crate::ports::observer::{ConsensusEvent, ConsensusObserver, Disposition};
use gambit_domain::{
    ConsensusOutcome, DomainError, TallyBoard, VoterResult, VoterSlot, select_winner,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while running a round
///
/// All of them are terminal for the round; the turn driver catches them
/// and stalls instead of retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunRoundError {
    #[error("empty voter panel")]
    NoVoters,

    #[error("no usable proposals: every voter failed before settling a vote")]
    NoUsableProposals,

    #[error("all proposals invalid: no vote group passed the legal-action filter")]
    AllProposalsInvalid,

    #[error("round cancelled externally; outcome discarded")]
    Cancelled,
}

impl From<DomainError> for RunRoundError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NoUsableProposals => RunRoundError::NoUsableProposals,
            DomainError::AllProposalsInvalid => RunRoundError::AllProposalsInvalid,
            DomainError::Cancelled => RunRoundError::Cancelled,
            DomainError::InvalidProvider(_) => RunRoundError::NoVoters,
        }
    }
}

/// Use case for running one consensus round
pub struct RunRoundUseCase<G: DecisionGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: DecisionGateway + 'static> RunRoundUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Execute one round for the given panel
    ///
    /// `external_cancel` interrupts the whole decision process (e.g. the
    /// game was reset mid-turn); the round token is a child of it, so the
    /// outcome of an externally cancelled round is always discarded.
    pub async fn execute(
        &self,
        round: usize,
        slots: &[VoterSlot],
        ctx: &DecisionContext,
        params: &EngineParams,
        observer: &dyn ConsensusObserver,
        external_cancel: Option<&CancellationToken>,
    ) -> Result<ConsensusOutcome, RunRoundError> {
        if slots.is_empty() {
            return Err(RunRoundError::NoVoters);
        }

        info!(round, panel = slots.len(), "round start");
        observer.on_event(&ConsensusEvent::RoundStart {
            round,
            panel_size: slots.len(),
        });

        // One abort signal per round. A child token keeps sessions from
        // interfering with each other's cancellation.
        let round_token = match external_cancel {
            Some(token) => token.child_token(),
            None => CancellationToken::new(),
        };

        let ctx = Arc::new(ctx.clone());
        let mut join_set = JoinSet::new();

        for slot in slots {
            observer.on_event(&ConsensusEvent::VoterPending {
                round,
                slot: slot.clone(),
            });
            join_set.spawn(Self::dispatch_voter(
                Arc::clone(&self.gateway),
                slot.clone(),
                Arc::clone(&ctx),
                params.voter_deadline,
                round_token.clone(),
            ));
        }

        // Aggregation runs synchronously in this drain loop: it is the
        // only writer to the board, the round's single critical section.
        let mut board = TallyBoard::new(slots.len(), params.margin_rule);
        let mut early_fired = false;

        while let Some(joined) = join_set.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!(round, "voter task join error: {}", e);
                    continue;
                }
            };

            let disposition = Disposition::from(&result.verdict);
            debug!(
                round,
                slot = %result.slot,
                %disposition,
                elapsed_ms = result.elapsed_ms,
                "voter settled"
            );
            observer.on_event(&ConsensusEvent::VoterSettled {
                round,
                slot: result.slot.clone(),
                disposition,
                elapsed_ms: result.elapsed_ms,
            });

            if let Some(signature) = board.record(result)
                && !early_fired
            {
                early_fired = true;
                info!(
                    round,
                    winner = %signature,
                    settled = board.settled_count(),
                    "early consensus reached, aborting pending voters"
                );
                round_token.cancel();
            }
        }

        if external_cancel.is_some_and(|token| token.is_cancelled()) {
            info!(round, "round cancelled externally, outcome discarded");
            return Err(RunRoundError::Cancelled);
        }

        let outcome = select_winner(&board, &ctx.legal_actions)?;

        if outcome.early_winner_rejected {
            // Distinct from the ordinary fallback: an early winner that
            // the rule engine would reject points at voter/context desync.
            warn!(
                round,
                winner = %outcome.winning_action,
                "early-consensus winner failed the legality filter; fell back to ranked list"
            );
        }

        let required_margin = params.margin_rule.required_margin(slots.len());
        info!(
            round,
            winner = %outcome.winning_action,
            votes = outcome.winner_vote_count,
            considered = outcome.votes_considered,
            early = outcome.early_consensus_applied,
            "round decided"
        );
        observer.on_event(&ConsensusEvent::RoundDecided {
            round,
            outcome: outcome.clone(),
            required_margin,
        });

        Ok(outcome)
    }

    /// One voter unit: races the gateway call against the per-voter
    /// deadline and the round's abort signal. Settles exactly once.
    async fn dispatch_voter(
        gateway: Arc<G>,
        slot: VoterSlot,
        ctx: Arc<DecisionContext>,
        deadline: std::time::Duration,
        token: CancellationToken,
    ) -> VoterResult {
        enum Settled {
            Aborted,
            Deadline,
            Reply(Result<VoterReply, GatewayError>),
        }

        let started = tokio::time::Instant::now();
        let settled = tokio::select! {
            biased;

            _ = token.cancelled() => Settled::Aborted,
            _ = tokio::time::sleep(deadline) => Settled::Deadline,
            reply = gateway.invoke(&slot.provider, &ctx, token.clone()) => Settled::Reply(reply),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match settled {
            Settled::Aborted => VoterResult::aborted(slot, elapsed_ms),
            Settled::Deadline => VoterResult::timeout(slot, elapsed_ms),
            Settled::Reply(Ok(reply)) => VoterResult::proposed(slot, reply.action, elapsed_ms),
            Settled::Reply(Err(GatewayError::Timeout)) => VoterResult::timeout(slot, elapsed_ms),
            Settled::Reply(Err(e)) => VoterResult::failed(slot, e.to_string(), elapsed_ms),
        }
    }
}

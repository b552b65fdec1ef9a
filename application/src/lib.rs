//! Application layer for gambit-quorum
//!
//! Use cases and ports for the consensus decision engine. The round use
//! case fans out one cancellable, deadline-bound voter unit per slot and
//! aggregates settlements into a winning action; the turn use case chains
//! rounds until an automated player's turn completes.
//!
//! External collaborators live behind ports: the card-game rule engine
//! ([`TableEngine`]), the decision-making call ([`DecisionGateway`]) and
//! the event stream ([`ConsensusObserver`]). Adapters belong to the
//! infrastructure layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::EngineParams;
pub use ports::{
    ConsensusEvent, ConsensusObserver, DecisionContext, DecisionGateway, Disposition, EngineError,
    GatewayError, NoObserver, PendingDecision, ReplyFormat, TableEngine, VoterReply,
};
pub use use_cases::{RunRoundError, RunRoundUseCase, RunTurnUseCase, TurnEnd, TurnReport};

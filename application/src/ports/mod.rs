//! Ports (interfaces) consumed or exposed by the use cases

pub mod decision_gateway;
pub mod observer;
pub mod table_engine;

pub use decision_gateway::{
    DecisionContext, DecisionGateway, GatewayError, ReplyFormat, VoterReply,
};
pub use observer::{ConsensusEvent, ConsensusObserver, Disposition, NoObserver};
pub use table_engine::{EngineError, PendingDecision, TableEngine};

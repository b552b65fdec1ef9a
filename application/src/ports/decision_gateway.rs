//! Decision gateway port
//!
//! Defines the interface to the external decision-making call. The engine
//! treats one invocation as an opaque async unit: prompt construction and
//! backend transport live in the infrastructure layer.

use async_trait::async_trait;
use gambit_domain::{GameAction, ProposedAction, Provider};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur during a gateway invocation
///
/// Every variant is non-fatal for the round; it only excludes the voter
/// from the tally.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Reply could not be parsed into an action: {0}")]
    MalformedReply(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// The reply shape a voter answered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReplyFormat {
    /// Structured action object
    #[default]
    Json,
    /// Free text coerced into an action by the adapter
    FreeText,
}

/// Shared context handed to every voter in a round
#[derive(Debug, Clone)]
pub struct DecisionContext {
    /// Serialized game state, as supplied by the rule engine
    pub state_snapshot: String,
    /// Prior partial choice when resolving a chained sub-decision
    pub pending_choice: Option<String>,
    /// The allow-list for this decision point
    pub legal_actions: Vec<GameAction>,
    /// Preferred reply shape
    pub format_hint: ReplyFormat,
}

impl DecisionContext {
    pub fn new(state_snapshot: impl Into<String>, legal_actions: Vec<GameAction>) -> Self {
        Self {
            state_snapshot: state_snapshot.into(),
            pending_choice: None,
            legal_actions,
            format_hint: ReplyFormat::Json,
        }
    }

    pub fn with_pending_choice(mut self, choice: impl Into<String>) -> Self {
        self.pending_choice = Some(choice.into());
        self
    }
}

/// One voter's answer
#[derive(Debug, Clone)]
pub struct VoterReply {
    pub action: ProposedAction,
    pub format: ReplyFormat,
}

/// Gateway to the external decision-making backends
///
/// Implementations (adapters) live in the infrastructure layer. The
/// cancellation token is advisory: an adapter should stop work promptly
/// once it fires, but the dispatcher never waits on teardown — the unit
/// settles as aborted regardless.
#[async_trait]
pub trait DecisionGateway: Send + Sync {
    async fn invoke(
        &self,
        provider: &Provider,
        ctx: &DecisionContext,
        cancel: CancellationToken,
    ) -> Result<VoterReply, GatewayError>;
}

//! Infrastructure layer for gambit-quorum
//!
//! Adapters for the application ports. Real deployments plug their own
//! rule engine and decision backends in here; this crate ships the demo
//! pair used by the CLI and integration tests: a seeded dice voter and a
//! scripted table fixture.

pub mod dice_gateway;
pub mod scripted_table;

pub use dice_gateway::DiceGateway;
pub use scripted_table::{DecisionPoint, ScriptedTable};

//! Core value objects and errors

pub mod error;
pub mod provider;

pub use error::DomainError;
pub use provider::{PlayerId, Provider};

//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors and the lifecycle/ownership
//! traits that form the vocabulary of the variation ledger.

mod auth;
mod command;
mod errors;
mod ids;
mod money;
mod ownership;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ProjectId, UserId, VariationId};
pub use money::Money;
pub use ownership::OwnedByUser;
pub use state_machine::{StateMachine, Transition};
pub use timestamp::Timestamp;

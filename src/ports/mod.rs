//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence
//!
//! - `ProjectRepository` - Versioned Project aggregate storage
//! - `SignatureTokenIndex` - Optional token -> variation lookup cache
//!
//! ## Outbound
//!
//! - `VariationNotifier` - Signing links and signed confirmations
//!
//! ## Identity and environment
//!
//! - `SessionValidator` - Bearer token validation for owners
//! - `Clock` - Current time
//! - `TokenGenerator` - Signature token source

mod clock;
mod notifier;
mod project_repository;
mod session_validator;
mod signature_token_index;
mod token_generator;

pub use clock::Clock;
pub use notifier::{NotificationError, SignatureRequest, SignedConfirmation, VariationNotifier};
pub use project_repository::ProjectRepository;
pub use session_validator::SessionValidator;
pub use signature_token_index::{SignatureTokenIndex, TokenIndexError, TokenLocation};
pub use token_generator::TokenGenerator;

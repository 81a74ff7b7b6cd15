//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Writes go through [`ProjectWriter`]; side effects that may fail without
//! failing the request (token indexing, notifications) happen after commit.

pub mod aggregate_writer;
pub mod handlers;
pub mod notifications;
pub mod signature_tokens;

pub use aggregate_writer::{ProjectWriter, DEFAULT_MAX_CONFLICT_RETRIES};
pub use notifications::{DispatchMode, NotificationDispatcher, DEFAULT_NOTIFICATION_TIMEOUT};
pub use signature_tokens::{location, signing_url, SignatureTokenService, DEFAULT_TOKEN_TTL_HOURS};

pub use handlers::{
    // Project handlers
    CreateProjectCommand, CreateProjectHandler,
    GetProjectHandler, GetProjectQuery,
    ListProjectsHandler, ListProjectsQuery,
    // Variation handlers
    CreateVariationCommand, CreateVariationHandler, CreateVariationResult,
    DeleteVariationCommand, DeleteVariationHandler,
    EditVariationCommand, EditVariationHandler,
    SignVariationCommand, SignVariationHandler, SignVariationResult,
    SubmitVariationCommand, SubmitVariationHandler, SubmitVariationResult,
    ValidateSignatureTokenHandler, ValidateSignatureTokenQuery, ValidatedSignatureToken,
    VariationFields,
};

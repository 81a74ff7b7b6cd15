//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod project;
pub mod variation;

pub use project::{
    CreateProjectCommand, CreateProjectHandler, GetProjectHandler, GetProjectQuery,
    ListProjectsHandler, ListProjectsQuery,
};
pub use variation::{
    CreateVariationCommand, CreateVariationHandler, CreateVariationResult,
    DeleteVariationCommand, DeleteVariationHandler, EditVariationCommand, EditVariationHandler,
    SignVariationCommand, SignVariationHandler, SignVariationResult, SubmitVariationCommand,
    SubmitVariationHandler, SubmitVariationResult, ValidateSignatureTokenHandler,
    ValidateSignatureTokenQuery, ValidatedSignatureToken, VariationFields,
};

//! Project domain module.
//!
//! Projects are construction contracts. Each owns an ordered list of
//! variations (change orders) that move through the lifecycle
//! `draft -> submitted -> approved`, with the approval step performed by
//! the client through a single-use signature token.
//!
//! The contract price shown to users is always derived by
//! [`reconcile_contract_price`]; nothing adjusts it incrementally.

mod aggregate;
mod errors;
mod mutation_policy;
mod pricing;
mod signature_token;
mod variation;
mod variation_status;

pub use aggregate::{ClientContact, Project, MAX_NAME_LENGTH, MAX_VARIATIONS};
pub use errors::VariationError;
pub use mutation_policy::VariationMutationPolicy;
pub use pricing::reconcile_contract_price;
pub use signature_token::{SignatureToken, TokenGrant, MAX_TOKEN_LENGTH, MIN_TOKEN_LENGTH};
pub use variation::{
    Signatory, SignerContext, Variation, VariationDetails, MAX_DELAY_DAYS, MAX_SIGNER_NAME_LENGTH,
    MAX_TEXT_LENGTH, MAX_USER_AGENT_LENGTH,
};
pub use variation_status::{VariationStatus, VARIATION_TRANSITIONS};

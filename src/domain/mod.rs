//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, state machine)
//! - `project` - Project aggregate, variation lifecycle, price reconciliation
//!   and signature tokens

pub mod foundation;
pub mod project;

//! PostgreSQL adapters.
//!
//! - `PostgresProjectRepository` - Versioned project storage with JSONB variations

mod project_repository;

pub use project_repository::PostgresProjectRepository;

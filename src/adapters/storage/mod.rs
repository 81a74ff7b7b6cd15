//! Storage adapters.
//!
//! - `InMemoryProjectRepository` - Project storage for tests and local runs

mod in_memory_project_repository;

pub use in_memory_project_repository::InMemoryProjectRepository;

//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `auth` - Bearer token validation (JWT, mock)
//! - `http` - axum REST API
//! - `notifier` - Client and owner notifications (Resend, logging, recording)
//! - `postgres` - Project storage in PostgreSQL
//! - `storage` - In-memory project storage
//! - `system` - Clock and token randomness
//! - `token_index` - Signature token lookup (in-memory, Redis)

pub mod auth;
pub mod http;
pub mod notifier;
pub mod postgres;
pub mod storage;
pub mod system;
pub mod token_index;

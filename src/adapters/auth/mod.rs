//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwt` - HS256 bearer tokens checked against issuer and audience
//! - `mock` - Fixed token map for tests

mod jwt;
mod mock;

pub use jwt::{JwtSessionValidator, OwnerClaims};
pub use mock::MockSessionValidator;

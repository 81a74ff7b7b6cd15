//! System adapters: time and randomness.

mod clock;
mod token_generator;

pub use clock::{FixedClock, SystemClock};
pub use token_generator::{OsRngTokenGenerator, SequentialTokenGenerator, TOKEN_BYTES};

//! Variation notifier adapters.
//!
//! - `ResendNotifier` - Email via the Resend HTTP API
//! - `LoggingNotifier` - Log lines only, when email is not configured
//! - `RecordingNotifier` - In-memory capture for tests

mod logging;
mod recording;
mod resend;

pub use logging::LoggingNotifier;
pub use recording::RecordingNotifier;
pub use resend::{ResendConfig, ResendNotifier};

//! Clock port.

use crate::domain::foundation::Timestamp;

/// Source of the current time. Injected so expiry can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

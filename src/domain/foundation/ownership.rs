//! Ownership trait for user-owned aggregates.
//!
//! Owner-only operations call `check_ownership` before touching the
//! aggregate, so every handler reports a non-owner the same way.
//!
//! # Example
//!
//! ```ignore
//! impl OwnedByUser for Project {
//!     fn owner_id(&self) -> &UserId {
//!         &self.owner_id
//!     }
//! }
//!
//! project.check_ownership(&metadata.user_id)?; // Err(Forbidden) if not owner
//! ```

use super::{DomainError, ErrorCode, UserId};

/// Trait for aggregates that have a single owner.
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this resource.
    fn owner_id(&self) -> &UserId;

    /// Checks if the given user is the owner.
    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }

    /// Validates ownership, returning a `Forbidden` error if the user is not
    /// the owner.
    fn check_ownership(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "User does not own this resource",
            )
            .with_detail("requested_by", user_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestResource {
        owner: UserId,
    }

    impl OwnedByUser for TestResource {
        fn owner_id(&self) -> &UserId {
            &self.owner
        }
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn check_ownership_succeeds_for_owner() {
        let resource = TestResource { owner: user("owner-123") };
        assert!(resource.is_owner(&user("owner-123")));
        assert!(resource.check_ownership(&user("owner-123")).is_ok());
    }

    #[test]
    fn check_ownership_fails_for_non_owner() {
        let resource = TestResource { owner: user("owner-123") };

        let err = resource.check_ownership(&user("other-456")).unwrap_err();

        assert_eq!(err.code, ErrorCode::Forbidden);
        assert_eq!(err.details.get("requested_by"), Some(&"other-456".to_string()));
        assert!(!err.details.contains_key("owner_id"));
    }
}

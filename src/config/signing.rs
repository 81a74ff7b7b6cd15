//! Variation signing workflow configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::project::VariationMutationPolicy;

use super::error::ValidationError;
use super::server::Environment;

/// Signing link, mutation policy and notification settings
#[derive(Debug, Clone, Deserialize)]
pub struct SigningConfig {
    /// Signature token lifetime in hours
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    /// Base URL of the client-facing app; links are `{base}/sign?token=...`
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Comma-separated statuses in which a variation may be edited
    #[serde(default = "default_editable_statuses")]
    pub editable_statuses: String,

    /// Comma-separated statuses in which a variation may be deleted
    #[serde(default = "default_deletable_statuses")]
    pub deletable_statuses: String,

    /// Attempts made when a project write loses a version race
    #[serde(default = "default_max_conflict_retries")]
    pub max_conflict_retries: u32,

    /// Upper bound on a single notification delivery
    #[serde(default = "default_notification_timeout")]
    pub notification_timeout_secs: u64,

    /// Await notifications before responding instead of spawning them
    #[serde(default)]
    pub inline_notifications: bool,
}

impl SigningConfig {
    /// Token lifetime as a chrono Duration
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }

    /// Notification timeout as Duration
    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    /// Edit/delete policy parsed from the status lists
    pub fn mutation_policy(&self) -> Result<VariationMutationPolicy, ValidationError> {
        VariationMutationPolicy::from_lists(&self.editable_statuses, &self.deletable_statuses)
            .map_err(|e| ValidationError::InvalidStatusList {
                setting: "editable_statuses/deletable_statuses",
                reason: e.to_string(),
            })
    }

    /// Validate signing configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if !(1..=720).contains(&self.token_ttl_hours) {
            return Err(ValidationError::InvalidTokenTtl);
        }
        let url = self.public_base_url.as_str();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidPublicBaseUrl);
        }
        if *environment == Environment::Production && !url.starts_with("https://") {
            return Err(ValidationError::PublicBaseUrlMustBeHttps);
        }
        if !(1..=10).contains(&self.max_conflict_retries) {
            return Err(ValidationError::InvalidConflictRetries);
        }
        if !(1..=120).contains(&self.notification_timeout_secs) {
            return Err(ValidationError::InvalidNotificationTimeout);
        }
        self.mutation_policy()?;
        Ok(())
    }
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl_hours(),
            public_base_url: default_public_base_url(),
            editable_statuses: default_editable_statuses(),
            deletable_statuses: default_deletable_statuses(),
            max_conflict_retries: default_max_conflict_retries(),
            notification_timeout_secs: default_notification_timeout(),
            inline_notifications: false,
        }
    }
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_public_base_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_editable_statuses() -> String {
    "draft".to_string()
}

fn default_deletable_statuses() -> String {
    "draft,submitted".to_string()
}

fn default_max_conflict_retries() -> u32 {
    3
}

fn default_notification_timeout() -> u64 {
    10
}

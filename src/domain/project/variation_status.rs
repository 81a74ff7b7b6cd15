//! VariationStatus enum and the variation transition table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, Transition, ValidationError};

/// Lifecycle status of a variation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VariationStatus {
    #[default]
    Draft,
    Submitted,
    Approved,
    /// Declared for completeness. No operation produces it yet.
    Rejected,
}

/// Every legal variation transition. Handlers never test statuses ad hoc.
pub const VARIATION_TRANSITIONS: &[Transition<VariationStatus>] = &[
    Transition {
        from: VariationStatus::Draft,
        to: VariationStatus::Submitted,
        trigger: "owner sends the variation for signature",
    },
    Transition {
        from: VariationStatus::Submitted,
        to: VariationStatus::Approved,
        trigger: "client signs with a valid signature token",
    },
    // Reserved edge: rejection has no triggering operation until the
    // product defines one.
    Transition {
        from: VariationStatus::Submitted,
        to: VariationStatus::Rejected,
        trigger: "unassigned",
    },
];

impl StateMachine for VariationStatus {
    fn transitions() -> &'static [Transition<Self>] {
        VARIATION_TRANSITIONS
    }
}

impl VariationStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [VariationStatus; 4] = [
        VariationStatus::Draft,
        VariationStatus::Submitted,
        VariationStatus::Approved,
        VariationStatus::Rejected,
    ];

    /// Only approved variations move the contract price.
    pub fn counts_toward_price(&self) -> bool {
        matches!(self, VariationStatus::Approved)
    }

    /// Returns the snake_case name used on the wire and in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariationStatus::Draft => "draft",
            VariationStatus::Submitted => "submitted",
            VariationStatus::Approved => "approved",
            VariationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for VariationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VariationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        VariationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == needle)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "variation_status",
                    format!("unknown status '{}'", s.trim()),
                )
            })
    }
}

//! Which variation statuses allow owner edits and deletions.
//!
//! Whether an approved variation may be edited or removed is a product
//! decision that has not been made. The rule lives here, behind
//! configuration, rather than inside the state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::{VariationError, VariationStatus};

/// Status allow-lists for owner edit and delete operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationMutationPolicy {
    editable: Vec<VariationStatus>,
    deletable: Vec<VariationStatus>,
}

impl VariationMutationPolicy {
    pub fn new(editable: Vec<VariationStatus>, deletable: Vec<VariationStatus>) -> Self {
        Self { editable, deletable }
    }

    /// Builds a policy from comma-separated status lists.
    ///
    /// An empty list is allowed and disables the operation entirely.
    pub fn from_lists(editable: &str, deletable: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(parse_list(editable)?, parse_list(deletable)?))
    }

    /// Every status may be edited and deleted.
    pub fn unrestricted() -> Self {
        Self::new(VariationStatus::ALL.to_vec(), VariationStatus::ALL.to_vec())
    }

    pub fn can_edit(&self, status: VariationStatus) -> bool {
        self.editable.contains(&status)
    }

    pub fn can_delete(&self, status: VariationStatus) -> bool {
        self.deletable.contains(&status)
    }

    pub fn ensure_editable(&self, status: VariationStatus) -> Result<(), VariationError> {
        if self.can_edit(status) {
            Ok(())
        } else {
            Err(VariationError::OperationNotAllowed {
                operation: "edit",
                status,
            })
        }
    }

    pub fn ensure_deletable(&self, status: VariationStatus) -> Result<(), VariationError> {
        if self.can_delete(status) {
            Ok(())
        } else {
            Err(VariationError::OperationNotAllowed {
                operation: "delete",
                status,
            })
        }
    }
}

impl Default for VariationMutationPolicy {
    /// Edit only drafts; delete drafts and unsigned submissions.
    fn default() -> Self {
        Self::new(
            vec![VariationStatus::Draft],
            vec![VariationStatus::Draft, VariationStatus::Submitted],
        )
    }
}

fn parse_list(raw: &str) -> Result<Vec<VariationStatus>, ValidationError> {
    let mut statuses = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let status: VariationStatus = part.parse()?;
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }
    Ok(statuses)
}

//! Table-driven state machine trait for status enums.
//!
//! A status enum declares its legal edges once, as a static slice of
//! [`Transition`] rows. Every legality question (can this move happen, what
//! comes next, is this state terminal) is answered from that table, so no
//! handler re-derives lifecycle rules on its own.

use std::fmt;

use super::ValidationError;

/// One legal edge of a lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S: 'static> {
    pub from: S,
    pub to: S,
    /// What causes the edge to be taken, for diagnostics.
    pub trigger: &'static str,
}

/// Trait for status enums that represent state machines.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for VariationStatus {
///     fn transitions() -> &'static [Transition<Self>] {
///         VARIATION_TRANSITIONS
///     }
/// }
///
/// let next = VariationStatus::Draft.transition_to(VariationStatus::Submitted)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + fmt::Debug + 'static {
    /// The complete transition table.
    fn transitions() -> &'static [Transition<Self>];

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        Self::transitions()
            .iter()
            .any(|t| t.from == *self && t.to == *target)
    }

    /// Returns all valid target states from current state, in table order.
    fn valid_transitions(&self) -> Vec<Self> {
        Self::transitions()
            .iter()
            .filter(|t| t.from == *self)
            .map(|t| t.to)
            .collect()
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

//! Variation entity and its value objects.
//!
//! A variation is owned by exactly one project and is only ever mutated
//! through the project aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, StateMachine, Timestamp, ValidationError, VariationId};

use super::{SignatureToken, TokenGrant, VariationError, VariationStatus};

/// Maximum length of each descriptive text field.
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Maximum schedule delay a single variation may claim (ten years).
pub const MAX_DELAY_DAYS: u32 = 3_650;

/// Maximum length of a signer's name.
pub const MAX_SIGNER_NAME_LENGTH: usize = 200;

/// User agents are truncated to this many characters before storage.
pub const MAX_USER_AGENT_LENGTH: usize = 512;

/// Descriptive business fields of a variation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationDetails {
    description: String,
    reason: String,
    effect: String,
    permit_required: bool,
    delay_days: u32,
}

impl VariationDetails {
    /// Validates and builds the descriptive fields.
    ///
    /// # Errors
    ///
    /// - `EmptyField` for blank `description`, `reason` or `effect`
    /// - `OutOfRange` for overlong text or `delay_days` above the cap
    pub fn new(
        description: impl Into<String>,
        reason: impl Into<String>,
        effect: impl Into<String>,
        permit_required: bool,
        delay_days: u32,
    ) -> Result<Self, ValidationError> {
        let description = required_text("description", description.into())?;
        let reason = required_text("reason", reason.into())?;
        let effect = required_text("effect", effect.into())?;
        if delay_days > MAX_DELAY_DAYS {
            return Err(ValidationError::out_of_range(
                "delay_days",
                0,
                MAX_DELAY_DAYS as i64,
                delay_days as i64,
            ));
        }
        Ok(Self {
            description,
            reason,
            effect,
            permit_required,
            delay_days,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn effect(&self) -> &str {
        &self.effect
    }

    pub fn permit_required(&self) -> bool {
        self.permit_required
    }

    pub fn delay_days(&self) -> u32 {
        self.delay_days
    }
}

fn required_text(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let chars = trimmed.chars().count();
    if chars > MAX_TEXT_LENGTH {
        return Err(ValidationError::out_of_range(
            field,
            1,
            MAX_TEXT_LENGTH as i64,
            chars as i64,
        ));
    }
    Ok(trimmed.to_string())
}

/// Where a signature came from, captured from the signing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignerContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Audit record of who signed a variation and from where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatory {
    pub name: String,
    pub email: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl Signatory {
    /// Builds a signatory from the signer's own details and request context.
    pub fn from_context(
        name: impl Into<String>,
        email: Option<String>,
        context: SignerContext,
    ) -> Result<Self, ValidationError> {
        Self::new(name, email, context.ip_address, context.user_agent)
    }

    /// Builds a signatory from client input and request context.
    pub fn new(
        name: impl Into<String>,
        email: Option<String>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::empty_field("signed_by.name"));
        }
        let name_chars = name.chars().count();
        if name_chars > MAX_SIGNER_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                "signed_by.name",
                1,
                MAX_SIGNER_NAME_LENGTH as i64,
                name_chars as i64,
            ));
        }

        let email = email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        if let Some(email) = &email {
            if !email.contains('@') {
                return Err(ValidationError::invalid_format(
                    "signed_by.email",
                    "missing @ symbol",
                ));
            }
        }

        let user_agent = user_agent.map(|ua| ua.chars().take(MAX_USER_AGENT_LENGTH).collect());

        Ok(Self {
            name: name.to_string(),
            email,
            ip_address: ip_address.filter(|ip| !ip.trim().is_empty()),
            user_agent,
        })
    }
}

/// A change order against a project's contract.
///
/// # Invariants
///
/// - `signature_token` and `signature_token_expires_at` are both set or both
///   unset, and set only while `status == Submitted`
/// - `signed_at`/`signed_by` are written once, on the move to `Approved`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    id: VariationId,
    number: u32,
    #[serde(flatten)]
    details: VariationDetails,
    #[serde(rename = "cost_cents")]
    cost: Money,
    status: VariationStatus,
    signature_token: Option<SignatureToken>,
    signature_token_expires_at: Option<Timestamp>,
    signed_at: Option<Timestamp>,
    signed_by: Option<Signatory>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Variation {
    pub(crate) fn new_draft(
        id: VariationId,
        number: u32,
        details: VariationDetails,
        cost: Money,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            number,
            details,
            cost,
            status: VariationStatus::Draft,
            signature_token: None,
            signature_token_expires_at: None,
            signed_at: None,
            signed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> VariationId {
        self.id
    }

    /// 1-based display number within the project.
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn details(&self) -> &VariationDetails {
        &self.details
    }

    pub fn cost(&self) -> Money {
        self.cost
    }

    pub fn status(&self) -> VariationStatus {
        self.status
    }

    pub fn signature_token(&self) -> Option<&SignatureToken> {
        self.signature_token.as_ref()
    }

    pub fn signature_token_expires_at(&self) -> Option<&Timestamp> {
        self.signature_token_expires_at.as_ref()
    }

    pub fn signed_at(&self) -> Option<&Timestamp> {
        self.signed_at.as_ref()
    }

    pub fn signed_by(&self) -> Option<&Signatory> {
        self.signed_by.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// True if this variation holds `token` and it has not expired at `now`.
    pub fn has_live_token(&self, token: &SignatureToken, now: &Timestamp) -> bool {
        self.holds_token(token)
            && self
                .signature_token_expires_at
                .map_or(false, |expires_at| !now.is_after(&expires_at))
    }

    fn holds_token(&self, token: &SignatureToken) -> bool {
        self.signature_token
            .as_ref()
            .map_or(false, |held| held.matches(token))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations (called by the Project aggregate only)
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) fn revise(&mut self, details: VariationDetails, cost: Money, now: Timestamp) {
        self.details = details;
        self.cost = cost;
        self.updated_at = now;
    }

    pub(crate) fn submit(&mut self, grant: TokenGrant, now: Timestamp) -> Result<(), VariationError> {
        self.status = self.advance(VariationStatus::Submitted)?;
        self.signature_token = Some(grant.token);
        self.signature_token_expires_at = Some(grant.expires_at);
        self.updated_at = now;
        Ok(())
    }

    /// Approves the variation, consuming the token.
    ///
    /// Checks run in a fixed order: status first, then token possession,
    /// then expiry, so a consumed token can never look merely expired.
    ///
    /// `AlreadySigned` and `NotReadyForSignature` guard direct calls only.
    /// [`Project::sign_variation`](super::Project::sign_variation) finds the
    /// variation by its token, and a token exists only while the variation
    /// is submitted, so a signing link never surfaces either error; a reused
    /// link reports `TokenInvalidOrExpired` instead.
    pub(crate) fn sign(
        &mut self,
        token: &SignatureToken,
        signatory: Signatory,
        now: Timestamp,
    ) -> Result<(), VariationError> {
        match self.status {
            VariationStatus::Submitted => {}
            VariationStatus::Approved => return Err(VariationError::AlreadySigned),
            other => return Err(VariationError::NotReadyForSignature(other)),
        }
        if !self.holds_token(token) {
            return Err(VariationError::TokenInvalidOrExpired);
        }
        if !self.has_live_token(token, &now) {
            return Err(VariationError::TokenExpired);
        }

        self.status = self.advance(VariationStatus::Approved)?;
        self.signed_at = Some(now);
        self.signed_by = Some(signatory);
        self.signature_token = None;
        self.signature_token_expires_at = None;
        self.updated_at = now;
        Ok(())
    }

    fn advance(&self, to: VariationStatus) -> Result<VariationStatus, VariationError> {
        self.status
            .transition_to(to)
            .map_err(|_| VariationError::InvalidTransition {
                from: self.status,
                to,
            })
    }
}

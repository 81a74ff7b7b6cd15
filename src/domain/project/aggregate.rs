//! Project aggregate.
//!
//! A project is a construction contract with a base price and the ordered
//! list of variations raised against it. It is the unit of consistency:
//! every variation change is a mutation of the project, followed by a full
//! price reconciliation, and is persisted as one versioned write.
//!
//! # Ownership
//!
//! Projects own their variations outright. A variation is addressed as
//! `(ProjectId, VariationId)` and never exists outside its project.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    Money, OwnedByUser, ProjectId, Timestamp, UserId, ValidationError, VariationId,
};

use super::{
    reconcile_contract_price, Signatory, SignatureToken, TokenGrant, Variation, VariationDetails,
    VariationError, VariationMutationPolicy,
};

/// Maximum length for a project or client name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Hard cap on variations per project. With `Money::MAX_ABS_CENTS` this
/// bounds every contract total well inside `i64`.
pub const MAX_VARIATIONS: usize = 10_000;

/// The contract counterparty who receives signing links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientContact {
    pub name: String,
    pub email: String,
}

impl ClientContact {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Result<Self, ValidationError> {
        let name = bounded_name("client.name", name.into())?;
        let email = email.into().trim().to_string();
        if email.is_empty() {
            return Err(ValidationError::empty_field("client.email"));
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid_format(
                "client.email",
                "missing @ symbol",
            ));
        }
        Ok(Self { name, email })
    }
}

fn bounded_name(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LENGTH {
        return Err(ValidationError::out_of_range(
            field,
            1,
            MAX_NAME_LENGTH as i64,
            len as i64,
        ));
    }
    Ok(trimmed.to_string())
}

/// Project aggregate root.
///
/// # Invariants
///
/// - `current_contract_price == reconcile_contract_price(contract_price, variations)`
///   after every public method returns
/// - `contract_price` never changes after creation
/// - variation numbers are unique and never reused
/// - at most [`MAX_VARIATIONS`] variations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    id: ProjectId,
    owner_id: UserId,
    name: String,
    client: ClientContact,
    contract_price: Money,
    current_contract_price: Money,
    variations: Vec<Variation>,
    /// Highest number ever assigned, so deleted numbers are not reissued.
    last_variation_number: u32,
    version: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Project {
    /// Creates an empty project.
    ///
    /// # Errors
    ///
    /// - `EmptyField`/`OutOfRange` for a blank or overlong name
    pub fn new(
        id: ProjectId,
        owner_id: UserId,
        name: impl Into<String>,
        client: ClientContact,
        contract_price: Money,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = bounded_name("name", name.into())?;
        Ok(Self {
            id,
            owner_id,
            name,
            client,
            contract_price,
            current_contract_price: contract_price,
            variations: Vec::new(),
            last_variation_number: 0,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a project from storage.
    ///
    /// The stored price total is not trusted; it is recomputed here.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ProjectId,
        owner_id: UserId,
        name: String,
        client: ClientContact,
        contract_price: Money,
        variations: Vec<Variation>,
        last_variation_number: u32,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        let last_variation_number = variations
            .iter()
            .map(Variation::number)
            .max()
            .unwrap_or(0)
            .max(last_variation_number);
        let mut project = Self {
            id,
            owner_id,
            name,
            client,
            contract_price,
            current_contract_price: contract_price,
            variations,
            last_variation_number,
            version,
            created_at,
            updated_at,
        };
        project.reconcile();
        project
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client(&self) -> &ClientContact {
        &self.client
    }

    pub fn contract_price(&self) -> Money {
        self.contract_price
    }

    pub fn current_contract_price(&self) -> Money {
        self.current_contract_price
    }

    /// Variations in insertion order.
    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    pub fn variation(&self, id: VariationId) -> Option<&Variation> {
        self.variations.iter().find(|v| v.id() == id)
    }

    /// Highest variation number ever assigned in this project.
    pub fn last_variation_number(&self) -> u32 {
        self.last_variation_number
    }

    /// Persistence stamp for compare-and-swap writes.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Finds the variation currently holding `token`, live or expired.
    pub fn find_by_signature_token(&self, token: &SignatureToken) -> Option<&Variation> {
        self.variations.iter().find(|v| {
            v.signature_token()
                .map_or(false, |held| held.matches(token))
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a draft variation and returns its id.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` once the project holds [`MAX_VARIATIONS`]
    pub fn add_variation(
        &mut self,
        details: VariationDetails,
        cost: Money,
        now: Timestamp,
    ) -> Result<VariationId, VariationError> {
        if self.variations.len() >= MAX_VARIATIONS {
            return Err(VariationError::validation(
                "variations",
                format!("a project holds at most {} variations", MAX_VARIATIONS),
            ));
        }
        let id = VariationId::new();
        self.last_variation_number += 1;
        self.variations.push(Variation::new_draft(
            id,
            self.last_variation_number,
            details,
            cost,
            now,
        ));
        self.touch(now);
        Ok(id)
    }

    /// Replaces a variation's descriptive fields and cost.
    ///
    /// A submitted variation keeps its token when the policy allows the edit.
    pub fn edit_variation(
        &mut self,
        id: VariationId,
        details: VariationDetails,
        cost: Money,
        policy: &VariationMutationPolicy,
        now: Timestamp,
    ) -> Result<(), VariationError> {
        let variation = self.variation_mut(id)?;
        policy.ensure_editable(variation.status())?;
        variation.revise(details, cost, now);
        self.touch(now);
        Ok(())
    }

    /// Removes a variation, returning it so callers can revoke its token.
    pub fn remove_variation(
        &mut self,
        id: VariationId,
        policy: &VariationMutationPolicy,
        now: Timestamp,
    ) -> Result<Variation, VariationError> {
        let index = self.position(id)?;
        policy.ensure_deletable(self.variations[index].status())?;
        let removed = self.variations.remove(index);
        self.touch(now);
        Ok(removed)
    }

    /// Sends a draft for signature with a freshly issued token.
    pub fn submit_variation(
        &mut self,
        id: VariationId,
        grant: TokenGrant,
        now: Timestamp,
    ) -> Result<(), VariationError> {
        self.variation_mut(id)?.submit(grant, now)?;
        self.touch(now);
        Ok(())
    }

    /// Signs the variation holding `token`.
    ///
    /// # Errors
    ///
    /// - `TokenInvalidOrExpired` if no variation in this project holds it
    /// - whatever [`Variation::sign`] reports otherwise
    pub fn sign_variation(
        &mut self,
        token: &SignatureToken,
        signatory: Signatory,
        now: Timestamp,
    ) -> Result<VariationId, VariationError> {
        let id = self
            .find_by_signature_token(token)
            .map(Variation::id)
            .ok_or(VariationError::TokenInvalidOrExpired)?;
        self.variation_mut(id)?.sign(token, signatory, now)?;
        self.touch(now);
        Ok(id)
    }

    /// Recomputes the derived contract price from scratch.
    pub fn reconcile(&mut self) {
        self.current_contract_price =
            reconcile_contract_price(self.contract_price, &self.variations);
    }

    /// Records the version the repository assigned to the last write.
    pub fn record_persisted_version(&mut self, version: u64) {
        self.version = version;
    }

    fn touch(&mut self, now: Timestamp) {
        self.reconcile();
        self.updated_at = now;
    }

    fn position(&self, id: VariationId) -> Result<usize, VariationError> {
        self.variations
            .iter()
            .position(|v| v.id() == id)
            .ok_or(VariationError::VariationNotFound(id))
    }

    fn variation_mut(&mut self, id: VariationId) -> Result<&mut Variation, VariationError> {
        let index = self.position(id)?;
        Ok(&mut self.variations[index])
    }
}

impl OwnedByUser for Project {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::VariationStatus;

    fn now() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    fn dollars(d: i64) -> Money {
        Money::try_from_dollars(d).unwrap()
    }

    fn project() -> Project {
        Project::new(
            ProjectId::new(),
            UserId::new("owner-1").unwrap(),
            "Harbour St renovation",
            ClientContact::new("Client Person", "client@example.com").unwrap(),
            dollars(450_000),
            now(),
        )
        .unwrap()
    }

    fn details() -> VariationDetails {
        VariationDetails::new("Extra steel", "Engineer change", "Two day delay", true, 2).unwrap()
    }

    fn grant(byte: u8) -> TokenGrant {
        TokenGrant {
            token: SignatureToken::from_random_bytes(&[byte; 32]),
            issued_at: now(),
            expires_at: now().plus_hours(24),
        }
    }

    fn signatory() -> Signatory {
        Signatory::new("Client Person", None, None, None).unwrap()
    }

    fn approve(project: &mut Project, cost: Money, byte: u8) -> VariationId {
        let id = project.add_variation(details(), cost, now()).unwrap();
        let grant = grant(byte);
        let token = grant.token.clone();
        project.submit_variation(id, grant, now()).unwrap();
        project.sign_variation(&token, signatory(), now()).unwrap();
        id
    }

    #[test]
    fn new_project_price_equals_base() {
        let p = project();
        assert_eq!(p.current_contract_price(), dollars(450_000));
        assert!(p.variations().is_empty());
        assert_eq!(p.version(), 0);
    }

    #[test]
    fn new_project_rejects_blank_name() {
        let result = Project::new(
            ProjectId::new(),
            UserId::new("owner-1").unwrap(),
            "  ",
            ClientContact::new("C", "c@example.com").unwrap(),
            Money::ZERO,
            now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn client_contact_requires_email() {
        assert!(ClientContact::new("C", "").is_err());
        assert!(ClientContact::new("C", "nope").is_err());
        assert!(ClientContact::new("", "c@example.com").is_err());
    }

    #[test]
    fn draft_variation_does_not_move_price() {
        let mut p = project();
        p.add_variation(details(), dollars(45_000), now()).unwrap();
        assert_eq!(p.current_contract_price(), dollars(450_000));
    }

    #[test]
    fn approved_debit_then_credit() {
        let mut p = project();
        approve(&mut p, dollars(2_500), 1);
        assert_eq!(p.current_contract_price(), dollars(452_500));

        approve(&mut p, dollars(-8_500), 2);
        assert_eq!(p.current_contract_price(), dollars(444_000));
    }

    #[test]
    fn numbers_are_sequential_and_never_reused() {
        let mut p = project();
        let policy = VariationMutationPolicy::default();
        let first = p.add_variation(details(), dollars(1), now()).unwrap();
        let second = p.add_variation(details(), dollars(1), now()).unwrap();
        p.remove_variation(second, &policy, now()).unwrap();
        let third = p.add_variation(details(), dollars(1), now()).unwrap();

        assert_eq!(p.variation(first).unwrap().number(), 1);
        assert_eq!(p.variation(third).unwrap().number(), 3);
    }

    #[test]
    fn reconstitute_recomputes_price_and_numbering() {
        let mut p = project();
        approve(&mut p, dollars(2_500), 1);
        let rebuilt = Project::reconstitute(
            p.id(),
            p.owner_id().clone(),
            p.name().to_string(),
            p.client().clone(),
            p.contract_price(),
            p.variations().to_vec(),
            0,
            7,
            *p.created_at(),
            *p.updated_at(),
        );
        assert_eq!(rebuilt.current_contract_price(), dollars(452_500));
        assert_eq!(rebuilt.version(), 7);
        assert_eq!(rebuilt.last_variation_number(), 1);
    }

    #[test]
    fn edit_respects_policy() {
        let mut p = project();
        let policy = VariationMutationPolicy::default();
        let id = p.add_variation(details(), dollars(10), now()).unwrap();

        p.edit_variation(id, details(), dollars(20), &policy, now()).unwrap();
        assert_eq!(p.variation(id).unwrap().cost(), dollars(20));

        p.submit_variation(id, grant(1), now()).unwrap();
        let err = p
            .edit_variation(id, details(), dollars(30), &policy, now())
            .unwrap_err();
        assert!(matches!(err, VariationError::OperationNotAllowed { operation: "edit", .. }));
    }

    #[test]
    fn editing_approved_variation_under_open_policy_reconciles() {
        let mut p = project();
        let id = approve(&mut p, dollars(2_500), 1);
        let policy = VariationMutationPolicy::unrestricted();

        p.edit_variation(id, details(), dollars(1_000), &policy, now()).unwrap();

        assert_eq!(p.current_contract_price(), dollars(451_000));
    }

    #[test]
    fn delete_approved_is_rejected_by_default() {
        let mut p = project();
        let id = approve(&mut p, dollars(2_500), 1);

        let err = p
            .remove_variation(id, &VariationMutationPolicy::default(), now())
            .unwrap_err();

        assert!(matches!(err, VariationError::OperationNotAllowed { operation: "delete", .. }));
        assert_eq!(p.current_contract_price(), dollars(452_500));
    }

    #[test]
    fn delete_submitted_returns_variation_with_token() {
        let mut p = project();
        let id = p.add_variation(details(), dollars(10), now()).unwrap();
        p.submit_variation(id, grant(4), now()).unwrap();

        let removed = p
            .remove_variation(id, &VariationMutationPolicy::default(), now())
            .unwrap();

        assert!(removed.signature_token().is_some());
        assert!(p.find_by_signature_token(&grant(4).token).is_none());
    }

    #[test]
    fn sign_with_unknown_token_is_invalid() {
        let mut p = project();
        let err = p
            .sign_variation(&grant(9).token, signatory(), now())
            .unwrap_err();
        assert_eq!(err, VariationError::TokenInvalidOrExpired);
    }

    #[test]
    fn consumed_token_no_longer_resolves() {
        let mut p = project();
        let id = p.add_variation(details(), dollars(10), now()).unwrap();
        let g = grant(3);
        p.submit_variation(id, g.clone(), now()).unwrap();
        p.sign_variation(&g.token, signatory(), now()).unwrap();

        assert!(p.find_by_signature_token(&g.token).is_none());
        assert_eq!(p.variation(id).unwrap().status(), VariationStatus::Approved);
        let err = p.sign_variation(&g.token, signatory(), now()).unwrap_err();
        assert_eq!(err, VariationError::TokenInvalidOrExpired);
    }

    #[test]
    fn missing_variation_is_not_found() {
        let mut p = project();
        let missing = VariationId::new();
        let err = p.submit_variation(missing, grant(1), now()).unwrap_err();
        assert_eq!(err, VariationError::VariationNotFound(missing));
    }

    #[test]
    fn ownership_check() {
        let p = project();
        assert!(p.check_ownership(&UserId::new("owner-1").unwrap()).is_ok());
        assert!(p.check_ownership(&UserId::new("intruder").unwrap()).is_err());
    }
}

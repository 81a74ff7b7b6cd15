//! Variation command and query handlers.
//!
//! Owner commands (create, edit, delete, submit) check ownership inside the
//! aggregate write so the check is repeated on every conflict retry. The
//! signing path has no acting user; the signature token is the credential.

mod create_variation;
mod delete_variation;
mod edit_variation;
mod sign_variation;
mod submit_variation;
mod validate_signature_token;

pub use create_variation::{CreateVariationCommand, CreateVariationHandler, CreateVariationResult};
pub use delete_variation::{DeleteVariationCommand, DeleteVariationHandler};
pub use edit_variation::{EditVariationCommand, EditVariationHandler};
pub use sign_variation::{SignVariationCommand, SignVariationHandler, SignVariationResult};
pub use submit_variation::{SubmitVariationCommand, SubmitVariationHandler, SubmitVariationResult};
pub use validate_signature_token::{
    ValidateSignatureTokenHandler, ValidateSignatureTokenQuery, ValidatedSignatureToken,
};

use crate::domain::foundation::Money;
use crate::domain::project::{VariationDetails, VariationError};

/// Owner-supplied variation fields, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationFields {
    pub description: String,
    pub reason: String,
    pub effect: String,
    pub permit_required: bool,
    pub delay_days: u32,
    pub cost_cents: i64,
}

impl VariationFields {
    pub fn into_domain(self) -> Result<(VariationDetails, Money), VariationError> {
        let details = VariationDetails::new(
            self.description,
            self.reason,
            self.effect,
            self.permit_required,
            self.delay_days,
        )?;
        let cost = Money::for_field("cost_cents", self.cost_cents)?;
        Ok((details, cost))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use chrono::Duration;

    use crate::adapters::notifier::RecordingNotifier;
    use crate::adapters::storage::InMemoryProjectRepository;
    use crate::adapters::system::{FixedClock, SequentialTokenGenerator};
    use crate::adapters::token_index::InMemoryTokenIndex;
    use crate::application::{
        DispatchMode, NotificationDispatcher, ProjectWriter, SignatureTokenService,
    };
    use crate::domain::foundation::{CommandMetadata, Money, ProjectId, Timestamp, UserId};
    use crate::domain::project::{ClientContact, Project};
    use crate::ports::ProjectRepository;

    use super::VariationFields;

    pub const OWNER: &str = "owner-1";
    pub const BASE_URL: &str = "https://app.example.com";

    pub fn start() -> Timestamp {
        Timestamp::from_unix_secs(1_700_000_000).unwrap()
    }

    pub struct Harness {
        pub repo: Arc<InMemoryProjectRepository>,
        pub clock: Arc<FixedClock>,
        pub index: Arc<InMemoryTokenIndex>,
        pub notifier: RecordingNotifier,
        pub writer: Arc<ProjectWriter>,
        pub tokens: Arc<SignatureTokenService>,
        pub dispatcher: NotificationDispatcher,
    }

    impl Harness {
        pub fn new() -> Self {
            let repo = Arc::new(InMemoryProjectRepository::new());
            let clock = Arc::new(FixedClock::new(start()));
            let index = Arc::new(InMemoryTokenIndex::new(clock.clone()));
            let notifier = RecordingNotifier::new();
            let writer = Arc::new(ProjectWriter::new(repo.clone(), 3));
            let tokens = Arc::new(
                SignatureTokenService::new(
                    repo.clone(),
                    Arc::new(SequentialTokenGenerator::new()),
                    clock.clone(),
                    Duration::hours(24),
                )
                .with_index(index.clone()),
            );
            let dispatcher = NotificationDispatcher::new(
                Arc::new(notifier.clone()),
                std::time::Duration::from_secs(5),
                DispatchMode::Inline,
            );
            Self {
                repo,
                clock,
                index,
                notifier,
                writer,
                tokens,
                dispatcher,
            }
        }

        pub fn metadata(&self) -> CommandMetadata {
            CommandMetadata::test_fixture(OWNER)
        }

        pub async fn project(&self, dollars: i64) -> Project {
            let project = Project::new(
                ProjectId::new(),
                UserId::new(OWNER).unwrap(),
                "Harbour St renovation",
                ClientContact::new("Client Person", "client@example.com").unwrap(),
                Money::try_from_dollars(dollars).unwrap(),
                start(),
            )
            .unwrap();
            self.repo.insert(&project).await.unwrap();
            project
        }

        pub async fn stored(&self, id: ProjectId) -> Project {
            self.repo.find_by_id(&id).await.unwrap().unwrap()
        }
    }

    pub fn fields(cost_cents: i64) -> VariationFields {
        VariationFields {
            description: "Add skylight".to_string(),
            reason: "Client request".to_string(),
            effect: "Two extra days".to_string(),
            permit_required: false,
            delay_days: 2,
            cost_cents,
        }
    }
}

//! Router assembly.
//!
//! Wires ports into application handlers and mounts every HTTP module:
//!
//! ```text
//! /health                      public
//! /api/projects/...            owner (bearer token)
//! /api/variations/...          public (signature token)
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Json, Router};

use crate::application::handlers::project::{
    CreateProjectHandler, GetProjectHandler, ListProjectsHandler,
};
use crate::application::handlers::variation::{
    CreateVariationHandler, DeleteVariationHandler, EditVariationHandler, SignVariationHandler,
    SubmitVariationHandler, ValidateSignatureTokenHandler,
};
use crate::application::{
    DispatchMode, NotificationDispatcher, ProjectWriter, SignatureTokenService,
    DEFAULT_MAX_CONFLICT_RETRIES, DEFAULT_NOTIFICATION_TIMEOUT, DEFAULT_TOKEN_TTL_HOURS,
};
use crate::domain::project::VariationMutationPolicy;
use crate::ports::{
    Clock, ProjectRepository, SessionValidator, SignatureTokenIndex, TokenGenerator,
    VariationNotifier,
};

use super::middleware::{auth_middleware, AuthState};
use super::project::{project_routes, ProjectHandlers};
use super::signing::{signing_routes, SigningHandlers};
use super::variation::{variation_routes, VariationHandlers};

/// Port implementations the API runs on.
#[derive(Clone)]
pub struct ApiServices {
    pub repository: Arc<dyn ProjectRepository>,
    pub token_index: Option<Arc<dyn SignatureTokenIndex>>,
    pub notifier: Arc<dyn VariationNotifier>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub clock: Arc<dyn Clock>,
    pub token_generator: Arc<dyn TokenGenerator>,
}

/// Runtime settings for the variation workflow.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub public_base_url: String,
    pub token_ttl: chrono::Duration,
    pub mutation_policy: VariationMutationPolicy,
    pub max_conflict_retries: u32,
    pub notification_timeout: Duration,
    pub dispatch_mode: DispatchMode,
    /// Take the signer's address from `X-Forwarded-For`/`X-Real-IP`.
    /// Only safe behind a proxy that overwrites those headers.
    pub trust_proxy_headers: bool,
}

impl ApiSettings {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into(),
            token_ttl: chrono::Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            mutation_policy: VariationMutationPolicy::default(),
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
            dispatch_mode: DispatchMode::Detached,
            trust_proxy_headers: true,
        }
    }

    pub fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch_mode = mode;
        self
    }

    pub fn with_trust_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    pub fn with_mutation_policy(mut self, policy: VariationMutationPolicy) -> Self {
        self.mutation_policy = policy;
        self
    }
}

/// Builds the full API router.
pub fn api_router(services: ApiServices, settings: ApiSettings) -> Router {
    let writer = Arc::new(ProjectWriter::new(
        services.repository.clone(),
        settings.max_conflict_retries,
    ));

    let mut tokens = SignatureTokenService::new(
        services.repository.clone(),
        services.token_generator.clone(),
        services.clock.clone(),
        settings.token_ttl,
    );
    if let Some(index) = services.token_index.clone() {
        tokens = tokens.with_index(index);
    }
    let tokens = Arc::new(tokens);

    let dispatcher = NotificationDispatcher::new(
        services.notifier.clone(),
        settings.notification_timeout,
        settings.dispatch_mode,
    );

    let projects = ProjectHandlers::new(
        Arc::new(CreateProjectHandler::new(
            services.repository.clone(),
            services.clock.clone(),
        )),
        Arc::new(GetProjectHandler::new(writer.clone())),
        Arc::new(ListProjectsHandler::new(services.repository.clone())),
    );

    let variations = VariationHandlers::new(
        Arc::new(CreateVariationHandler::new(writer.clone(), services.clock.clone())),
        Arc::new(EditVariationHandler::new(
            writer.clone(),
            services.clock.clone(),
            settings.mutation_policy.clone(),
        )),
        Arc::new(DeleteVariationHandler::new(
            writer.clone(),
            tokens.clone(),
            services.clock.clone(),
            settings.mutation_policy.clone(),
        )),
        Arc::new(SubmitVariationHandler::new(
            writer.clone(),
            tokens.clone(),
            dispatcher.clone(),
            settings.public_base_url.clone(),
        )),
    );

    let signing = SigningHandlers::new(
        Arc::new(ValidateSignatureTokenHandler::new(tokens.clone())),
        Arc::new(SignVariationHandler::new(
            writer,
            tokens,
            dispatcher,
            services.clock.clone(),
        )),
        settings.trust_proxy_headers,
    );

    let auth_state: AuthState = services.session_validator;
    let owner_api = project_routes(projects)
        .merge(variation_routes(variations))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest("/api/projects", owner_api)
        .nest("/api/variations", signing_routes(signing))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

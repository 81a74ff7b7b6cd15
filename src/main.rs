//! Variation Ledger HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use variation_ledger::adapters::auth::JwtSessionValidator;
use variation_ledger::adapters::http::{api_router, ApiServices, ApiSettings};
use variation_ledger::adapters::notifier::{LoggingNotifier, ResendConfig, ResendNotifier};
use variation_ledger::adapters::postgres::PostgresProjectRepository;
use variation_ledger::adapters::system::{OsRngTokenGenerator, SystemClock};
use variation_ledger::adapters::token_index::{InMemoryTokenIndex, RedisTokenIndex};
use variation_ledger::application::DispatchMode;
use variation_ledger::config::{AppConfig, RedisConfig, ServerConfig};
use variation_ledger::ports::{Clock, SignatureTokenIndex, VariationNotifier};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let token_index: Arc<dyn SignatureTokenIndex> = match &config.redis {
        Some(redis) => Arc::new(redis_index(redis, clock.clone()).await?),
        None => {
            tracing::info!("No Redis configured, using in-process signature token index");
            Arc::new(InMemoryTokenIndex::new(clock.clone()))
        }
    };

    let notifier: Arc<dyn VariationNotifier> = match &config.email.resend_api_key {
        Some(key) => {
            use secrecy::ExposeSecret;
            Arc::new(ResendNotifier::new(
                ResendConfig::new(key.expose_secret().clone(), config.email.from_header())
                    .with_api_base_url(config.email.api_base_url.clone()),
            ))
        }
        None => {
            tracing::warn!("No Resend API key configured, notifications will only be logged");
            Arc::new(LoggingNotifier)
        }
    };

    let services = ApiServices {
        repository: Arc::new(PostgresProjectRepository::new(pool)),
        token_index: Some(token_index),
        notifier,
        session_validator: Arc::new(JwtSessionValidator::new(
            config.auth.secret_bytes(),
            config.auth.jwt_issuer.clone(),
            config.auth.jwt_audience.clone(),
        )),
        clock,
        token_generator: Arc::new(OsRngTokenGenerator),
    };

    let signing = &config.signing;
    let settings = ApiSettings {
        public_base_url: signing.public_base_url.clone(),
        token_ttl: signing.token_ttl(),
        mutation_policy: signing.mutation_policy()?,
        max_conflict_retries: signing.max_conflict_retries,
        notification_timeout: signing.notification_timeout(),
        dispatch_mode: if signing.inline_notifications {
            DispatchMode::Inline
        } else {
            DispatchMode::Detached
        },
        trust_proxy_headers: config.server.trust_proxy_headers,
    };

    let app = api_router(services, settings).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(config.server.request_timeout()))
            .layer(CompressionLayer::new())
            .layer(cors_layer(&config.server)),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "variation-ledger listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.as_str()));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn redis_index(config: &RedisConfig, clock: Arc<dyn Clock>) -> Result<RedisTokenIndex, BoxError> {
    let client = redis::Client::open(config.url.as_str())?;
    let conn = tokio::time::timeout(config.timeout(), client.get_multiplexed_async_connection())
        .await
        .map_err(|_| "timed out connecting to Redis")??;
    tracing::info!("Signature token index backed by Redis");
    Ok(RedisTokenIndex::new(conn, clock))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}

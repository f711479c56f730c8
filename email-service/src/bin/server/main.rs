use std::sync::Arc;

use auth::Authenticator;
use email_service::config::Config;
use email_service::domain::account::service::AccountService;
use email_service::domain::email::pipeline::GenerationPipeline;
use email_service::domain::email::service::EmailService;
use email_service::inbound::http::router::create_router;
use email_service::inbound::http::router::AppState;
use email_service::outbound::inference::HuggingFaceTextGenerator;
use email_service::outbound::repositories::PostgresEmailHistoryRepository;
use email_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "email_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "email-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        translation_url = %config.inference.translation_url,
        formatting_url = %config.inference.formatting_url,
        timeout_seconds = config.inference.timeout_seconds,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret.as_bytes()).with_default_token_ttl(
            chrono::Duration::minutes(config.jwt.default_ttl_minutes),
        ),
    );

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let history_repository = Arc::new(PostgresEmailHistoryRepository::new(pg_pool));

    let http_client = reqwest::Client::builder()
        .timeout(config.inference.timeout())
        .build()?;
    let translator = Arc::new(HuggingFaceTextGenerator::new(
        http_client.clone(),
        config.inference.translation_url.clone(),
        config.inference.api_token.clone(),
        config.inference.timeout(),
    ));
    let formatter = Arc::new(HuggingFaceTextGenerator::new(
        http_client,
        config.inference.formatting_url.clone(),
        config.inference.api_token.clone(),
        config.inference.timeout(),
    ));

    let pipeline = GenerationPipeline::new(translator, formatter)
        .with_max_new_tokens(config.inference.max_new_tokens)
        .with_stage_timeout(config.inference.timeout());

    let account_service = Arc::new(AccountService::new(
        user_repository,
        Arc::clone(&authenticator),
    ));
    let email_service = Arc::new(EmailService::new(pipeline, history_repository));

    let state = AppState::new(
        account_service,
        email_service,
        authenticator,
        chrono::Duration::minutes(config.jwt.login_ttl_minutes),
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state, &config.server.allowed_origins);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}

use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use authgate::{
  adapters::http::{AuthDependencies, RequestIdMiddleware, configure_auth_routes},
  domain::auth::ports::{AuthDatasource, GoogleIdentityVerifier, PasswordHasher},
  infrastructure::{
    config::{Config, DatabaseConfig},
    persistence::{AuthRepositoryImpl, InMemoryAuthDatasource, PostgresAuthDatasource},
    security::{
      Argon2PasswordHasher, GoogleTokenInfoVerifier, JwtAdapter, UnconfiguredGoogleVerifier,
    },
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "authgate=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting authgate");

  let config = Config::load().context("Failed to load configuration")?;
  tracing::info!("Configuration loaded successfully");

  let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::with_cost(
    config.security.hash_cost(),
  )?);

  let datasource: Arc<dyn AuthDatasource> = match &config.database {
    Some(database) => Arc::new(PostgresAuthDatasource::new(
      connect_database(database).await?,
      password_hasher,
    )),
    None => {
      tracing::warn!("No database configured, users are kept in memory");
      Arc::new(InMemoryAuthDatasource::new(password_hasher))
    }
  };

  let jwt = Arc::new(JwtAdapter::new(
    &config.security.jwt_secret,
    config.security.token_ttl_seconds,
  )?);

  let google_verifier: Arc<dyn GoogleIdentityVerifier> = match &config.google {
    Some(google) => Arc::new(GoogleTokenInfoVerifier::new(
      google.client_id.clone(),
      google.tokeninfo_url.clone(),
      Duration::from_secs(google.request_timeout_seconds),
    )?),
    None => {
      tracing::info!("Google sign-in is not configured");
      Arc::new(UnconfiguredGoogleVerifier)
    }
  };

  let auth_deps = AuthDependencies {
    repository: Arc::new(AuthRepositoryImpl::new(datasource)),
    token_issuer: jwt.clone(),
    token_verifier: jwt,
    google_verifier,
  };

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    App::new()
      // Add request ID middleware
      .wrap(RequestIdMiddleware::new())
      // Add logging middleware
      .wrap(Logger::default())
      .service(
        web::scope("/api/auth").configure(|cfg| configure_auth_routes(cfg, auth_deps.clone())),
      )
      // Health check endpoint
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await?;

  Ok(())
}

/// Connect to PostgreSQL and apply pending migrations
async fn connect_database(database: &DatabaseConfig) -> anyhow::Result<sqlx::PgPool> {
  tracing::info!("Connecting to database");

  let pool = tokio::time::timeout(
    Duration::from_secs(database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(database.max_connections)
      .acquire_timeout(Duration::from_secs(database.acquire_timeout_seconds))
      .connect(&database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      database.connect_timeout_seconds
    );
    anyhow::anyhow!(
      "Database connection timed out after {} seconds",
      database.connect_timeout_seconds
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    e
  })
  .context("Could not connect to database")?;

  tracing::info!("Database connection pool created");

  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  Ok(pool)
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}

// verdant-server/src/main.rs

use std::sync::Arc;

use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use anyhow::Context;

use verdant_server::config::AppConfig;
use verdant_server::db::{self, PgStore};
use verdant_server::services::{FirebaseVerifier, StripeGateway};
use verdant_server::web::configure_app_routes;
use verdant_server::{build_state, cors_policy, telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);
  telemetry::init(app_config.log_format);
  tracing::info!(config = ?app_config, "Starting Verdant storefront server...");

  let db_pool = db::connect(&app_config).await.context("Failed to connect to the database")?;
  tracing::info!("Successfully connected to the database.");

  if app_config.run_migrations {
    db::run_migrations(&db_pool).await.context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied.");
  }

  let gateway = StripeGateway::new(&app_config.stripe_api_base, &app_config.stripe_secret_key)
    .context("Failed to build the Stripe client")?;
  let identity = FirebaseVerifier::new(&app_config.firebase_project_id, &app_config.firebase_jwks_url)
    .context("Failed to build the Firebase verifier")?;

  let app_state = build_state(
    app_config.clone(),
    PgStore::new(db_pool.clone()),
    Arc::new(gateway),
    Arc::new(identity),
  );

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  let client_domain = app_config.client_domain.clone();
  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(cors_policy(&client_domain))
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await
  .context("Server terminated with an error")?;

  tracing::info!("Server stopped; closing the database pool.");
  db_pool.close().await;
  Ok(())
}

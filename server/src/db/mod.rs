// verdant-server/src/db/mod.rs

//! Postgres implementations of the storefront store contracts.
//!
//! Queries are built at runtime with `sqlx::query`/`query_as`, so the crate
//! compiles without a live database.

mod catalog;
mod orders;
mod rows;
mod unit_of_work;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::AppConfig;

pub use unit_of_work::PgSession;

/// Name of the unique constraint that makes `transaction_id` an idempotency key.
pub const TRANSACTION_ID_CONSTRAINT: &str = "orders_transaction_id_key";

/// Catalog, order book and unit of work over one connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }
}

pub async fn connect(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
  PgPoolOptions::new()
    .max_connections(config.db_max_connections)
    .connect(&config.database_url)
    .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
  sqlx::migrate!("./migrations").run(pool).await
}

// verdant-server/src/lib.rs

//! HTTP surface and infrastructure adapters for the Verdant storefront.

pub mod config;
pub mod db;
pub mod errors;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod web;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::{header, Method};

use verdant::{CheckoutBackends, CheckoutSettings, IdentityVerifier, PaymentGateway, Storefront};

use crate::config::AppConfig;
use crate::db::PgStore;
use crate::state::AppState;

/// Wires the Postgres store, a payment gateway and an identity verifier into
/// the shared application state.
pub fn build_state(
  config: Arc<AppConfig>,
  store: PgStore,
  gateway: Arc<dyn PaymentGateway>,
  identity: Arc<dyn IdentityVerifier>,
) -> AppState {
  let store = Arc::new(store);
  let backends = CheckoutBackends {
    catalog: store.clone(),
    orders: store.clone(),
    unit_of_work: store,
    gateway,
  };
  let settings = CheckoutSettings {
    client_domain: config.client_domain.clone(),
    currency: config.checkout_currency.clone(),
  };
  AppState {
    storefront: Arc::new(Storefront::new(backends, settings)),
    identity,
    config,
  }
}

/// Single-origin CORS policy for the storefront frontend, credentials allowed.
pub fn cors_policy(client_domain: &str) -> Cors {
  Cors::default()
    .allowed_origin(client_domain)
    .allowed_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allowed_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
    .supports_credentials()
    .max_age(3600)
}

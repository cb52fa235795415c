// verdant-server/src/state.rs
use std::sync::Arc;

use verdant::{IdentityVerifier, Storefront};

use crate::config::AppConfig;

/// Shared by every worker; built once at startup.
#[derive(Clone)]
pub struct AppState {
  pub storefront: Arc<Storefront>,
  pub identity: Arc<dyn IdentityVerifier>,
  pub config: Arc<AppConfig>,
}

// verdant/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failure inside a catalog/order store or a unit of work.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Storage backend failed during '{operation}'. Source: {source}")]
  Backend {
    operation: &'static str,
    #[source]
    source: AnyhowError,
  },

  #[error("Unit of work was already finished")]
  SessionClosed,
}

impl StoreError {
  pub fn backend(operation: &'static str, source: impl Into<AnyhowError>) -> Self {
    StoreError::Backend {
      operation,
      source: source.into(),
    }
  }
}

/// Failure talking to the payment provider.
#[derive(Debug, Error)]
pub enum GatewayError {
  #[error("Checkout session not found: {session_id}")]
  SessionNotFound { session_id: String },

  #[error("Payment provider rejected the request (HTTP {status}): {message}")]
  Rejected { status: u16, message: String },

  #[error("Payment provider unreachable. Source: {source}")]
  Transport {
    #[source]
    source: AnyhowError,
  },

  #[error("Malformed payment provider response: {0}")]
  Malformed(String),
}

/// Failure verifying a caller's bearer credential.
#[derive(Debug, Error)]
pub enum IdentityError {
  #[error("Missing bearer credential")]
  MissingCredential,

  #[error("Malformed bearer credential: {0}")]
  Malformed(String),

  #[error("Credential rejected: {0}")]
  Rejected(String),

  #[error("Identity provider keys unavailable. Source: {source}")]
  KeysUnavailable {
    #[source]
    source: AnyhowError,
  },
}

#[derive(Debug, Error)]
pub enum VerdantError {
  #[error(transparent)]
  Store(#[from] StoreError),

  #[error(transparent)]
  Gateway(#[from] GatewayError),

  #[error(transparent)]
  Identity(#[from] IdentityError),

  #[error("Validation failed: {0}")]
  Validation(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Plant {plant_id} is out of stock")]
  OutOfStock { plant_id: uuid::Uuid },

  #[error(transparent)]
  Pipeline(#[from] crate::pipeline::PipelineError),
}

pub type VerdantResult<T, E = VerdantError> = std::result::Result<T, E>;

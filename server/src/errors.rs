// verdant-server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use verdant::{GatewayError, IdentityError, StoreError, VerdantError};

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {source}")]
  Unauthorized {
    #[from]
    source: IdentityError,
  },

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Plant {plant_id} is out of stock")]
  OutOfStock { plant_id: uuid::Uuid },

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Payment Provider Error: {0}")]
  Gateway(#[from] GatewayError),

  #[error("Database Error: {0}")]
  Store(#[from] StoreError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<VerdantError> for AppError {
  fn from(err: VerdantError) -> Self {
    match err {
      VerdantError::Store(e) => AppError::Store(e),
      VerdantError::Gateway(e) => AppError::Gateway(e),
      VerdantError::Identity(e) => AppError::Unauthorized { source: e },
      VerdantError::Validation(m) => AppError::Validation(m),
      VerdantError::NotFound(m) => AppError::NotFound(m),
      VerdantError::OutOfStock { plant_id } => AppError::OutOfStock { plant_id },
      VerdantError::Pipeline(e) => AppError::Internal(e.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Unauthorized {
        source: IdentityError::KeysUnavailable { .. },
      } => StatusCode::BAD_GATEWAY,
      AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::OutOfStock { .. } => StatusCode::CONFLICT,
      AppError::Gateway(GatewayError::SessionNotFound { .. }) => StatusCode::NOT_FOUND,
      AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
      AppError::Config(_) | AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Responding with error");
    }

    let body = match self {
      AppError::Validation(m) => json!({"error": m}),
      AppError::Unauthorized {
        source: IdentityError::KeysUnavailable { .. },
      } => json!({"error": "Identity provider unavailable"}),
      AppError::Unauthorized { source } => json!({"error": "Unauthorized", "detail": source.to_string()}),
      AppError::Forbidden(m) => json!({"error": "Forbidden", "detail": m}),
      AppError::NotFound(m) => json!({"error": "Not found", "detail": m}),
      AppError::OutOfStock { plant_id } => json!({
        "outOfStock": true,
        "message": "Product is out of stock",
        "plantId": plant_id,
      }),
      AppError::Gateway(GatewayError::SessionNotFound { session_id }) => {
        json!({"error": "Checkout session not found", "detail": session_id})
      }
      AppError::Gateway(e) => json!({"error": "Payment provider error", "detail": e.to_string()}),
      AppError::Store(_) => json!({"error": "Database operation failed"}),
      AppError::Config(_) | AppError::Internal(_) => json!({"error": "An internal error occurred"}),
    };
    HttpResponse::build(status).json(body)
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;

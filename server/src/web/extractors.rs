// verdant-server/src/web/extractors.rs

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use verdant::identity::bearer_token;
use verdant::{IdentityError, VerifiedCaller};

use crate::errors::AppError;
use crate::state::AppState;

/// The caller behind a verified `Authorization: Bearer` credential.
#[derive(Debug, Clone)]
pub struct AuthenticatedCaller(pub VerifiedCaller);

impl AuthenticatedCaller {
  pub fn email(&self) -> &str {
    &self.0.email
  }

  /// Fails with 403 unless `email` belongs to the caller.
  pub fn ensure_owns(&self, email: &str) -> Result<(), AppError> {
    if self.0.owns(email) {
      return Ok(());
    }
    warn!(caller = %self.0.email, requested = %email, "Caller tried to act for another account.");
    Err(AppError::Forbidden(format!("credential does not belong to {}", email)))
  }
}

impl FromRequest for AuthenticatedCaller {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let header_value = req
      .headers()
      .get(header::AUTHORIZATION)
      .map(|value| value.to_str().map(str::to_string));

    Box::pin(async move {
      let state = state.ok_or_else(|| AppError::Internal("application state is not registered".to_string()))?;
      let header_value = match header_value {
        None => None,
        Some(Ok(value)) => Some(value),
        Some(Err(_)) => {
          return Err(IdentityError::Malformed("authorization header is not visible ASCII".to_string()).into());
        }
      };
      let token = bearer_token(header_value.as_deref())?;
      let caller = state.identity.verify(token).await?;
      Ok(AuthenticatedCaller(caller))
    })
  }
}

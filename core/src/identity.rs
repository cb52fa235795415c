// verdant/src/identity.rs

use async_trait::async_trait;

use crate::error::IdentityError;

/// A caller whose bearer credential was accepted by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCaller {
  pub email: String,
}

impl VerifiedCaller {
  /// Exact comparison, the same rule the stores use to filter by email. An
  /// address that only differs in case names somebody else's records.
  pub fn owns(&self, email: &str) -> bool {
    self.email == email.trim()
  }
}

#[async_trait]
pub trait IdentityVerifier: Send + Sync {
  async fn verify(&self, bearer_token: &str) -> Result<VerifiedCaller, IdentityError>;
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: Option<&str>) -> Result<&str, IdentityError> {
  let value = header_value.ok_or(IdentityError::MissingCredential)?;
  let mut parts = value.split_whitespace();
  match (parts.next(), parts.next(), parts.next()) {
    (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
    (None, _, _) => Err(IdentityError::MissingCredential),
    _ => Err(IdentityError::Malformed(
      "expected 'Authorization: Bearer <token>'".to_string(),
    )),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extracts_token_after_scheme() {
    assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    assert_eq!(bearer_token(Some("bearer xyz")).unwrap(), "xyz");
  }

  #[test]
  fn missing_or_blank_header_is_missing_credential() {
    assert!(matches!(bearer_token(None), Err(IdentityError::MissingCredential)));
    assert!(matches!(bearer_token(Some("   ")), Err(IdentityError::MissingCredential)));
  }

  #[test]
  fn wrong_scheme_or_extra_parts_is_malformed() {
    assert!(matches!(bearer_token(Some("Basic abc")), Err(IdentityError::Malformed(_))));
    assert!(matches!(bearer_token(Some("Bearer")), Err(IdentityError::Malformed(_))));
    assert!(matches!(bearer_token(Some("Bearer a b")), Err(IdentityError::Malformed(_))));
  }

  #[test]
  fn ownership_matches_the_stored_email_exactly() {
    let caller = VerifiedCaller {
      email: "buyer@example.com".to_string(),
    };
    assert!(caller.owns("buyer@example.com"));
    assert!(caller.owns(" buyer@example.com "));
    assert!(!caller.owns("Buyer@example.com"));
    assert!(!caller.owns("other@example.com"));
  }
}

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use tracing::error;
use uuid::Uuid;

use crate::services::auth::error::AuthError;
use crate::services::auth::identity::Identity;
use crate::services::auth::signed_token::Claims;

/// Issues HS256 signed tokens for authenticated subjects (login flow).
#[derive(Clone)]
pub struct TokenIssuer {
    issuer: Option<String>,
    audience: Option<String>,
    ttl_seconds: u64,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

impl TokenIssuer {
    pub fn new(
        secret: &[u8],
        issuer: Option<String>,
        audience: Option<String>,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            issuer,
            audience,
            ttl_seconds,
            encoding_key: EncodingKey::from_secret(secret),
        }
    }

    pub fn issue(&self, identity: &Identity) -> Result<IssuedToken, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let exp = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                error!(ttl_seconds = self.ttl_seconds, "token lifetime out of range");
                AuthError::BackendFailure("token lifetime out of range".to_string())
            })?;

        let claims = Claims {
            sub: identity.subject_id.clone(),
            role: Some(identity.role),
            iat: now,
            exp,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Some(Uuid::new_v4().to_string()),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        let token = jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign token");
            AuthError::BackendFailure("token signing failed".to_string())
        })?;

        Ok(IssuedToken {
            token,
            expires_in: self.ttl_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::identity::Role;
    use crate::services::auth::signed_token::SignedTokenVerifier;

    fn ada() -> Identity {
        Identity {
            subject_id: "u42".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Admin,
            display_name: "Ada".to_string(),
        }
    }

    #[test]
    fn issued_token_verifies_with_the_same_secret() {
        let secret = b"issuer-test-secret-issuer-test-secret";
        let issuer = TokenIssuer::new(secret, Some("me".into()), Some("api".into()), 900);
        let verifier = SignedTokenVerifier::new(secret, Some("me"), Some("api"), 0);

        let identity = ada();

        let issued = issuer.issue(&identity).unwrap();
        assert_eq!(issued.expires_in, 900);

        let claims = verifier.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "u42");
        assert_eq!(claims.role, Some(Role::Admin));
        assert_eq!(claims.exp - claims.iat, 900);
        assert!(claims.jti.is_some());
    }

    #[test]
    fn out_of_range_lifetime_is_a_backend_failure() {
        for ttl in [i64::MAX as u64, u64::MAX] {
            let issuer = TokenIssuer::new(b"issuer-test-secret-issuer-test-secret", None, None, ttl);
            assert!(
                matches!(issuer.issue(&ada()), Err(AuthError::BackendFailure(_))),
                "ttl {ttl}"
            );
        }
    }
}

use std::sync::Arc;

use crate::services::auth::credential::{self, CredentialKind};
use crate::services::auth::error::AuthError;
use crate::services::auth::identity::Role;
use crate::services::auth::provider::ProviderVerifier;
use crate::services::auth::signed_token::SignedTokenVerifier;

/// Outcome of a successful verification: who the credential speaks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCredential {
    pub kind: CredentialKind,
    pub subject_id: String,
    pub claimed_role: Option<Role>,
}

/// Single entry point for both credential kinds.
///
/// The kind is decided up-front by `credential::classify`; there is no
/// fallback from one path to the other.
#[derive(Clone)]
pub struct CredentialVerifier {
    signed: SignedTokenVerifier,
    provider: Option<Arc<dyn ProviderVerifier>>,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("signed", &self.signed)
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .finish()
    }
}

impl CredentialVerifier {
    pub fn new(signed: SignedTokenVerifier, provider: Option<Arc<dyn ProviderVerifier>>) -> Self {
        Self { signed, provider }
    }

    pub async fn verify(&self, raw: &str) -> Result<VerifiedCredential, AuthError> {
        match credential::classify(raw)? {
            CredentialKind::SignedToken => {
                let claims = self.signed.verify(raw)?;
                Ok(VerifiedCredential {
                    kind: CredentialKind::SignedToken,
                    subject_id: claims.sub,
                    claimed_role: claims.role,
                })
            }
            CredentialKind::ProviderReference => {
                // Without a provider backend an opaque string proves nothing.
                let provider = self
                    .provider
                    .as_ref()
                    .ok_or(AuthError::MalformedCredential)?;
                let subject_id = provider.verify(raw).await?;
                Ok(VerifiedCredential {
                    kind: CredentialKind::ProviderReference,
                    subject_id,
                    claimed_role: None,
                })
            }
        }
    }
}

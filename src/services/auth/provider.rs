use std::{future::Future, pin::Pin};

use crate::services::auth::error::AuthError;

const MAX_REFERENCE_LEN: usize = 128;

/// Verification backend for opaque provider-reference credentials.
///
/// Returns:
/// - `Ok(subject_id)`                 => the issuing authority vouches for the subject
/// - `Err(MalformedCredential)` etc.  => the reference is not acceptable
/// - `Err(BackendFailure)`            => the authority could not be reached (500)
pub trait ProviderVerifier: Send + Sync {
    fn verify<'a>(
        &'a self,
        reference: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AuthError>> + Send + 'a>>;

    fn name(&self) -> &'static str;
}

/// Development-only placeholder: the reference itself is taken as the subject id.
///
/// No signature or introspection check happens here. Config refuses this mode
/// when `APP_ENV=production`; a real deployment plugs in a `ProviderVerifier`
/// that asks the issuing authority.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughProvider;

impl ProviderVerifier for PassthroughProvider {
    fn verify<'a>(
        &'a self,
        reference: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, AuthError>> + Send + 'a>> {
        Box::pin(async move {
            if !is_plausible_subject(reference) {
                return Err(AuthError::MalformedCredential);
            }
            Ok(reference.to_string())
        })
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}

fn is_plausible_subject(reference: &str) -> bool {
    !reference.is_empty()
        && reference.len() <= MAX_REFERENCE_LEN
        && reference
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passthrough_returns_reference_as_subject() {
        let provider = PassthroughProvider;
        assert_eq!(provider.verify("Xy7Qp0uid").await.unwrap(), "Xy7Qp0uid");
        assert_eq!(provider.name(), "passthrough");
    }

    #[tokio::test]
    async fn passthrough_rejects_implausible_references() {
        let provider = PassthroughProvider;
        assert_eq!(
            provider.verify("a/b").await,
            Err(AuthError::MalformedCredential)
        );

        let long = "a".repeat(MAX_REFERENCE_LEN + 1);
        assert_eq!(
            provider.verify(&long).await,
            Err(AuthError::MalformedCredential)
        );
    }
}

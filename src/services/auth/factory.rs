/// Factory: build the auth services from application `Config`.
///
/// The signing secret is handed to the verifier and the issuer here and
/// nowhere else.
use std::sync::Arc;

use crate::config::{Config, ProviderTokens};
use crate::repos::user_repo::UserDirectory;
use crate::services::auth::gateway::AuthGateway;
use crate::services::auth::provider::{PassthroughProvider, ProviderVerifier};
use crate::services::auth::resolver::IdentityResolver;
use crate::services::auth::signed_token::SignedTokenVerifier;
use crate::services::auth::token_issuer::TokenIssuer;
use crate::services::auth::verifier::CredentialVerifier;

pub fn build_auth_gateway(config: &Config, directory: Arc<dyn UserDirectory>) -> Arc<AuthGateway> {
    let signed = SignedTokenVerifier::new(
        config.jwt_secret.as_bytes(),
        config.auth_issuer.as_deref(),
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    );

    let provider: Option<Arc<dyn ProviderVerifier>> = match config.provider_tokens {
        ProviderTokens::Disabled => None,
        ProviderTokens::Passthrough => {
            tracing::warn!(
                "provider tokens are accepted WITHOUT verification (passthrough); development only"
            );
            Some(Arc::new(PassthroughProvider))
        }
    };

    Arc::new(AuthGateway::new(
        CredentialVerifier::new(signed, provider),
        IdentityResolver::new(directory),
    ))
}

pub fn build_token_issuer(config: &Config) -> Arc<TokenIssuer> {
    Arc::new(TokenIssuer::new(
        config.jwt_secret.as_bytes(),
        config.auth_issuer.clone(),
        config.auth_audience.clone(),
        config.access_token_ttl_seconds,
    ))
}

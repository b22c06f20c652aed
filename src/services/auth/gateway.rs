//! Authorization gateway: extracted credential -> verified subject ->
//! resolved identity -> decision.
//!
//! Stages: `Start -> Extracted -> Verified -> Resolved -> Decided`.
//! Any missing prerequisite ends the request with the most specific error.
//! Nothing is retried; a failure is final for the request.

use tracing::Instrument;

use crate::services::auth::credential::{CredentialKind, credential_fingerprint};
use crate::services::auth::decision::{AccessPolicy, Decision, decide};
use crate::services::auth::error::AuthError;
use crate::services::auth::identity::Identity;
use crate::services::auth::resolver::IdentityResolver;
use crate::services::auth::verifier::CredentialVerifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Extracted,
    Verified,
    Resolved,
    Decided,
}

impl Stage {
    fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Extracted => "extracted",
            Stage::Verified => "verified",
            Stage::Resolved => "resolved",
            Stage::Decided => "decided",
        }
    }
}

/// Terminal outcome of one authorization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationResult {
    Allowed(Authorized),
    Denied(String),
    Unauthenticated(AuthError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorized {
    pub identity: Identity,
    pub kind: CredentialKind,
}

impl AuthorizationResult {
    /// Unauthenticated/denied outcomes as the error taxonomy.
    pub fn into_result(self) -> Result<Authorized, AuthError> {
        match self {
            AuthorizationResult::Allowed(authorized) => Ok(authorized),
            AuthorizationResult::Denied(reason) => Err(AuthError::Forbidden(reason)),
            AuthorizationResult::Unauthenticated(err) => Err(err),
        }
    }
}

#[derive(Clone)]
pub struct AuthGateway {
    verifier: CredentialVerifier,
    resolver: IdentityResolver,
}

impl std::fmt::Debug for AuthGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGateway")
            .field("verifier", &self.verifier)
            .finish_non_exhaustive()
    }
}

impl AuthGateway {
    pub fn new(verifier: CredentialVerifier, resolver: IdentityResolver) -> Self {
        Self { verifier, resolver }
    }

    /// Run the whole pipeline for one request.
    ///
    /// `Err` is reserved for `BackendFailure`; every other outcome is an
    /// `AuthorizationResult`.
    pub async fn authorize(
        &self,
        credential: Option<&str>,
        target_owner: Option<&str>,
        policy: &AccessPolicy,
    ) -> Result<AuthorizationResult, AuthError> {
        let span = tracing::debug_span!(
            "authorize",
            stage = Stage::Start.as_str(),
            credential = tracing::field::Empty,
            subject_id = tracing::field::Empty,
        );

        self.run(credential, target_owner, policy)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        credential: Option<&str>,
        target_owner: Option<&str>,
        policy: &AccessPolicy,
    ) -> Result<AuthorizationResult, AuthError> {
        let span = tracing::Span::current();

        let Some(raw) = credential else {
            tracing::debug!("no credential provided");
            return Ok(AuthorizationResult::Unauthenticated(
                AuthError::MissingCredential,
            ));
        };
        span.record("stage", Stage::Extracted.as_str());
        span.record("credential", credential_fingerprint(raw).as_str());

        let verified = match self.verifier.verify(raw).await {
            Ok(verified) => verified,
            Err(AuthError::BackendFailure(msg)) => {
                tracing::error!(error = %msg, "credential verification backend failed");
                return Err(AuthError::BackendFailure(msg));
            }
            Err(err) => {
                tracing::warn!(error = ?err, "credential verification failed");
                return Ok(AuthorizationResult::Unauthenticated(err));
            }
        };
        span.record("stage", Stage::Verified.as_str());
        span.record("subject_id", verified.subject_id.as_str());

        let Some(identity) = self.resolver.resolve(&verified.subject_id).await? else {
            tracing::warn!("verified subject not present in user directory");
            return Ok(AuthorizationResult::Unauthenticated(
                AuthError::IdentityNotFound,
            ));
        };
        span.record("stage", Stage::Resolved.as_str());

        if let Some(claimed) = verified.claimed_role
            && claimed != identity.role
        {
            tracing::debug!(
                claimed = %claimed,
                actual = %identity.role,
                "token role differs from directory role"
            );
        }

        let decision = decide(&identity, target_owner, policy);
        span.record("stage", Stage::Decided.as_str());

        match decision {
            Decision::Allowed => Ok(AuthorizationResult::Allowed(Authorized {
                identity,
                kind: verified.kind,
            })),
            Decision::Denied(reason) => {
                tracing::info!(reason = %reason, "access denied");
                Ok(AuthorizationResult::Denied(reason))
            }
        }
    }
}

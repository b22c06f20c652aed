//! Credential kind discrimination.
//!
//! One `Authorization` header can carry either a signed token (compact JWS)
//! or an opaque provider reference. The kind is decided here, once, so the
//! verifier never falls back from one path to the other.
//!
//! Precedence: anything shaped like a compact JWS is a signed token, even if
//! it would also be a syntactically valid provider reference.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::services::auth::error::AuthError;

const MAX_CREDENTIAL_LEN: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    SignedToken,
    ProviderReference,
}

pub fn classify(raw: &str) -> Result<CredentialKind, AuthError> {
    if raw.is_empty() || raw.len() > MAX_CREDENTIAL_LEN {
        return Err(AuthError::MalformedCredential);
    }
    if !raw.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(AuthError::MalformedCredential);
    }

    if looks_like_jws(raw) {
        return Ok(CredentialKind::SignedToken);
    }

    Ok(CredentialKind::ProviderReference)
}

fn looks_like_jws(raw: &str) -> bool {
    let segments: Vec<&str> = raw.split('.').collect();
    if segments.len() != 3 {
        return false;
    }

    // header and payload must be present; the signature may be empty (alg=none),
    // which the signed-token verifier then rejects.
    !segments[0].is_empty()
        && !segments[1].is_empty()
        && segments.iter().all(|s| s.bytes().all(is_base64url))
}

fn is_base64url(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

/// Short, non-reversible tag for correlating a credential in logs.
pub fn credential_fingerprint(raw: &str) -> String {
    let digest = Sha256::digest(raw.as_bytes());
    hex::encode(&digest[..6])
}

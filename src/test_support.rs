//! Shared fixtures for unit and router tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use argon2::Argon2;
use argon2::password_hash::{PasswordHasher, SaltString};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};

use crate::repos::error::RepoError;
use crate::repos::user_repo::{LoginRecord, UserDirectory};
use crate::services::auth::gateway::AuthGateway;
use crate::services::auth::password::Argon2Comparer;
use crate::services::auth::provider::PassthroughProvider;
use crate::services::auth::resolver::IdentityResolver;
use crate::services::auth::signed_token::{Claims, SignedTokenVerifier};
use crate::services::auth::token_issuer::TokenIssuer;
use crate::services::auth::verifier::CredentialVerifier;
use crate::services::auth::{Identity, Role};
use crate::state::AppState;

pub const SECRET: &[u8] = b"test-signing-secret-0123456789abcdef";

pub fn identity(subject_id: &str, role: Role) -> Identity {
    Identity {
        subject_id: subject_id.to_string(),
        username: subject_id.to_string(),
        email: format!("{subject_id}@example.com"),
        role,
        display_name: subject_id.to_uppercase(),
    }
}

pub fn sign_token(sub: &str, role: Option<Role>, expires_in: i64) -> String {
    sign_token_with_secret(SECRET, sub, role, expires_in)
}

pub fn sign_token_with_secret(
    secret: &[u8],
    sub: &str,
    role: Option<Role>,
    expires_in: i64,
) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        role,
        iat: now,
        exp: now + expires_in,
        iss: None,
        aud: None,
        jti: None,
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

pub fn hash_password(plaintext: &str) -> String {
    let salt = SaltString::from_b64("c2FsdHNhbHRzYWx0c2FsdA").unwrap();
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

/// `UserDirectory` backed by a map; counts lookups and can simulate outages.
#[derive(Default)]
pub struct InMemoryDirectory {
    users: Mutex<HashMap<String, (Identity, Option<String>)>>,
    lookups: AtomicUsize,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl InMemoryDirectory {
    pub fn with_users(users: impl IntoIterator<Item = Identity>) -> Self {
        let directory = Self::default();
        for user in users {
            directory.upsert(user);
        }
        directory
    }

    pub fn upsert(&self, identity: Identity) {
        let mut users = self.users.lock().unwrap();
        let hash = users.get(&identity.subject_id).and_then(|(_, h)| h.clone());
        users.insert(identity.subject_id.clone(), (identity, hash));
    }

    pub fn set_password(&self, subject_id: &str, plaintext: &str) {
        let hash = hash_password(plaintext);
        if let Some(entry) = self.users.lock().unwrap().get_mut(subject_id) {
            entry.1 = Some(hash);
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn fail_lookups(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn delay_lookups(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    async fn before_read(&self) -> Result<(), RepoError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_id(&self, subject_id: &str) -> Result<Option<Identity>, RepoError> {
        self.before_read().await?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(subject_id)
            .map(|(identity, _)| identity.clone()))
    }

    async fn find_login(&self, email: &str) -> Result<Option<LoginRecord>, RepoError> {
        self.before_read().await?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|(identity, _)| identity.email.eq_ignore_ascii_case(email))
            .and_then(|(identity, hash)| {
                hash.clone().map(|password_hash| LoginRecord {
                    identity: identity.clone(),
                    password_hash,
                })
            }))
    }

    async fn list(&self) -> Result<Vec<Identity>, RepoError> {
        self.before_read().await?;
        let mut users: Vec<Identity> = self
            .users
            .lock()
            .unwrap()
            .values()
            .map(|(identity, _)| identity.clone())
            .collect();
        users.sort_by(|a, b| a.subject_id.cmp(&b.subject_id));
        Ok(users)
    }

    async fn update_display_name(
        &self,
        subject_id: &str,
        display_name: &str,
    ) -> Result<Option<Identity>, RepoError> {
        let mut users = self.users.lock().unwrap();
        Ok(users.get_mut(subject_id).map(|(identity, _)| {
            identity.display_name = display_name.to_string();
            identity.clone()
        }))
    }

    async fn delete(&self, subject_id: &str) -> Result<bool, RepoError> {
        Ok(self.users.lock().unwrap().remove(subject_id).is_some())
    }
}

/// AppState over an in-memory directory, signed tokens + passthrough provider.
pub fn test_state(directory: Arc<InMemoryDirectory>) -> AppState {
    let gateway = AuthGateway::new(
        CredentialVerifier::new(
            SignedTokenVerifier::new(SECRET, None, None, 0),
            Some(Arc::new(PassthroughProvider)),
        ),
        IdentityResolver::new(directory.clone()),
    );

    AppState::new(
        directory,
        Arc::new(gateway),
        Arc::new(TokenIssuer::new(SECRET, None, None, 600)),
        Arc::new(Argon2Comparer),
        Duration::from_secs(5),
    )
}

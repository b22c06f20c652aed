use std::sync::Arc;

use crate::repos::user_repo::UserDirectory;
use crate::services::auth::error::AuthError;
use crate::services::auth::identity::Identity;

/// Resolves a verified subject to its authoritative directory record.
///
/// No caching: role changes take effect on the very next request.
#[derive(Clone)]
pub struct IdentityResolver {
    directory: Arc<dyn UserDirectory>,
}

impl IdentityResolver {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    pub async fn resolve(&self, subject_id: &str) -> Result<Option<Identity>, AuthError> {
        self.directory.find_by_id(subject_id).await.map_err(|err| {
            tracing::error!(error = ?err, "user directory lookup failed");
            AuthError::BackendFailure("user directory unavailable".to_string())
        })
    }
}

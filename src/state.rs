/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - directory: UserDirectory, gateway: AuthGateway, issuer: TokenIssuer など
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - リクエスト間で共有するのは読み取り専用の値のみ
 */
use std::sync::Arc;
use std::time::Duration;

use crate::repos::user_repo::UserDirectory;
use crate::services::auth::password::PasswordComparer;
use crate::services::auth::token_issuer::TokenIssuer;
use crate::services::auth::AuthGateway;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn UserDirectory>,
    pub gateway: Arc<AuthGateway>,
    pub issuer: Arc<TokenIssuer>,
    pub passwords: Arc<dyn PasswordComparer>,
    /// Upper bound for one gateway run (verification + directory lookup).
    pub auth_timeout: Duration,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("gateway", &self.gateway)
            .field("issuer", &self.issuer)
            .field("auth_timeout", &self.auth_timeout)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        gateway: Arc<AuthGateway>,
        issuer: Arc<TokenIssuer>,
        passwords: Arc<dyn PasswordComparer>,
        auth_timeout: Duration,
    ) -> Self {
        Self {
            directory,
            gateway,
            issuer,
            passwords,
            auth_timeout,
        }
    }
}

/*
 * Responsibility
 * - Handler から見える「認可済みコンテキスト」の型
 * - middleware (access) が gateway を通して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - credential の検証や identity 解決は middleware/services 側の責務
 * - identity は directory から毎リクエスト解決した値。ここでは読み取り専用
 */
use crate::services::auth::Identity;
use crate::services::auth::credential::CredentialKind;

/// 認可済みのリクエストに付与されるコンテキスト
///
/// - `identity` は directory 上の正式なレコード (role もここが正)
/// - `kind` はどの種類の credential で認証されたか (ログ/監査用)
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub identity: Identity,
    pub kind: CredentialKind,
}

impl AuthCtx {
    pub fn new(identity: Identity, kind: CredentialKind) -> Self {
        Self { identity, kind }
    }

    pub fn subject_id(&self) -> &str {
        &self.identity.subject_id
    }
}

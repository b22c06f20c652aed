/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON body: { success, message })
 * - AuthError / RepoError を統一的に変換
 *
 * Notes
 * - 認証段階の失敗はすべて 401。トークン不正と未登録ユーザーは外部から区別できない
 *   (user enumeration 対策)。詳細な種別はログにのみ残す
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(String),
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            message: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        if e.is_authentication_failure() {
            tracing::debug!(error = %e, reason = e.reason(), "request not authenticated");
        }

        match e {
            AuthError::MissingCredential => AppError::Unauthorized("No token provided"),
            AuthError::MalformedCredential
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::IdentityNotFound => AppError::Unauthorized("Invalid token"),
            AuthError::Forbidden(reason) => AppError::Forbidden(reason),
            AuthError::BackendFailure(detail) => {
                tracing::error!(error = %detail, "authorization backend failure");
                AppError::Internal
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        tracing::error!(error = ?e, "repository failure");
        AppError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn body_is_success_false_with_message() {
        let response = AppError::Forbidden("required: admin; actual: user".into()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "message": "required: admin; actual: user"
            })
        );
    }

    #[test]
    fn authentication_failures_are_indistinguishable() {
        for err in [
            AuthError::MalformedCredential,
            AuthError::InvalidSignature,
            AuthError::Expired,
            AuthError::IdentityNotFound,
        ] {
            assert!(err.is_authentication_failure());
            let app = AppError::from(err);
            assert_eq!(app.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(app.to_string(), "Invalid token");
        }

        let missing = AppError::from(AuthError::MissingCredential);
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(missing.to_string(), "No token provided");
    }

    #[test]
    fn backend_failure_is_500() {
        let app = AppError::from(AuthError::BackendFailure("db down".into()));
        assert_eq!(app.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.to_string(), "internal server error");
    }
}

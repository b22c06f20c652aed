/*
 * Responsibility
 * - POST /auth/login: email + password → signed token 発行
 * - パスワード比較は PasswordComparer (argon2) に委譲。CPU を使うので blocking pool で実行
 * - email 不明 / パスワード不一致 は同じ 401 を返す
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::dto::{
        ApiResponse,
        auth::{LoginRequest, LoginResponse},
        users::UserResponse,
    },
    error::AppError,
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let Some(record) = state.directory.find_login(req.email.trim()).await? else {
        tracing::info!("login rejected: unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
    };

    let passwords = state.passwords.clone();
    let hash = record.password_hash;
    let password = req.password;
    let matches = tokio::task::spawn_blocking(move || passwords.compare(&password, &hash))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "password comparison task failed");
            AppError::Internal
        })?;

    if !matches {
        tracing::info!(user_id = %record.identity.subject_id, "login rejected: wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS));
    }

    let issued = state.issuer.issue(&record.identity)?;
    tracing::info!(user_id = %record.identity.subject_id, "token issued");

    Ok(Json(ApiResponse::ok(LoginResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_in: issued.expires_in,
        user: UserResponse::from(record.identity),
    })))
}

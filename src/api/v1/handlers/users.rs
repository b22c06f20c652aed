/*
 * Responsibility
 * - /users 系 handler
 * - 認可 (role / 所有者チェック) は routes で掛けた access guard が済ませている前提
 * - handler は AuthCtx を受け取り、repo を呼ぶだけ
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::{
            ApiResponse,
            users::{UpdateUserRequest, UserResponse},
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

pub async fn get_me(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Json<ApiResponse<UserResponse>> {
    // identity was resolved from the directory for this very request
    tracing::debug!(user_id = %ctx.subject_id(), kind = ?ctx.kind, "whoami");
    Json(ApiResponse::ok(UserResponse::from(ctx.identity)))
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let users = state.directory.list().await?;

    Ok(Json(ApiResponse::ok(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let identity = state
        .directory
        .find_by_id(&user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(ApiResponse::ok(UserResponse::from(identity))))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let identity = state
        .directory
        .update_display_name(&user_id, req.display_name.trim())
        .await?
        .ok_or(AppError::not_found("user"))?;

    tracing::info!(
        actor = %ctx.subject_id(),
        user_id = %user_id,
        "display name updated"
    );

    Ok(Json(ApiResponse::ok(UserResponse::from(identity))))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Path(user_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if user_id == ctx.subject_id() {
        return Err(AppError::bad_request("cannot delete the calling user"));
    }

    let deleted = state.directory.delete(&user_id).await?;
    if !deleted {
        return Err(AppError::not_found("user"));
    }

    tracing::info!(actor = %ctx.subject_id(), user_id = %user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

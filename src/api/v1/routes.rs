/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - ルートごとに access guard (許可ロール + 所有者 path parameter) をここで決める
 *   - /health, /auth/login : 公開
 *   - /users/me            : user, admin
 *   - /users (一覧)        : admin
 *   - /users/{user_id}     : GET/PUT は本人 (user) か admin, DELETE は admin
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    auth::login,
    health::health,
    users::{delete_user, get_me, get_user, list_users, update_user},
};
use crate::middleware::auth::access::{self, RouteGuard};
use crate::services::auth::{AccessPolicy, Role};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login));

    let me = access::require(
        Router::new().route("/users/me", get(get_me)),
        state.clone(),
        RouteGuard::new(AccessPolicy::authenticated()),
    );

    let admin = access::require(
        Router::new()
            .route("/users", get(list_users))
            .route("/users/{user_id}", axum::routing::delete(delete_user)),
        state.clone(),
        RouteGuard::new(AccessPolicy::admin_only()),
    );

    let owned = access::require(
        Router::new().route("/users/{user_id}", get(get_user).put(update_user)),
        state,
        RouteGuard::new(AccessPolicy::owner_or_admin([Role::User])).owned_by("user_id"),
    );

    public.merge(me).merge(admin).merge(owned)
}

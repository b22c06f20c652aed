//! bearer credential 検証 → identity 解決 → 認可判定 → AuthCtx を extensions に入れる
//!
//! ルートごとに `RouteGuard` (許可ロール + 所有者を示す path parameter) を指定する。
//! 判定ロジック自体は `services::auth` 側にあり、ここは HTTP との接続だけを担う。
//!
//! - gateway 全体に `auth_timeout` を掛ける。時間切れは 401 (Unauthenticated) 扱い
//! - 失敗時は `{ success: false, message }` で即座に返す (リトライしない)

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{FromRequestParts, Path, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::middleware::bearer_auth::bearer_credential;
use crate::services::auth::AccessPolicy;
use crate::state::AppState;

/// Access requirements of one group of routes.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    pub policy: AccessPolicy,
    /// Path parameter holding the subject id that owns the target resource.
    pub owner_param: Option<&'static str>,
}

impl RouteGuard {
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            policy,
            owner_param: None,
        }
    }

    pub fn owned_by(mut self, param: &'static str) -> Self {
        self.owner_param = Some(param);
        self
    }
}

#[derive(Clone)]
struct GuardState {
    app: AppState,
    guard: Arc<RouteGuard>,
}

/// Protect every route registered on `router` so far with `guard`.
///
/// 例：
/// ```ignore
/// let admin = Router::new().route("/users", get(list_users));
/// let admin = middleware::auth::access::require(admin, state.clone(), RouteGuard::new(AccessPolicy::admin_only()));
/// ```
pub fn require(router: Router<AppState>, state: AppState, guard: RouteGuard) -> Router<AppState> {
    let guard_state = GuardState {
        app: state,
        guard: Arc::new(guard),
    };
    // route_layer: path parameters are already matched when the middleware runs
    router.route_layer(middleware::from_fn_with_state(guard_state, access_middleware))
}

async fn access_middleware(
    State(GuardState { app, guard }): State<GuardState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let target_owner = match guard.owner_param {
        Some(name) => {
            let Path(params) = Path::<HashMap<String, String>>::from_request_parts(&mut parts, &app)
                .await
                .map_err(|err| {
                    tracing::error!(error = %err, param = name, "owner path parameter unavailable");
                    AppError::Internal
                })?;
            let owner = params.get(name).cloned().ok_or_else(|| {
                tracing::error!(param = name, "owner path parameter missing from route");
                AppError::Internal
            })?;
            Some(owner)
        }
        None => None,
    };

    let credential = bearer_credential(&parts.headers);

    let outcome = tokio::time::timeout(
        app.auth_timeout,
        app.gateway
            .authorize(credential, target_owner.as_deref(), &guard.policy),
    )
    .await;

    let result = match outcome {
        Ok(result) => result?,
        Err(_elapsed) => {
            tracing::warn!(
                timeout = ?app.auth_timeout,
                "authorization timed out; treating request as unauthenticated"
            );
            // nothing was decided about the credential, so no AuthError kind applies
            return Err(AppError::Unauthorized("Invalid token"));
        }
    };

    let authorized = result.into_result()?;

    let mut req = Request::from_parts(parts, body);
    // middleware → extractor への受け渡し
    req.extensions_mut()
        .insert(AuthCtx::new(authorized.identity, authorized.kind));

    Ok(next.run(req).await)
}

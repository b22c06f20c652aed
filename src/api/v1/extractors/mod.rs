/*
 * Responsibility
 * - handler 向け extractor の公開インターフェース
 */
mod auth_ctx;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};

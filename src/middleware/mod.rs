/*
 * Responsibility
 * - middleware の公開インターフェース
 *   - auth::access   : ルート単位の認可ガード
 *   - bearer_auth    : Authorization ヘッダからの credential 抽出
 *   - http           : request-id / trace / body limit / timeout
 */
pub mod auth;
pub mod bearer_auth;
pub mod http;

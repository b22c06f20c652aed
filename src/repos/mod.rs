/*
 * Responsibility
 * - 永続化層の公開インターフェース
 */
pub mod error;
pub mod user_repo;

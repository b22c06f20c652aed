/*
 * Responsibility
 * - v1 の request/response DTO
 * - 成功レスポンスは { success: true, data } で包む
 */
use serde::Serialize;

pub mod auth;
pub mod users;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/*
 * Responsibility
 * - Users の request/response DTO
 * - validation (形式チェック) 用の validate() を持たせる
 */
use serde::{Deserialize, Serialize};

use crate::services::auth::{Identity, Role};

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub display_name: String,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let display_name = self.display_name.trim();
        if display_name.is_empty() {
            return Err("display_name is required");
        }
        if display_name.chars().count() > 64 {
            return Err("display_name must be <= 64 chars");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub display_name: String,
}

impl From<Identity> for UserResponse {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.subject_id,
            username: identity.username,
            email: identity.email,
            role: identity.role,
            display_name: identity.display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_validated() {
        let ok = UpdateUserRequest {
            display_name: "Ada".to_string(),
        };
        assert!(ok.validate().is_ok());

        let blank = UpdateUserRequest {
            display_name: "   ".to_string(),
        };
        assert_eq!(blank.validate(), Err("display_name is required"));

        let long = UpdateUserRequest {
            display_name: "x".repeat(65),
        };
        assert_eq!(long.validate(), Err("display_name must be <= 64 chars"));

        let padded = UpdateUserRequest {
            display_name: format!("  {}  ", "x".repeat(64)),
        };
        assert!(padded.validate().is_ok());
    }
}

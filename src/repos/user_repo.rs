/*
 * Responsibility
 * - users テーブル (user directory) 向け SQLx 操作
 * - 認可コアは find_by_id のみを使う (読み取り専用)
 * - login / 管理系 handler 用に find_login, list, update, delete も提供
 * - DB エラーは RepoError で返す
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;
use crate::services::auth::identity::{Identity, Role};

/// Lookup surface of the user directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// One read keyed by the subject id (unique). `None` when absent.
    async fn find_by_id(&self, subject_id: &str) -> Result<Option<Identity>, RepoError>;

    /// Identity plus password hash, keyed by email. Used only by the login flow.
    async fn find_login(&self, email: &str) -> Result<Option<LoginRecord>, RepoError>;

    async fn list(&self) -> Result<Vec<Identity>, RepoError>;

    async fn update_display_name(
        &self,
        subject_id: &str,
        display_name: &str,
    ) -> Result<Option<Identity>, RepoError>;

    async fn delete(&self, subject_id: &str) -> Result<bool, RepoError>;
}

#[derive(Debug, Clone)]
pub struct LoginRecord {
    pub identity: Identity,
    pub password_hash: String,
}

#[derive(Debug, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    id: String,
    #[sqlx(rename = "userName")]
    user_name: String,
    email: String,
    role: String,
    #[sqlx(rename = "displayName")]
    display_name: Option<String>,
}

#[derive(Debug, FromRow)]
struct LoginRow {
    #[sqlx(flatten)]
    user: UserRow,
    #[sqlx(rename = "passwordHash")]
    password_hash: String,
}

impl From<UserRow> for Identity {
    fn from(row: UserRow) -> Self {
        // Unknown roles fall back to the least privileged one.
        let role = row.role.parse::<Role>().unwrap_or_else(|e| {
            tracing::warn!(user_id = %row.id, error = %e, "unknown role in users table");
            Role::User
        });

        let display_name = row
            .display_name
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| row.user_name.clone());

        Identity {
            subject_id: row.id,
            username: row.user_name,
            email: row.email,
            role,
            display_name,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_id(&self, subject_id: &str) -> Result<Option<Identity>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId"::text AS "userId", "userName", email, role, "displayName"
            FROM users
            WHERE "userId"::text = $1
            "#,
        )
        .bind(subject_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Identity::from))
    }

    async fn find_login(&self, email: &str) -> Result<Option<LoginRecord>, RepoError> {
        let row = sqlx::query_as::<_, LoginRow>(
            r#"
            SELECT "userId"::text AS "userId", "userName", email, role, "displayName", "passwordHash"
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|r| LoginRecord {
            identity: Identity::from(r.user),
            password_hash: r.password_hash,
        }))
    }

    async fn list(&self) -> Result<Vec<Identity>, RepoError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId"::text AS "userId", "userName", email, role, "displayName"
            FROM users
            ORDER BY "createdAt" DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Identity::from).collect())
    }

    async fn update_display_name(
        &self,
        subject_id: &str,
        display_name: &str,
    ) -> Result<Option<Identity>, RepoError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET "displayName" = $2
            WHERE "userId"::text = $1
            RETURNING "userId"::text AS "userId", "userName", email, role, "displayName"
            "#,
        )
        .bind(subject_id)
        .bind(display_name)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Identity::from))
    }

    async fn delete(&self, subject_id: &str) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE "userId"::text = $1
            "#,
        )
        .bind(subject_id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

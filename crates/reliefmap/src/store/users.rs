use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::SqliteStore;
use crate::repository::RepositoryError;
use crate::users::{NewUser, User, UserId, UserRepository, UserRole, DEFAULT_TRUST_SCORE};

const SQL_SELECT_USER: &str = r#"
SELECT user_id, user_name, email, preferred_language, trust_score, contribution_count,
       verified_contributions, user_role, auth_provider, provider_id, created_at
FROM users
"#;

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<Result<User, String>> {
    let user_id: i64 = row.get("user_id")?;
    let role: String = row.get("user_role")?;
    let Some(user_role) = UserRole::parse(&role) else {
        return Ok(Err(format!("user {user_id}: unknown user_role '{role}'")));
    };
    Ok(Ok(User {
        user_id: UserId(user_id),
        user_name: row.get("user_name")?,
        email: row.get("email")?,
        preferred_language: row.get("preferred_language")?,
        trust_score: row.get("trust_score")?,
        contribution_count: row.get("contribution_count")?,
        verified_contributions: row.get("verified_contributions")?,
        user_role,
        auth_provider: row.get("auth_provider")?,
        provider_id: row.get("provider_id")?,
        created_at: row.get("created_at")?,
    }))
}

impl UserRepository for SqliteStore {
    fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    &format!("{SQL_SELECT_USER} WHERE user_id = ?1"),
                    params![id.0],
                    user_from_row,
                )
                .optional()?;
            user.transpose().map_err(RepositoryError::Corrupt)
        })
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    &format!("{SQL_SELECT_USER} WHERE email = ?1"),
                    params![email],
                    user_from_row,
                )
                .optional()?;
            user.transpose().map_err(RepositoryError::Corrupt)
        })
    }

    fn create(&self, user: NewUser) -> Result<UserId, RepositoryError> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
INSERT INTO users (
    user_name, email, preferred_language, trust_score, user_role,
    auth_provider, provider_id, created_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#,
                params![
                    user.user_name,
                    user.email,
                    user.preferred_language.unwrap_or_else(|| "en".to_string()),
                    user.trust_score.unwrap_or(DEFAULT_TRUST_SCORE),
                    user.user_role.unwrap_or_default().as_str(),
                    user.auth_provider,
                    user.provider_id,
                    Utc::now(),
                ],
            )?;
            Ok(UserId(conn.last_insert_rowid()))
        })
    }

    fn increment_contribution(&self, id: UserId) -> Result<(), RepositoryError> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET contribution_count = contribution_count + 1 WHERE user_id = ?1",
                params![id.0],
            )?;
            Ok(())
        })
    }

    fn increment_verified_contribution(&self, id: UserId) -> Result<(), RepositoryError> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET verified_contributions = verified_contributions + 1 \
                 WHERE user_id = ?1",
                params![id.0],
            )?;
            Ok(())
        })
    }

    fn set_trust_score(&self, id: UserId, trust_score: i64) -> Result<bool, RepositoryError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET trust_score = ?1 WHERE user_id = ?2",
                params![trust_score, id.0],
            )?;
            Ok(changed > 0)
        })
    }
}

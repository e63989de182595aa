use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trust score assigned to accounts that do not specify one.
pub const DEFAULT_TRUST_SCORE: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    General,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::General => "general",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "general" => Some(Self::General),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub user_name: String,
    pub email: Option<String>,
    pub preferred_language: String,
    /// Mutable credibility; reviews and UGC locations snapshot it at write time.
    pub trust_score: i64,
    pub contribution_count: i64,
    pub verified_contributions: i64,
    pub user_role: UserRole,
    pub auth_provider: Option<String>,
    pub provider_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Registration payload. Unset fields fall back to `en`, [`DEFAULT_TRUST_SCORE`], and `general`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub user_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
    #[serde(default)]
    pub trust_score: Option<i64>,
    #[serde(default)]
    pub user_role: Option<UserRole>,
    #[serde(default)]
    pub auth_provider: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
}

impl NewUser {
    pub fn named(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            ..Self::default()
        }
    }

    pub fn with_trust_score(mut self, trust_score: i64) -> Self {
        self.trust_score = Some(trust_score);
        self
    }
}

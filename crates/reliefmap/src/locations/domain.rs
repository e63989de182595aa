use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amenities::Amenities;
use crate::geo::{Coordinates, RadiusFilter};
use crate::users::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(pub i64);

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseLocationId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UgcLocationId(pub i64);

/// The source row a merged location was created from. Exactly one per merged row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Provenance {
    Base(BaseLocationId),
    Ugc(UgcLocationId),
}

impl Provenance {
    /// Rebuilds provenance from the two nullable foreign keys of a stored row.
    pub fn from_columns(base_id: Option<i64>, ugc_id: Option<i64>) -> Result<Self, String> {
        match (base_id, ugc_id) {
            (Some(base), None) => Ok(Self::Base(BaseLocationId(base))),
            (None, Some(ugc)) => Ok(Self::Ugc(UgcLocationId(ugc))),
            (Some(base), Some(ugc)) => Err(format!(
                "both base_id {base} and ugc_id {ugc} are set"
            )),
            (None, None) => Err("neither base_id nor ugc_id is set".to_string()),
        }
    }

    pub fn base_id(&self) -> Option<i64> {
        match self {
            Self::Base(id) => Some(id.0),
            Self::Ugc(_) => None,
        }
    }

    pub fn ugc_id(&self) -> Option<i64> {
        match self {
            Self::Ugc(id) => Some(id.0),
            Self::Base(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Api,
    Admin,
    User,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Api => "api",
            SourceType::Admin => "admin",
            SourceType::User => "user",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "api" => Some(Self::Api),
            "admin" => Some(Self::Admin),
            "user" => Some(Self::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Red,
    Yellow,
    Green,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Red => "red",
            VerificationStatus::Yellow => "yellow",
            VerificationStatus::Green => "green",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "red" => Some(Self::Red),
            "yellow" => Some(Self::Yellow),
            "green" => Some(Self::Green),
            _ => None,
        }
    }
}

/// How a new location enters the system. Admin-sourced rows have no creation path of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Api,
    User,
}

/// Verification fields a merged row starts out with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialVerification {
    pub source_type: SourceType,
    pub status: VerificationStatus,
    pub score: f64,
    pub auto_verified: bool,
    pub admin_verified: bool,
}

impl Submission {
    /// Fixed per-source constants; there is no scoring function behind these.
    pub fn initial_verification(self) -> InitialVerification {
        match self {
            Submission::Api => InitialVerification {
                source_type: SourceType::Api,
                status: VerificationStatus::Yellow,
                score: 0.5,
                auto_verified: true,
                admin_verified: false,
            },
            Submission::User => InitialVerification {
                source_type: SourceType::User,
                status: VerificationStatus::Red,
                score: 0.3,
                auto_verified: false,
                admin_verified: false,
            },
        }
    }
}

/// Canonical projection through which every location read and write goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedLocation {
    pub location_id: LocationId,
    pub provenance: Provenance,
    pub display_name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub source_type: SourceType,
    pub verification_status: VerificationStatus,
    pub verification_score: f64,
    pub auto_verified: bool,
    pub admin_verified: bool,
    pub creator_user_id: Option<UserId>,
    pub creator_trust_score: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl MergedLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Single-location read: the merged row plus its amenities, if any were recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationDetail {
    #[serde(flatten)]
    pub location: MergedLocation,
    pub amenities: Option<Amenities>,
}

/// Authoritative-source record as imported from the place-search API or an official dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLocation {
    pub base_id: BaseLocationId,
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub source_name: Option<String>,
    pub source_id: Option<String>,
    pub is_official: bool,
    pub last_updated: DateTime<Utc>,
}

/// Input for an API-sourced location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLocationDraft {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub source_name: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default = "default_official")]
    pub is_official: bool,
}

fn default_official() -> bool {
    true
}

/// Input for a user-submitted location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UgcLocationDraft {
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub address_input: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Mutable merged-location fields. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationPatch {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub verification_status: Option<VerificationStatus>,
    #[serde(default)]
    pub verification_score: Option<f64>,
    #[serde(default)]
    pub auto_verified: Option<bool>,
    #[serde(default)]
    pub admin_verified: Option<bool>,
}

impl LocationPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Filters for the map listing. The radius only applies when centre and radius are all known.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationFilters {
    pub verification_status: Option<VerificationStatus>,
    pub source_type: Option<SourceType>,
    pub radius: Option<RadiusFilter>,
}

/// Result of a location patch as seen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationUpdate {
    Updated,
    Unchanged,
}

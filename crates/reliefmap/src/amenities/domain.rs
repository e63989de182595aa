use serde::{Deserialize, Serialize};

use crate::locations::LocationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderType {
    #[default]
    Mixed,
    Male,
    Female,
    Separate,
}

impl GenderType {
    pub fn as_str(self) -> &'static str {
        match self {
            GenderType::Mixed => "mixed",
            GenderType::Male => "male",
            GenderType::Female => "female",
            GenderType::Separate => "separate",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mixed" => Some(Self::Mixed),
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            "separate" => Some(Self::Separate),
            _ => None,
        }
    }
}

/// Facility flags recorded for a single location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenities {
    pub location_id: LocationId,
    #[serde(flatten)]
    pub features: AmenityInput,
}

/// Writable amenity fields; anything omitted defaults to `false` / `mixed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmenityInput {
    pub western_style: bool,
    pub japanese_style: bool,
    pub accessible: bool,
    pub baby_changing: bool,
    pub warm_seat: bool,
    pub gender_type: GenderType,
}

/// Which branch an amenity update took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmenityWrite {
    Created,
    Updated,
}

use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::geo::Coordinates;
use crate::locations::domain::BaseLocationDraft;

/// One data row of an official dataset export, with its 1-based line number.
#[derive(Debug)]
pub(crate) struct PlaceRecord {
    pub(crate) line: usize,
    pub(crate) draft: BaseLocationDraft,
}

#[derive(Debug)]
pub(crate) enum RowError {
    Csv(csv::Error),
    Invalid { line: usize, reason: String },
}

impl From<csv::Error> for RowError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<PlaceRecord>, RowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<PlaceRow>().enumerate() {
        let row = record?;
        // Header is line 1.
        let line = index + 2;
        records.push(PlaceRecord {
            line,
            draft: row.into_draft(line)?,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct PlaceRow {
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    latitude: f64,
    longitude: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    source_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    source_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_official: Option<String>,
}

impl PlaceRow {
    fn into_draft(self, line: usize) -> Result<BaseLocationDraft, RowError> {
        if self.name.trim().is_empty() {
            return Err(RowError::Invalid {
                line,
                reason: "name is empty".to_string(),
            });
        }
        if !Coordinates::new(self.latitude, self.longitude).is_valid() {
            return Err(RowError::Invalid {
                line,
                reason: format!(
                    "coordinates ({}, {}) are out of range",
                    self.latitude, self.longitude
                ),
            });
        }
        let is_official = match self.is_official.as_deref() {
            None => true,
            Some(raw) => parse_flag(raw).ok_or_else(|| RowError::Invalid {
                line,
                reason: format!("is_official '{raw}' is not a boolean"),
            })?,
        };

        Ok(BaseLocationDraft {
            name: self.name,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            source_name: self.source_name,
            source_id: self.source_id,
            is_official,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

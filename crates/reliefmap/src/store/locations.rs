use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension, Row, Transaction};

use super::amenities::amenities_for_location;
use super::{bool_to_sql, like_pattern, sql_to_bool, SqliteStore};
use crate::locations::repository::TEXT_SEARCH_LIMIT;
use crate::locations::{
    BaseLocation, BaseLocationDraft, BaseLocationId, LocationDetail, LocationFilters, LocationId,
    LocationPatch, LocationRepository, MergedLocation, Provenance, SourceType, Submission,
    UgcLocationDraft, VerificationStatus,
};
use crate::repository::{PatchOutcome, RepositoryError};
use crate::users::{UserId, DEFAULT_TRUST_SCORE};

const MERGED_COLUMNS: &str = r#"
    lm.location_id, lm.base_id, lm.ugc_id, lm.display_name, lm.address, lm.latitude,
    lm.longitude, lm.source_type, lm.verification_status, lm.verification_score,
    lm.auto_verified, lm.admin_verified, lm.creator_user_id, lm.creator_trust_score,
    lm.created_at
"#;

const SQL_INSERT_MERGED: &str = r#"
INSERT INTO locations_merged (
    base_id, ugc_id, display_name, address, latitude, longitude,
    source_type, verification_status, verification_score,
    auto_verified, admin_verified, creator_user_id, creator_trust_score, created_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
"#;

/// Rows come out of SQLite as loosely typed text; anything that does not map back onto the
/// domain enums or provenance rules is reported as corrupt instead of silently defaulted.
fn merged_from_row(row: &Row<'_>) -> rusqlite::Result<Result<MergedLocation, String>> {
    let location_id: i64 = row.get("location_id")?;
    let provenance = match Provenance::from_columns(row.get("base_id")?, row.get("ugc_id")?) {
        Ok(provenance) => provenance,
        Err(reason) => return Ok(Err(format!("location {location_id}: {reason}"))),
    };
    let source_type: String = row.get("source_type")?;
    let Some(source_type) = SourceType::parse(&source_type) else {
        return Ok(Err(format!(
            "location {location_id}: unknown source_type '{source_type}'"
        )));
    };
    let status: String = row.get("verification_status")?;
    let Some(verification_status) = VerificationStatus::parse(&status) else {
        return Ok(Err(format!(
            "location {location_id}: unknown verification_status '{status}'"
        )));
    };

    Ok(Ok(MergedLocation {
        location_id: LocationId(location_id),
        provenance,
        display_name: row.get("display_name")?,
        address: row.get("address")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        source_type,
        verification_status,
        verification_score: row.get("verification_score")?,
        auto_verified: sql_to_bool(row.get("auto_verified")?),
        admin_verified: sql_to_bool(row.get("admin_verified")?),
        creator_user_id: row.get::<_, Option<i64>>("creator_user_id")?.map(UserId),
        creator_trust_score: row.get("creator_trust_score")?,
        created_at: row.get("created_at")?,
    }))
}

fn collect_merged(
    rows: impl Iterator<Item = rusqlite::Result<Result<MergedLocation, String>>>,
) -> Result<Vec<MergedLocation>, RepositoryError> {
    let mut locations = Vec::new();
    for row in rows {
        locations.push(row?.map_err(RepositoryError::Corrupt)?);
    }
    Ok(locations)
}

fn base_from_row(row: &Row<'_>) -> rusqlite::Result<BaseLocation> {
    Ok(BaseLocation {
        base_id: BaseLocationId(row.get("base_id")?),
        name: row.get("name")?,
        address: row.get("address")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        source_name: row.get("source_name")?,
        source_id: row.get("source_id")?,
        is_official: sql_to_bool(row.get("is_official")?),
        last_updated: row.get("last_updated")?,
    })
}

fn insert_merged(
    tx: &Transaction<'_>,
    provenance: Provenance,
    submission: Submission,
    display_name: &str,
    address: Option<&str>,
    latitude: f64,
    longitude: f64,
    creator: Option<(UserId, i64)>,
) -> rusqlite::Result<LocationId> {
    let initial = submission.initial_verification();
    tx.execute(
        SQL_INSERT_MERGED,
        params![
            provenance.base_id(),
            provenance.ugc_id(),
            display_name,
            address,
            latitude,
            longitude,
            initial.source_type.as_str(),
            initial.status.as_str(),
            initial.score,
            bool_to_sql(initial.auto_verified),
            bool_to_sql(initial.admin_verified),
            creator.map(|(user_id, _)| user_id.0),
            creator.map(|(_, trust)| trust),
            Utc::now(),
        ],
    )?;
    Ok(LocationId(tx.last_insert_rowid()))
}

fn import_base(tx: &Transaction<'_>, draft: &BaseLocationDraft) -> rusqlite::Result<LocationId> {
    tx.execute(
        r#"
INSERT INTO locations_base (
    name, address, latitude, longitude, source_name, source_id, is_official, last_updated
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#,
        params![
            draft.name,
            draft.address,
            draft.latitude,
            draft.longitude,
            draft.source_name,
            draft.source_id,
            bool_to_sql(draft.is_official),
            Utc::now(),
        ],
    )?;
    let base_id = BaseLocationId(tx.last_insert_rowid());

    insert_merged(
        tx,
        Provenance::Base(base_id),
        Submission::Api,
        &draft.name,
        draft.address.as_deref(),
        draft.latitude,
        draft.longitude,
        None,
    )
}

fn submit_ugc(tx: &Transaction<'_>, draft: &UgcLocationDraft) -> rusqlite::Result<LocationId> {
    tx.execute(
        r#"
INSERT INTO locations_ugc (user_id, name, address_input, latitude, longitude, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#,
        params![
            draft.user_id.0,
            draft.name,
            draft.address_input,
            draft.latitude,
            draft.longitude,
            Utc::now(),
        ],
    )?;
    let ugc_id = crate::locations::UgcLocationId(tx.last_insert_rowid());

    let trust_score = tx
        .query_row(
            "SELECT trust_score FROM users WHERE user_id = ?1",
            params![draft.user_id.0],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .unwrap_or(DEFAULT_TRUST_SCORE);

    insert_merged(
        tx,
        Provenance::Ugc(ugc_id),
        Submission::User,
        &draft.name,
        draft.address_input.as_deref(),
        draft.latitude,
        draft.longitude,
        Some((draft.user_id, trust_score)),
    )
}

impl SqliteStore {
    /// Runs `write` in a transaction; any failure rolls the whole unit back.
    fn atomically(
        &self,
        operation: &'static str,
        write: impl FnOnce(&Transaction<'_>) -> rusqlite::Result<LocationId>,
    ) -> Result<LocationId, RepositoryError> {
        self.with_conn(|conn| {
            let tx = conn
                .transaction()
                .map_err(|err| RepositoryError::rollback(operation, err))?;
            // Dropping an uncommitted transaction rolls it back.
            let id = write(&tx).map_err(|err| RepositoryError::rollback(operation, err))?;
            tx.commit()
                .map_err(|err| RepositoryError::rollback(operation, err))?;
            Ok(id)
        })
    }
}

impl LocationRepository for SqliteStore {
    fn find_all(&self, filters: &LocationFilters) -> Result<Vec<MergedLocation>, RepositoryError> {
        let mut sql = format!(
            "SELECT {MERGED_COLUMNS} FROM locations_merged lm WHERE lm.is_deleted = 0"
        );
        let mut values: Vec<Value> = Vec::new();

        if let Some(status) = filters.verification_status {
            sql.push_str(" AND lm.verification_status = ?");
            values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(source_type) = filters.source_type {
            sql.push_str(" AND lm.source_type = ?");
            values.push(Value::Text(source_type.as_str().to_string()));
        }
        sql.push_str(
            " ORDER BY lm.verification_score DESC, lm.created_at DESC, lm.location_id DESC",
        );

        let mut locations = self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), merged_from_row)?;
            collect_merged(rows)
        })?;

        if let Some(radius) = filters.radius {
            locations.retain(|location| radius.contains(&location.coordinates()));
        }

        Ok(locations)
    }

    fn find_by_id(&self, id: LocationId) -> Result<Option<MergedLocation>, RepositoryError> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!(
                        "SELECT {MERGED_COLUMNS} FROM locations_merged lm \
                         WHERE lm.location_id = ?1 AND lm.is_deleted = 0"
                    ),
                    params![id.0],
                    merged_from_row,
                )
                .optional()?;
            row.transpose().map_err(RepositoryError::Corrupt)
        })
    }

    fn find_detail(&self, id: LocationId) -> Result<Option<LocationDetail>, RepositoryError> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!(
                        "SELECT {MERGED_COLUMNS}, a.location_id AS amenity_location_id, \
                         a.western_style, a.japanese_style, a.accessible, a.baby_changing, \
                         a.warm_seat, a.gender_type \
                         FROM locations_merged lm \
                         LEFT JOIN amenities a ON lm.location_id = a.location_id \
                         WHERE lm.location_id = ?1 AND lm.is_deleted = 0"
                    ),
                    params![id.0],
                    |row| {
                        let location = merged_from_row(row)?;
                        let amenities = match row.get::<_, Option<i64>>("amenity_location_id")? {
                            Some(location_id) => Some(amenities_for_location(row, location_id)?),
                            None => None,
                        };
                        Ok((location, amenities))
                    },
                )
                .optional()?;

            match row {
                Some((location, amenities)) => Ok(Some(LocationDetail {
                    location: location.map_err(RepositoryError::Corrupt)?,
                    amenities: amenities.transpose().map_err(RepositoryError::Corrupt)?,
                })),
                None => Ok(None),
            }
        })
    }

    fn search(&self, term: &str) -> Result<Vec<MergedLocation>, RepositoryError> {
        let pattern = like_pattern(term);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MERGED_COLUMNS} FROM locations_merged lm \
                 WHERE lm.is_deleted = 0 \
                   AND (lm.display_name LIKE ?1 ESCAPE '\\' OR lm.address LIKE ?1 ESCAPE '\\') \
                 ORDER BY lm.verification_score DESC, lm.location_id DESC \
                 LIMIT ?2"
            ))?;
            let rows = stmt.query_map(
                params![pattern, TEXT_SEARCH_LIMIT as i64],
                merged_from_row,
            )?;
            collect_merged(rows)
        })
    }

    fn create_from_base(&self, draft: &BaseLocationDraft) -> Result<LocationId, RepositoryError> {
        self.atomically("base location import", |tx| import_base(tx, draft))
    }

    fn create_from_ugc(&self, draft: &UgcLocationDraft) -> Result<LocationId, RepositoryError> {
        self.atomically("user location submission", |tx| submit_ugc(tx, draft))
    }

    fn update(
        &self,
        id: LocationId,
        patch: &LocationPatch,
    ) -> Result<PatchOutcome, RepositoryError> {
        let mut assignments: Vec<&'static str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(name) = &patch.display_name {
            assignments.push("display_name = ?");
            values.push(Value::Text(name.clone()));
        }
        if let Some(address) = &patch.address {
            assignments.push("address = ?");
            values.push(Value::Text(address.clone()));
        }
        if let Some(latitude) = patch.latitude {
            assignments.push("latitude = ?");
            values.push(Value::Real(latitude));
        }
        if let Some(longitude) = patch.longitude {
            assignments.push("longitude = ?");
            values.push(Value::Real(longitude));
        }
        if let Some(status) = patch.verification_status {
            assignments.push("verification_status = ?");
            values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(score) = patch.verification_score {
            assignments.push("verification_score = ?");
            values.push(Value::Real(score));
        }
        if let Some(auto_verified) = patch.auto_verified {
            assignments.push("auto_verified = ?");
            values.push(Value::Integer(bool_to_sql(auto_verified)));
        }
        if let Some(admin_verified) = patch.admin_verified {
            assignments.push("admin_verified = ?");
            values.push(Value::Integer(bool_to_sql(admin_verified)));
        }

        if assignments.is_empty() {
            return Ok(PatchOutcome::Unchanged);
        }

        values.push(Value::Integer(id.0));
        let sql = format!(
            "UPDATE locations_merged SET {} WHERE location_id = ? AND is_deleted = 0",
            assignments.join(", ")
        );

        self.with_conn(|conn| {
            let changed = conn.execute(&sql, params_from_iter(values.iter()))?;
            Ok(if changed > 0 {
                PatchOutcome::Applied
            } else {
                PatchOutcome::Missing
            })
        })
    }

    fn delete(&self, id: LocationId) -> Result<bool, RepositoryError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE locations_merged SET is_deleted = 1 \
                 WHERE location_id = ?1 AND is_deleted = 0",
                params![id.0],
            )?;
            Ok(changed > 0)
        })
    }

    fn find_base_by_source(
        &self,
        source_name: &str,
        source_id: &str,
    ) -> Result<Option<BaseLocation>, RepositoryError> {
        self.with_conn(|conn| {
            let base = conn
                .query_row(
                    "SELECT base_id, name, address, latitude, longitude, source_name, source_id, \
                     is_official, last_updated FROM locations_base \
                     WHERE source_name = ?1 AND source_id = ?2 \
                     ORDER BY base_id LIMIT 1",
                    params![source_name, source_id],
                    base_from_row,
                )
                .optional()?;
            Ok(base)
        })
    }

    fn refresh_base(
        &self,
        id: BaseLocationId,
        draft: &BaseLocationDraft,
    ) -> Result<bool, RepositoryError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                r#"
UPDATE locations_base
SET name = ?1, address = ?2, latitude = ?3, longitude = ?4, is_official = ?5, last_updated = ?6
WHERE base_id = ?7
"#,
                params![
                    draft.name,
                    draft.address,
                    draft.latitude,
                    draft.longitude,
                    bool_to_sql(draft.is_official),
                    Utc::now(),
                    id.0,
                ],
            )?;
            Ok(changed > 0)
        })
    }
}

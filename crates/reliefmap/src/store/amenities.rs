use rusqlite::{params, OptionalExtension, Row};

use super::{bool_to_sql, sql_to_bool, SqliteStore};
use crate::amenities::{AmenityInput, AmenityRepository, Amenities, GenderType};
use crate::locations::LocationId;
use crate::repository::RepositoryError;

fn amenities_from_row(row: &Row<'_>) -> rusqlite::Result<Result<Amenities, String>> {
    amenities_for_location(row, row.get("location_id")?)
}

/// Reads the amenity columns of a row whose location id was already taken from it.
pub(super) fn amenities_for_location(
    row: &Row<'_>,
    location_id: i64,
) -> rusqlite::Result<Result<Amenities, String>> {
    let gender: String = row.get("gender_type")?;
    let Some(gender_type) = GenderType::parse(&gender) else {
        return Ok(Err(format!(
            "amenities for location {location_id}: unknown gender_type '{gender}'"
        )));
    };
    Ok(Ok(Amenities {
        location_id: LocationId(location_id),
        features: AmenityInput {
            western_style: sql_to_bool(row.get("western_style")?),
            japanese_style: sql_to_bool(row.get("japanese_style")?),
            accessible: sql_to_bool(row.get("accessible")?),
            baby_changing: sql_to_bool(row.get("baby_changing")?),
            warm_seat: sql_to_bool(row.get("warm_seat")?),
            gender_type,
        },
    }))
}

impl AmenityRepository for SqliteStore {
    fn find_by_location(
        &self,
        location_id: LocationId,
    ) -> Result<Option<Amenities>, RepositoryError> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT location_id, western_style, japanese_style, accessible, \
                     baby_changing, warm_seat, gender_type FROM amenities WHERE location_id = ?1",
                    params![location_id.0],
                    amenities_from_row,
                )
                .optional()?;
            row.transpose().map_err(RepositoryError::Corrupt)
        })
    }

    fn create(&self, location_id: LocationId, input: AmenityInput) -> Result<(), RepositoryError> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
INSERT INTO amenities (
    location_id, western_style, japanese_style, accessible, baby_changing, warm_seat, gender_type
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#,
                params![
                    location_id.0,
                    bool_to_sql(input.western_style),
                    bool_to_sql(input.japanese_style),
                    bool_to_sql(input.accessible),
                    bool_to_sql(input.baby_changing),
                    bool_to_sql(input.warm_seat),
                    input.gender_type.as_str(),
                ],
            )?;
            Ok(())
        })
    }

    fn update(
        &self,
        location_id: LocationId,
        input: AmenityInput,
    ) -> Result<bool, RepositoryError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                r#"
UPDATE amenities
SET western_style = ?1, japanese_style = ?2, accessible = ?3, baby_changing = ?4,
    warm_seat = ?5, gender_type = ?6
WHERE location_id = ?7
"#,
                params![
                    bool_to_sql(input.western_style),
                    bool_to_sql(input.japanese_style),
                    bool_to_sql(input.accessible),
                    bool_to_sql(input.baby_changing),
                    bool_to_sql(input.warm_seat),
                    input.gender_type.as_str(),
                    location_id.0,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    fn delete(&self, location_id: LocationId) -> Result<bool, RepositoryError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM amenities WHERE location_id = ?1",
                params![location_id.0],
            )?;
            Ok(changed > 0)
        })
    }
}

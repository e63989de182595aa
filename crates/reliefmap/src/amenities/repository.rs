use super::domain::{AmenityInput, Amenities};
use crate::locations::LocationId;
use crate::repository::RepositoryError;

/// Storage abstraction for per-location amenity records.
pub trait AmenityRepository: Send + Sync {
    fn find_by_location(&self, location_id: LocationId)
        -> Result<Option<Amenities>, RepositoryError>;
    /// Fails with [`RepositoryError::Conflict`] when the location already has a record.
    fn create(&self, location_id: LocationId, input: AmenityInput) -> Result<(), RepositoryError>;
    /// Full replacement. Returns `false` when no record exists.
    fn update(&self, location_id: LocationId, input: AmenityInput)
        -> Result<bool, RepositoryError>;
    /// Hard delete. Returns `false` when no record exists.
    fn delete(&self, location_id: LocationId) -> Result<bool, RepositoryError>;
}

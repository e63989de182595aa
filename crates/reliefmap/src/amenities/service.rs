use std::sync::Arc;

use tracing::info;

use super::domain::{AmenityInput, AmenityWrite, Amenities};
use super::repository::AmenityRepository;
use crate::error::{Entity, ServiceError};
use crate::locations::{LocationId, LocationRepository};
use crate::repository::RepositoryError;

const ALREADY_EXISTS: &str = "Amenities already exist for this location. Use update instead.";

/// Amenity records keyed by location. `create` refuses duplicates; `update` upserts.
pub struct AmenityService<A, L> {
    amenities: Arc<A>,
    locations: Arc<L>,
}

impl<A, L> AmenityService<A, L>
where
    A: AmenityRepository + 'static,
    L: LocationRepository + 'static,
{
    pub fn new(amenities: Arc<A>, locations: Arc<L>) -> Self {
        Self {
            amenities,
            locations,
        }
    }

    pub fn get(&self, location_id: LocationId) -> Result<Option<Amenities>, ServiceError> {
        Ok(self.amenities.find_by_location(location_id)?)
    }

    pub fn create(&self, location_id: LocationId, input: AmenityInput) -> Result<(), ServiceError> {
        self.require_location(location_id)?;
        match self.amenities.create(location_id, input) {
            Ok(()) => {
                info!(%location_id, "amenities created");
                Ok(())
            }
            Err(RepositoryError::Conflict) => {
                Err(ServiceError::Conflict(ALREADY_EXISTS.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Replaces every flag, creating the record when the location has none yet.
    pub fn update(
        &self,
        location_id: LocationId,
        input: AmenityInput,
    ) -> Result<AmenityWrite, ServiceError> {
        self.require_location(location_id)?;
        if self.amenities.update(location_id, input)? {
            info!(%location_id, "amenities updated");
            return Ok(AmenityWrite::Updated);
        }
        self.amenities.create(location_id, input)?;
        info!(%location_id, "amenities created by update");
        Ok(AmenityWrite::Created)
    }

    pub fn delete(&self, location_id: LocationId) -> Result<(), ServiceError> {
        if !self.amenities.delete(location_id)? {
            return Err(ServiceError::NotFound(Entity::Amenities));
        }
        info!(%location_id, "amenities deleted");
        Ok(())
    }

    fn require_location(&self, location_id: LocationId) -> Result<(), ServiceError> {
        match self.locations.find_by_id(location_id)? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound(Entity::Location)),
        }
    }
}

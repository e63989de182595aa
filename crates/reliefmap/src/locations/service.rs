use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{
    BaseLocationDraft, LocationDetail, LocationFilters, LocationId, LocationPatch, LocationUpdate,
    MergedLocation, UgcLocationDraft,
};
use super::places::PlaceSearch;
use super::repository::LocationRepository;
use crate::error::{Entity, ServiceError};
use crate::geo::Coordinates;
use crate::repository::PatchOutcome;
use crate::users::UserRepository;

/// Location merge and verification workflows over the location and user stores.
pub struct LocationService<R, U, P> {
    locations: Arc<R>,
    users: Arc<U>,
    places: Arc<P>,
}

impl<R, U, P> LocationService<R, U, P>
where
    R: LocationRepository + 'static,
    U: UserRepository + 'static,
    P: PlaceSearch + 'static,
{
    pub fn new(locations: Arc<R>, users: Arc<U>, places: Arc<P>) -> Self {
        Self {
            locations,
            users,
            places,
        }
    }

    /// Map listing: filtered, non-deleted, best-verified first.
    pub fn search(&self, filters: &LocationFilters) -> Result<Vec<MergedLocation>, ServiceError> {
        Ok(self.locations.find_all(filters)?)
    }

    pub fn search_text(&self, term: &str) -> Result<Vec<MergedLocation>, ServiceError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ServiceError::validation(
                "Search query parameter (q) is required",
            ));
        }
        Ok(self.locations.search(term)?)
    }

    pub fn get(&self, id: LocationId) -> Result<LocationDetail, ServiceError> {
        self.locations
            .find_detail(id)?
            .ok_or(ServiceError::NotFound(Entity::Location))
    }

    pub async fn search_places(
        &self,
        query: &str,
        bias: Option<Coordinates>,
    ) -> Result<Vec<BaseLocationDraft>, ServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::validation("Query parameter is required"));
        }
        Ok(self.places.text_search(query, bias).await?)
    }

    /// Imports an authoritative place as a new API-sourced location.
    pub fn import_from_places(&self, draft: BaseLocationDraft) -> Result<LocationId, ServiceError> {
        validate_place(&draft.name, draft.latitude, draft.longitude)?;
        let location_id = self.locations.create_from_base(&draft)?;
        info!(
            %location_id,
            source = draft.source_name.as_deref().unwrap_or("unknown"),
            "imported location"
        );
        Ok(location_id)
    }

    /// Records a user-submitted location and credits the submitter.
    pub fn create_from_ugc(&self, draft: UgcLocationDraft) -> Result<LocationId, ServiceError> {
        validate_place(&draft.name, draft.latitude, draft.longitude)?;
        if self.users.find_by_id(draft.user_id)?.is_none() {
            return Err(ServiceError::NotFound(Entity::User));
        }

        let location_id = self.locations.create_from_ugc(&draft)?;
        // The location is committed at this point; a failed counter bump must not undo it.
        if let Err(err) = self.users.increment_contribution(draft.user_id) {
            warn!(user_id = %draft.user_id, error = %err, "could not credit contribution");
        }
        info!(%location_id, user_id = %draft.user_id, "user location submitted");
        Ok(location_id)
    }

    pub fn update(
        &self,
        id: LocationId,
        patch: &LocationPatch,
    ) -> Result<LocationUpdate, ServiceError> {
        validate_patch(patch)?;

        let before = self
            .locations
            .find_by_id(id)?
            .ok_or(ServiceError::NotFound(Entity::Location))?;

        match self.locations.update(id, patch)? {
            PatchOutcome::Unchanged => Ok(LocationUpdate::Unchanged),
            PatchOutcome::Missing => Err(ServiceError::NotFound(Entity::Location)),
            PatchOutcome::Applied => {
                if patch.admin_verified == Some(true) && !before.admin_verified {
                    if let Some(creator) = before.creator_user_id {
                        if let Err(err) = self.users.increment_verified_contribution(creator) {
                            warn!(
                                location_id = %id,
                                user_id = %creator,
                                error = %err,
                                "could not credit verified contribution"
                            );
                        }
                    }
                }
                info!(location_id = %id, "location updated");
                Ok(LocationUpdate::Updated)
            }
        }
    }

    pub fn delete(&self, id: LocationId) -> Result<(), ServiceError> {
        if !self.locations.delete(id)? {
            return Err(ServiceError::NotFound(Entity::Location));
        }
        info!(location_id = %id, "location deleted");
        Ok(())
    }
}

fn validate_place(name: &str, latitude: f64, longitude: f64) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::validation("name must not be empty"));
    }
    if !Coordinates::new(latitude, longitude).is_valid() {
        return Err(ServiceError::validation(
            "latitude must be within -90..90 and longitude within -180..180",
        ));
    }
    Ok(())
}

fn validate_patch(patch: &LocationPatch) -> Result<(), ServiceError> {
    if matches!(&patch.display_name, Some(name) if name.trim().is_empty()) {
        return Err(ServiceError::validation("display_name must not be empty"));
    }
    if matches!(patch.latitude, Some(lat) if !(-90.0..=90.0).contains(&lat)) {
        return Err(ServiceError::validation("latitude must be within -90..90"));
    }
    if matches!(patch.longitude, Some(lng) if !(-180.0..=180.0).contains(&lng)) {
        return Err(ServiceError::validation("longitude must be within -180..180"));
    }
    if matches!(patch.verification_score, Some(score) if !score.is_finite()) {
        return Err(ServiceError::validation("verification_score must be a number"));
    }
    Ok(())
}

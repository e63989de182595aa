use super::domain::{
    BaseLocation, BaseLocationDraft, BaseLocationId, LocationDetail, LocationFilters,
    LocationId, LocationPatch, MergedLocation, UgcLocationDraft,
};
use crate::repository::{PatchOutcome, RepositoryError};

/// Maximum number of rows returned by a free-text search.
pub const TEXT_SEARCH_LIMIT: usize = 50;

/// Storage abstraction over the base, UGC, and merged location tables.
///
/// Both create paths write the provenance row and the merged row in one transaction; on
/// failure neither row remains and the error is [`RepositoryError::Rollback`].
pub trait LocationRepository: Send + Sync {
    fn find_all(&self, filters: &LocationFilters) -> Result<Vec<MergedLocation>, RepositoryError>;
    fn find_by_id(&self, id: LocationId) -> Result<Option<MergedLocation>, RepositoryError>;
    fn find_detail(&self, id: LocationId) -> Result<Option<LocationDetail>, RepositoryError>;
    fn search(&self, term: &str) -> Result<Vec<MergedLocation>, RepositoryError>;
    fn create_from_base(&self, draft: &BaseLocationDraft) -> Result<LocationId, RepositoryError>;
    fn create_from_ugc(&self, draft: &UgcLocationDraft) -> Result<LocationId, RepositoryError>;
    fn update(&self, id: LocationId, patch: &LocationPatch)
        -> Result<PatchOutcome, RepositoryError>;
    /// Soft delete. Returns `false` when the row is missing or already deleted.
    fn delete(&self, id: LocationId) -> Result<bool, RepositoryError>;
    fn find_base_by_source(
        &self,
        source_name: &str,
        source_id: &str,
    ) -> Result<Option<BaseLocation>, RepositoryError>;
    /// Re-applies authoritative data to an existing base row and bumps `last_updated`.
    /// The merged projection keeps any edits made since the import.
    fn refresh_base(
        &self,
        id: BaseLocationId,
        draft: &BaseLocationDraft,
    ) -> Result<bool, RepositoryError>;
}

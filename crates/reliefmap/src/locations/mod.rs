//! Location merge and verification: official imports and user submissions merged into one
//! verification-scored projection.

pub mod domain;
pub mod import;
pub mod places;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    BaseLocation, BaseLocationDraft, BaseLocationId, InitialVerification, LocationDetail,
    LocationFilters, LocationId, LocationPatch, LocationUpdate, MergedLocation, Provenance,
    SourceType, Submission, UgcLocationDraft, UgcLocationId, VerificationStatus,
};
pub use import::{ImportSummary, PlaceImportError, PlaceImporter};
pub use places::{GooglePlacesClient, PlaceSearch, PlaceSearchError};
pub use repository::LocationRepository;
pub use router::location_router;
pub use service::LocationService;

//! Facility metadata attached one-to-one to merged locations.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{AmenityInput, AmenityWrite, Amenities, GenderType};
pub use repository::AmenityRepository;
pub use router::amenity_router;
pub use service::AmenityService;

#[cfg(test)]
mod tests;

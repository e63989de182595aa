//! ReliefMap core: merged restroom locations, trust-weighted reviews, and amenity records.

pub mod amenities;
pub mod config;
pub mod error;
pub mod geo;
pub mod http;
pub mod locations;
pub mod repository;
pub mod reviews;
pub mod store;
pub mod telemetry;
pub mod users;

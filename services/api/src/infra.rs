use metrics_exporter_prometheus::PrometheusHandle;
use reliefmap::amenities::AmenityService;
use reliefmap::locations::{GooglePlacesClient, LocationService};
use reliefmap::reviews::ReviewService;
use reliefmap::store::SqliteStore;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type Locations = LocationService<SqliteStore, SqliteStore, GooglePlacesClient>;
pub(crate) type Reviews = ReviewService<SqliteStore, SqliteStore, SqliteStore>;
pub(crate) type Amenities = AmenityService<SqliteStore, SqliteStore>;

/// Every domain service, wired to one shared store.
pub(crate) struct Services {
    pub(crate) locations: Arc<Locations>,
    pub(crate) reviews: Arc<Reviews>,
    pub(crate) amenities: Arc<Amenities>,
}

impl Services {
    pub(crate) fn new(store: SqliteStore, places: GooglePlacesClient) -> Self {
        let store = Arc::new(store);
        Self {
            locations: Arc::new(LocationService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::new(places),
            )),
            reviews: Arc::new(ReviewService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&store),
            )),
            amenities: Arc::new(AmenityService::new(Arc::clone(&store), store)),
        }
    }
}

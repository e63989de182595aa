use crate::infra::{AppState, Services};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use reliefmap::amenities::amenity_router;
use reliefmap::http::route_not_found;
use reliefmap::locations::location_router;
use reliefmap::reviews::review_router;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) message: &'static str,
}

/// Every domain router plus liveness, readiness, and metrics; unknown paths get the JSON 404.
pub(crate) fn with_application_routes(services: Services) -> Router {
    Router::new()
        .merge(location_router(services.locations))
        .merge(review_router(services.reviews))
        .merge(amenity_router(services.amenities))
        .route("/api/health", get(healthcheck))
        .route("/api/users/health", get(users_healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .fallback(route_not_found)
}

pub(crate) async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "ReliefMap API is running",
    })
}

pub(crate) async fn users_healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "message": "Users route is working" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use reliefmap::config::PlacesConfig;
    use reliefmap::locations::GooglePlacesClient;
    use reliefmap::store::SqliteStore;
    use reliefmap::users::{NewUser, UserRepository};
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> (Router, SqliteStore, AppState) {
        let store = SqliteStore::open_in_memory().expect("store opens");
        let places = GooglePlacesClient::new(&PlacesConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
        });
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let app = with_application_routes(Services::new(store.clone(), places))
            .layer(Extension(state.clone()));
        (app, store, state)
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
                .expect("request builds"),
            None => builder.body(Body::empty()).expect("request builds"),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn health_routes_answer() {
        let (app, _store, _state) = test_app();

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/health", None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "status": "OK", "message": "ReliefMap API is running" })
        );

        let response = app
            .oneshot(request(Method::GET, "/api/users/health", None))
            .await
            .expect("response");
        assert_eq!(json_body(response).await["message"], "Users route is working");
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let (app, _store, state) = test_app();

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/ready", None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = app
            .oneshot(request(Method::GET, "/ready", None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn unknown_paths_get_json_404() {
        let (app, _store, _state) = test_app();

        let response = app
            .oneshot(request(Method::GET, "/api/nowhere", None))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({ "success": false, "message": "Route not found" })
        );
    }

    #[tokio::test]
    async fn domain_routers_share_one_store() {
        let (app, store, _state) = test_app();
        let user = store
            .create(NewUser::named("haru").with_trust_score(6))
            .expect("user created");

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/locations/ugc",
                Some(json!({
                    "user_id": user.0,
                    "name": "Park WC",
                    "latitude": 35.1,
                    "longitude": 139.1
                })),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = json_body(response).await["data"]["location_id"]
            .as_i64()
            .expect("location id");

        let response = app
            .clone()
            .oneshot(request(
                Method::PUT,
                &format!("/api/amenities/location/{location}"),
                Some(json!({ "accessible": true })),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/api/reviews",
                Some(json!({ "location_id": location, "user_id": user.0, "review_text": "Fine" })),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request(Method::GET, &format!("/api/locations/{location}"), None))
            .await
            .expect("response");
        let body = json_body(response).await;
        assert_eq!(body["data"]["amenities"]["accessible"], true);
        assert_eq!(body["data"]["creator_trust_score"], 6);
    }

    #[tokio::test]
    async fn place_search_without_key_is_internal_error() {
        let (app, _store, _state) = test_app();

        let response = app
            .oneshot(request(
                Method::GET,
                "/api/locations/google-search?query=toilet",
                None,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["message"], "Internal server error");
    }
}

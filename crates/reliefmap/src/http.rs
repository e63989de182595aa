//! JSON envelope and status mapping shared by every router.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::error::ServiceError;
use crate::repository::RepositoryError;

static EXPOSE_ERROR_DETAIL: AtomicBool = AtomicBool::new(false);

/// Include infrastructure error detail in 500 bodies. Only development servers turn this on.
pub fn expose_error_detail(enabled: bool) {
    EXPOSE_ERROR_DETAIL.store(enabled, Ordering::Relaxed);
}

/// `{success, data?, message?, count?, error?}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            count: None,
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::data(items)
        }
    }
}

impl Envelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            count: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::message(message)
        }
    }
}

pub fn respond<T: Serialize>(status: StatusCode, envelope: Envelope<T>) -> Response {
    (status, Json(envelope)).into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    respond(StatusCode::BAD_REQUEST, Envelope::failure(message))
}

pub fn error_response(err: &ServiceError) -> Response {
    service_error_response(err, EXPOSE_ERROR_DETAIL.load(Ordering::Relaxed))
}

pub(crate) fn service_error_response(err: &ServiceError, expose_detail: bool) -> Response {
    let status = match err {
        ServiceError::Validation(_) | ServiceError::Conflict(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Unauthorized(_) => StatusCode::FORBIDDEN,
        ServiceError::Repository(_) | ServiceError::PlaceSearch(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if !err.is_internal() {
        return respond(status, Envelope::failure(err.to_string()));
    }

    error!(error = %err, "request failed");
    let mut envelope = Envelope::failure("Internal server error");
    if expose_detail {
        envelope.error = Some(err.to_string());
    }
    respond(status, envelope)
}

/// Runs a synchronous service call on tokio's blocking pool, off the async workers.
pub async fn blocking<T, F>(call: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call).await.unwrap_or_else(|err| {
        Err(ServiceError::Repository(RepositoryError::Unavailable(format!(
            "store task failed: {err}"
        ))))
    })
}

/// Unwraps a JSON body, turning malformed or mistyped payloads into a 400 envelope.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    body.map(|Json(value)| value)
        .map_err(|rejection| bad_request(rejection.body_text()))
}

pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, Response> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| bad_request(rejection.body_text()))
}

/// Numeric path identifier; anything else is a 400 naming the parameter.
pub fn path_id(path: Result<Path<i64>, PathRejection>, name: &str) -> Result<i64, Response> {
    path.map(|Path(id)| id)
        .map_err(|_| bad_request(format!("Invalid {name}")))
}

/// Fallback for any path no router claims.
pub async fn route_not_found() -> Response {
    respond(StatusCode::NOT_FOUND, Envelope::failure("Route not found"))
}

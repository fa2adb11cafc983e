use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::{error, warn};
use uuid::Uuid;

use super::domain::ReviewRequest;
use super::factory::{InvalidReviewType, ReviewKind};
use super::repository::ReviewRepository;
use super::service::{ReviewErrorKind, ReviewService, ReviewServiceError};

pub const MISSING_FIELDS_MESSAGE: &str = "One or more required fields are missing.";
pub const OUT_OF_RANGE_MESSAGE: &str = "One or more values are out of range.";
pub const INVALID_TYPE_MESSAGE: &str = "Invalid review type.";
pub const MALFORMED_REQUEST_MESSAGE: &str = "The request could not be parsed.";
pub const CONFLICT_MESSAGE: &str = "A review of this type already exists for the order.";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Router builder exposing review intake and lookup.
pub fn review_router<R>(service: Arc<ReviewService<R>>) -> Router
where
    R: ReviewRepository + 'static,
{
    Router::new()
        .route("/api/v1/reviews", post(create_handler::<R>))
        .route(
            "/api/v1/reviews/:review_type/:order_id",
            get(lookup_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    payload: Result<axum::Json<ReviewRequest>, JsonRejection>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    let axum::Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "review body rejected");
            return malformed_request();
        }
    };

    match service.create_review(request).await {
        Ok(review) => (StatusCode::OK, axum::Json(review)).into_response(),
        Err(err) => error_response(&err),
    }
}

pub(crate) async fn lookup_handler<R>(
    State(service): State<Arc<ReviewService<R>>>,
    path: Result<Path<(String, Uuid)>, PathRejection>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    let Path((review_type, order_id)) = match path {
        Ok(path) => path,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "review lookup path rejected");
            return malformed_request();
        }
    };

    let Some(kind) = ReviewKind::from_token(&review_type) else {
        let err = ReviewServiceError::from(InvalidReviewType::new(Some(&review_type)));
        return error_response(&err);
    };

    match service.find_review(order_id, kind).await {
        Ok(review) => (StatusCode::OK, axum::Json(review)).into_response(),
        // A stored document that no longer validates is a server-side fault.
        Err(err @ ReviewServiceError::Validation(_)) => {
            error!(%order_id, review_type = %kind, error = %err, "stored review is invalid");
            unexpected_response()
        }
        Err(err) => error_response(&err),
    }
}

fn malformed_request() -> Response {
    let payload = json!({ "error": MALFORMED_REQUEST_MESSAGE });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn unexpected_response() -> Response {
    let payload = json!({ "error": UNEXPECTED_MESSAGE });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

fn error_response(err: &ReviewServiceError) -> Response {
    let (status, message) = match err.kind() {
        ReviewErrorKind::MissingField => (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE),
        ReviewErrorKind::OutOfRange => (StatusCode::BAD_REQUEST, OUT_OF_RANGE_MESSAGE),
        ReviewErrorKind::InvalidReviewType => (StatusCode::BAD_REQUEST, INVALID_TYPE_MESSAGE),
        ReviewErrorKind::Conflict => (StatusCode::CONFLICT, CONFLICT_MESSAGE),
        ReviewErrorKind::NotFound => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
        ReviewErrorKind::Unexpected => {
            error!(error = %err, "review request failed");
            return unexpected_response();
        }
    };

    let payload = json!({ "error": message });
    (status, axum::Json(payload)).into_response()
}

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

use crate::error::ApiError;

use super::AppState;
use super::schemas::{BoxResponse, CreateBoxRequest, FailureResponse, ValidationErrorResponse};

/// `POST /api/generate-box` -- create a box from a JSON payload.
///
/// A body that is not valid JSON is validated as an empty payload, so the
/// caller gets the usual per-field 422 rather than a parser error.
#[utoipa::path(
    post,
    path = "/api/generate-box",
    tag = "Boxes",
    summary = "Create a box (payload)",
    description = "Validates height, width and color, stores a new box and returns it.",
    request_body(content = CreateBoxRequest, description = "Box creation payload"),
    responses(
        (status = 201, description = "Box created", body = BoxResponse),
        (status = 422, description = "Validation error", body = ValidationErrorResponse),
        (status = 500, description = "Server error", body = FailureResponse)
    )
)]
pub async fn generate_box(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = match payload {
        Ok(Json(value)) => value,
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "unreadable box payload");
            Value::Null
        }
    };

    let record = state
        .boxes
        .create_box(&payload)
        .await
        .map_err(|e| ApiError::from_create(e, state.debug))?;

    Ok((StatusCode::CREATED, Json(BoxResponse { data: record })))
}

/// `GET /api/boxes/{id}` -- fetch a stored box.
///
/// An id that is not an integer cannot name a box, so it gets the same 404
/// body as a missing one.
#[utoipa::path(
    get,
    path = "/api/boxes/{id}",
    tag = "Boxes",
    summary = "Get a box",
    params(
        ("id" = i64, Path, description = "Box id")
    ),
    responses(
        (status = 200, description = "Box found", body = BoxResponse),
        (status = 404, description = "No box with this id", body = FailureResponse),
        (status = 500, description = "Server error", body = FailureResponse)
    )
)]
pub async fn get_box(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "unusable box id");
        ApiError::NotFound {
            message: "Box not found.",
        }
    })?;

    let record = state
        .boxes
        .get_box(id)
        .await
        .map_err(|e| ApiError::from_get(e, state.debug))?
        .ok_or(ApiError::NotFound {
            message: "Box not found.",
        })?;

    Ok((StatusCode::OK, Json(BoxResponse { data: record })))
}

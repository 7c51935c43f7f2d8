use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use boxes_core::BoxRecord;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status indicator.
    #[schema(example = "ok")]
    pub status: String,
}

/// Box creation payload.
///
/// Documentation only: the handler accepts any JSON and validates it field
/// by field, so malformed payloads get per-field errors instead of a
/// deserialization failure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateBoxRequest {
    /// Height in px or units.
    #[schema(example = 150, minimum = 1)]
    pub height: i32,
    /// Width in px or units.
    #[schema(example = 200, minimum = 1)]
    pub width: i32,
    /// Hex code or color name.
    #[schema(example = "#A1B2C3", min_length = 1, max_length = 50)]
    pub color: String,
}

/// Envelope for a single box.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BoxResponse {
    pub data: BoxRecord,
}

/// Body of a 422 response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    /// First violation, plus a count of the others.
    #[schema(example = "The height field must be at least 1.")]
    pub message: String,
    /// Field name -> rule violations.
    #[schema(example = json!({"height": ["The height field must be at least 1."]}))]
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Body of a 404 or 500 response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FailureResponse {
    /// Always `false`.
    pub success: bool,
    /// Failure category.
    #[schema(example = "Database error while creating box.")]
    pub message: String,
    /// Generic detail, or the raw diagnostic when debug mode is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Database failure")]
    pub error: Option<String>,
}

use std::fmt::Display;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use boxes_core::ValidationError;
use boxes_store::StoreError;

use crate::api::schemas::{FailureResponse, ValidationErrorResponse};
use crate::service::{CreateBoxError, GetBoxError};

/// Errors that can occur when starting the Boxes server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The box store could not be built or migrated.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Which 500 category a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The durable-storage operation failed.
    Storage,
    /// Anything else.
    Internal,
}

impl FailureKind {
    /// The message shown in place of the diagnostic when debug mode is off.
    pub fn generic_error(self) -> &'static str {
        match self {
            Self::Storage => "Database failure",
            Self::Internal => "Internal server error",
        }
    }
}

/// An error on its way out of an HTTP handler.
///
/// This is the one place where failures are mapped to status codes:
/// validation -> 422, storage and internal -> 500, missing records -> 404.
/// Raw diagnostics reach the body only when built with `debug = true`.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    NotFound {
        message: &'static str,
    },
    Failure {
        kind: FailureKind,
        message: &'static str,
        error: String,
    },
}

impl ApiError {
    /// Build a 500 error, disclosing `diagnostic` only in debug mode.
    pub fn failure(
        kind: FailureKind,
        message: &'static str,
        diagnostic: &impl Display,
        debug: bool,
    ) -> Self {
        let error = if debug {
            diagnostic.to_string()
        } else {
            kind.generic_error().to_owned()
        };
        Self::Failure {
            kind,
            message,
            error,
        }
    }

    /// Classify a failed box creation.
    pub fn from_create(err: CreateBoxError, debug: bool) -> Self {
        match err {
            CreateBoxError::Validation(e) => Self::Validation(e),
            CreateBoxError::Storage(e) => Self::failure(
                FailureKind::Storage,
                "Database error while creating box.",
                &e,
                debug,
            ),
            CreateBoxError::Internal(detail) => Self::failure(
                FailureKind::Internal,
                "Unexpected error while creating box.",
                &detail,
                debug,
            ),
        }
    }

    /// Classify a failed box lookup.
    pub fn from_get(err: GetBoxError, debug: bool) -> Self {
        match err {
            GetBoxError::Storage(e) => Self::failure(
                FailureKind::Storage,
                "Database error while fetching box.",
                &e,
                debug,
            ),
            GetBoxError::Internal(detail) => Self::failure(
                FailureKind::Internal,
                "Unexpected error while fetching box.",
                &detail,
                debug,
            ),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Failure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::Validation(e) => (
                status,
                Json(ValidationErrorResponse {
                    message: e.message(),
                    errors: e.errors().clone(),
                }),
            )
                .into_response(),
            Self::NotFound { message } => (
                status,
                Json(FailureResponse {
                    success: false,
                    message: message.to_owned(),
                    error: None,
                }),
            )
                .into_response(),
            Self::Failure { message, error, .. } => (
                status,
                Json(FailureResponse {
                    success: false,
                    message: message.to_owned(),
                    error: Some(error),
                }),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn validation_maps_to_422() {
        let err = boxes_core::validate(&json!({})).unwrap_err();
        let api = ApiError::from_create(CreateBoxError::Validation(err), false);
        assert_eq!(api.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn storage_hides_diagnostic_without_debug() {
        let err = CreateBoxError::Storage(StoreError::Connection("db01 refused".into()));
        let ApiError::Failure {
            kind,
            message,
            error,
        } = ApiError::from_create(err, false)
        else {
            panic!("expected a failure");
        };
        assert_eq!(kind, FailureKind::Storage);
        assert_eq!(message, "Database error while creating box.");
        assert_eq!(error, "Database failure");
    }

    #[test]
    fn storage_discloses_diagnostic_in_debug() {
        let err = CreateBoxError::Storage(StoreError::Connection("db01 refused".into()));
        let ApiError::Failure { error, .. } = ApiError::from_create(err, true) else {
            panic!("expected a failure");
        };
        assert_eq!(error, "connection error: db01 refused");
    }

    #[test]
    fn internal_uses_its_own_category() {
        let api = ApiError::from_create(CreateBoxError::Internal("bad row".into()), false);
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let ApiError::Failure {
            kind,
            message,
            error,
        } = api
        else {
            panic!("expected a failure");
        };
        assert_eq!(kind, FailureKind::Internal);
        assert_eq!(message, "Unexpected error while creating box.");
        assert_eq!(error, "Internal server error");
    }

    #[test]
    fn lookup_failures_name_the_fetch() {
        let api = ApiError::from_get(GetBoxError::Storage(StoreError::Query("x".into())), false);
        let ApiError::Failure { message, .. } = api else {
            panic!("expected a failure");
        };
        assert_eq!(message, "Database error while fetching box.");
    }
}

use std::any::Any;
use std::backtrace::Backtrace;

use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::ResponseForPanic;

use crate::error::{ApiError, FailureKind};

/// Turns a panic inside the creation handler into the standard internal
/// error body, logging it once.
#[derive(Debug, Clone, Copy)]
pub struct CreatePanicResponder {
    pub debug: bool,
}

impl ResponseForPanic for CreatePanicResponder {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response {
        let detail = panic_message(err.as_ref());
        let backtrace = Backtrace::capture();
        tracing::error!(panic = %detail, backtrace = %backtrace, "GenerateBox - General error");

        ApiError::failure(
            FailureKind::Internal,
            "Unexpected error while creating box.",
            &detail,
            self.debug,
        )
        .into_response()
    }
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "panic with a non-string payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_string_payloads() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("boom"));
        assert_eq!(panic_message(owned.as_ref()), "boom");

        let borrowed: Box<dyn Any + Send> = Box::new("static boom");
        assert_eq!(panic_message(borrowed.as_ref()), "static boom");

        let other: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(
            panic_message(other.as_ref()),
            "panic with a non-string payload"
        );
    }
}

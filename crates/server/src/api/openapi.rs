#![allow(clippy::needless_for_each)]

use boxes_core::BoxRecord;

use super::schemas::{
    BoxResponse, CreateBoxRequest, FailureResponse, HealthResponse, ValidationErrorResponse,
};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Safeway Boxes API",
        version = "0.1.0",
        description = "HTTP API for creating and retrieving boxes.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Boxes", description = "Box creation and lookup")
    ),
    paths(
        super::health::health,
        super::boxes::generate_box,
        super::boxes::get_box,
    ),
    components(schemas(
        BoxRecord,
        BoxResponse, CreateBoxRequest,
        ValidationErrorResponse, FailureResponse,
        HealthResponse,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Safeway Boxes API");
        for path in ["/health", "/api/generate-box", "/api/boxes/{id}"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}

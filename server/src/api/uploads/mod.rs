pub mod serve;
pub mod upload;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/uploads endpoints (mounted at /api/uploads)
pub fn router() -> Router<AppState> {
    Router::new().route("/single", post(upload::upload_single))
}

/// Public image serving (mounted at /uploads)
pub fn serve_router() -> Router<AppState> {
    Router::new().route("/{id}", get(serve::serve_upload))
}

#[derive(OpenApi)]
#[openapi(
    paths(upload::upload_single, serve::serve_upload,),
    components(schemas(ladle_core::UploadResponse, upload::UploadImageRequest,))
)]
pub struct ApiDoc;

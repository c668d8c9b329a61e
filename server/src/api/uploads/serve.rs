use crate::api::{error_response, internal_error, ErrorResponse};
use crate::db::DbPool;
use crate::get_conn;
use crate::schema::uploads;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/uploads/{id}",
    tag = "uploads",
    params(
        ("id" = Uuid, Path, description = "Upload ID")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Upload not found", body = ErrorResponse)
    )
)]
pub async fn serve_upload(State(pool): State<Arc<DbPool>>, Path(id): Path<Uuid>) -> Response {
    let mut conn = get_conn!(pool);

    let (content_type, data): (String, Vec<u8>) = match uploads::table
        .find(id)
        .select((uploads::content_type, uploads::data))
        .first(&mut conn)
        .optional()
    {
        Ok(Some(row)) => row,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Upload not found"),
        Err(e) => return internal_error("Failed to fetch upload", e),
    };

    // Uploads are immutable
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        Body::from(data),
    )
        .into_response()
}

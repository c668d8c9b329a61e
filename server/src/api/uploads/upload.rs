use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::AuthUser;
use crate::config::ServerConfig;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::NewUpload;
use crate::schema::uploads;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::{upload_path, validate_image, UploadResponse};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadImageRequest {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

fn multipart_error(e: MultipartError, max: usize) -> Response {
    tracing::warn!("Multipart read error: {}", e);
    let message = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        format!("File too large. Maximum size is {} bytes", max)
    } else {
        format!("Failed to read multipart data: {}", e.body_text())
    };
    error_response(e.status(), message)
}

#[utoipa::path(
    post,
    path = "/api/uploads/single",
    tag = "uploads",
    request_body(content_type = "multipart/form-data", content = UploadImageRequest),
    responses(
        (status = 201, description = "Image stored", body = UploadResponse),
        (status = 400, description = "Missing, oversized or unsupported image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_single(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<ServerConfig>>,
    mut multipart: Multipart,
) -> Response {
    let max = config.max_upload_bytes;

    // The `image` field, or failing that the first file field
    let field = loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some(IMAGE_FIELD) || field.file_name().is_some() {
                    break field;
                }
            }
            Ok(None) => return error_response(StatusCode::BAD_REQUEST, "No file provided"),
            Err(e) => return multipart_error(e, max),
        }
    };

    let data = match field.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return multipart_error(e, max),
    };

    if data.len() > max {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("File too large. Maximum size is {} bytes", max),
        );
    }

    // Format is detected from the bytes, not the declared content type
    let content_type = match validate_image(&data) {
        Ok(ct) => ct,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let mut conn = get_conn!(pool);

    let id: Uuid = match diesel::insert_into(uploads::table)
        .values(&NewUpload {
            user_id: user.id,
            content_type: &content_type,
            data: &data[..],
        })
        .returning(uploads::id)
        .get_result(&mut conn)
    {
        Ok(id) => id,
        Err(e) => return internal_error("Failed to save upload", e),
    };

    tracing::info!(upload_id = %id, user_id = %user.id, size = data.len(), %content_type, "image uploaded");

    (
        StatusCode::CREATED,
        Json(UploadResponse {
            path: upload_path(id),
            content_type,
            size: data.len(),
        }),
    )
        .into_response()
}

use ladle_core::{validate_image, UploadResponse};

use crate::client::{Auth, LadleClient};
use crate::error::ApiError;
use crate::transport::{Method, RequestBody};

/// Multipart field the server reads the file from.
const IMAGE_FIELD: &str = "image";

impl LadleClient {
    /// `POST /api/uploads/single`. The image is checked locally first, so
    /// oversized or non-image files are refused without a request.
    pub async fn upload_image(&self, file_name: &str, data: Vec<u8>) -> Result<UploadResponse, ApiError> {
        let content_type = validate_image(&data)?;
        let body = RequestBody::File {
            field: IMAGE_FIELD.to_string(),
            file_name: file_name.to_string(),
            content_type: Some(content_type),
            data,
        };
        let response: UploadResponse = self
            .call(Method::Post, "/api/uploads/single", body, Auth::Required)
            .await?;
        tracing::info!(path = %response.path, size = response.size, "uploaded image");
        Ok(response)
    }
}

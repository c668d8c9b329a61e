use ladle_core::{Category, CategoryRequest, UpdateCategoryRequest};
use uuid::Uuid;

use crate::client::{Auth, LadleClient};
use crate::error::ApiError;
use crate::transport::{Method, RequestBody};

impl LadleClient {
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get("/api/categories", Auth::Optional).await
    }

    pub async fn get_category(&self, id: Uuid) -> Result<Category, ApiError> {
        self.get(&format!("/api/categories/{}", id), Auth::Optional)
            .await
    }

    /// Admin only.
    pub async fn create_category(&self, request: &CategoryRequest) -> Result<Category, ApiError> {
        if request.name.trim().is_empty() {
            return Err(ApiError::Validation("Category name is required".to_string()));
        }
        self.send_json(Method::Post, "/api/categories", request, Auth::Required)
            .await
    }

    /// Admin only.
    pub async fn update_category(
        &self,
        id: Uuid,
        request: &UpdateCategoryRequest,
    ) -> Result<Category, ApiError> {
        self.send_json(
            Method::Put,
            &format!("/api/categories/{}", id),
            request,
            Auth::Required,
        )
        .await
    }

    /// Admin only. Recipes in the category keep existing without one.
    pub async fn delete_category(&self, id: Uuid) -> Result<(), ApiError> {
        self.call_empty(
            Method::Delete,
            &format!("/api/categories/{}", id),
            RequestBody::Empty,
            Auth::Required,
        )
        .await
    }
}

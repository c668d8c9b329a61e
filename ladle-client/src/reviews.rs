use ladle_core::review::validate_review;
use ladle_core::{CreateReviewRequest, Review, UpdateReviewRequest};
use uuid::Uuid;

use crate::client::{json_body, Auth, LadleClient};
use crate::error::ApiError;
use crate::transport::{Method, RequestBody};

impl LadleClient {
    /// Every review on the site. Admin only.
    pub async fn list_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.get("/api/reviews", Auth::Required).await
    }

    pub async fn recipe_reviews(&self, recipe_id: Uuid) -> Result<Vec<Review>, ApiError> {
        self.get(&format!("/api/reviews/recipe/{}", recipe_id), Auth::Optional)
            .await
    }

    /// Reviews written by the signed-in user.
    pub async fn my_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.get("/api/reviews/user", Auth::Required).await
    }

    pub async fn create_review(
        &self,
        recipe_id: Uuid,
        rating: i32,
        comment: &str,
    ) -> Result<Review, ApiError> {
        let comment = validate_review(rating, comment)?;
        let body = json_body(&CreateReviewRequest {
            recipe_id,
            rating,
            comment: comment.to_string(),
        })?;
        self.call(Method::Post, "/api/reviews", body, Auth::Required)
            .await
    }

    pub async fn update_review(
        &self,
        id: Uuid,
        request: &UpdateReviewRequest,
    ) -> Result<Review, ApiError> {
        if let Some(rating) = request.rating {
            ladle_core::review::validate_rating(rating)?;
        }
        if let Some(comment) = &request.comment {
            ladle_core::review::validate_comment(comment)?;
        }
        self.send_json(
            Method::Put,
            &format!("/api/reviews/{}", id),
            request,
            Auth::Required,
        )
        .await
    }

    pub async fn delete_review(&self, id: Uuid) -> Result<(), ApiError> {
        self.call_empty(
            Method::Delete,
            &format!("/api/reviews/{}", id),
            RequestBody::Empty,
            Auth::Required,
        )
        .await
    }
}

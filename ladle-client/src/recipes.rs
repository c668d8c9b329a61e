use chrono::Utc;
use ladle_core::{
    find_title_collision, retain_active, AttachReviewRequest, CreateRecipeRequest, Difficulty,
    Recipe, RecipeList, RecipeStatus, RecipeSummary, Review, UpdateRecipeRequest,
};
use url::form_urlencoded;
use uuid::Uuid;

use crate::client::{json_body, Auth, LadleClient};
use crate::error::ApiError;
use crate::transport::{Method, RequestBody};

/// Listing order understood by `GET /api/recipes`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RecipeSort {
    #[default]
    Newest,
    Oldest,
    Title,
    Rating,
    Popular,
}

impl RecipeSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeSort::Newest => "newest",
            RecipeSort::Oldest => "oldest",
            RecipeSort::Title => "title",
            RecipeSort::Rating => "rating",
            RecipeSort::Popular => "popular",
        }
    }
}

impl std::str::FromStr for RecipeSort {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newest" => Ok(RecipeSort::Newest),
            "oldest" => Ok(RecipeSort::Oldest),
            "title" => Ok(RecipeSort::Title),
            "rating" => Ok(RecipeSort::Rating),
            "popular" => Ok(RecipeSort::Popular),
            other => Err(ApiError::Validation(format!("unknown sort order: {}", other))),
        }
    }
}

/// Query parameters for a recipe listing. Unset fields are left out of the
/// query string.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecipeFilter {
    pub title: Option<String>,
    pub search: Option<String>,
    pub category: Option<Uuid>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<RecipeStatus>,
    pub author: Option<Uuid>,
    pub mine: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort: Option<RecipeSort>,
}

impl RecipeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact title match, used for the duplicate check before creating.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn category(mut self, id: Uuid) -> Self {
        self.category = Some(id);
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn status(mut self, status: RecipeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn author(mut self, id: Uuid) -> Self {
        self.author = Some(id);
        self
    }

    pub fn mine(mut self) -> Self {
        self.mine = true;
        self
    }

    pub fn page(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn sort(mut self, sort: RecipeSort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Encoded query string without the leading `?`.
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(title) = &self.title {
            query.append_pair("title", title.trim());
        }
        if let Some(search) = &self.search {
            query.append_pair("q", search);
        }
        if let Some(id) = self.category {
            query.append_pair("category", &id.to_string());
        }
        if let Some(difficulty) = self.difficulty {
            query.append_pair("difficulty", difficulty.as_str());
        }
        if let Some(status) = self.status {
            query.append_pair("status", status.as_str());
        }
        if let Some(id) = self.author {
            query.append_pair("author", &id.to_string());
        }
        if self.mine {
            query.append_pair("mine", "true");
        }
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(offset) = self.offset {
            query.append_pair("offset", &offset.to_string());
        }
        if let Some(sort) = self.sort {
            query.append_pair("sort", sort.as_str());
        }
        query.finish()
    }

    fn path(&self) -> String {
        let query = self.to_query();
        if query.is_empty() {
            "/api/recipes".to_string()
        } else {
            format!("/api/recipes?{}", query)
        }
    }
}

/// How a recipe delete went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The server removed the recipe
    Deleted,
    /// The hard delete failed with a server error and the recipe was marked
    /// deleted instead
    SoftDeleted,
}

impl LadleClient {
    /// `GET /api/recipes`
    pub async fn list_recipes(&self, filter: &RecipeFilter) -> Result<RecipeList, ApiError> {
        self.get(&filter.path(), Auth::Optional).await
    }

    /// Listing with soft-deleted entries removed, whatever the server returned.
    pub async fn active_recipes(&self, filter: &RecipeFilter) -> Result<Vec<RecipeSummary>, ApiError> {
        let list = self.list_recipes(filter).await?;
        Ok(retain_active(list.recipes))
    }

    /// `GET /api/recipes/{slug}`
    pub async fn get_recipe(&self, slug: &str) -> Result<Recipe, ApiError> {
        self.get(&format!("/api/recipes/{}", slug), Auth::Optional).await
    }

    /// `GET /api/recipes/id/{id}`
    pub async fn get_recipe_by_id(&self, id: Uuid) -> Result<Recipe, ApiError> {
        self.get(&format!("/api/recipes/id/{}", id), Auth::Optional).await
    }

    /// `POST /api/recipes` with no client-side checks.
    pub async fn create_recipe(&self, request: &CreateRecipeRequest) -> Result<Recipe, ApiError> {
        self.send_json(Method::Post, "/api/recipes", request, Auth::Required)
            .await
    }

    /// Create a recipe after checking that no active recipe already uses the
    /// title. A collision fails with [`ApiError::DuplicateTitle`] and nothing
    /// is sent to the create endpoint.
    pub async fn create_recipe_checked(
        &self,
        request: &CreateRecipeRequest,
    ) -> Result<Recipe, ApiError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("Title is required".to_string()));
        }
        if !self.session().is_authenticated() {
            return Err(ApiError::NotLoggedIn);
        }

        let existing = self.active_recipes(&RecipeFilter::new().title(title)).await?;
        if let Some(taken) = find_title_collision(title, existing.iter().map(|r| r.title.as_str())) {
            tracing::debug!(title, taken, "refusing to create recipe with duplicate title");
            return Err(ApiError::DuplicateTitle(taken.to_string()));
        }

        self.create_recipe(request).await
    }

    /// `PUT /api/recipes/{id}`
    pub async fn update_recipe(
        &self,
        id: Uuid,
        request: &UpdateRecipeRequest,
    ) -> Result<Recipe, ApiError> {
        self.send_json(
            Method::Put,
            &format!("/api/recipes/{}", id),
            request,
            Auth::Required,
        )
        .await
    }

    /// `DELETE /api/recipes/{id}`.
    ///
    /// When the server fails the delete with a 500, the recipe is soft-deleted
    /// through an update instead. Any other failure is returned as is.
    pub async fn delete_recipe(&self, id: Uuid) -> Result<DeleteOutcome, ApiError> {
        let path = format!("/api/recipes/{}", id);
        match self
            .call_empty(Method::Delete, &path, RequestBody::Empty, Auth::Required)
            .await
        {
            Ok(()) => Ok(DeleteOutcome::Deleted),
            Err(ApiError::Server { status: 500, message }) => {
                tracing::warn!(recipe_id = %id, %message, "hard delete failed, marking recipe deleted");
                self.update_recipe(id, &UpdateRecipeRequest::soft_delete(Utc::now()))
                    .await?;
                Ok(DeleteOutcome::SoftDeleted)
            }
            Err(e) => Err(e),
        }
    }

    /// `POST /api/recipes/{id}/reviews`
    pub async fn attach_review(
        &self,
        recipe_id: Uuid,
        rating: i32,
        comment: &str,
    ) -> Result<Review, ApiError> {
        ladle_core::review::validate_review(rating, comment)?;
        let body = json_body(&AttachReviewRequest {
            rating,
            comment: comment.trim().to_string(),
        })?;
        self.call(
            Method::Post,
            &format!("/api/recipes/{}/reviews", recipe_id),
            body,
            Auth::Required,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_query() {
        assert_eq!(RecipeFilter::new().path(), "/api/recipes");
    }

    #[test]
    fn test_filter_query_encoding() {
        let category = Uuid::nil();
        let query = RecipeFilter::new()
            .title("  Mac & Cheese ")
            .category(category)
            .difficulty(Difficulty::Easy)
            .page(10, 20)
            .sort(RecipeSort::Rating)
            .to_query();
        assert_eq!(
            query,
            format!(
                "title=Mac+%26+Cheese&category={}&difficulty=easy&limit=10&offset=20&sort=rating",
                category
            )
        );
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("Popular".parse::<RecipeSort>().unwrap(), RecipeSort::Popular);
        assert!("random".parse::<RecipeSort>().is_err());
    }
}

use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::RecipeRow;
use crate::recipe_is_active;
use crate::schema::recipes;
use crate::views::recipe_summaries;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Double, Text};
use ladle_core::{Difficulty, Pagination, RecipeList, RecipeStatus};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Listing order
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecipeSort {
    /// Most recently created first
    #[default]
    Newest,
    Oldest,
    /// Alphabetical by title
    Title,
    /// Highest average rating first
    Rating,
    /// Most favorited first
    Popular,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListRecipesParams {
    /// Exact title match (after trimming, ignoring case)
    pub title: Option<String>,
    /// Substring search over title and description
    pub q: Option<String>,
    /// Category ID
    pub category: Option<Uuid>,
    pub difficulty: Option<Difficulty>,
    /// Ignored for anonymous callers, who only see published recipes
    pub status: Option<RecipeStatus>,
    /// Author ID
    pub author: Option<Uuid>,
    /// Only the caller's own recipes (requires a token)
    #[serde(default)]
    pub mine: bool,
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
    #[serde(default)]
    pub sort: RecipeSort,
}

pub fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    (
        limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        offset.unwrap_or(0).max(0),
    )
}

fn like_pattern(text: &str) -> String {
    format!("%{}%", text.replace('%', "\\%").replace('_', "\\_"))
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Active recipes", body = RecipeList),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 401, description = "Invalid token, or mine=true without one", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<ListRecipesParams>,
) -> Response {
    let (limit, offset) = page_bounds(params.limit, params.offset);

    if params.mine && viewer.is_none() {
        return error_response(StatusCode::UNAUTHORIZED, "Sign in to list your recipes");
    }

    let text_pattern = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(like_pattern);
    let exact_title = params
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    let mut conn = get_conn!(pool);

    let mut query = recipes::table.filter(recipe_is_active!()).into_boxed();

    // Visibility: anonymous callers see published recipes, signed-in users
    // also see their own, admins see everything active.
    match &viewer {
        None => {
            query = query.filter(recipes::status.eq(RecipeStatus::Published.as_str()));
        }
        Some(user) if !user.is_admin() => {
            query = query.filter(
                recipes::status
                    .eq(RecipeStatus::Published.as_str())
                    .or(recipes::author_id.eq(user.id)),
            );
        }
        Some(_) => {}
    }

    if let (true, Some(user)) = (params.mine, &viewer) {
        query = query.filter(recipes::author_id.eq(user.id));
    }
    if let Some(author) = params.author {
        query = query.filter(recipes::author_id.eq(author));
    }
    if let Some(category) = params.category {
        query = query.filter(recipes::category_id.eq(category));
    }
    if let Some(difficulty) = params.difficulty {
        query = query.filter(recipes::difficulty.eq(difficulty.as_str()));
    }
    if let (Some(status), Some(_)) = (params.status, &viewer) {
        query = query.filter(recipes::status.eq(status.as_str()));
    }
    if let Some(ref title) = exact_title {
        query = query.filter(sql::<Bool>("LOWER(TRIM(title)) = ").bind::<Text, _>(title));
    }
    if let Some(ref pattern) = text_pattern {
        query = query.filter(
            recipes::title
                .ilike(pattern)
                .or(recipes::description.ilike(pattern)),
        );
    }

    let query = match params.sort {
        RecipeSort::Newest => query.order(recipes::created_at.desc()),
        RecipeSort::Oldest => query.order(recipes::created_at.asc()),
        RecipeSort::Title => query.order(recipes::title.asc()),
        RecipeSort::Rating => query
            .order(sql::<Double>(
                "COALESCE((SELECT AVG(r.rating)::float8 FROM reviews r WHERE r.recipe_id = recipes.id), 0) DESC",
            ))
            .then_order_by(recipes::created_at.desc()),
        RecipeSort::Popular => query
            .order(sql::<BigInt>(
                "(SELECT COUNT(*) FROM favorites f WHERE f.recipe_id = recipes.id) DESC",
            ))
            .then_order_by(recipes::created_at.desc()),
    };

    // COUNT(*) OVER() carries the total across all matching rows
    let results: Vec<(RecipeRow, i64)> = match query
        .select((RecipeRow::as_select(), sql::<BigInt>("COUNT(*) OVER()")))
        .limit(limit)
        .offset(offset)
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => return internal_error("Failed to fetch recipes", e),
    };

    let total = results.first().map(|(_, total)| *total).unwrap_or(0);
    let rows = results.into_iter().map(|(row, _)| row).collect();

    let recipes = match recipe_summaries(&mut conn, rows) {
        Ok(r) => r,
        Err(e) => return internal_error("Failed to fetch recipes", e),
    };

    (
        StatusCode::OK,
        Json(RecipeList {
            recipes,
            pagination: Pagination {
                total,
                limit,
                offset,
            },
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds_defaults() {
        assert_eq!(page_bounds(None, None), (DEFAULT_LIMIT, 0));
    }

    #[test]
    fn test_page_bounds_clamped() {
        assert_eq!(page_bounds(Some(0), Some(-3)), (1, 0));
        assert_eq!(page_bounds(Some(5000), Some(40)), (MAX_LIMIT, 40));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_sort_deserializes_lowercase() {
        let params: ListRecipesParams =
            serde_json::from_value(serde_json::json!({"sort": "popular", "mine": true})).unwrap();
        assert_eq!(params.sort, RecipeSort::Popular);
        assert!(params.mine);
        assert_eq!(
            serde_json::from_value::<ListRecipesParams>(serde_json::json!({}))
                .unwrap()
                .sort,
            RecipeSort::Newest
        );
    }
}

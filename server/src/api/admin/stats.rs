use crate::api::{internal_error, ErrorResponse};
use crate::auth::AdminUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{RecipeRow, ReviewRow, User};
use crate::recipe_is_active;
use crate::api::favorites::active_favorites;
use crate::api::reviews::active_reviews;
use crate::schema::{categories, recipes, reviews, users};
use crate::views::{recipe_summaries, reviews_view};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::{AdminStats, EntityCounts};
use std::sync::Arc;

/// How many of each recent item the dashboard shows
pub const RECENT_LIMIT: i64 = 5;

fn load_stats(conn: &mut PgConnection) -> QueryResult<AdminStats> {
    let counts = EntityCounts {
        users: users::table
            .filter(users::deleted_at.is_null())
            .count()
            .get_result(conn)?,
        recipes: recipes::table
            .filter(recipe_is_active!())
            .count()
            .get_result(conn)?,
        categories: categories::table.count().get_result(conn)?,
        reviews: active_reviews().count().get_result(conn)?,
        favorites: active_favorites().count().get_result(conn)?,
    };

    let recipe_rows: Vec<RecipeRow> = recipes::table
        .filter(recipe_is_active!())
        .order(recipes::created_at.desc())
        .limit(RECENT_LIMIT)
        .select(RecipeRow::as_select())
        .load(conn)?;

    let recent_users: Vec<User> = users::table
        .filter(users::deleted_at.is_null())
        .order(users::created_at.desc())
        .limit(RECENT_LIMIT)
        .select(User::as_select())
        .load(conn)?;

    let review_rows: Vec<ReviewRow> = active_reviews()
        .order(reviews::created_at.desc())
        .limit(RECENT_LIMIT)
        .select(ReviewRow::as_select())
        .load(conn)?;

    Ok(AdminStats {
        counts,
        recent_recipes: recipe_summaries(conn, recipe_rows)?,
        recent_users: recent_users.iter().map(User::to_api).collect(),
        recent_reviews: reviews_view(conn, review_rows)?,
    })
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "admin",
    responses(
        (status = 200, description = "Dashboard counts and recent activity", body = AdminStats),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_stats(AdminUser(_admin): AdminUser, State(pool): State<Arc<DbPool>>) -> Response {
    let mut conn = get_conn!(pool);

    match load_stats(&mut conn) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => internal_error("Failed to load stats", e),
    }
}

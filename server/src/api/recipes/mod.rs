pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod reviews;
pub mod update;

use crate::models::{RecipeRow, User};
use crate::recipe_is_active;
use crate::schema::{categories, recipes};
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};
use utoipa::OpenApi;
use uuid::Uuid;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route("/id/{id}", get(get::get_recipe_by_id))
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/{id}/reviews", post(reviews::attach_review))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        get::get_recipe,
        get::get_recipe_by_id,
        create::create_recipe,
        update::update_recipe,
        delete::delete_recipe,
        reviews::attach_review,
    ),
    components(schemas(
        ladle_core::Recipe,
        ladle_core::RecipeSummary,
        ladle_core::RecipeList,
        ladle_core::Pagination,
        ladle_core::CreateRecipeRequest,
        ladle_core::UpdateRecipeRequest,
        ladle_core::AttachReviewRequest,
        ladle_core::Instruction,
        ladle_core::Difficulty,
        ladle_core::RecipeStatus,
        ladle_core::RatingSummary,
        ladle_core::CategoryRef,
        ladle_core::UserRef,
        list::RecipeSort,
    ))
)]
pub struct ApiDoc;

/// Authors edit their own recipes; admins edit any.
pub fn can_edit(user: &User, recipe: &RecipeRow) -> bool {
    recipe.author_id == user.id || user.is_admin()
}

/// Drafts and archived recipes are only visible to their author and admins.
pub fn can_view(viewer: Option<&User>, recipe: &RecipeRow) -> bool {
    recipe.status == ladle_core::RecipeStatus::Published.as_str()
        || viewer.is_some_and(|u| can_edit(u, recipe))
}

/// Title of an active recipe that collides with `title`, ignoring case.
pub fn title_taken(
    conn: &mut PgConnection,
    title: &str,
    exclude: Option<Uuid>,
) -> QueryResult<Option<String>> {
    let mut query = recipes::table
        .filter(recipe_is_active!())
        .filter(
            sql::<Bool>("LOWER(title) = LOWER(")
                .bind::<Text, _>(title.trim())
                .sql(")"),
        )
        .select(recipes::title)
        .into_boxed();

    if let Some(id) = exclude {
        query = query.filter(recipes::id.ne(id));
    }

    query.first(conn).optional()
}

/// A slug derived from `title` that no other recipe uses.
pub fn slug_for(conn: &mut PgConnection, title: &str, exclude: Option<Uuid>) -> QueryResult<String> {
    let base = ladle_core::slugify(title);
    let pattern = format!("{}%", base.replace('%', "\\%").replace('_', "\\_"));

    let mut query = recipes::table
        .filter(recipes::slug.like(pattern))
        .select(recipes::slug)
        .into_boxed();
    if let Some(id) = exclude {
        query = query.filter(recipes::id.ne(id));
    }
    let taken: Vec<String> = query.load(conn)?;

    Ok(ladle_core::recipe::unique_slug(&base, &taken))
}

pub fn category_exists(conn: &mut PgConnection, id: Uuid) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(categories::table.find(id))).get_result(conn)
}

/// Reject negative durations and servings below one.
pub fn validate_numbers(
    preparation_time: Option<i32>,
    cooking_time: Option<i32>,
    servings: Option<i32>,
) -> Result<(), &'static str> {
    if preparation_time.is_some_and(|t| t < 0) {
        return Err("Preparation time cannot be negative");
    }
    if cooking_time.is_some_and(|t| t < 0) {
        return Err("Cooking time cannot be negative");
    }
    if servings.is_some_and(|s| s < 1) {
        return Err("Servings must be at least 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_numbers() {
        assert!(validate_numbers(Some(0), Some(10), Some(1)).is_ok());
        assert!(validate_numbers(None, None, None).is_ok());
        assert!(validate_numbers(Some(-1), None, None).is_err());
        assert!(validate_numbers(None, Some(-5), None).is_err());
        assert!(validate_numbers(None, None, Some(0)).is_err());
    }
}

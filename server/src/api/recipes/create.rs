use crate::api::{error_response, internal_error, is_unique_violation, non_blank, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{NewRecipe, RecipeRow};
use crate::schema::recipes;
use crate::views::recipe_detail;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::prelude::*;
use ladle_core::instructions::normalize;
use ladle_core::{CreateRecipeRequest, Recipe, RecipeStatus};
use std::sync::Arc;

use super::{category_exists, slug_for, title_taken, validate_numbers};

/// Drop blank entries and surrounding whitespace from a string list.
pub fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect()
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Invalid request or duplicate title", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Json(request): Json<CreateRecipeRequest>,
) -> Response {
    let title = request.title.trim();
    if title.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Title cannot be empty");
    }
    if request.status == RecipeStatus::Deleted {
        return error_response(StatusCode::BAD_REQUEST, "Cannot create a deleted recipe");
    }
    if let Err(msg) = validate_numbers(
        Some(request.preparation_time),
        Some(request.cooking_time),
        Some(request.servings),
    ) {
        return error_response(StatusCode::BAD_REQUEST, msg);
    }

    let mut conn = get_conn!(pool);

    if let Some(category_id) = request.category_id {
        match category_exists(&mut conn, category_id) {
            Ok(true) => {}
            Ok(false) => return error_response(StatusCode::BAD_REQUEST, "Unknown category"),
            Err(e) => return internal_error("Failed to check category", e),
        }
    }

    match title_taken(&mut conn, title, None) {
        Ok(Some(existing)) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("A recipe titled \"{}\" already exists", existing),
            )
        }
        Ok(None) => {}
        Err(e) => return internal_error("Failed to check title", e),
    }

    let slug = match slug_for(&mut conn, title, None) {
        Ok(s) => s,
        Err(e) => return internal_error("Failed to create recipe", e),
    };

    let instructions = match serde_json::to_value(normalize(request.instructions)) {
        Ok(v) => v,
        Err(e) => return internal_error("Failed to encode instructions", e),
    };
    let ingredients = clean_list(request.ingredients);
    let equipment = clean_list(request.equipment);
    let description = non_blank(request.description);
    let image = non_blank(request.image);
    let video_url = non_blank(request.video_url);

    let new_recipe = NewRecipe {
        author_id: user.id,
        category_id: request.category_id,
        title,
        slug: &slug,
        description: description.as_deref(),
        image: image.as_deref(),
        preparation_time: request.preparation_time,
        cooking_time: request.cooking_time,
        servings: request.servings,
        difficulty: request.difficulty.as_str(),
        ingredients: &ingredients,
        equipment: &equipment,
        instructions,
        has_video: request.has_video,
        video_url: video_url.as_deref(),
        status: request.status.as_str(),
    };

    let row: RecipeRow = match diesel::insert_into(recipes::table)
        .values(&new_recipe)
        .returning(RecipeRow::as_returning())
        .get_result(&mut conn)
    {
        Ok(r) => r,
        // Lost a race on the slug
        Err(e) if is_unique_violation(&e) => {
            return error_response(StatusCode::BAD_REQUEST, "A recipe with this title already exists")
        }
        Err(e) => return internal_error("Failed to create recipe", e),
    };

    tracing::info!(recipe_id = %row.id, slug = %row.slug, author_id = %user.id, "recipe created");

    match recipe_detail(&mut conn, row) {
        Ok(recipe) => (StatusCode::CREATED, Json(recipe)).into_response(),
        Err(e) => internal_error("Failed to load created recipe", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_list() {
        let items = vec![" flour ".to_string(), "".to_string(), "  ".to_string(), "salt".to_string()];
        assert_eq!(clean_list(items), vec!["flour", "salt"]);
    }
}

use crate::api::{error_response, internal_error, is_unique_violation, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{RecipeChanges, RecipeRow};
use crate::schema::recipes;
use crate::views::recipe_detail;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use ladle_core::instructions::normalize;
use ladle_core::{Recipe, RecipeStatus, UpdateRecipeRequest};
use std::sync::Arc;
use uuid::Uuid;

use super::create::clean_list;
use super::{can_edit, category_exists, slug_for, title_taken, validate_numbers};

/// What an update does to the soft-delete markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unchanged,
    /// Set all three markers
    SoftDelete(DateTime<Utc>),
    /// Clear all three markers; status becomes the given one
    Restore(RecipeStatus),
}

/// Any single soft-delete marker in the request deletes the recipe, so the
/// stored markers never disagree.
pub fn lifecycle(request: &UpdateRecipeRequest, now: DateTime<Utc>) -> Lifecycle {
    let deleting = request.is_deleted == Some(true)
        || request.status == Some(RecipeStatus::Deleted)
        || request.deleted_at.is_some();

    if deleting {
        return Lifecycle::SoftDelete(request.deleted_at.unwrap_or(now));
    }
    if request.is_deleted == Some(false) {
        return Lifecycle::Restore(request.status.unwrap_or(RecipeStatus::Draft));
    }
    Lifecycle::Unchanged
}

/// A title must be checked against the active recipes when it changes, and
/// also when a soft-deleted recipe comes back, since its title may have been
/// reused in the meantime.
pub fn needs_title_check(lifecycle: Lifecycle, title_changed: bool) -> bool {
    title_changed || matches!(lifecycle, Lifecycle::Restore(_))
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = Recipe),
        (status = 400, description = "Invalid request or duplicate title", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRecipeRequest>,
) -> Response {
    if let Err(msg) = validate_numbers(
        request.preparation_time,
        request.cooking_time,
        request.servings,
    ) {
        return error_response(StatusCode::BAD_REQUEST, msg);
    }

    let mut conn = get_conn!(pool);

    // Soft-deleted rows stay addressable so a repeated soft delete succeeds
    let existing: RecipeRow = match recipes::table
        .find(id)
        .select(RecipeRow::as_select())
        .first(&mut conn)
        .optional()
    {
        Ok(Some(r)) => r,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Recipe not found"),
        Err(e) => return internal_error("Failed to fetch recipe", e),
    };

    if !can_edit(&user, &existing) {
        return error_response(StatusCode::FORBIDDEN, "You can only edit your own recipes");
    }

    let now = Utc::now();
    let lifecycle = lifecycle(&request, now);

    let new_title = match request.title.as_deref().map(str::trim) {
        Some("") => return error_response(StatusCode::BAD_REQUEST, "Title cannot be empty"),
        Some(t) if t != existing.title => Some(t.to_string()),
        _ => None,
    };
    let title = new_title.as_deref().unwrap_or(&existing.title);

    if needs_title_check(lifecycle, new_title.is_some()) {
        match title_taken(&mut conn, title, Some(id)) {
            Ok(Some(other)) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("A recipe titled \"{}\" already exists", other),
                )
            }
            Ok(None) => {}
            Err(e) => return internal_error("Failed to check title", e),
        }
    }

    let mut changes = RecipeChanges {
        description: request.description.map(|d| d.trim().to_string()),
        image: request.image.map(|i| i.trim().to_string()),
        preparation_time: request.preparation_time,
        cooking_time: request.cooking_time,
        servings: request.servings,
        difficulty: request.difficulty.map(|d| d.as_str().to_string()),
        ingredients: request.ingredients.map(clean_list),
        equipment: request.equipment.map(clean_list),
        has_video: request.has_video,
        video_url: request.video_url.map(|v| v.trim().to_string()),
        updated_at: Some(now),
        ..RecipeChanges::default()
    };

    if let Some(title) = new_title {
        changes.slug = match slug_for(&mut conn, &title, Some(id)) {
            Ok(s) => Some(s),
            Err(e) => return internal_error("Failed to update recipe", e),
        };
        changes.title = Some(title);
    }

    if let Some(category_id) = request.category_id {
        match category_exists(&mut conn, category_id) {
            Ok(true) => changes.category_id = Some(category_id),
            Ok(false) => return error_response(StatusCode::BAD_REQUEST, "Unknown category"),
            Err(e) => return internal_error("Failed to check category", e),
        }
    }

    if let Some(instructions) = request.instructions {
        changes.instructions = match serde_json::to_value(normalize(instructions)) {
            Ok(v) => Some(v),
            Err(e) => return internal_error("Failed to encode instructions", e),
        };
    }

    match lifecycle {
        Lifecycle::SoftDelete(at) => {
            changes.status = Some(RecipeStatus::Deleted.as_str().to_string());
            changes.is_deleted = Some(true);
            changes.deleted_at = Some(at);
        }
        Lifecycle::Restore(status) => {
            changes.status = Some(status.as_str().to_string());
            changes.is_deleted = Some(false);
        }
        Lifecycle::Unchanged => {
            changes.status = request.status.map(|s| s.as_str().to_string());
        }
    }

    let result = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let row = diesel::update(recipes::table.find(id))
            .set(&changes)
            .returning(RecipeRow::as_returning())
            .get_result(conn)?;

        if !matches!(lifecycle, Lifecycle::Restore(_)) {
            return Ok(row);
        }

        // deleted_at can only be cleared explicitly; a None changeset field is skipped
        diesel::update(recipes::table.find(id))
            .set(recipes::deleted_at.eq(None::<DateTime<Utc>>))
            .returning(RecipeRow::as_returning())
            .get_result(conn)
    });

    let row = match result {
        Ok(r) => r,
        Err(e) if is_unique_violation(&e) => {
            return error_response(StatusCode::BAD_REQUEST, "A recipe with this title already exists")
        }
        Err(e) => return internal_error("Failed to update recipe", e),
    };

    if matches!(lifecycle, Lifecycle::SoftDelete(_)) {
        tracing::info!(recipe_id = %id, user_id = %user.id, "recipe soft-deleted");
    }

    match recipe_detail(&mut conn, row) {
        Ok(recipe) => (StatusCode::OK, Json(recipe)).into_response(),
        Err(e) => internal_error("Failed to load updated recipe", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_unchanged() {
        let req = UpdateRecipeRequest {
            title: Some("Soup".to_string()),
            status: Some(RecipeStatus::Archived),
            ..UpdateRecipeRequest::default()
        };
        assert_eq!(lifecycle(&req, Utc::now()), Lifecycle::Unchanged);
    }

    #[test]
    fn test_any_marker_soft_deletes() {
        let now = Utc::now();
        let by_status = UpdateRecipeRequest {
            status: Some(RecipeStatus::Deleted),
            ..UpdateRecipeRequest::default()
        };
        assert_eq!(lifecycle(&by_status, now), Lifecycle::SoftDelete(now));

        let by_flag = UpdateRecipeRequest {
            is_deleted: Some(true),
            ..UpdateRecipeRequest::default()
        };
        assert_eq!(lifecycle(&by_flag, now), Lifecycle::SoftDelete(now));

        let compensating = UpdateRecipeRequest::soft_delete(now);
        assert_eq!(lifecycle(&compensating, Utc::now()), Lifecycle::SoftDelete(now));
    }

    #[test]
    fn test_restore_defaults_to_draft() {
        let req = UpdateRecipeRequest {
            is_deleted: Some(false),
            ..UpdateRecipeRequest::default()
        };
        assert_eq!(
            lifecycle(&req, Utc::now()),
            Lifecycle::Restore(RecipeStatus::Draft)
        );
    }

    #[test]
    fn test_restore_rechecks_title() {
        let restore = UpdateRecipeRequest {
            is_deleted: Some(false),
            status: Some(RecipeStatus::Published),
            ..UpdateRecipeRequest::default()
        };
        let lifecycle = lifecycle(&restore, Utc::now());
        assert!(needs_title_check(lifecycle, false));
    }

    #[test]
    fn test_title_check_only_when_needed() {
        assert!(!needs_title_check(Lifecycle::Unchanged, false));
        assert!(!needs_title_check(Lifecycle::SoftDelete(Utc::now()), false));
        assert!(needs_title_check(Lifecycle::Unchanged, true));
    }
}

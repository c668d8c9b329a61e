pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use crate::models::{ReviewRow, User};
use crate::recipe_is_active;
use crate::schema::{recipes, reviews};
use crate::AppState;
use axum::routing::{get, put};
use axum::Router;
use diesel::pg::Pg;
use diesel::prelude::*;
use utoipa::OpenApi;

/// Reviews whose recipe is not soft-deleted.
pub fn active_reviews<'a>() -> reviews::BoxedQuery<'a, Pg> {
    reviews::table
        .filter(
            reviews::recipe_id.eq_any(
                recipes::table
                    .filter(recipe_is_active!())
                    .select(recipes::id),
            ),
        )
        .into_boxed()
}

/// Returns the router for /api/reviews endpoints (mounted at /api/reviews)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_all_reviews).post(create::create_review))
        .route("/user", get(list::list_my_reviews))
        .route("/recipe/{id}", get(list::list_recipe_reviews))
        .route(
            "/{id}",
            put(update::update_review).delete(delete::delete_review),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_all_reviews,
        list::list_my_reviews,
        list::list_recipe_reviews,
        create::create_review,
        update::update_review,
        delete::delete_review,
    ),
    components(schemas(
        ladle_core::Review,
        ladle_core::CreateReviewRequest,
        ladle_core::UpdateReviewRequest,
    ))
)]
pub struct ApiDoc;

/// Reviewers manage their own reviews; admins moderate any.
pub fn can_manage(user: &User, review: &ReviewRow) -> bool {
    review.user_id == user.id || user.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_reviews_skip_soft_deleted_recipes() {
        let sql = diesel::debug_query::<Pg, _>(&active_reviews()).to_string();
        assert!(sql.contains(r#"FROM "recipes""#), "{}", sql);
        assert!(sql.contains(r#""recipes"."is_deleted""#), "{}", sql);
        assert!(sql.contains(r#""recipes"."deleted_at" IS NULL"#), "{}", sql);
    }
}

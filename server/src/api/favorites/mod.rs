pub mod add;
pub mod check;
pub mod list;
pub mod remove;

use crate::recipe_is_active;
use crate::schema::{favorites, recipes};
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use diesel::pg::Pg;
use diesel::prelude::*;
use utoipa::OpenApi;

/// Favorites whose recipe is not soft-deleted.
pub fn active_favorites<'a>() -> favorites::BoxedQuery<'a, Pg> {
    favorites::table
        .filter(
            favorites::recipe_id.eq_any(
                recipes::table
                    .filter(recipe_is_active!())
                    .select(recipes::id),
            ),
        )
        .into_boxed()
}

/// Returns the router for /api/favorites endpoints (mounted at /api/favorites)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_favorites))
        .route("/check/{recipe_id}", get(check::check_favorite))
        .route(
            "/{recipe_id}",
            post(add::add_favorite).delete(remove::remove_favorite),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_favorites,
        check::check_favorite,
        add::add_favorite,
        remove::remove_favorite,
    ),
    components(schemas(ladle_core::FavoriteCheckResponse))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_favorites_skip_soft_deleted_recipes() {
        let sql = diesel::debug_query::<Pg, _>(&active_favorites().count()).to_string();
        assert!(sql.contains(r#""recipes"."status""#), "{}", sql);
        assert!(sql.contains(r#""recipes"."deleted_at" IS NULL"#), "{}", sql);
    }
}

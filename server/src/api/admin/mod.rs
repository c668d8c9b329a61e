pub mod stats;
pub mod users;

use crate::AppState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Admin dashboard endpoints (mounted at /api/admin)
pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats::get_stats))
}

/// User management, mounted at both /api/admin/users and /api/users
pub fn users_router() -> Router<AppState> {
    Router::new().route("/", get(users::list_users)).route(
        "/{id}",
        get(users::get_user)
            .put(users::update_user_role)
            .delete(users::delete_user),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        stats::get_stats,
        users::list_users,
        users::get_user,
        users::update_user_role,
        users::delete_user,
    ),
    components(schemas(
        ladle_core::AdminStats,
        ladle_core::EntityCounts,
        ladle_core::UpdateRoleRequest,
    ))
)]
pub struct ApiDoc;

pub mod account;
pub mod admin;
pub mod categories;
pub mod favorites;
pub mod public;
pub mod recipes;
pub mod reviews;
pub mod uploads;

use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

pub use ladle_core::ErrorResponse;

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Log an unexpected failure and answer 500 with a generic message.
pub fn internal_error(message: &str, error: impl std::fmt::Display) -> Response {
    tracing::error!("{}: {}", message, error);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

pub fn is_unique_violation(error: &diesel::result::Error) -> bool {
    matches!(
        error,
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _
        )
    )
}

/// Trim an optional text field, treating blank as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// All API routes. Authentication is enforced per handler through the
/// `AuthUser`, `MaybeAuthUser` and `AdminUser` extractors.
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(public::router())
        .nest("/api/auth", account::router())
        .nest("/api/recipes", recipes::router())
        .nest("/api/categories", categories::router())
        .nest("/api/favorites", favorites::router())
        .nest("/api/reviews", reviews::router())
        .nest(
            "/api/uploads",
            uploads::router().layer(DefaultBodyLimit::max(max_upload_bytes + 64 * 1024)),
        )
        .nest("/uploads", uploads::serve_router())
        .nest("/api/admin", admin::router())
        .nest("/api/admin/users", admin::users_router())
        .nest("/api/users", admin::users_router())
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Base spec with shared components and security
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Ladle API", description = "Recipe sharing service"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    // Add security scheme
    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    // Merge in each module's spec
    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        public::ApiDoc::openapi(),
        account::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        categories::ApiDoc::openapi(),
        favorites::ApiDoc::openapi(),
        reviews::ApiDoc::openapi(),
        uploads::ApiDoc::openapi(),
        admin::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        // Merge paths
        spec.paths.paths.extend(module_spec.paths.paths);

        // Merge components (schemas)
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ".to_string())), Some("x".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_openapi_lists_contract_paths() {
        let spec = openapi();
        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/me",
            "/api/recipes",
            "/api/recipes/{slug}",
            "/api/recipes/id/{id}",
            "/api/categories",
            "/api/favorites/check/{recipe_id}",
            "/api/reviews/recipe/{id}",
            "/api/uploads/single",
            "/api/admin/stats",
            "/api/admin/users/{id}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}

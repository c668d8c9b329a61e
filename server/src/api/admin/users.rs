use crate::api::{error_response, internal_error, ErrorResponse};
use crate::auth::{revoke_user_sessions, AdminUser};
use crate::db::DbPool;
use crate::get_conn;
use crate::models::{User, UserChanges};
use crate::schema::users;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use ladle_core::UpdateRoleRequest;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "admin",
    responses(
        (status = 200, description = "Live accounts, newest first", body = Vec<ladle_core::User>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(AdminUser(_admin): AdminUser, State(pool): State<Arc<DbPool>>) -> Response {
    let mut conn = get_conn!(pool);

    match users::table
        .filter(users::deleted_at.is_null())
        .order(users::created_at.desc())
        .select(User::as_select())
        .load::<User>(&mut conn)
    {
        Ok(rows) => {
            let users: Vec<ladle_core::User> = rows.iter().map(User::to_api).collect();
            (StatusCode::OK, Json(users)).into_response()
        }
        Err(e) => internal_error("Failed to fetch users", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = ladle_core::User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    AdminUser(_admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Response {
    let mut conn = get_conn!(pool);

    match users::table
        .find(id)
        .filter(users::deleted_at.is_null())
        .select(User::as_select())
        .first::<User>(&mut conn)
        .optional()
    {
        Ok(Some(user)) => (StatusCode::OK, Json(user.to_api())).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => internal_error("Failed to fetch user", e),
    }
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{id}",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = ladle_core::User),
        (status = 400, description = "Admins cannot change their own role", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user_role(
    AdminUser(admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Response {
    if id == admin.id {
        return error_response(StatusCode::BAD_REQUEST, "You cannot change your own role");
    }

    let mut conn = get_conn!(pool);

    match diesel::update(users::table.find(id).filter(users::deleted_at.is_null()))
        .set(&UserChanges {
            role: Some(request.role.as_str().to_string()),
            updated_at: Some(Utc::now()),
            ..UserChanges::default()
        })
        .returning(User::as_returning())
        .get_result::<User>(&mut conn)
        .optional()
    {
        Ok(Some(user)) => {
            tracing::info!(user_id = %id, admin_id = %admin.id, role = %request.role, "role changed");
            (StatusCode::OK, Json(user.to_api())).into_response()
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, "User not found"),
        Err(e) => internal_error("Failed to update role", e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "Account deactivated and signed out everywhere"),
        (status = 400, description = "Admins cannot delete themselves", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_user(
    AdminUser(admin): AdminUser,
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<Uuid>,
) -> Response {
    if id == admin.id {
        return error_response(StatusCode::BAD_REQUEST, "You cannot delete your own account");
    }

    let mut conn = get_conn!(pool);

    let result = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let updated = diesel::update(users::table.find(id).filter(users::deleted_at.is_null()))
            .set(users::deleted_at.eq(Some(Utc::now())))
            .execute(conn)?;
        if updated > 0 {
            revoke_user_sessions(conn, id, None)?;
        }
        Ok(updated)
    });

    match result {
        Ok(0) => error_response(StatusCode::NOT_FOUND, "User not found"),
        Ok(_) => {
            tracing::info!(user_id = %id, admin_id = %admin.id, "user deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => internal_error("Failed to delete user", e),
    }
}

use crate::db::DbPool;
use crate::models::{NewSession, NewUser, User, UserChanges};
use crate::schema::{sessions, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use ladle_core::Role;
use uuid::Uuid;

use super::crypto::{generate_token, hash_password, hash_token};

pub fn create_session(
    conn: &mut PgConnection,
    user_id: Uuid,
    ttl_days: i64,
) -> Result<String, diesel::result::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(ttl_days);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

pub async fn get_user_from_token(pool: &DbPool, token: &str) -> Option<User> {
    let mut conn = pool.get().ok()?;
    let token_hash = hash_token(token);

    sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .filter(users::deleted_at.is_null())
        .select(User::as_select())
        .first(&mut conn)
        .ok()
}

pub fn revoke_session(conn: &mut PgConnection, token: &str) -> Result<usize, diesel::result::Error> {
    let token_hash = hash_token(token);
    diesel::delete(sessions::table.filter(sessions::token_hash.eq(&token_hash))).execute(conn)
}

/// Revoke every session of a user, optionally keeping the one presented with
/// the current request.
pub fn revoke_user_sessions(
    conn: &mut PgConnection,
    user_id: Uuid,
    keep_token: Option<&str>,
) -> Result<usize, diesel::result::Error> {
    let keep_hash = keep_token.map(hash_token).unwrap_or_default();
    diesel::delete(
        sessions::table
            .filter(sessions::user_id.eq(user_id))
            .filter(sessions::token_hash.ne(&keep_hash)),
    )
    .execute(conn)
}

/// Create the configured admin account, or promote it if it already exists.
pub fn ensure_admin(
    pool: &DbPool,
    email: &str,
    password: &str,
) -> Result<Uuid, Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let email = email.trim().to_lowercase();

    let existing: Option<User> = users::table
        .filter(users::email.eq(&email))
        .filter(users::deleted_at.is_null())
        .select(User::as_select())
        .first(&mut conn)
        .optional()?;

    if let Some(user) = existing {
        if !user.is_admin() {
            diesel::update(users::table.find(user.id))
                .set(&UserChanges {
                    role: Some(Role::Admin.as_str().to_string()),
                    updated_at: Some(Utc::now()),
                    ..UserChanges::default()
                })
                .execute(&mut conn)?;
            tracing::info!(user_id = %user.id, "promoted bootstrap account to admin");
        }
        return Ok(user.id);
    }

    let password_hash = hash_password(password).map_err(|e| e.to_string())?;
    let id = diesel::insert_into(users::table)
        .values(&NewUser {
            name: "Administrator",
            email: &email,
            password_hash: &password_hash,
            role: Role::Admin.as_str(),
        })
        .returning(users::id)
        .get_result(&mut conn)?;

    tracing::info!(user_id = %id, "created bootstrap admin account");
    Ok(id)
}

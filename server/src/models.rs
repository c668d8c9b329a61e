use chrono::{DateTime, Utc};
use diesel::prelude::*;
use ladle_core::instructions::Instruction;
use ladle_core::{Category, CategoryRef, Difficulty, RecipeStatus, Role, UserRef};
use uuid::Uuid;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_else(|_| {
            tracing::warn!(user_id = %self.id, role = %self.role, "unknown role, treating as user");
            Role::User
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_admin()
    }

    pub fn to_api(&self) -> ladle_core::User {
        ladle_core::User {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role(),
            bio: self.bio.clone(),
            avatar: self.avatar.clone(),
            created_at: self.created_at,
        }
    }

    pub fn to_ref(&self) -> UserRef {
        UserRef {
            id: self.id,
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub bg_color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryRow {
    pub fn to_api(&self, recipe_count: i64) -> Category {
        Category {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
            bg_color: self.bg_color.clone(),
            recipe_count,
            created_at: self.created_at,
        }
    }

    pub fn to_ref(&self) -> CategoryRef {
        CategoryRef {
            id: self.id,
            name: self.name.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
            bg_color: self.bg_color.clone(),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub icon: Option<&'a str>,
    pub color: Option<&'a str>,
    pub bg_color: Option<&'a str>,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::categories)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub bg_color: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub preparation_time: i32,
    pub cooking_time: i32,
    pub servings: i32,
    pub difficulty: String,
    pub ingredients: Vec<String>,
    pub equipment: Vec<String>,
    pub instructions: serde_json::Value,
    pub has_video: bool,
    pub video_url: Option<String>,
    pub status: String,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecipeRow {
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty.parse().unwrap_or_default()
    }

    pub fn status(&self) -> RecipeStatus {
        self.status.parse().unwrap_or_default()
    }

    /// Instructions are stored as JSONB; a malformed column reads as empty.
    pub fn instructions(&self) -> Vec<Instruction> {
        serde_json::from_value(self.instructions.clone()).unwrap_or_else(|e| {
            tracing::warn!(recipe_id = %self.id, error = %e, "unreadable instructions column");
            Vec::new()
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipe<'a> {
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: &'a str,
    pub slug: &'a str,
    pub description: Option<&'a str>,
    pub image: Option<&'a str>,
    pub preparation_time: i32,
    pub cooking_time: i32,
    pub servings: i32,
    pub difficulty: &'a str,
    pub ingredients: &'a [String],
    pub equipment: &'a [String],
    pub instructions: serde_json::Value,
    pub has_video: bool,
    pub video_url: Option<&'a str>,
    pub status: &'a str,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChanges {
    pub category_id: Option<Uuid>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub preparation_time: Option<i32>,
    pub cooking_time: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<String>,
    pub ingredients: Option<Vec<String>>,
    pub equipment: Option<Vec<String>>,
    pub instructions: Option<serde_json::Value>,
    pub has_video: Option<bool>,
    pub video_url: Option<String>,
    pub status: Option<String>,
    pub is_deleted: Option<bool>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::reviews)]
pub struct NewReview<'a> {
    pub recipe_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::favorites)]
pub struct NewFavorite {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::uploads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct Upload {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_type: String,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::uploads)]
pub struct NewUpload<'a> {
    pub user_id: Uuid,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

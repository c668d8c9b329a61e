use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::CoreError;
use crate::instructions::Instruction;

/// Where the UI sends anyone without a valid session.
pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(CoreError::UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

string_enum!(Role, "role", { User => "user", Admin => "admin" });

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Page a freshly logged-in user lands on. Advisory only; the server
    /// checks the role on every admin request.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Admin => ADMIN_DASHBOARD_PATH,
            Role::User => DASHBOARD_PATH,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

string_enum!(Difficulty, "difficulty", { Easy => "easy", Medium => "medium", Hard => "hard" });

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecipeStatus {
    Draft,
    #[default]
    Published,
    Archived,
    Deleted,
}

string_enum!(RecipeStatus, "recipe status", {
    Draft => "draft",
    Published => "published",
    Archived => "archived",
    Deleted => "deleted",
});

/// Public view of a user. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Minimal author/reviewer reference embedded in other resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub bg_color: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// Mean review rating, 0 when there are no reviews
    pub average: f64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub preparation_time: i32,
    pub cooking_time: i32,
    pub servings: i32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub has_video: bool,
    #[serde(default)]
    pub video_url: Option<String>,
    pub status: RecipeStatus,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rating: RatingSummary,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub author: UserRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List projection of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub preparation_time: i32,
    pub cooking_time: i32,
    pub servings: i32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    pub status: RecipeStatus,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rating: RatingSummary,
    pub author: UserRef,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub bg_color: Option<String>,
    #[serde(default)]
    pub recipe_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub recipe_id: Uuid,
    #[serde(default)]
    pub recipe_title: Option<String>,
    pub user: UserRef,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total number of matching items
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeList {
    pub recipes: Vec<RecipeSummary>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityCounts {
    pub users: i64,
    pub recipes: i64,
    pub categories: i64,
    pub reviews: i64,
    pub favorites: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub counts: EntityCounts,
    pub recent_recipes: Vec<RecipeSummary>,
    pub recent_users: Vec<User>,
    pub recent_reviews: Vec<Review>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_landing_paths() {
        assert_eq!(Role::Admin.landing_path(), "/admin/dashboard");
        assert_eq!(Role::User.landing_path(), "/dashboard");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&RecipeStatus::Deleted).unwrap();
        assert_eq!(json, "\"deleted\"");
    }

    #[test]
    fn test_summary_wire_names_are_camel_case() {
        let summary = RecipeSummary {
            id: Uuid::nil(),
            slug: "toast".to_string(),
            title: "Toast".to_string(),
            description: None,
            image: None,
            preparation_time: 1,
            cooking_time: 2,
            servings: 1,
            difficulty: Difficulty::Easy,
            category: None,
            status: RecipeStatus::Published,
            is_deleted: false,
            deleted_at: None,
            rating: RatingSummary::default(),
            author: UserRef {
                id: Uuid::nil(),
                name: "a".to_string(),
                avatar: None,
            },
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("preparationTime").is_some());
        assert!(value.get("isDeleted").is_some());
        assert!(value.get("preparation_time").is_none());
    }
}

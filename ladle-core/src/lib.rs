pub mod error;
pub mod image;
pub mod instructions;
pub mod recipe;
pub mod requests;
pub mod review;
pub mod types;

pub use error::CoreError;
pub use image::{
    fallback_image_url, resolve_image_url, upload_path, validate_image, MAX_FILE_SIZE,
    PLACEHOLDER_IMAGE,
};
pub use instructions::Instruction;
pub use recipe::{ensure_unique_title, find_title_collision, retain_active, slugify, SoftDeletable};
pub use requests::*;
pub use types::{
    AdminStats, Category, CategoryRef, Difficulty, EntityCounts, Pagination, RatingSummary,
    Recipe, RecipeList, RecipeStatus, RecipeSummary, Review, Role, User, UserRef,
    ADMIN_DASHBOARD_PATH, DASHBOARD_PATH, LOGIN_PATH,
};

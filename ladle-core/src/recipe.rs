//! Recipe rules shared by server and client: soft-delete visibility, title
//! collisions, slugs.

use chrono::{DateTime, Utc};

use crate::error::CoreError;
use crate::types::{Recipe, RecipeStatus, RecipeSummary};

/// Anything carrying the three soft-delete markers.
pub trait SoftDeletable {
    fn is_deleted_flag(&self) -> bool;
    fn status(&self) -> RecipeStatus;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    /// Any one marker is enough to hide the recipe.
    fn is_soft_deleted(&self) -> bool {
        self.is_deleted_flag()
            || self.status() == RecipeStatus::Deleted
            || self.deleted_at().is_some()
    }
}

impl SoftDeletable for Recipe {
    fn is_deleted_flag(&self) -> bool {
        self.is_deleted
    }

    fn status(&self) -> RecipeStatus {
        self.status
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

impl SoftDeletable for RecipeSummary {
    fn is_deleted_flag(&self) -> bool {
        self.is_deleted
    }

    fn status(&self) -> RecipeStatus {
        self.status
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

pub fn is_soft_deleted(
    is_deleted: bool,
    status: RecipeStatus,
    deleted_at: Option<DateTime<Utc>>,
) -> bool {
    is_deleted || status == RecipeStatus::Deleted || deleted_at.is_some()
}

/// Drop soft-deleted entries from a listing.
pub fn retain_active<T: SoftDeletable>(items: Vec<T>) -> Vec<T> {
    items.into_iter().filter(|r| !r.is_soft_deleted()).collect()
}

/// Return the first existing title equal to `candidate` after trimming,
/// ignoring case.
pub fn find_title_collision<'a, I>(candidate: &str, existing: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let candidate = candidate.trim().to_lowercase();
    existing
        .into_iter()
        .find(|t| t.trim().to_lowercase() == candidate)
}

pub fn ensure_unique_title<'a, I>(candidate: &str, existing: I) -> Result<(), CoreError>
where
    I: IntoIterator<Item = &'a str>,
{
    match find_title_collision(candidate, existing) {
        Some(title) => Err(CoreError::DuplicateTitle(title.to_string())),
        None => Ok(()),
    }
}

/// URL slug for a title: lower-case ASCII alphanumerics separated by single
/// dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "recipe".to_string()
    } else {
        slug
    }
}

/// `base`, or `base-2`, `base-3`, ... whichever is not taken.
pub fn unique_slug(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|s| s == base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_delete_any_marker() {
        assert!(!is_soft_deleted(false, RecipeStatus::Published, None));
        assert!(is_soft_deleted(true, RecipeStatus::Published, None));
        assert!(is_soft_deleted(false, RecipeStatus::Deleted, None));
        assert!(is_soft_deleted(false, RecipeStatus::Draft, Some(Utc::now())));
    }

    #[test]
    fn test_collision_trims_and_ignores_case() {
        let existing = ["Pancakes", "Waffles"];
        assert_eq!(
            find_title_collision(" Waffles ", existing.iter().copied()),
            Some("Waffles")
        );
        assert_eq!(
            find_title_collision("waffles", existing.iter().copied()),
            Some("Waffles")
        );
        assert_eq!(find_title_collision("Waffle", existing.iter().copied()), None);
    }

    #[test]
    fn test_ensure_unique_title() {
        let err = ensure_unique_title("Pancakes", ["Pancakes"]).unwrap_err();
        assert_eq!(err, CoreError::DuplicateTitle("Pancakes".to_string()));
        assert!(ensure_unique_title("Crepes", ["Pancakes"]).is_ok());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Chicken Tikka Masala"), "chicken-tikka-masala");
        assert_eq!(slugify("  Mac & Cheese!! "), "mac-cheese");
        assert_eq!(slugify("Crème brûlée"), "cr-me-br-l-e");
        assert_eq!(slugify("!!!"), "recipe");
    }

    #[test]
    fn test_unique_slug() {
        let taken = vec!["soup".to_string(), "soup-2".to_string()];
        assert_eq!(unique_slug("soup", &taken), "soup-3");
        assert_eq!(unique_slug("stew", &taken), "stew");
    }
}

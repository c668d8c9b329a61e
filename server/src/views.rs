//! Assembles API views from database rows.
//!
//! Related rows (authors, categories, rating aggregates, reviewers) are
//! loaded in one query per kind for a whole page of results rather than
//! joined row by row.

use crate::models::{CategoryRow, RecipeRow, ReviewRow, User};
use crate::schema::{categories, recipes, reviews, users};
use diesel::dsl::{count, sum};
use diesel::prelude::*;
use ladle_core::{RatingSummary, Recipe, RecipeSummary, Review, UserRef};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

fn unique_ids(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    ids.collect::<HashSet<_>>().into_iter().collect()
}

fn missing_user(id: Uuid) -> UserRef {
    UserRef {
        id,
        name: "Deleted user".to_string(),
        avatar: None,
    }
}

pub fn load_user_refs(
    conn: &mut PgConnection,
    ids: impl Iterator<Item = Uuid>,
) -> QueryResult<HashMap<Uuid, UserRef>> {
    let ids = unique_ids(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<User> = users::table
        .filter(users::id.eq_any(&ids))
        .select(User::as_select())
        .load(conn)?;

    Ok(rows.iter().map(|u| (u.id, u.to_ref())).collect())
}

fn load_categories(
    conn: &mut PgConnection,
    ids: impl Iterator<Item = Uuid>,
) -> QueryResult<HashMap<Uuid, CategoryRow>> {
    let ids = unique_ids(ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<CategoryRow> = categories::table
        .filter(categories::id.eq_any(&ids))
        .select(CategoryRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(|c| (c.id, c)).collect())
}

/// Rating aggregate per recipe. Recipes without reviews are absent.
pub fn load_ratings(
    conn: &mut PgConnection,
    recipe_ids: &[Uuid],
) -> QueryResult<HashMap<Uuid, RatingSummary>> {
    if recipe_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, Option<i64>, i64)> = reviews::table
        .filter(reviews::recipe_id.eq_any(recipe_ids))
        .group_by(reviews::recipe_id)
        .select((reviews::recipe_id, sum(reviews::rating), count(reviews::id)))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, total, n)| (id, rating_summary(total.unwrap_or(0), n)))
        .collect())
}

pub fn rating_summary(total: i64, count: i64) -> RatingSummary {
    if count == 0 {
        return RatingSummary::default();
    }
    // One decimal place, as shown next to the stars
    let average = (total as f64 / count as f64 * 10.0).round() / 10.0;
    RatingSummary { average, count }
}

pub fn recipe_summaries(
    conn: &mut PgConnection,
    rows: Vec<RecipeRow>,
) -> QueryResult<Vec<RecipeSummary>> {
    let authors = load_user_refs(conn, rows.iter().map(|r| r.author_id))?;
    let cats = load_categories(conn, rows.iter().filter_map(|r| r.category_id))?;
    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let ratings = load_ratings(conn, &ids)?;

    Ok(rows
        .into_iter()
        .map(|r| RecipeSummary {
            id: r.id,
            difficulty: r.difficulty(),
            status: r.status(),
            slug: r.slug,
            title: r.title,
            description: r.description,
            image: r.image,
            preparation_time: r.preparation_time,
            cooking_time: r.cooking_time,
            servings: r.servings,
            category: r
                .category_id
                .and_then(|id| cats.get(&id))
                .map(CategoryRow::to_ref),
            is_deleted: r.is_deleted,
            deleted_at: r.deleted_at,
            rating: ratings.get(&r.id).copied().unwrap_or_default(),
            author: authors
                .get(&r.author_id)
                .cloned()
                .unwrap_or_else(|| missing_user(r.author_id)),
            created_at: r.created_at,
        })
        .collect())
}

pub fn recipe_detail(conn: &mut PgConnection, row: RecipeRow) -> QueryResult<Recipe> {
    let review_rows: Vec<ReviewRow> = reviews::table
        .filter(reviews::recipe_id.eq(row.id))
        .order(reviews::created_at.desc())
        .select(ReviewRow::as_select())
        .load(conn)?;
    let reviews = reviews_view(conn, review_rows)?;

    let total: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    let rating = rating_summary(total, reviews.len() as i64);

    let author = load_user_refs(conn, std::iter::once(row.author_id))?
        .remove(&row.author_id)
        .unwrap_or_else(|| missing_user(row.author_id));

    let category = match row.category_id {
        Some(id) => categories::table
            .find(id)
            .select(CategoryRow::as_select())
            .first(conn)
            .optional()?
            .map(|c| c.to_ref()),
        None => None,
    };

    Ok(Recipe {
        id: row.id,
        difficulty: row.difficulty(),
        status: row.status(),
        instructions: row.instructions(),
        slug: row.slug,
        title: row.title,
        description: row.description,
        image: row.image,
        preparation_time: row.preparation_time,
        cooking_time: row.cooking_time,
        servings: row.servings,
        category,
        ingredients: row.ingredients,
        equipment: row.equipment,
        has_video: row.has_video,
        video_url: row.video_url,
        is_deleted: row.is_deleted,
        deleted_at: row.deleted_at,
        rating,
        reviews,
        author,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn reviews_view(conn: &mut PgConnection, rows: Vec<ReviewRow>) -> QueryResult<Vec<Review>> {
    let reviewers = load_user_refs(conn, rows.iter().map(|r| r.user_id))?;

    let recipe_ids = unique_ids(rows.iter().map(|r| r.recipe_id));
    let titles: HashMap<Uuid, String> = if recipe_ids.is_empty() {
        HashMap::new()
    } else {
        recipes::table
            .filter(recipes::id.eq_any(&recipe_ids))
            .select((recipes::id, recipes::title))
            .load::<(Uuid, String)>(conn)?
            .into_iter()
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|r| Review {
            id: r.id,
            recipe_id: r.recipe_id,
            recipe_title: titles.get(&r.recipe_id).cloned(),
            user: reviewers
                .get(&r.user_id)
                .cloned()
                .unwrap_or_else(|| missing_user(r.user_id)),
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_summary_empty() {
        assert_eq!(rating_summary(0, 0), RatingSummary::default());
    }

    #[test]
    fn test_rating_summary_rounds_to_one_decimal() {
        let s = rating_summary(14, 3);
        assert_eq!(s.count, 3);
        assert!((s.average - 4.7).abs() < f64::EPSILON);
    }
}

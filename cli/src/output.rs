//! Plain text rendering of API resources.

use ladle_client::LadleClient;
use ladle_core::{AdminStats, Category, Recipe, RecipeList, RecipeSummary, Review, User};

pub fn user(user: &User) {
    println!("{}  {} <{}> [{}]", user.id, user.name, user.email, user.role);
    if let Some(bio) = &user.bio {
        println!("    {}", bio);
    }
}

fn rating(average: f64, count: i64) -> String {
    if count == 0 {
        "no ratings".to_string()
    } else {
        format!("{:.1}/5 ({})", average, count)
    }
}

fn summary_line(r: &RecipeSummary) -> String {
    let category = r.category.as_ref().map(|c| c.name.as_str()).unwrap_or("-");
    format!(
        "{}  {:<32} {:<9} {:<8} {:<12} {}  by {}",
        r.id,
        r.title,
        r.status.as_str(),
        r.difficulty.as_str(),
        category,
        rating(r.rating.average, r.rating.count),
        r.author.name
    )
}

pub fn summaries(recipes: &[RecipeSummary]) {
    if recipes.is_empty() {
        println!("No recipes");
    }
    for r in recipes {
        println!("{}", summary_line(r));
    }
}

pub fn recipe_list(list: &RecipeList) {
    summaries(&list.recipes);
    let p = list.pagination;
    println!(
        "-- {} of {} (offset {})",
        list.recipes.len(),
        p.total,
        p.offset
    );
}

pub fn recipe(client: &LadleClient, r: &Recipe) {
    println!("{} [{}]", r.title, r.status);
    println!("slug: {}  id: {}", r.slug, r.id);
    println!("by {}", r.author.name);
    if let Some(category) = &r.category {
        println!("category: {}", category.name);
    }
    println!("image: {}", client.image_url(r.image.as_deref()));
    println!(
        "prep {} min, cook {} min, serves {}, {}",
        r.preparation_time, r.cooking_time, r.servings, r.difficulty
    );
    println!("rating: {}", rating(r.rating.average, r.rating.count));
    if let Some(description) = &r.description {
        println!();
        println!("{}", description);
    }
    if !r.ingredients.is_empty() {
        println!();
        println!("Ingredients:");
        for i in &r.ingredients {
            println!("  - {}", i);
        }
    }
    if !r.equipment.is_empty() {
        println!();
        println!("Equipment:");
        for e in &r.equipment {
            println!("  - {}", e);
        }
    }
    if !r.instructions.is_empty() {
        println!();
        println!("Instructions:");
        crate::steps::print(&r.instructions);
    }
    if let Some(video) = r.video_url.as_deref().filter(|_| r.has_video) {
        println!();
        println!("video: {}", video);
    }
    if !r.reviews.is_empty() {
        println!();
        reviews(&r.reviews);
    }
}

pub fn categories(categories: &[Category]) {
    for c in categories {
        println!("{}  {:<24} {} recipes", c.id, c.name, c.recipe_count);
    }
}

pub fn reviews(reviews: &[Review]) {
    if reviews.is_empty() {
        println!("No reviews");
    }
    for r in reviews {
        let on = r.recipe_title.as_deref().unwrap_or("");
        println!("{}  {}/5  {}  {}", r.id, r.rating, r.user.name, on);
        println!("    {}", r.comment);
    }
}

pub fn stats(stats: &AdminStats) {
    let c = stats.counts;
    println!(
        "users {}  recipes {}  categories {}  reviews {}  favorites {}",
        c.users, c.recipes, c.categories, c.reviews, c.favorites
    );
    println!();
    println!("Recent recipes:");
    summaries(&stats.recent_recipes);
    println!();
    println!("Recent users:");
    for u in &stats.recent_users {
        user(u);
    }
    println!();
    println!("Recent reviews:");
    reviews(&stats.recent_reviews);
}

use anyhow::{Context, Result};
use ladle_client::{ApiError, LadleClient};
use ladle_core::instructions::from_lines;
use ladle_core::{Category, CategoryRequest, CreateRecipeRequest, Difficulty, RecipeStatus, RegisterRequest};
use uuid::Uuid;

struct SeedCategory {
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    color: &'static str,
    bg_color: &'static str,
}

const SAMPLE_CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Breakfast",
        description: "Start the day right",
        icon: "sunrise",
        color: "#b45309",
        bg_color: "#fef3c7",
    },
    SeedCategory {
        name: "Dinner",
        description: "Evening mains",
        icon: "utensils",
        color: "#1d4ed8",
        bg_color: "#dbeafe",
    },
    SeedCategory {
        name: "Baking",
        description: "Breads, cakes and pastry",
        icon: "cake",
        color: "#be185d",
        bg_color: "#fce7f3",
    },
    SeedCategory {
        name: "Salads",
        description: "Fresh and light",
        icon: "leaf",
        color: "#15803d",
        bg_color: "#dcfce7",
    },
];

struct SeedRecipe {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    difficulty: Difficulty,
    preparation_time: i32,
    cooking_time: i32,
    servings: i32,
    ingredients: &'static [&'static str],
    equipment: &'static [&'static str],
    instructions: &'static str,
}

const SAMPLE_RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        title: "Classic Spaghetti Carbonara",
        description: "A rich and creamy Italian pasta dish with eggs, cheese, and pancetta.",
        category: "Dinner",
        difficulty: Difficulty::Medium,
        preparation_time: 10,
        cooking_time: 15,
        servings: 4,
        ingredients: &[
            "400 g spaghetti",
            "200 g pancetta or guanciale",
            "4 large eggs",
            "100 g Pecorino Romano, freshly grated",
            "2 tsp black pepper, freshly ground",
            "salt for the pasta water",
        ],
        equipment: &["large pot", "frying pan"],
        instructions: "Bring a large pot of salted water to boil and cook spaghetti until al dente.
Fry the cubed pancetta until crispy.
Whisk together eggs, grated Pecorino Romano, and black pepper.
Reserve a cup of pasta water, then drain.
Off the heat, toss the hot pasta with the pancetta and the egg mixture.
Loosen with pasta water as needed and serve immediately.",
    },
    SeedRecipe {
        title: "Banana Bread",
        description: "Moist banana bread, perfect for using up overripe bananas.",
        category: "Baking",
        difficulty: Difficulty::Easy,
        preparation_time: 15,
        cooking_time: 60,
        servings: 8,
        ingredients: &[
            "3 large ripe bananas",
            "1/3 cup butter, melted",
            "3/4 cup sugar",
            "1 large egg",
            "1 tsp vanilla extract",
            "1 tsp baking soda",
            "1/4 tsp salt",
            "1.5 cups all-purpose flour",
        ],
        equipment: &["9x5 inch loaf pan", "mixing bowl"],
        instructions: "Preheat oven to 175°C and grease the loaf pan.
Mash bananas in a large bowl until smooth.
Mix in melted butter, then sugar, egg, and vanilla.
Stir in baking soda and salt, then fold in flour until just combined.
Bake for 55-65 minutes until a toothpick comes out clean.",
    },
    SeedRecipe {
        title: "Overnight Oats",
        description: "No-cook oats that are ready when you wake up.",
        category: "Breakfast",
        difficulty: Difficulty::Easy,
        preparation_time: 5,
        cooking_time: 0,
        servings: 1,
        ingredients: &[
            "1/2 cup rolled oats",
            "1/2 cup milk",
            "1/4 cup yogurt",
            "1 tbsp chia seeds",
            "1 tsp honey",
        ],
        equipment: &["jar with lid"],
        instructions: "Combine oats, milk, yogurt, chia seeds, and honey in the jar.
Stir well, close the lid and refrigerate overnight.
Top with fruit before serving.",
    },
    SeedRecipe {
        title: "Greek Salad",
        description: "Fresh Mediterranean salad with feta cheese and olives.",
        category: "Salads",
        difficulty: Difficulty::Easy,
        preparation_time: 15,
        cooking_time: 0,
        servings: 4,
        ingredients: &[
            "4 tomatoes, cut into wedges",
            "1 cucumber, sliced",
            "1 red onion, thinly sliced",
            "1/2 cup Kalamata olives",
            "200 g feta cheese",
            "3 tbsp olive oil",
            "1 tbsp red wine vinegar",
            "1 tsp dried oregano",
        ],
        equipment: &["large bowl"],
        instructions: "Combine tomatoes, cucumber, and onion in a large bowl.
Add olives and the feta.
Dress with olive oil, vinegar, and oregano, then season to taste.",
    },
    SeedRecipe {
        title: "Mushroom Risotto",
        description: "Creamy Italian rice dish with savory mushrooms and Parmesan cheese.",
        category: "Dinner",
        difficulty: Difficulty::Hard,
        preparation_time: 15,
        cooking_time: 35,
        servings: 4,
        ingredients: &[
            "1.5 cups arborio rice",
            "6 cups vegetable broth",
            "300 g mixed mushrooms, sliced",
            "2 shallots, minced",
            "1/2 cup white wine",
            "3 tbsp butter",
            "1/2 cup Parmesan, grated",
        ],
        equipment: &["saucepan", "wide pan", "ladle"],
        instructions: "Keep the broth warm over low heat.
Sauté mushrooms in butter until golden and set aside.
Soften the shallots, then toast the rice for 2 minutes.
Add the wine and stir until absorbed.
Add broth a ladle at a time, stirring until each is absorbed, for about 20 minutes.
Stir in mushrooms, butter, and Parmesan and season to taste.",
    },
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn category_id(categories: &[Category], name: &str) -> Option<Uuid> {
    categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map(|c| c.id)
}

async fn sign_in(client: &LadleClient, name: &str, email: &str, password: &str) -> Result<()> {
    match client.login(email, password).await {
        Ok(outcome) => {
            println!("Signed in as {} ({})", outcome.user.email, outcome.user.role);
            Ok(())
        }
        Err(ApiError::Unauthorized(_)) => {
            client
                .register(&RegisterRequest {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await
                .context("Failed to create user")?;
            println!("Created new user: {}", email);
            Ok(())
        }
        Err(e) => Err(e).context("Failed to sign in"),
    }
}

/// Categories can only be created by an admin; other accounts seed recipes
/// into whatever categories already exist.
async fn ensure_categories(client: &LadleClient) -> Result<Vec<Category>> {
    let mut categories = client.list_categories().await?;
    let is_admin = client.session().role().is_some_and(|r| r.is_admin());

    if !is_admin {
        println!("Not an admin, using the {} existing categories", categories.len());
        return Ok(categories);
    }

    for seed in SAMPLE_CATEGORIES {
        if category_id(&categories, seed.name).is_some() {
            continue;
        }
        let created = client
            .create_category(&CategoryRequest {
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
                icon: Some(seed.icon.to_string()),
                color: Some(seed.color.to_string()),
                bg_color: Some(seed.bg_color.to_string()),
            })
            .await
            .with_context(|| format!("Failed to create category: {}", seed.name))?;
        println!("  Created category: {}", created.name);
        categories.push(created);
    }
    Ok(categories)
}

pub async fn seed(client: &LadleClient, name: &str, email: &str, password: &str) -> Result<()> {
    sign_in(client, name, email, password).await?;
    let categories = ensure_categories(client).await?;

    println!("Creating {} sample recipes...", SAMPLE_RECIPES.len());
    let mut created = 0;

    for recipe in SAMPLE_RECIPES {
        let request = CreateRecipeRequest {
            title: recipe.title.to_string(),
            description: Some(recipe.description.to_string()),
            image: None,
            preparation_time: recipe.preparation_time,
            cooking_time: recipe.cooking_time,
            servings: recipe.servings,
            difficulty: recipe.difficulty,
            category_id: category_id(&categories, recipe.category),
            ingredients: strings(recipe.ingredients),
            equipment: strings(recipe.equipment),
            instructions: from_lines(recipe.instructions.lines()),
            has_video: false,
            video_url: None,
            status: RecipeStatus::Published,
        };

        match client.create_recipe_checked(&request).await {
            Ok(_) => {
                created += 1;
                println!("  Created: {}", recipe.title);
            }
            Err(ApiError::DuplicateTitle(_)) => {
                println!("  Skipped (already exists): {}", recipe.title);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to create recipe: {}", recipe.title))
            }
        }
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("SEED DATA COMPLETE ({} new recipes)", created);
    println!("{}", "=".repeat(50));
    println!("Email:    {}", email);
    println!("Password: {}", password);
    println!("Base URL: {}", client.base_url());
    println!("{}", "=".repeat(50));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_recipes_are_well_formed() {
        for recipe in SAMPLE_RECIPES {
            assert!(!from_lines(recipe.instructions.lines()).is_empty(), "{}", recipe.title);
            assert!(
                SAMPLE_CATEGORIES.iter().any(|c| c.name == recipe.category),
                "{} has unknown category {}",
                recipe.title,
                recipe.category
            );
        }
    }

    #[test]
    fn test_seed_titles_are_unique() {
        let titles: Vec<&str> = SAMPLE_RECIPES.iter().map(|r| r.title).collect();
        for (i, title) in titles.iter().enumerate() {
            assert!(ladle_core::find_title_collision(title, titles[i + 1..].iter().copied()).is_none());
        }
    }
}

mod output;
mod seed;
mod steps;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use ladle_client::{ApiError, ClientConfig, FavoriteToggle, LadleClient, RecipeFilter, RecipeSort};
use ladle_core::{
    CategoryRequest, CreateRecipeRequest, Difficulty, RecipeStatus, RegisterRequest, Role,
    UpdateCategoryRequest, UpdateProfileRequest, UpdateRecipeRequest, UpdateReviewRequest,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "ladle")]
#[command(about = "Ladle recipe sharing CLI", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, global = true, env = "LADLE_API_URL")]
    server: Option<String>,

    /// Where the session token is kept
    #[arg(long, global = true, env = "LADLE_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ping the server (unauthenticated)
    Ping,
    /// Create an account and sign in as it
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in account
    Me,
    /// Update the signed-in account's profile
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// Image path or URL
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Change the signed-in account's password
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
    #[command(subcommand)]
    Recipes(RecipeCommand),
    #[command(subcommand)]
    Categories(CategoryCommand),
    #[command(subcommand)]
    Favorites(FavoriteCommand),
    #[command(subcommand)]
    Reviews(ReviewCommand),
    /// Upload an image and print its stored path
    Upload { file: PathBuf },
    #[command(subcommand)]
    Admin(AdminCommand),
    /// Seed the server with sample categories and recipes
    Seed {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Display name when the account has to be created
        #[arg(long, default_value = "Seed Cook")]
        name: String,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Search title and description
    #[arg(long)]
    search: Option<String>,
    /// Category ID
    #[arg(long)]
    category: Option<Uuid>,
    #[arg(long)]
    difficulty: Option<Difficulty>,
    #[arg(long)]
    status: Option<RecipeStatus>,
    /// Only my recipes
    #[arg(long)]
    mine: bool,
    #[arg(long, default_value_t = 20)]
    limit: i64,
    #[arg(long, default_value_t = 0)]
    offset: i64,
    /// newest, oldest, title, rating or popular
    #[arg(long)]
    sort: Option<RecipeSort>,
}

impl ListArgs {
    fn filter(&self) -> RecipeFilter {
        let mut filter = RecipeFilter::new().page(self.limit, self.offset);
        filter.search = self.search.clone();
        filter.category = self.category;
        filter.difficulty = self.difficulty;
        filter.status = self.status;
        filter.mine = self.mine;
        filter.sort = self.sort;
        filter
    }
}

#[derive(Subcommand)]
enum RecipeCommand {
    /// List recipes
    List(ListArgs),
    /// Show a recipe by slug or ID
    Show { recipe: String },
    /// Create a recipe from a JSON file
    Create {
        file: PathBuf,
        /// Skip the duplicate title check
        #[arg(long)]
        force: bool,
    },
    /// Apply a JSON patch file to a recipe
    Update { id: Uuid, file: PathBuf },
    /// Delete a recipe
    Delete { id: Uuid },
    /// Bring a soft-deleted recipe back
    Restore {
        id: Uuid,
        #[arg(long, default_value = "draft")]
        status: RecipeStatus,
    },
    /// Edit a recipe's instruction steps
    Steps {
        /// Recipe slug or ID
        recipe: String,
        #[command(subcommand)]
        action: steps::StepAction,
    },
}

#[derive(Subcommand)]
enum CategoryCommand {
    List,
    /// Create a category (admin)
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        bg_color: Option<String>,
    },
    /// Update a category (admin)
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        bg_color: Option<String>,
    },
    /// Delete a category (admin)
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum FavoriteCommand {
    List,
    Add { recipe_id: Uuid },
    Remove { recipe_id: Uuid },
    /// Flip the favorite state of a recipe
    Toggle { recipe_id: Uuid },
    Check { recipe_id: Uuid },
}

#[derive(Subcommand)]
enum ReviewCommand {
    /// Every review (admin)
    List,
    /// Reviews of one recipe
    Recipe { recipe_id: Uuid },
    /// My reviews
    Mine,
    Add {
        recipe_id: Uuid,
        #[arg(long)]
        rating: i32,
        #[arg(long)]
        comment: String,
    },
    Update {
        id: Uuid,
        #[arg(long)]
        rating: Option<i32>,
        #[arg(long)]
        comment: Option<String>,
    },
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Site-wide counts and recent activity
    Stats,
    Users,
    User { id: Uuid },
    /// Change a user's role
    Role { id: Uuid, role: Role },
    DeleteUser { id: Uuid },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(path) = e.downcast_ref::<ApiError>().and_then(ApiError::redirect) {
                eprintln!("Sign in again with `ladle login` (web: {}).", path);
            }
            ExitCode::FAILURE
        }
    }
}

fn client(cli: &Cli) -> Result<LadleClient> {
    let mut builder = ClientConfig::builder();
    if let Some(server) = &cli.server {
        builder = builder.api_base_url(server);
    }
    if let Some(path) = &cli.session_file {
        builder = builder.session_file(path);
    }
    let config = builder.build()?;
    Ok(LadleClient::new(&config)?)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

async fn run(cli: Cli) -> Result<()> {
    let client = client(&cli)?;

    match cli.command {
        Commands::Ping => println!("{}", client.ping().await?),
        Commands::Register {
            name,
            email,
            password,
        } => {
            let outcome = client
                .register(&RegisterRequest {
                    name,
                    email,
                    password,
                })
                .await?;
            println!("Registered {} ({})", outcome.user.name, outcome.user.email);
        }
        Commands::Login { email, password } => {
            let outcome = client.login(&email, &password).await?;
            println!(
                "Signed in as {} ({}), landing page {}",
                outcome.user.name, outcome.user.role, outcome.redirect
            );
        }
        Commands::Logout => {
            client.logout().await?;
            println!("Signed out");
        }
        Commands::Me => output::user(&client.me().await?),
        Commands::Profile {
            name,
            email,
            bio,
            avatar,
        } => {
            let user = client
                .update_profile(&UpdateProfileRequest {
                    name,
                    email,
                    bio,
                    avatar,
                })
                .await?;
            output::user(&user);
        }
        Commands::Password { current, new } => {
            println!("{}", client.change_password(&current, &new).await?);
        }
        Commands::Recipes(command) => recipes(&client, command).await?,
        Commands::Categories(command) => categories(&client, command).await?,
        Commands::Favorites(command) => favorites(&client, command).await?,
        Commands::Reviews(command) => reviews(&client, command).await?,
        Commands::Upload { file } => {
            let data = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            let uploaded = client.upload_image(&name, data).await?;
            println!("{}", uploaded.path);
            println!("{}", client.image_url(Some(&uploaded.path)));
        }
        Commands::Admin(command) => admin(&client, command).await?,
        Commands::Seed {
            email,
            password,
            name,
        } => seed::seed(&client, &name, &email, &password).await?,
    }

    Ok(())
}

/// A recipe argument is an ID when it parses as one, otherwise a slug.
async fn fetch_recipe(client: &LadleClient, recipe: &str) -> Result<ladle_core::Recipe> {
    let recipe = match recipe.parse::<Uuid>() {
        Ok(id) => client.get_recipe_by_id(id).await?,
        Err(_) => client.get_recipe(recipe).await?,
    };
    Ok(recipe)
}

async fn recipes(client: &LadleClient, command: RecipeCommand) -> Result<()> {
    match command {
        RecipeCommand::List(args) => {
            let list = client.list_recipes(&args.filter()).await?;
            output::recipe_list(&list);
        }
        RecipeCommand::Show { recipe } => {
            let recipe = fetch_recipe(client, &recipe).await?;
            output::recipe(client, &recipe);
        }
        RecipeCommand::Create { file, force } => {
            let request: CreateRecipeRequest = read_json(&file)?;
            let recipe = if force {
                client.create_recipe(&request).await?
            } else {
                client.create_recipe_checked(&request).await?
            };
            println!("Created {} ({})", recipe.title, recipe.slug);
        }
        RecipeCommand::Update { id, file } => {
            let request: UpdateRecipeRequest = read_json(&file)?;
            let recipe = client.update_recipe(id, &request).await?;
            println!("Updated {} ({})", recipe.title, recipe.status);
        }
        RecipeCommand::Delete { id } => {
            let outcome = client.delete_recipe(id).await?;
            println!("{:?}", outcome);
        }
        RecipeCommand::Restore { id, status } => {
            if status == RecipeStatus::Deleted {
                bail!("Cannot restore a recipe into the deleted status");
            }
            let request = UpdateRecipeRequest {
                is_deleted: Some(false),
                status: Some(status),
                ..UpdateRecipeRequest::default()
            };
            let recipe = client.update_recipe(id, &request).await?;
            println!("Restored {} as {}", recipe.title, recipe.status);
        }
        RecipeCommand::Steps { recipe, action } => {
            let recipe = fetch_recipe(client, &recipe).await?;
            steps::run(client, recipe, action).await?;
        }
    }
    Ok(())
}

async fn categories(client: &LadleClient, command: CategoryCommand) -> Result<()> {
    match command {
        CategoryCommand::List => output::categories(&client.list_categories().await?),
        CategoryCommand::Create {
            name,
            description,
            icon,
            color,
            bg_color,
        } => {
            let category = client
                .create_category(&CategoryRequest {
                    name,
                    description,
                    icon,
                    color,
                    bg_color,
                })
                .await?;
            println!("Created category {} ({})", category.name, category.id);
        }
        CategoryCommand::Update {
            id,
            name,
            description,
            icon,
            color,
            bg_color,
        } => {
            let category = client
                .update_category(
                    id,
                    &UpdateCategoryRequest {
                        name,
                        description,
                        icon,
                        color,
                        bg_color,
                    },
                )
                .await?;
            println!("Updated category {}", category.name);
        }
        CategoryCommand::Delete { id } => {
            client.delete_category(id).await?;
            println!("Deleted category {}", id);
        }
    }
    Ok(())
}

async fn favorites(client: &LadleClient, command: FavoriteCommand) -> Result<()> {
    match command {
        FavoriteCommand::List => output::summaries(&client.list_favorites().await?),
        FavoriteCommand::Add { recipe_id } => {
            client.add_favorite(recipe_id).await?;
            println!("Added to favorites");
        }
        FavoriteCommand::Remove { recipe_id } => {
            client.remove_favorite(recipe_id).await?;
            println!("Removed from favorites");
        }
        FavoriteCommand::Toggle { recipe_id } => {
            let mut state = FavoriteToggle::Committed(client.is_favorite(recipe_id).await?);
            let now = client.toggle_favorite(recipe_id, &mut state).await?;
            println!("{}", if now { "Favorited" } else { "Unfavorited" });
        }
        FavoriteCommand::Check { recipe_id } => {
            println!("{}", client.is_favorite(recipe_id).await?);
        }
    }
    Ok(())
}

async fn reviews(client: &LadleClient, command: ReviewCommand) -> Result<()> {
    match command {
        ReviewCommand::List => output::reviews(&client.list_reviews().await?),
        ReviewCommand::Recipe { recipe_id } => {
            output::reviews(&client.recipe_reviews(recipe_id).await?)
        }
        ReviewCommand::Mine => output::reviews(&client.my_reviews().await?),
        ReviewCommand::Add {
            recipe_id,
            rating,
            comment,
        } => {
            let review = client.create_review(recipe_id, rating, &comment).await?;
            println!("Posted review {}", review.id);
        }
        ReviewCommand::Update {
            id,
            rating,
            comment,
        } => {
            let review = client
                .update_review(id, &UpdateReviewRequest { rating, comment })
                .await?;
            println!("Updated review {} ({}/5)", review.id, review.rating);
        }
        ReviewCommand::Delete { id } => {
            client.delete_review(id).await?;
            println!("Deleted review {}", id);
        }
    }
    Ok(())
}

async fn admin(client: &LadleClient, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Stats => output::stats(&client.admin_stats().await?),
        AdminCommand::Users => {
            for user in client.list_users().await? {
                output::user(&user);
            }
        }
        AdminCommand::User { id } => output::user(&client.get_user(id).await?),
        AdminCommand::Role { id, role } => {
            let user = client.update_user_role(id, role).await?;
            println!("{} is now {}", user.email, user.role);
        }
        AdminCommand::DeleteUser { id } => {
            client.delete_user(id).await?;
            println!("Deleted user {}", id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_args_build_filter() {
        let cli = Cli::try_parse_from([
            "ladle", "recipes", "list", "--difficulty", "hard", "--sort", "rating", "--mine",
        ])
        .unwrap();
        let Commands::Recipes(RecipeCommand::List(args)) = cli.command else {
            panic!("expected recipes list");
        };
        let filter = args.filter();
        assert_eq!(filter.difficulty, Some(Difficulty::Hard));
        assert_eq!(filter.sort, Some(RecipeSort::Rating));
        assert!(filter.mine);
        assert_eq!(filter.limit, Some(20));
    }
}

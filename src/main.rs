use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mealbuddy::config::Config;
use mealbuddy::controllers::{
    add_pantry_item, create_meal_plan, create_recipe, generate_grocery_list,
    get_expiring_pantry_items, get_grocery_list, get_pantry_stats, grocery_list_summary,
    list_meal_plans, list_pantry_items, list_recipes, set_item_purchased,
};
use mealbuddy::models::api::{
    ExpiryWindow, GenerateGroceryListRequest, NewMealPlan, NewPantryItem, PantryQuery, Recipe,
};
use serde::Serialize;
use sqlx::{SqlitePool, migrate::MigrateDatabase, sqlite::SqlitePoolOptions};

/// mealbuddy - meal plans, pantry and grocery lists
#[derive(Parser)]
#[command(name = "mealbuddy")]
#[command(about = "Plan meals, track the pantry and build grocery lists", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    /// Owner whose data the command reads and writes
    #[arg(long, global = true, default_value_t = 1)]
    owner: i64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database if needed and run migrations
    Migrate,
    #[command(subcommand)]
    Recipe(RecipeCommand),
    #[command(subcommand)]
    MealPlan(MealPlanCommand),
    #[command(subcommand)]
    Pantry(PantryCommand),
    #[command(subcommand)]
    Grocery(GroceryCommand),
}

#[derive(Subcommand)]
enum RecipeCommand {
    /// Import one recipe or an array of recipes from a JSON file
    Import { file: PathBuf },
    List,
}

#[derive(Subcommand)]
enum MealPlanCommand {
    /// Create a meal plan from a JSON file
    Create { file: PathBuf },
    List,
}

#[derive(Subcommand)]
enum PantryCommand {
    /// Add stock, topping up an existing item with the same name and unit
    Add {
        name: String,
        quantity: f64,
        unit: String,
        #[arg(long)]
        category: Option<String>,
        /// Expiry date (YYYY-MM-DD)
        #[arg(long)]
        expires: Option<NaiveDate>,
    },
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 50)]
        limit: u32,
        /// Only items expiring within the configured window
        #[arg(long)]
        expiring: bool,
    },
    /// Items expiring soon and items already expired
    Expiring {
        /// Look-ahead window (defaults to the configured value)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Item totals, expiry counts and a per-category breakdown
    Stats {
        #[arg(long)]
        days: Option<u32>,
    },
}

#[derive(Subcommand)]
enum GroceryCommand {
    /// Generate and store a grocery list from a meal plan
    Generate {
        meal_plan_id: i64,
        #[arg(long)]
        name: Option<String>,
        /// Leave out ingredients the pantry already covers
        #[arg(long, overrides_with = "include_pantry")]
        exclude_pantry: bool,
        /// Keep ingredients the pantry already covers
        #[arg(long, overrides_with = "exclude_pantry")]
        include_pantry: bool,
    },
    Show { id: i64 },
    /// Mark the item at `index` (0-based) as purchased
    Check {
        id: i64,
        index: usize,
        /// Mark the item as not purchased instead
        #[arg(long)]
        undo: bool,
    },
    Summary { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    mealbuddy::observability::init_observability(&config.observability.log_level)?;

    match cli.command {
        Commands::Migrate => migrate_command(&config).await,
        Commands::Recipe(command) => {
            let pool = connect(&config).await?;
            recipe_command(&pool, command).await
        }
        Commands::MealPlan(command) => {
            let pool = connect(&config).await?;
            meal_plan_command(&pool, cli.owner, command).await
        }
        Commands::Pantry(command) => {
            let pool = connect(&config).await?;
            pantry_command(&pool, &config, cli.owner, command).await
        }
        Commands::Grocery(command) => {
            let pool = connect(&config).await?;
            grocery_command(&pool, &config, cli.owner, command).await
        }
    }
}

async fn connect(config: &Config) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .with_context(|| {
            format!(
                "Failed to open {}, run `mealbuddy migrate` first",
                config.database.url
            )
        })?;

    Ok(pool)
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: &Config) -> Result<()> {
    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;

    mealbuddy::run_migrations(&pool).await?;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

async fn recipe_command(pool: &SqlitePool, command: RecipeCommand) -> Result<()> {
    match command {
        RecipeCommand::Import { file } => {
            let recipes = read_recipes(&file)?;
            let mut ids = Vec::with_capacity(recipes.len());
            for recipe in &recipes {
                ids.push(create_recipe(pool, recipe).await?);
            }
            print_json(&ids)
        }
        RecipeCommand::List => print_json(&list_recipes(pool).await?),
    }
}

async fn meal_plan_command(
    pool: &SqlitePool,
    owner_id: i64,
    command: MealPlanCommand,
) -> Result<()> {
    match command {
        MealPlanCommand::Create { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let plan: NewMealPlan = serde_json::from_str(&contents)
                .with_context(|| format!("Invalid meal plan in {}", file.display()))?;
            let id = create_meal_plan(pool, owner_id, &plan).await?;
            print_json(&id)
        }
        MealPlanCommand::List => print_json(&list_meal_plans(pool, owner_id).await?),
    }
}

async fn pantry_command(
    pool: &SqlitePool,
    config: &Config,
    owner_id: i64,
    command: PantryCommand,
) -> Result<()> {
    match command {
        PantryCommand::Add {
            name,
            quantity,
            unit,
            category,
            expires,
        } => {
            let item = NewPantryItem {
                name,
                quantity,
                unit,
                category,
                expiry_date: expires,
            };
            let (item, outcome) = add_pantry_item(pool, owner_id, &item).await?;
            print_json(&serde_json::json!({ "item": item, "outcome": outcome }))
        }
        PantryCommand::List {
            category,
            page,
            limit,
            expiring,
        } => {
            let query = PantryQuery {
                category,
                expiring: expiring.then(|| {
                    ExpiryWindow::within_days(today(), config.pantry.expiring_within_days)
                }),
                page,
                limit,
            };
            print_json(&list_pantry_items(pool, owner_id, &query).await?)
        }
        PantryCommand::Expiring { days } => {
            let days = days.unwrap_or(config.pantry.expiring_within_days);
            print_json(&get_expiring_pantry_items(pool, owner_id, today(), days).await?)
        }
        PantryCommand::Stats { days } => {
            let days = days.unwrap_or(config.pantry.expiring_within_days);
            print_json(&get_pantry_stats(pool, owner_id, today(), days).await?)
        }
    }
}

async fn grocery_command(
    pool: &SqlitePool,
    config: &Config,
    owner_id: i64,
    command: GroceryCommand,
) -> Result<()> {
    match command {
        GroceryCommand::Generate {
            meal_plan_id,
            name,
            exclude_pantry,
            include_pantry,
        } => {
            let request = GenerateGroceryListRequest {
                meal_plan_id,
                name,
                exclude_pantry_items: pantry_exclusion(
                    exclude_pantry,
                    include_pantry,
                    config.grocery.exclude_pantry_items_by_default,
                ),
            };
            print_json(&generate_grocery_list(pool, owner_id, &request).await?)
        }
        GroceryCommand::Show { id } => print_json(&get_grocery_list(pool, owner_id, id).await?),
        GroceryCommand::Check { id, index, undo } => {
            print_json(&set_item_purchased(pool, owner_id, id, index, !undo).await?)
        }
        GroceryCommand::Summary { id } => {
            print_json(&grocery_list_summary(pool, owner_id, id).await?)
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// The flag given last wins; with neither, the configured default applies
fn pantry_exclusion(exclude_pantry: bool, include_pantry: bool, default: bool) -> bool {
    match (exclude_pantry, include_pantry) {
        (true, _) => true,
        (_, true) => false,
        _ => default,
    }
}

fn read_recipes(path: &Path) -> Result<Vec<Recipe>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    // Accept a single recipe object as well as an array
    let recipes = match serde_json::from_str::<Vec<Recipe>>(&contents) {
        Ok(recipes) => recipes,
        Err(_) => vec![serde_json::from_str::<Recipe>(&contents)
            .with_context(|| format!("Invalid recipe JSON in {}", path.display()))?],
    };

    Ok(recipes)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_flags(args: &[&str]) -> (bool, bool) {
        let cli = Cli::try_parse_from(args).expect("Failed to parse arguments");
        match cli.command {
            Commands::Grocery(GroceryCommand::Generate {
                exclude_pantry,
                include_pantry,
                ..
            }) => (exclude_pantry, include_pantry),
            _ => panic!("Expected grocery generate"),
        }
    }

    #[test]
    fn test_pantry_exclusion_falls_back_to_config() {
        assert!(pantry_exclusion(false, false, true));
        assert!(!pantry_exclusion(false, false, false));
        assert!(pantry_exclusion(true, false, false));
        assert!(!pantry_exclusion(false, true, true));
    }

    #[test]
    fn test_last_pantry_flag_wins() {
        let (exclude, include) =
            generate_flags(&["mealbuddy", "grocery", "generate", "3", "--exclude-pantry"]);
        assert!(pantry_exclusion(exclude, include, false));

        let (exclude, include) = generate_flags(&[
            "mealbuddy",
            "grocery",
            "generate",
            "3",
            "--exclude-pantry",
            "--include-pantry",
        ]);
        assert!(!pantry_exclusion(exclude, include, true));

        let (exclude, include) = generate_flags(&[
            "mealbuddy",
            "grocery",
            "generate",
            "3",
            "--include-pantry",
            "--exclude-pantry",
        ]);
        assert!(pantry_exclusion(exclude, include, false));

        let (exclude, include) = generate_flags(&["mealbuddy", "grocery", "generate", "3"]);
        assert!(pantry_exclusion(exclude, include, true));
        assert!(!pantry_exclusion(exclude, include, false));
    }
}

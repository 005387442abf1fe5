use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use recipe_scout::app::RecipeApp;
use recipe_scout::config::Config;
use recipe_scout::favorites::{FavoritesStore, FileStorage};
use recipe_scout::filter::{applied_filters_summary, FacetFamily, FacetRegistry, FilterSet};
use recipe_scout::logging::init_tracing;
use recipe_scout::recipe::Recipe;
use recipe_scout::session::SearchStatus;

#[derive(Debug, Parser)]
#[command(name = "recipe-scout", version, about = "Search recipes and keep favorites")]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search the catalog
    Search {
        text: String,
        /// Dietary restriction (repeatable), e.g. vegan
        #[arg(long = "diet")]
        diet: Vec<String>,
        /// Cuisine type (repeatable), e.g. Italian
        #[arg(long)]
        cuisine: Vec<String>,
        /// Save the n-th result (1-based) as a favorite
        #[arg(long)]
        save: Option<usize>,
    },
    /// Show a random preview of the catalog
    Featured,
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// List available filter options
    Filters,
}

#[derive(Debug, Subcommand)]
enum FavoritesAction {
    List,
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading configuration")?;

    match cli.command {
        Command::Search {
            text,
            diet,
            cuisine,
            save,
        } => run_search(&config, &text, &diet, &cuisine, save).await,
        Command::Featured => run_featured(&config).await,
        Command::Favorites { action } => run_favorites(&config, action).await,
        Command::Filters => {
            print_filters(&FacetRegistry::builtin());
            Ok(())
        }
    }
}

async fn run_search(
    config: &Config,
    text: &str,
    diet: &[String],
    cuisine: &[String],
    save: Option<usize>,
) -> Result<()> {
    let app = RecipeApp::from_config(config).context("configuring catalog")?;
    app.load_favorites().await;

    let filters = build_filters(app.registry(), diet, cuisine)?;
    app.start_search(text, &filters).await;

    let state = app.session().state();
    if state.status == SearchStatus::Failed {
        let message = state
            .error
            .map(|e| e.message)
            .unwrap_or_else(|| "unknown error".to_string());
        bail!("search failed: {}", message);
    }

    println!(
        "Filters applied: {}",
        applied_filters_summary(&state.committed_query, app.registry())
    );
    if state.has_no_results() {
        println!("No results found.");
        return Ok(());
    }
    for (index, recipe) in state.results.iter().enumerate() {
        print_recipe(index + 1, recipe, app.favorites().is_favorite(&recipe.id));
    }

    if let Some(n) = save {
        let Some(recipe) = n.checked_sub(1).and_then(|i| state.results.get(i)) else {
            bail!("--save {} is out of range (1..={})", n, state.results.len());
        };
        let added = app
            .favorites()
            .add(recipe.clone())
            .await
            .with_context(|| format!("saving '{}'", recipe.title))?;
        if added {
            println!("Saved '{}' to favorites.", recipe.title);
        } else {
            println!("'{}' is already a favorite.", recipe.title);
        }
    }
    Ok(())
}

async fn run_featured(config: &Config) -> Result<()> {
    let app = RecipeApp::from_config(config).context("configuring catalog")?;
    app.load_favorites().await;

    let featured = app.featured();
    if featured.refresh().await == SearchStatus::Failed {
        let message = featured
            .state()
            .error
            .map(|e| e.message)
            .unwrap_or_else(|| "unknown error".to_string());
        bail!("featured preview failed: {}", message);
    }

    for (index, recipe) in featured.recipes().iter().enumerate() {
        print_recipe(index + 1, recipe, app.favorites().is_favorite(&recipe.id));
    }
    Ok(())
}

async fn run_favorites(config: &Config, action: FavoritesAction) -> Result<()> {
    let storage = Arc::new(FileStorage::new(config.storage.resolved_data_dir()));
    let store = FavoritesStore::new(storage);
    store.load().await.context("reading favorites")?;

    match action {
        FavoritesAction::List => {
            let favorites = store.list_all();
            if favorites.is_empty() {
                println!("You have no favorite recipes yet.");
            }
            for (index, recipe) in favorites.iter().enumerate() {
                print_recipe(index + 1, recipe, true);
            }
        }
        FavoritesAction::Remove { id } => {
            if store.remove(&id).await.context("removing favorite")? {
                println!("Removed {}.", id);
            } else {
                println!("{} is not a favorite.", id);
            }
        }
    }
    Ok(())
}

fn build_filters(registry: &FacetRegistry, diet: &[String], cuisine: &[String]) -> Result<FilterSet> {
    let mut filters = FilterSet::empty(registry);
    let requested = diet
        .iter()
        .map(|o| (FacetFamily::Dietary, o))
        .chain(cuisine.iter().map(|o| (FacetFamily::Cuisine, o)));

    for (family, option) in requested {
        if !filters.set(family, option, true) {
            let known: Vec<&str> = registry.options(family).map(|d| d.name).collect();
            bail!(
                "unknown {} option '{}' (expected one of: {})",
                family.as_str(),
                option,
                known.join(", ")
            );
        }
    }
    Ok(filters)
}

fn print_filters(registry: &FacetRegistry) {
    for family in FacetFamily::all() {
        println!("{}:", family.label());
        for def in registry.options(*family) {
            println!("  {:<16} {}", def.name, def.label);
        }
    }
}

fn print_recipe(position: usize, recipe: &Recipe, favorite: bool) {
    let marker = if favorite { " ♥" } else { "" };
    println!("[{}] {}{}", position, recipe.title, marker);

    let mut details = Vec::new();
    if let Some(cuisine) = recipe.cuisine_summary() {
        details.push(format!("cuisine: {}", cuisine));
    }
    if let Some(calories) = recipe.rounded_calories() {
        details.push(format!("calories: {}", calories));
    }
    details.push(format!("ingredients: {}", recipe.ingredient_count()));
    println!("    {}", details.join(" | "));
    println!("    id: {}", recipe.id);
    if let Some(url) = &recipe.external_url {
        println!("    {}", url);
    }
}

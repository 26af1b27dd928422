use anyhow::Result;
use clap::{Parser, Subcommand};
use weekplate::{AppState, Config};
use weekplate_recipe::{
    RecipeCatalog, SuggestionContext, generate_weekly_suggestions,
    suggestion::RECENT_SELECTION_WINDOW,
};
use weekplate_shopping::{
    Categorizer, ShoppingListError, generate_grocery_list, render_markdown,
};

/// weekplate - weekly dinner planning and grocery lists
#[derive(Parser)]
#[command(name = "weekplate")]
#[command(about = "Weekly dinner suggestions and consolidated grocery lists", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Build the grocery list for a week's recipes
    Grocery {
        /// Recipe ids, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,

        /// Recipe catalog file (overrides config file)
        #[arg(long)]
        file: Option<String>,

        /// Week label used in the printed list
        #[arg(long)]
        week: Option<String>,

        /// Print the markdown checklist instead of JSON
        #[arg(long)]
        markdown: bool,
    },
    /// Print this week's recipe suggestions
    Suggest {
        /// Number of suggestions (overrides config file)
        #[arg(long)]
        count: Option<usize>,

        /// Seed for a reproducible list
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    weekplate::observability::init_observability(
        "weekplate",
        env!("CARGO_PKG_VERSION"),
        &config.logging.level,
        &config.logging.format,
    )?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Grocery {
            ids,
            file,
            week,
            markdown,
        } => grocery_command(config, ids, file, week, markdown).await,
        Commands::Suggest { count, seed } => suggest_command(config, count, seed).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting weekplate server...");

    // Use CLI overrides if provided, otherwise use config
    let host = host_override.unwrap_or_else(|| config.server.host.clone());
    let port = port_override.unwrap_or(config.server.port);

    let state = AppState::from_config(config).await;
    let app = weekplate::router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Starting graceful shutdown...");
}

#[tracing::instrument(skip(config))]
async fn grocery_command(
    config: Config,
    ids: Vec<String>,
    file: Option<String>,
    week: Option<String>,
    markdown: bool,
) -> Result<()> {
    let options = config.planning.grocery_options();
    if ids.len() != options.required_recipes {
        return Err(ShoppingListError::WrongRecipeCount {
            expected: options.required_recipes,
            actual: ids.len(),
        }
        .into());
    }

    let catalog = match file.or_else(|| config.data.recipes_path.clone()) {
        Some(path) => RecipeCatalog::try_load(&path)?,
        None => RecipeCatalog::builtin(),
    };
    let categorizer = match &config.data.departments_path {
        Some(path) => Categorizer::from_path(path),
        None => Categorizer::builtin(),
    };

    let recipes = catalog.resolve(&ids)?;
    let report = generate_grocery_list(&recipes, &options, &categorizer)?;

    let week_date = week.unwrap_or_else(|| chrono::Utc::now().date_naive().to_string());

    let history = weekplate::HistoryStore::open(&config.data.history_path).await;
    history
        .record_grocery_list(
            &week_date,
            &recipes,
            report.statistics.total_unique_ingredients,
            report.estimated_cost.to_string(),
        )
        .await?;

    if markdown {
        println!("{}", render_markdown(&report, &recipes, &week_date));
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn suggest_command(config: Config, count: Option<usize>, seed: Option<u64>) -> Result<()> {
    let catalog = match &config.data.recipes_path {
        Some(path) => RecipeCatalog::load(path),
        None => RecipeCatalog::builtin(),
    };
    let history = weekplate::HistoryStore::open(&config.data.history_path).await;

    let ctx = SuggestionContext {
        recent_selections: history.recent_selection_names(RECENT_SELECTION_WINDOW).await,
        max_per_protein: config.planning.max_per_protein,
        max_per_cuisine: config.planning.max_per_cuisine,
    };
    let count = count.unwrap_or(config.planning.suggestion_count);

    let weekly = generate_weekly_suggestions(&catalog, count, &ctx, seed);
    for suggestion in &weekly.suggestions {
        println!(
            "{:>2}. {} [{}] ({}, {})",
            suggestion.suggestion_number,
            suggestion.recipe.name,
            suggestion.recipe.id,
            suggestion.recipe.protein_key(),
            suggestion.recipe.cuisine_key()
        );
    }

    Ok(())
}

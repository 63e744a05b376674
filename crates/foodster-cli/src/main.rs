mod browse;
mod saved;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use foodster_core::{AppConfig, SortKey};
use foodster_db::{PoolConfig, SaveStore};
use foodster_state::QueryStateManager;
use foodster_yelp::YelpClient;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "foodster")]
#[command(about = "Find restaurants nearby and keep a list of favourites")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search restaurants near a place or coordinate
    Search {
        /// Free-text location (e.g., "Chapel Hill")
        #[arg(long, short)]
        location: Option<String>,
        /// Latitude to search around when no location is given
        #[arg(long, requires = "longitude", allow_hyphen_values = true)]
        latitude: Option<f64>,
        /// Longitude to search around when no location is given
        #[arg(long, requires = "latitude", allow_hyphen_values = true)]
        longitude: Option<f64>,
        /// Search term appended to "restaurant"
        #[arg(long, short, default_value = "")]
        term: String,
        /// best_match, rating, review_count or distance
        #[arg(long, default_value = "best_match")]
        sort: SortKey,
    },
    /// Show full details for one restaurant
    Detail {
        /// Yelp business id
        id: String,
    },
    /// Save a restaurant to the local list
    Save {
        /// Yelp business id
        id: String,
    },
    /// List saved restaurants, most recent first
    Saved,
    /// Remove a restaurant from the local list
    Unsave {
        /// Yelp business id
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("foodster: run with --help to see available commands");
        return Ok(());
    };

    let config = foodster_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::debug!(env = %config.env, "starting foodster");
    let store = SaveStore::open(&config.database_url, PoolConfig::from_app_config(&config)).await?;

    match command {
        Commands::Search {
            location,
            latitude,
            longitude,
            term,
            sort,
        } => {
            let manager = spawn_manager(&config, store)?;
            let coordinate = browse::coordinate_from(latitude, longitude);
            browse::run_search(&manager, location, coordinate, term, sort).await
        }
        Commands::Detail { id } => browse::run_detail(&spawn_manager(&config, store)?, &id).await,
        Commands::Save { id } => saved::run_save(&spawn_manager(&config, store)?, &id).await,
        Commands::Saved => {
            saved::run_saved(&store);
            Ok(())
        }
        Commands::Unsave { id } => {
            saved::run_unsave(&store, &id).await;
            Ok(())
        }
    }
}

/// Builds the Yelp client and starts the state manager. Only commands that
/// call Yelp need this, so only they require `YELP_API_KEY`.
fn spawn_manager(config: &AppConfig, store: SaveStore) -> anyhow::Result<QueryStateManager> {
    let api_key = config
        .require_yelp_api_key()
        .map_err(|e| anyhow::anyhow!("{e}; it is needed to search or fetch restaurants"))?;
    let client = YelpClient::with_base_url(api_key, &config.yelp_base_url)?;
    Ok(QueryStateManager::spawn(Arc::new(client), store))
}

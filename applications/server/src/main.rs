/// Favorites Server - ranked favorites collection over HTTP
use clap::{Parser, Subcommand};
use favorites_core::FavoritesStore;
use favorites_server::{api, config::ServerConfig, state::AppState};
use favorites_storage::{ImportReport, LocalFavoritesStore};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "favorites-server")]
#[command(about = "Ranked favorite albums server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "FAVORITES_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Import favorites from the legacy albums database (skipped if any exist)
    Import {
        /// Legacy database path (defaults to import.legacy_database_path)
        path: Option<PathBuf>,
    },
    /// Print all favorites
    List {
        /// Order by last played instead of rank
        #[arg(long)]
        recent: bool,
    },
    /// Verify that ranks form 1..N
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "favorites_server=info,favorites_storage=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = ServerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => serve(&config).await?,
        Commands::Import { path } => import(&config, path).await?,
        Commands::List { recent } => list(&config, recent).await?,
        Commands::Check => check(&config).await?,
    }

    Ok(())
}

async fn open_store(config: &ServerConfig) -> anyhow::Result<LocalFavoritesStore> {
    let store = LocalFavoritesStore::open(&config.storage.database_url).await?;
    tracing::info!("Database connected: {}", config.storage.database_url);
    Ok(store)
}

async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Favorites Server");

    let store = Arc::new(open_store(config).await?);
    let app = api::router(AppState::new(store));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn import(config: &ServerConfig, path: Option<PathBuf>) -> anyhow::Result<()> {
    let Some(path) = path.or_else(|| config.import.legacy_database_path.clone()) else {
        anyhow::bail!("No legacy database given (pass a path or set import.legacy_database_path)");
    };

    let store = open_store(config).await?;

    match favorites_storage::import_legacy(&store, &path).await? {
        ImportReport::Skipped { existing } => {
            println!("Database already has {existing} favorites, skipping import.");
            println!("To re-import, delete the database and run again.");
        }
        ImportReport::Imported { count, renumbered } => {
            println!("Imported {count} favorites ({renumbered} renumbered)");
        }
    }

    Ok(())
}

async fn list(config: &ServerConfig, recent: bool) -> anyhow::Result<()> {
    let store = open_store(config).await?;

    let favorites = if recent {
        store.list_by_recency().await?
    } else {
        store.list_by_rank().await?
    };

    for favorite in favorites {
        let year = favorite.year.map(|y| y.to_string()).unwrap_or_default();
        let played = favorite
            .last_played
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "{:>4}. {} - {} ({}) [played: {}]",
            favorite.rank, favorite.artist, favorite.title, year, played
        );
    }

    Ok(())
}

async fn check(config: &ServerConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let check = store.check_ranks().await?;

    if check.is_contiguous() {
        println!("OK: {} favorites ranked 1..{}", check.total, check.max_rank);
        Ok(())
    } else {
        anyhow::bail!(
            "Ranks are not contiguous: {} favorites, max rank {}, missing {:?}, invalid {:?}",
            check.total,
            check.max_rank,
            check.missing,
            check.invalid
        )
    }
}

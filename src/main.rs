//! Lattice - mental models reference API

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lattice::{
    config::Args,
    content::SeedContent,
    db::MongoClient,
    server::{self, AppState},
    services::seed_catalog,
    store::{InMemoryStore, MongoStore, Store},
};

fn init_tracing(args: &Args) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("lattice={},info", args.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if args.json_logs() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect to MongoDB, or fall back to memory in dev mode
async fn open_store(args: &Args) -> anyhow::Result<Arc<dyn Store>> {
    let connected = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => MongoStore::new(client).await,
        Err(e) => Err(e),
    };

    match connected {
        Ok(store) => {
            info!("MongoDB connected successfully");
            let store: Arc<dyn Store> = Arc::new(store);
            Ok(store)
        }
        Err(e) if args.dev_mode => {
            warn!("MongoDB unavailable (dev mode, using in-memory store): {}", e);
            let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
            Ok(store)
        }
        Err(e) => Err(anyhow::anyhow!("MongoDB connection failed: {}", e)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(&args);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Lattice - Mental Models API");
    info!("======================================");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("MongoDB: {} (db: {})", args.mongodb_uri, args.mongodb_db);
    info!("CORS origins: {}", args.cors_origins);
    match args.seed_path {
        Some(ref path) => info!("Seed content: {}", path.display()),
        None => info!("Seed content: embedded"),
    }
    info!("======================================");

    let content = SeedContent::load(args.seed_path.as_deref())?;

    let store = match open_store(&args).await {
        Ok(store) => store,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let report = seed_catalog(store.as_ref(), &content).await?;
    info!(
        models = report.models_inserted,
        sections = report.sections_inserted,
        "Seeding complete"
    );

    let state = Arc::new(AppState::new(args, store, content));
    server::run(state).await?;

    Ok(())
}

mod agents;
mod catalog;
mod config;
mod db;
mod errors;
mod llm_client;
mod market;
mod matching;
mod models;
mod orchestrator;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agents::{CourseCatalogProvider, JobMarketProvider, MatchingEngine, ProjectAdvisor};
use crate::catalog::{CourseCatalogSource, JsonFileCatalog, PgCourseCatalog, StaticCatalog};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::market::{
    HttpJobDataSource, JobDataSource, MemorySnapshotStore, NoJobDataSource, RedisSnapshotStore,
    SnapshotCache, SnapshotStore,
};
use crate::matching::archetypes::ArchetypeTable;
use crate::matching::explain::ExplanationGenerator;
use crate::orchestrator::CareerOrchestrator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Advisor API v{}", env!("CARGO_PKG_VERSION"));

    let archetypes = Arc::new(match &config.archetypes_path {
        Some(path) => ArchetypeTable::from_json_file(Path::new(path))
            .with_context(|| format!("Failed to load archetype table from {path}"))?,
        None => ArchetypeTable::builtin(),
    });
    info!("Archetype table loaded ({} archetypes)", archetypes.archetypes.len());

    let catalog_source = build_catalog_source(&config).await?;
    info!("Course catalog source: {}", catalog_source.describe());

    let job_source: Arc<dyn JobDataSource> = match &config.job_data_url {
        Some(url) => {
            info!("Job data source: {url}");
            Arc::new(HttpJobDataSource::new(url)?)
        }
        None => {
            info!("No JOB_DATA_URL set, market data will be synthetic");
            Arc::new(NoJobDataSource)
        }
    };

    let ttl = chrono::Duration::hours(config.cache_ttl_hours);
    let store: Arc<dyn SnapshotStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Redis snapshot store initialized");
            let ttl_seconds = u64::try_from(ttl.num_seconds()).context("cache TTL out of range")?;
            Arc::new(RedisSnapshotStore::new(client, ttl_seconds))
        }
        None => {
            info!("In-memory snapshot store initialized");
            Arc::new(MemorySnapshotStore::new(ttl))
        }
    };

    let generator: Option<Arc<dyn ExplanationGenerator>> = match &config.anthropic_api_key {
        Some(key) => {
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmClient::new(key.clone())))
        }
        None => {
            info!("No ANTHROPIC_API_KEY set, using template explanations");
            None
        }
    };

    let cache = SnapshotCache::new(
        job_source,
        store,
        archetypes.clone(),
        ttl,
        config.job_fetch_limit,
    );
    let orchestrator = CareerOrchestrator::new(
        Arc::new(JobMarketProvider::new(cache, archetypes.clone())),
        Arc::new(CourseCatalogProvider::new(catalog_source)),
        Arc::new(MatchingEngine::new(
            config.scoring_config(),
            archetypes.clone(),
            generator.clone(),
        )),
        Arc::new(ProjectAdvisor::new(generator, archetypes)),
    );

    let state = AppState {
        config: config.clone(),
        orchestrator: Arc::new(orchestrator),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Postgres when DATABASE_URL is set, else a JSON file, else the built-in list.
async fn build_catalog_source(config: &Config) -> Result<Arc<dyn CourseCatalogSource>> {
    if let Some(url) = &config.database_url {
        let pool = create_pool(url).await?;
        return Ok(Arc::new(PgCourseCatalog::new(pool)));
    }
    if let Some(path) = &config.course_catalog_path {
        return Ok(Arc::new(JsonFileCatalog::new(path)));
    }
    Ok(Arc::new(StaticCatalog::new()))
}

//! Service entry-point: loads settings, wires adapters and serves the REST API.

mod server;

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use reqwest::Client;
use tokio::runtime::{Handle, Runtime};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use namesake::domain::EnrichmentCoordinator;
use namesake::inbound::http::health::HealthState;
use namesake::outbound::TracingEnrichmentObserver;
use namesake::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use namesake::outbound::predictors::{AgifyPredictor, GenderizePredictor, NationalizePredictor};
use namesake::settings::AppSettings;

use server::{ServerConfig, create_server};

/// How long in-flight predictions get to finish once the server has stopped.
const ENRICHMENT_SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Multi-thread runtime the enrichment workers run on. Actix workers are
/// single-threaded, so predictor calls get threads of their own.
fn enrichment_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .thread_name("enrichment")
        .enable_all()
        .build()
        .wrap_err("failed to start enrichment runtime")
}

/// Build the coordinator around the three remote predictors, sharing one
/// HTTP client between them.
fn build_enrichment(settings: &AppSettings, runtime: Handle) -> Result<EnrichmentCoordinator> {
    let endpoints = settings
        .predictor_endpoints()
        .wrap_err("invalid prediction service settings")?;
    let client = Client::builder()
        .timeout(settings.predictor_timeout())
        .build()
        .wrap_err("failed to build prediction HTTP client")?;

    Ok(EnrichmentCoordinator::new(
        Arc::new(AgifyPredictor::with_client(client.clone(), endpoints.age)),
        Arc::new(GenderizePredictor::with_client(
            client.clone(),
            endpoints.gender,
        )),
        Arc::new(NationalizePredictor::with_client(
            client,
            endpoints.nationality,
        )),
        Arc::new(TracingEnrichmentObserver),
    )
    .on_runtime(runtime))
}

/// Apply migrations and open the connection pool.
async fn connect_database(database_url: &str, max_connections: u32) -> Result<DbPool> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .wrap_err("migration task failed")?
        .wrap_err("failed to apply database migrations")?;
    info!(applied, "database migrations applied");

    let config = PoolConfig::new(database_url).with_max_size(max_connections);
    DbPool::new(config)
        .await
        .wrap_err("failed to create database pool")
}

/// Application bootstrap.
fn main() -> Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let runtime = enrichment_runtime()?;
    let enrichment = build_enrichment(&settings, runtime.handle().clone())?;

    let outcome = actix_web::rt::System::new().block_on(serve(settings, enrichment));
    runtime.shutdown_timeout(ENRICHMENT_SHUTDOWN_GRACE);
    outcome
}

async fn serve(settings: AppSettings, enrichment: EnrichmentCoordinator) -> Result<()> {
    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;
    let mut config = ServerConfig::new(bind_addr, enrichment, settings.enrichment_timeout());
    match settings.database_url() {
        Some(url) => {
            let pool = connect_database(url, settings.db_max_connections).await?;
            config = config.with_db_pool(pool);
        }
        None => warn!("NAMESAKE_DATABASE_URL unset; users are kept in memory only"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "namesake listening");

    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated with an error")?;
    info!("namesake stopped");
    Ok(())
}

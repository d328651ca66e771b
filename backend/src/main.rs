//! Server entry-point: loads settings, prepares the store and serves the
//! user records API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_registry::config::AppSettings;
use user_registry::inbound::http::health::HealthState;
use user_registry::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

async fn connect_store(settings: &AppSettings, database_url: &str) -> Result<DbPool> {
    if settings.skip_migrations {
        info!("skipping embedded migrations");
    } else {
        run_pending_migrations(database_url)
            .await
            .wrap_err("apply database migrations")?;
    }

    let config = PoolConfig::new(database_url).with_max_size(settings.db_max_connections());
    DbPool::new(config)
        .await
        .wrap_err("build database connection pool")
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Option<actix_web_prom::PrometheusMetrics> {
    actix_web_prom::PrometheusMetricsBuilder::new("user_registry")
        .endpoint("/metrics")
        .build()
        .inspect_err(|e| warn!(error = %e, "metrics disabled: registry setup failed"))
        .ok()
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("load settings")?;
    let mut config = ServerConfig::new(settings.bind_addr()?);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect_store(&settings, database_url).await?);
    }
    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(make_metrics());
    }

    let listen_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("bind HTTP listener")?;
    info!(%listen_addr, "user registry listening");
    server.await.wrap_err("serve HTTP")
}

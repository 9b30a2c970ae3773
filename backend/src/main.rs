//! Server entry-point: loads settings, connects the datastore and cache for
//! the configured deployment mode, and serves the API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use playground::domain::DeploymentMode;
use playground::inbound::http::health::HealthState;
use playground::outbound::cache::RedisUserCache;
use playground::outbound::persistence::{
    BlockingDbPool, DbPool, PoolConfig, run_pending_migrations,
};
use playground::settings::AppSettings;
use server::{Datastore, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|e| io::Error::other(format!("load settings: {e}")))?;
    let mode = settings.mode().map_err(io::Error::other)?;
    let config = build_config(&settings, mode).await?;
    info!(
        mode = %mode,
        bind_addr = %config.bind_addr(),
        workers = settings.workers(mode),
        "starting server"
    );

    let health_state = web::Data::new(HealthState::new(mode));
    create_server(health_state, config)?.await
}

async fn build_config(settings: &AppSettings, mode: DeploymentMode) -> io::Result<ServerConfig> {
    let bind_addr = resolve_bind_addr(settings.host(), settings.port())?;
    let mut config = ServerConfig::new(mode, bind_addr)
        .with_workers(settings.workers(mode))
        .with_cache_ttl(settings.cache_ttl());

    match settings.pool_config() {
        Some(pool_config) => {
            if settings.run_migrations {
                run_pending_migrations(pool_config.database_url())
                    .map_err(|e| io::Error::other(format!("run migrations: {e}")))?;
            }
            config = config.with_datastore(connect_datastore(mode, pool_config).await?);
        }
        None => warn!("no database URL configured; serving from the in-memory store"),
    }

    if let Some(redis_url) = settings.redis_url.as_deref() {
        let cache = RedisUserCache::connect(redis_url, settings.redis_pool_size())
            .await
            .map_err(|e| io::Error::other(format!("connect user cache: {e}")))?;
        config = config.with_user_cache(cache);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::mode_metrics(mode));

    Ok(config)
}

/// Pick the datastore adapter matching `mode`'s wait style.
async fn connect_datastore(mode: DeploymentMode, pool_config: PoolConfig) -> io::Result<Datastore> {
    let datastore = match mode {
        DeploymentMode::Blocking => web::block(move || BlockingDbPool::new(pool_config))
            .await
            .map_err(|e| io::Error::other(e.to_string()))?
            .map(Datastore::Blocking),
        DeploymentMode::NonBlocking => DbPool::new(pool_config).await.map(Datastore::Async),
    };
    datastore.map_err(|e| io::Error::other(format!("connect datastore: {e}")))
}

fn resolve_bind_addr(host: &str, port: u16) -> io::Result<SocketAddr> {
    (host, port).to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no address for {host}:{port}"),
        )
    })
}

#[cfg(test)]
mod tests;

//! Process settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `PLAYGROUND_*` environment variables over
//! configuration files. Every field is optional; accessors supply defaults.

use std::num::NonZeroUsize;
use std::thread;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::user_service::DEFAULT_CACHE_TTL;
use crate::domain::{DeploymentMode, UnknownDeploymentMode};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
/// Worker count of the blocking deployment: one thread per in-flight request.
pub const DEFAULT_BLOCKING_WORKERS: usize = 200;
const DEFAULT_REDIS_POOL_SIZE: u32 = 16;

/// Configuration values controlling one server process.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PLAYGROUND")]
pub struct AppSettings {
    /// `blocking` or `non-blocking`.
    pub mode: Option<String>,
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Actix worker threads; defaults depend on the mode.
    pub workers: Option<usize>,
    /// PostgreSQL URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Redis URL. Caching is disabled when absent.
    pub redis_url: Option<String>,
    /// Maximum datastore connections.
    pub db_pool_max_size: Option<u32>,
    /// Maximum Redis connections.
    pub redis_pool_max_size: Option<u32>,
    /// Base lifetime of cached users in seconds.
    pub cache_ttl_seconds: Option<u64>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
}

impl AppSettings {
    /// Return the deployment mode, defaulting to non-blocking.
    ///
    /// # Errors
    /// Returns [`UnknownDeploymentMode`] for labels other than `blocking`
    /// and `non-blocking`.
    pub fn mode(&self) -> Result<DeploymentMode, UnknownDeploymentMode> {
        self.mode
            .as_deref()
            .map_or(Ok(DeploymentMode::NonBlocking), str::parse)
    }

    /// Return the bind host, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the bind port, falling back to 8080.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Return the worker count for `mode`.
    ///
    /// The blocking deployment defaults to [`DEFAULT_BLOCKING_WORKERS`]; the
    /// non-blocking deployment defaults to the available parallelism.
    pub fn workers(&self, mode: DeploymentMode) -> usize {
        self.workers.filter(|n| *n > 0).unwrap_or_else(|| match mode {
            DeploymentMode::Blocking => DEFAULT_BLOCKING_WORKERS,
            DeploymentMode::NonBlocking => thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
        })
    }

    /// Return the datastore pool configuration, if a URL is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let config = PoolConfig::new(self.database_url.as_deref()?);
        Some(match self.db_pool_max_size {
            Some(max_size) => config.with_max_size(max_size),
            None => config,
        })
    }

    /// Return the Redis pool size, independent of the datastore pool.
    pub fn redis_pool_size(&self) -> u32 {
        self.redis_pool_max_size.unwrap_or(DEFAULT_REDIS_POOL_SIZE)
    }

    /// Return the base cache TTL.
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_seconds
            .map_or(DEFAULT_CACHE_TTL, Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 10] = [
        "PLAYGROUND_MODE",
        "PLAYGROUND_HOST",
        "PLAYGROUND_PORT",
        "PLAYGROUND_WORKERS",
        "PLAYGROUND_DATABASE_URL",
        "PLAYGROUND_REDIS_URL",
        "PLAYGROUND_DB_POOL_MAX_SIZE",
        "PLAYGROUND_REDIS_POOL_MAX_SIZE",
        "PLAYGROUND_CACHE_TTL_SECONDS",
        "PLAYGROUND_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("playground")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.mode(), Ok(DeploymentMode::NonBlocking));
        assert_eq!(settings.host(), DEFAULT_HOST);
        assert_eq!(settings.port(), DEFAULT_PORT);
        assert_eq!(
            settings.workers(DeploymentMode::Blocking),
            DEFAULT_BLOCKING_WORKERS
        );
        assert!(settings.workers(DeploymentMode::NonBlocking) >= 1);
        assert!(settings.pool_config().is_none());
        assert!(settings.redis_url.is_none());
        assert_eq!(settings.redis_pool_size(), DEFAULT_REDIS_POOL_SIZE);
        assert_eq!(settings.cache_ttl(), DEFAULT_CACHE_TTL);
        assert!(!settings.run_migrations);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PLAYGROUND_MODE", Some("blocking".to_owned())),
            ("PLAYGROUND_HOST", Some("127.0.0.1".to_owned())),
            ("PLAYGROUND_PORT", Some("9090".to_owned())),
            ("PLAYGROUND_WORKERS", Some("32".to_owned())),
            (
                "PLAYGROUND_DATABASE_URL",
                Some("postgres://localhost/playground".to_owned()),
            ),
            ("PLAYGROUND_REDIS_URL", Some("redis://localhost".to_owned())),
            ("PLAYGROUND_DB_POOL_MAX_SIZE", Some("50".to_owned())),
            ("PLAYGROUND_REDIS_POOL_MAX_SIZE", Some("8".to_owned())),
            ("PLAYGROUND_CACHE_TTL_SECONDS", Some("30".to_owned())),
            ("PLAYGROUND_RUN_MIGRATIONS", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.mode(), Ok(DeploymentMode::Blocking));
        assert_eq!(settings.host(), "127.0.0.1");
        assert_eq!(settings.port(), 9090);
        assert_eq!(settings.workers(DeploymentMode::Blocking), 32);
        let pool = settings.pool_config().expect("pool config");
        assert_eq!(pool.max_size(), 50);
        assert_eq!(pool.database_url(), "postgres://localhost/playground");
        assert_eq!(settings.redis_pool_size(), 8);
        assert_eq!(settings.cache_ttl(), Duration::from_secs(30));
        assert!(settings.run_migrations);
    }

    #[rstest]
    fn datastore_pool_size_does_not_size_redis_pool() {
        let _guard = lock_env(VARS.map(|name| {
            let value = (name == "PLAYGROUND_DB_POOL_MAX_SIZE").then(|| "50".to_owned());
            (name, value)
        }));

        let settings = load_from_empty_args();
        assert_eq!(settings.redis_pool_size(), DEFAULT_REDIS_POOL_SIZE);
    }

    #[rstest]
    fn unknown_mode_is_reported() {
        let _guard = lock_env([("PLAYGROUND_MODE", Some("reactive".to_owned()))]);

        let settings = load_from_empty_args();
        assert!(settings.mode().is_err());
    }
}

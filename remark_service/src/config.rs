use std::{env, path::Path, sync::Arc};

use config::{Config, Environment, File};
use remark_store::executor::{QueryExecutorArc, sqlite::SqliteExecutor};
use serde::Deserialize;
use tracing::info;

use crate::{error::AppResult, schema};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Distribution metadata configuration
    pub distribution: DistributionConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Tracing configuration
    pub tracing: TracingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind")]
pub enum DatabaseConfig {
    /// In-memory SQLite database, gone when the process exits
    Memory,
    /// SQLite database file
    Sqlite(SqliteConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteConfig {
    /// Path of the database file, created if missing
    pub path: String,
}

/// Tracing configuration.
///
/// Controls how tracing data is output from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind")]
pub enum TracingConfig {
    /// Log events only
    Memory,
    /// Log events and export spans to standard output
    Stdout,
}

/// Distribution metadata configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DistributionConfig {
    /// Distribution name
    pub name: String,
    /// Distribution version
    pub version: Option<String>,
}

const CONFIG_PATH_ENV: &str = "REMARK_CONFIG_PATH";
const ENV_PREFIX: &str = "REMARK";
const VERSION: &str = env!("CARGO_PKG_VERSION");

const DISTRIBUTION_NAME_KEY: &str = "distribution.name";
const DISTRIBUTION_VERSION_KEY: &str = "distribution.version";
const DATABASE_KIND_KEY: &str = "database.kind";
const TRACING_KIND_KEY: &str = "tracing.kind";

impl AppConfig {
    /// Loads configuration from the directory named by `REMARK_CONFIG_PATH`,
    /// or `config` if it is not set.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> AppResult<Self> {
        let config_path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config".to_string());
        Self::load_from(config_path)
    }

    /// Loads configuration from files in a directory and environment variables.
    ///
    /// Sources in increasing priority: built-in defaults, `default` and
    /// `local` files in the directory, and `REMARK__*` environment variables
    /// such as `REMARK__DATABASE__PATH`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from<P: AsRef<Path>>(config_path: P) -> AppResult<Self> {
        let config_path = config_path.as_ref();

        let mut config_builder = Config::builder()
            .set_default(DISTRIBUTION_NAME_KEY, "remark")?
            .set_default(DISTRIBUTION_VERSION_KEY, VERSION)?
            .set_default(DATABASE_KIND_KEY, "Memory")?
            .set_default(TRACING_KIND_KEY, "Memory")?;

        // Initial "default" configuration file
        let default_path = config_path.join("default");
        config_builder =
            config_builder.add_source(File::from(default_path.as_path()).required(false));

        // Add in a local configuration file
        // This file shouldn't be checked in to git
        let local_path = config_path.join("local");
        config_builder =
            config_builder.add_source(File::from(local_path.as_path()).required(false));

        // Add in settings from the environment (with a prefix of REMARK)
        config_builder =
            config_builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        Ok(config_builder.build()?.try_deserialize()?)
    }

    /// Opens the configured database and brings its schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn connect(&self) -> AppResult<QueryExecutorArc> {
        let executor = match &self.database {
            DatabaseConfig::Memory => SqliteExecutor::open_memory()?,
            DatabaseConfig::Sqlite(sqlite) => SqliteExecutor::open(&sqlite.path)?,
        };
        schema::migrate(&executor).await?;
        info!(database = ?self.database, "connected to database");
        Ok(Arc::new(executor))
    }
}

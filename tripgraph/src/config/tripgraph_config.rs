use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{config::AllowedZoneSet, ingest::filter::TripFilter, TripGraphError};

/// configuration shipped with the binary, used when no file is provided.
pub const DEFAULT_CONFIG: &str = include_str!("tripgraph-default.toml");

/// top-level configuration for both the ingestion pipeline and the
/// analytics gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripGraphConfig {
    pub database: DatabaseConfig,
    pub ingest: IngestConfig,
    pub analytics: AnalyticsConfig,
}

/// Bolt connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// database name. when unset, the server default database is used.
    pub db: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// directory the staging CSV is written to. LOAD CSV resolves
    /// `file:///<name>` relative to this directory on the server side.
    pub staging_directory: PathBuf,
    pub zones: AllowedZoneSet,
    pub filters: Vec<TripFilter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// name of the in-memory graph projection used for ranking
    pub projection_name: String,
    pub damping_factor: f64,
}

/// command line values that take precedence over any configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub uri: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub staging_directory: Option<String>,
}

impl TripGraphConfig {
    /// loads a configuration file, or the default configuration if none is
    /// provided, and applies command line overrides on top of it.
    ///
    /// a user file replaces the default entirely. array values such as `zones`
    /// are merged index-by-index between sources, so layering would leak
    /// default entries into a shorter user list.
    pub fn load(
        configuration_file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<TripGraphConfig, TripGraphError> {
        let builder = match configuration_file {
            Some(filepath) => Config::builder().add_source(File::from(filepath)),
            None => Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)),
        };
        let source_name = configuration_file
            .and_then(|p| p.to_str())
            .unwrap_or("<default>")
            .to_string();
        let config = builder
            .set_override_option("database.uri", overrides.uri.clone())
            .and_then(|b| b.set_override_option("database.user", overrides.user.clone()))
            .and_then(|b| b.set_override_option("database.password", overrides.password.clone()))
            .and_then(|b| {
                b.set_override_option(
                    "ingest.staging_directory",
                    overrides.staging_directory.clone(),
                )
            })
            .and_then(|b| b.build())
            .map_err(|e| {
                let msg = format!("file '{source_name}' produced error: {e}");
                TripGraphError::InvalidUserInput(msg)
            })?;
        let result: TripGraphConfig = config.try_deserialize().map_err(|e| {
            let msg = format!("error reading configuration from '{source_name}': {e}");
            TripGraphError::InvalidUserInput(msg)
        })?;
        result.validate()?;
        Ok(result)
    }

    fn validate(&self) -> Result<(), TripGraphError> {
        if self.ingest.zones.is_empty() {
            return Err(TripGraphError::InvalidUserInput(String::from(
                "ingest.zones must contain at least one location id",
            )));
        }
        if !(0.0..1.0).contains(&self.analytics.damping_factor) {
            return Err(TripGraphError::InvalidUserInput(format!(
                "analytics.damping_factor must be in [0, 1), found {}",
                self.analytics.damping_factor
            )));
        }
        if self.analytics.projection_name.trim().is_empty() {
            return Err(TripGraphError::InvalidUserInput(String::from(
                "analytics.projection_name must not be empty",
            )));
        }
        Ok(())
    }
}

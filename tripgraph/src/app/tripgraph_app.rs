use std::path::Path;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::{
    analytics::AnalyticsGateway,
    config::{ConfigOverrides, TripGraphConfig},
    graph::Neo4jGraphStore,
    ingest::IngestionPipeline,
    TripGraphError,
};

/// Command line tool for loading taxi trips into a graph database and
/// querying the resulting location graph
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct TripGraphApp {
    /// TOML configuration file. if not provided, the built-in defaults are used.
    #[arg(short, long, global = true)]
    pub configuration_file: Option<String>,

    /// Bolt URI of the graph database, overrides the configuration file
    #[arg(long, global = true)]
    pub uri: Option<String>,

    /// database user, overrides the configuration file
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// database password, overrides the configuration file
    #[arg(long, global = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub op: TripGraphOperation,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum TripGraphOperation {
    /// filter a parquet trip file and bulk load it into the graph
    Ingest {
        /// parquet trip file
        file: String,

        /// directory to write the staging CSV to. must be the database's
        /// import directory.
        #[arg(short, long)]
        staging_directory: Option<String>,
    },
    /// report the highest and lowest PageRank locations as JSON
    Pagerank {
        #[arg(short, long, default_value_t = 20)]
        max_iterations: usize,

        /// trip property used as edge weight
        #[arg(short, long, default_value = "fare")]
        weight_property: String,
    },
    /// report one shortest path between two locations as JSON
    Bfs {
        #[arg(short, long)]
        start: i64,

        #[arg(short, long)]
        end: i64,
    },
}

impl TripGraphApp {
    pub fn overrides(&self) -> ConfigOverrides {
        let staging_directory = match &self.op {
            TripGraphOperation::Ingest {
                staging_directory, ..
            } => staging_directory.clone(),
            _ => None,
        };
        ConfigOverrides {
            uri: self.uri.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            staging_directory,
        }
    }

    pub fn run(&self) -> Result<(), TripGraphError> {
        let config_path = self.configuration_file.as_deref().map(Path::new);
        let config = TripGraphConfig::load(config_path, &self.overrides())?;
        let store = Neo4jGraphStore::connect(&config.database)?;
        let output = self.op.run(store, &config);
        output.map(|text| println!("{text}"))
    }
}

impl TripGraphOperation {
    /// runs the operation against a connected store, returning the text to
    /// print on success. the store is closed before returning.
    pub fn run(
        &self,
        store: Neo4jGraphStore,
        config: &TripGraphConfig,
    ) -> Result<String, TripGraphError> {
        match self {
            TripGraphOperation::Ingest { file, .. } => {
                let pipeline = IngestionPipeline::new(store, &config.ingest)?;
                let result = pipeline.load_transform_file(Path::new(file));
                pipeline.into_store().close();
                result.map(|_| String::from("Data loaded successfully."))
            }
            TripGraphOperation::Pagerank {
                max_iterations,
                weight_property,
            } => {
                let gateway = AnalyticsGateway::new(store, &config.analytics);
                let result = gateway.pagerank(*max_iterations, weight_property);
                gateway.into_store().close();
                to_json(&result?)
            }
            TripGraphOperation::Bfs { start, end } => {
                let gateway = AnalyticsGateway::new(store, &config.analytics);
                let result = gateway.bfs(*start, *end);
                gateway.into_store().close();
                to_json(&result?)
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, TripGraphError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| TripGraphError::SerializationError(format!("result as JSON: {e}")))
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        TripGraphApp::command().debug_assert();
    }

    #[test]
    fn test_parse_ingest_with_overrides() {
        let app = TripGraphApp::parse_from([
            "tripgraph",
            "--uri",
            "bolt://db:7687",
            "ingest",
            "yellow_tripdata_2022-03.parquet",
            "--staging-directory",
            "/tmp/import",
        ]);
        let overrides = app.overrides();
        assert_eq!(overrides.uri.as_deref(), Some("bolt://db:7687"));
        assert_eq!(overrides.user, None);
        assert_eq!(overrides.staging_directory.as_deref(), Some("/tmp/import"));
        match app.op {
            TripGraphOperation::Ingest { file, .. } => {
                assert_eq!(file, "yellow_tripdata_2022-03.parquet")
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn test_parse_pagerank_defaults() {
        let app = TripGraphApp::parse_from(["tripgraph", "pagerank"]);
        match app.op {
            TripGraphOperation::Pagerank {
                max_iterations,
                weight_property,
            } => {
                assert_eq!(max_iterations, 20);
                assert_eq!(weight_property, "fare");
            }
            _ => panic!("expected pagerank"),
        }
    }

    #[test]
    fn test_to_json_uses_result_shape() {
        let path = vec![crate::graph::ShortestPath::from(vec![159, 212])];
        let text = to_json(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"path": [{"name": 159}, {"name": 212}]}])
        );
    }

    #[test]
    fn test_to_json_failure_is_serialization_error() {
        // JSON object keys must be strings
        let mut by_pair = std::collections::BTreeMap::new();
        by_pair.insert((159, 212), 1);
        let result = to_json(&by_pair);
        assert!(matches!(result, Err(TripGraphError::SerializationError(_))));
    }

    #[test]
    fn test_parse_bfs_with_global_option_after_subcommand() {
        let app = TripGraphApp::parse_from([
            "tripgraph", "bfs", "--start", "159", "--end", "212", "--password", "secret",
        ]);
        assert_eq!(app.password.as_deref(), Some("secret"));
        assert!(matches!(
            app.op,
            TripGraphOperation::Bfs {
                start: 159,
                end: 212
            }
        ));
    }
}

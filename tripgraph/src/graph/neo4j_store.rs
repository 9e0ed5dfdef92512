use neo4rs::{query, ConfigBuilder, Graph, Query, Row};
use tokio::runtime::Runtime;

use crate::{
    config::DatabaseConfig,
    graph::{cypher, GraphStore, ProjectionSpec, RankParameters, RankedLocation},
    ingest::StagingFile,
    TripGraphError,
};

/// a [`GraphStore`] backed by a Neo4j server with the Graph Data Science
/// plugin, reached over Bolt.
///
/// the driver is async; every call is driven to completion on a
/// current-thread runtime owned by this store, so callers see a blocking API.
/// the connection pool and runtime are released when the store is dropped
/// or [`Neo4jGraphStore::close`]d.
pub struct Neo4jGraphStore {
    graph: Graph,
    runtime: Runtime,
    uri: String,
}

impl Neo4jGraphStore {
    /// connects to the database and verifies connectivity before returning.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, TripGraphError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                TripGraphError::RuntimeError(format!(
                    "failure creating async rust tokio runtime: {e}"
                ))
            })?;
        let connectivity_error = |message: String| TripGraphError::ConnectivityError {
            uri: config.uri.clone(),
            message,
        };

        let mut builder = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str());
        if let Some(db) = &config.db {
            builder = builder.db(db.as_str());
        }
        let neo4j_config = builder
            .build()
            .map_err(|e| connectivity_error(format!("invalid connection settings: {e}")))?;
        let graph = runtime
            .block_on(Graph::connect(neo4j_config))
            .map_err(|e| connectivity_error(e.to_string()))?;

        let store = Self {
            graph,
            runtime,
            uri: config.uri.clone(),
        };
        store
            .fetch_rows("verify connectivity", query(cypher::VERIFY_CONNECTIVITY))
            .map_err(|e| connectivity_error(e.to_string()))?;
        log::info!("connected to graph database at {}", store.uri);
        Ok(store)
    }

    /// releases the connection pool.
    pub fn close(self) {
        log::debug!("closing connection to {}", self.uri);
    }

    fn run(&self, operation: &str, q: Query) -> Result<(), TripGraphError> {
        log::debug!("running {operation}");
        self.runtime
            .block_on(self.graph.run(q))
            .map_err(|e| TripGraphError::query(operation, e))
    }

    fn fetch_rows(&self, operation: &str, q: Query) -> Result<Vec<Row>, TripGraphError> {
        log::debug!("running {operation}");
        self.runtime.block_on(async {
            let mut stream = self
                .graph
                .execute(q)
                .await
                .map_err(|e| TripGraphError::query(operation, e))?;
            let mut rows = Vec::new();
            while let Some(row) = stream
                .next()
                .await
                .map_err(|e| TripGraphError::query(operation, e))?
            {
                rows.push(row);
            }
            Ok::<_, TripGraphError>(rows)
        })
    }
}

/// reads one column of a result row.
fn column<'a, T>(row: &'a Row, key: &str) -> Result<T, TripGraphError>
where
    T: serde::Deserialize<'a>,
{
    row.get::<T>(key).map_err(|e| {
        TripGraphError::TransformError(format!("unexpected value in result column '{key}': {e}"))
    })
}

impl GraphStore for Neo4jGraphStore {
    fn ensure_location_constraint(&self) -> Result<(), TripGraphError> {
        self.run(
            "create location constraint",
            query(cypher::CREATE_LOCATION_CONSTRAINT),
        )
    }

    fn bulk_load(&self, staging: &StagingFile) -> Result<(), TripGraphError> {
        let url = staging.url();
        log::info!("bulk loading trips from {url}");
        self.run(
            "load trips csv",
            query(cypher::LOAD_TRIPS_CSV).param("url", url.as_str()),
        )
    }

    fn project(&self, spec: &ProjectionSpec) -> Result<usize, TripGraphError> {
        self.run(
            "drop projection",
            query(cypher::DROP_PROJECTION).param("graphName", spec.name.as_str()),
        )?;

        let count_rows = self.fetch_rows("count locations", query(cypher::COUNT_LOCATIONS))?;
        let locations = match count_rows.first() {
            Some(row) => column::<i64>(row, "count")?,
            None => 0,
        };
        if locations == 0 {
            log::info!("no locations in graph, skipping projection '{}'", spec.name);
            return Ok(0);
        }

        let rows = self.fetch_rows(
            "project locations",
            query(cypher::PROJECT_LOCATIONS)
                .param("graphName", spec.name.as_str())
                .param("weightProperty", spec.weight_property.as_str()),
        )?;
        let node_count = match rows.first() {
            Some(row) => column::<i64>(row, "nodeCount")?,
            None => 0,
        };
        log::info!(
            "projected {node_count} locations into '{}' weighted by '{}'",
            spec.name,
            spec.weight_property
        );
        Ok(node_count.max(0) as usize)
    }

    fn rank(
        &self,
        spec: &ProjectionSpec,
        parameters: &RankParameters,
    ) -> Result<Vec<RankedLocation>, TripGraphError> {
        let rows = self.fetch_rows(
            "pagerank stream",
            query(cypher::PAGERANK_STREAM)
                .param("graphName", spec.name.as_str())
                .param("maxIterations", parameters.max_iterations as i64)
                .param("dampingFactor", parameters.damping_factor),
        )?;
        rows.iter()
            .map(|row| -> Result<RankedLocation, TripGraphError> {
                Ok(RankedLocation {
                    name: column(row, "name")?,
                    score: column(row, "score")?,
                })
            })
            .collect()
    }

    fn shortest_path(&self, start: i64, end: i64) -> Result<Vec<i64>, TripGraphError> {
        // shortestPath rejects identical endpoints, a lookup is enough
        if start == end {
            let rows = self.fetch_rows(
                "find location",
                query(cypher::FIND_LOCATION).param("name", start),
            )?;
            return Ok(if rows.is_empty() { vec![] } else { vec![start] });
        }
        let rows = self.fetch_rows(
            "shortest path",
            query(cypher::SHORTEST_PATH)
                .param("start", start)
                .param("end", end),
        )?;
        match rows.first() {
            Some(row) => column::<Vec<i64>>(row, "path"),
            None => Ok(vec![]),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{ConfigOverrides, TripGraphConfig};

    // requires a running Neo4j instance with the GDS plugin at the default uri
    #[test]
    #[ignore]
    fn test_connect_and_query() {
        let config = TripGraphConfig::load(None, &ConfigOverrides::default()).unwrap();
        let store = Neo4jGraphStore::connect(&config.database).unwrap();
        store.ensure_location_constraint().unwrap();
        let path = store.shortest_path(-1, -1).unwrap();
        assert!(path.is_empty());
        store.close();
    }
}

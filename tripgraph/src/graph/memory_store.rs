use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use indexmap::IndexSet;

use crate::{
    graph::{
        algorithm::{self, WeightedDigraph},
        GraphStore, ProjectionSpec, RankParameters, RankedLocation, DISTANCE_PROPERTY,
        FARE_PROPERTY,
    },
    ingest::{StagingFile, TripRecord},
    TripGraphError,
};

/// a [`GraphStore`] that keeps locations and trips in process memory.
///
/// follows the same contract as [`super::Neo4jGraphStore`]: locations are
/// unique by name, every loaded row adds a new trip, and ranking requires a
/// prior projection. useful for tests and for running analytics without a
/// database server.
///
/// only `distance` and `fare` are stored per trip. any other weight property
/// weighs every trip 1.0; the datetime properties are rejected before reaching
/// a store by [`crate::analytics::AnalyticsGateway::pagerank`].
#[derive(Debug, Default)]
pub struct MemoryGraphStore {
    state: RwLock<MemoryGraph>,
}

#[derive(Debug, Default)]
struct MemoryGraph {
    constraint_created: bool,
    /// location names in insertion order. the index is the node id.
    locations: IndexSet<i64>,
    trips: Vec<TripEdge>,
    projections: HashMap<String, Projection>,
}

#[derive(Debug, Clone)]
struct TripEdge {
    source: usize,
    target: usize,
    distance: f64,
    fare: f64,
}

impl TripEdge {
    /// the trip property named by `weight_property`. properties trips do not
    /// carry weigh 1.0, as a missing property does in the Neo4j projection.
    fn weight(&self, weight_property: &str) -> f64 {
        match weight_property {
            DISTANCE_PROPERTY => self.distance,
            FARE_PROPERTY => self.fare,
            _ => 1.0,
        }
    }
}

/// a frozen copy of the graph taken at projection time.
#[derive(Debug)]
struct Projection {
    names: Vec<i64>,
    graph: WeightedDigraph,
}

impl MemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryGraph>, TripGraphError> {
        self.state
            .read()
            .map_err(|e| TripGraphError::GraphStoreError(format!("failed to acquire read lock: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryGraph>, TripGraphError> {
        self.state.write().map_err(|e| {
            TripGraphError::GraphStoreError(format!("failed to acquire write lock: {e}"))
        })
    }
}

// inspection helpers for tests across the crate
#[cfg(test)]
impl MemoryGraphStore {
    /// upserts both locations of a trip and adds one trip edge between them.
    pub(crate) fn add_trip(&self, trip: &TripRecord) -> Result<(), TripGraphError> {
        let mut state = self.write()?;
        state.insert_trip(trip);
        Ok(())
    }

    pub(crate) fn location_count(&self) -> Result<usize, TripGraphError> {
        Ok(self.read()?.locations.len())
    }

    pub(crate) fn trip_count(&self) -> Result<usize, TripGraphError> {
        Ok(self.read()?.trips.len())
    }

    pub(crate) fn has_location_constraint(&self) -> Result<bool, TripGraphError> {
        Ok(self.read()?.constraint_created)
    }

    pub(crate) fn has_projection(&self, name: &str) -> Result<bool, TripGraphError> {
        Ok(self.read()?.projections.contains_key(name))
    }
}

impl MemoryGraph {
    fn insert_trip(&mut self, trip: &TripRecord) {
        let (source, _) = self.locations.insert_full(trip.pickup_location_id);
        let (target, _) = self.locations.insert_full(trip.dropoff_location_id);
        self.trips.push(TripEdge {
            source,
            target,
            distance: trip.trip_distance,
            fare: trip.fare_amount,
        });
    }

    /// undirected adjacency with each neighbor list sorted by location name,
    /// so path search is deterministic regardless of load order.
    fn undirected_neighbors(&self) -> Vec<Vec<usize>> {
        let mut neighbors = vec![Vec::new(); self.locations.len()];
        for trip in &self.trips {
            neighbors[trip.source].push(trip.target);
            neighbors[trip.target].push(trip.source);
        }
        for list in neighbors.iter_mut() {
            list.sort_by_key(|idx| self.locations.get_index(*idx).copied());
            list.dedup();
        }
        neighbors
    }
}

impl GraphStore for MemoryGraphStore {
    fn ensure_location_constraint(&self) -> Result<(), TripGraphError> {
        self.write()?.constraint_created = true;
        Ok(())
    }

    fn bulk_load(&self, staging: &StagingFile) -> Result<(), TripGraphError> {
        let load_error = |message: String| {
            TripGraphError::GraphStoreError(format!(
                "failed to load '{}': {message}",
                staging.path.display()
            ))
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&staging.path)
            .map_err(|e| load_error(e.to_string()))?;
        // all rows are parsed before any are inserted so a bad row loads nothing
        let trips = reader
            .deserialize::<TripRecord>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| load_error(e.to_string()))?;

        let mut state = self.write()?;
        for trip in trips.iter() {
            state.insert_trip(trip);
        }
        log::info!("loaded {} trips from {}", trips.len(), staging.url());
        Ok(())
    }

    fn project(&self, spec: &ProjectionSpec) -> Result<usize, TripGraphError> {
        let mut state = self.write()?;
        state.projections.remove(&spec.name);
        let node_count = state.locations.len();
        if node_count == 0 {
            log::info!("no locations in graph, skipping projection '{}'", spec.name);
            return Ok(0);
        }
        let mut graph = WeightedDigraph::new(node_count);
        for trip in state.trips.iter() {
            graph.add_edge(trip.source, trip.target, trip.weight(&spec.weight_property));
        }
        let names = state.locations.iter().copied().collect();
        state
            .projections
            .insert(spec.name.clone(), Projection { names, graph });
        log::info!(
            "projected {node_count} locations into '{}' weighted by '{}'",
            spec.name,
            spec.weight_property
        );
        Ok(node_count)
    }

    fn rank(
        &self,
        spec: &ProjectionSpec,
        parameters: &RankParameters,
    ) -> Result<Vec<RankedLocation>, TripGraphError> {
        let state = self.read()?;
        let projection = state.projections.get(&spec.name).ok_or_else(|| {
            TripGraphError::GraphStoreError(format!("projection '{}' does not exist", spec.name))
        })?;
        let scores = algorithm::page_rank(&projection.graph, parameters);
        let ranked = projection
            .names
            .iter()
            .zip(scores)
            .map(|(name, score)| RankedLocation { name: *name, score })
            .collect();
        Ok(ranked)
    }

    fn shortest_path(&self, start: i64, end: i64) -> Result<Vec<i64>, TripGraphError> {
        let state = self.read()?;
        let (Some(source), Some(target)) = (
            state.locations.get_index_of(&start),
            state.locations.get_index_of(&end),
        ) else {
            return Ok(vec![]);
        };
        let neighbors = state.undirected_neighbors();
        let path = algorithm::shortest_undirected_path(&neighbors, source, target)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|idx| state.locations.get_index(idx).copied())
            .collect();
        Ok(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ingest::write_staging_csv;

    fn trip(pickup: i64, dropoff: i64, distance: f64, fare: f64) -> TripRecord {
        TripRecord {
            pickup_datetime: String::from("2022-03-01T00:13:08"),
            dropoff_datetime: String::from("2022-03-01T00:24:35"),
            pickup_location_id: pickup,
            dropoff_location_id: dropoff,
            trip_distance: distance,
            fare_amount: fare,
        }
    }

    fn spec(weight_property: &str) -> ProjectionSpec {
        ProjectionSpec {
            name: String::from("myGraph"),
            weight_property: weight_property.to_string(),
        }
    }

    const PARAMETERS: RankParameters = RankParameters {
        max_iterations: 20,
        damping_factor: 0.85,
    };

    #[test]
    fn test_bulk_load_upserts_locations_and_creates_trips() {
        let dir = tempfile::tempdir().unwrap();
        let trips = vec![trip(159, 47, 2.4, 10.5), trip(47, 159, 1.0, 6.0)];
        let staged = write_staging_csv(&trips, dir.path(), "trips.csv").unwrap();

        let store = MemoryGraphStore::new();
        store.bulk_load(&staged).unwrap();
        assert_eq!(store.location_count().unwrap(), 2);
        assert_eq!(store.trip_count().unwrap(), 2);

        store.bulk_load(&staged).unwrap();
        assert_eq!(store.location_count().unwrap(), 2);
        assert_eq!(store.trip_count().unwrap(), 4);
    }

    #[test]
    fn test_bulk_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "tpep_pickup_datetime,tpep_dropoff_datetime,PULocationID,DOLocationID,trip_distance,fare_amount\n\
             2022-03-01T00:13:08,2022-03-01T00:24:35,159,47,2.4,10.5\n\
             2022-03-01T00:13:08,2022-03-01T00:24:35,abc,47,2.4,10.5\n",
        )
        .unwrap();
        let staged = StagingFile {
            path,
            file_name: String::from("bad.csv"),
        };
        let store = MemoryGraphStore::new();
        let result = store.bulk_load(&staged);
        assert!(matches!(result, Err(TripGraphError::GraphStoreError(_))));
        assert_eq!(store.trip_count().unwrap(), 0);
    }

    #[test]
    fn test_constraint_is_idempotent() {
        let store = MemoryGraphStore::new();
        assert!(!store.has_location_constraint().unwrap());
        store.ensure_location_constraint().unwrap();
        store.ensure_location_constraint().unwrap();
        assert!(store.has_location_constraint().unwrap());
    }

    #[test]
    fn test_empty_projection_is_dropped() {
        let store = MemoryGraphStore::new();
        assert_eq!(store.project(&spec("fare")).unwrap(), 0);
        assert!(!store.has_projection("myGraph").unwrap());
        assert!(matches!(
            store.rank(&spec("fare"), &PARAMETERS),
            Err(TripGraphError::GraphStoreError(_))
        ));
    }

    #[test]
    fn test_reprojection_replaces_previous() {
        let store = MemoryGraphStore::new();
        store.add_trip(&trip(1, 2, 1.0, 1.0)).unwrap();
        assert_eq!(store.project(&spec("fare")).unwrap(), 2);
        store.add_trip(&trip(2, 3, 1.0, 1.0)).unwrap();
        assert_eq!(store.project(&spec("fare")).unwrap(), 3);
        let ranked = store.rank(&spec("fare"), &PARAMETERS).unwrap();
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_weight_property_changes_ranking() {
        let store = MemoryGraphStore::new();
        store.add_trip(&trip(1, 2, 9.0, 1.0)).unwrap();
        store.add_trip(&trip(1, 3, 1.0, 9.0)).unwrap();
        let score_of = |ranked: &[RankedLocation], name: i64| {
            ranked.iter().find(|r| r.name == name).unwrap().score
        };

        store.project(&spec("fare")).unwrap();
        let by_fare = store.rank(&spec("fare"), &PARAMETERS).unwrap();
        assert!(score_of(&by_fare, 3) > score_of(&by_fare, 2));

        store.project(&spec("distance")).unwrap();
        let by_distance = store.rank(&spec("distance"), &PARAMETERS).unwrap();
        assert!(score_of(&by_distance, 2) > score_of(&by_distance, 3));

        // unknown property weighs every trip 1.0
        store.project(&spec("tip")).unwrap();
        let unweighted = store.rank(&spec("tip"), &PARAMETERS).unwrap();
        assert!((score_of(&unweighted, 2) - score_of(&unweighted, 3)).abs() < 1e-12);
    }

    #[test]
    fn test_shortest_path_ignores_direction() {
        let store = MemoryGraphStore::new();
        store.add_trip(&trip(1, 2, 1.0, 1.0)).unwrap();
        store.add_trip(&trip(3, 2, 1.0, 1.0)).unwrap();
        assert_eq!(store.shortest_path(1, 3).unwrap(), vec![1, 2, 3]);
        assert_eq!(store.shortest_path(3, 1).unwrap(), vec![3, 2, 1]);
    }

    #[test]
    fn test_shortest_path_edge_cases() {
        let store = MemoryGraphStore::new();
        store.add_trip(&trip(1, 2, 1.0, 1.0)).unwrap();
        store.add_trip(&trip(5, 6, 1.0, 1.0)).unwrap();
        assert_eq!(store.shortest_path(1, 1).unwrap(), vec![1]);
        assert!(store.shortest_path(1, 5).unwrap().is_empty());
        assert!(store.shortest_path(1, 99).unwrap().is_empty());
        assert!(store.shortest_path(99, 99).unwrap().is_empty());
    }
}

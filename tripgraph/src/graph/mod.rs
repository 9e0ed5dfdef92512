mod graph_store;
mod location;
mod memory_store;
mod neo4j_store;

pub mod algorithm;
pub mod cypher;

pub use graph_store::{
    GraphStore, ProjectionSpec, RankParameters, DISTANCE_PROPERTY, FARE_PROPERTY,
    TRIP_DATETIME_PROPERTIES,
};
pub use location::{PathStep, RankedLocation, ShortestPath};
pub use memory_store::MemoryGraphStore;
pub use neo4j_store::Neo4jGraphStore;

use crate::{
    graph::RankedLocation,
    ingest::StagingFile,
    TripGraphError,
};

/// numeric trip properties written by the bulk load.
pub const DISTANCE_PROPERTY: &str = "distance";
pub const FARE_PROPERTY: &str = "fare";

/// datetime trip properties. these cannot be used as a ranking weight.
pub const TRIP_DATETIME_PROPERTIES: [&str; 2] = ["pickup_dt", "dropoff_dt"];

/// names the in-memory projection used for ranking and the trip property
/// read as edge weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionSpec {
    pub name: String,
    /// numeric trip property used as weight. trips without it weigh 1.0.
    pub weight_property: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankParameters {
    pub max_iterations: usize,
    pub damping_factor: f64,
}

/// the capabilities the ingestion pipeline and analytics gateway need from
/// a graph engine. every call blocks until the engine has finished and
/// fails fast; nothing is retried.
pub trait GraphStore {
    /// ensures the uniqueness constraint on location names exists. idempotent.
    fn ensure_location_constraint(&self) -> Result<(), TripGraphError>;

    /// bulk loads a staging file. both locations of each row are upserted and
    /// one new trip edge is created per row.
    fn bulk_load(&self, staging: &StagingFile) -> Result<(), TripGraphError>;

    /// drops any projection with this name and projects all locations and
    /// trips, directed, weighted by `spec.weight_property`. returns the number
    /// of projected locations. when that is zero, no projection exists afterward.
    fn project(&self, spec: &ProjectionSpec) -> Result<usize, TripGraphError>;

    /// runs weighted PageRank over an existing projection, returning one
    /// entry per projected location in no particular order.
    fn rank(
        &self,
        spec: &ProjectionSpec,
        parameters: &RankParameters,
    ) -> Result<Vec<RankedLocation>, TripGraphError>;

    /// finds one path with the fewest trips between two locations, ignoring
    /// trip direction. returns location names start to end inclusive, or an
    /// empty list if either location is absent or they are not connected.
    fn shortest_path(&self, start: i64, end: i64) -> Result<Vec<i64>, TripGraphError>;
}

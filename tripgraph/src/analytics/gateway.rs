use std::cmp::Reverse;

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::{
    config::AnalyticsConfig,
    graph::{
        GraphStore, PathStep, ProjectionSpec, RankParameters, RankedLocation, ShortestPath,
        TRIP_DATETIME_PROPERTIES,
    },
    TripGraphError,
};

/// read-only analytics over an ingested trip graph.
///
/// every call goes straight to the store; nothing is cached between calls,
/// though ranking replaces the named projection as a side effect.
pub struct AnalyticsGateway<S: GraphStore> {
    store: S,
    projection_name: String,
    damping_factor: f64,
}

impl<S: GraphStore> AnalyticsGateway<S> {
    pub fn new(store: S, config: &AnalyticsConfig) -> Self {
        Self {
            store,
            projection_name: config.projection_name.clone(),
            damping_factor: config.damping_factor,
        }
    }

    /// ranks all locations by weighted PageRank and returns the highest and
    /// lowest ranked location, in that order. ties are broken by location
    /// name, ascending. returns an empty list when the graph has no locations.
    ///
    /// # Arguments
    ///
    /// * `max_iterations` - upper bound on PageRank iterations, at least 1
    /// * `weight_property` - trip property used as edge weight, such as `fare`
    ///   or `distance`. trips without it weigh 1.0.
    pub fn pagerank(
        &self,
        max_iterations: usize,
        weight_property: &str,
    ) -> Result<Vec<RankedLocation>, TripGraphError> {
        if max_iterations == 0 {
            return Err(TripGraphError::InvalidUserInput(String::from(
                "max_iterations must be at least 1",
            )));
        }
        if !is_identifier(weight_property) {
            return Err(TripGraphError::InvalidUserInput(format!(
                "weight property '{weight_property}' is not a valid property name"
            )));
        }
        if TRIP_DATETIME_PROPERTIES.iter().any(|p| *p == weight_property) {
            return Err(TripGraphError::InvalidUserInput(format!(
                "weight property '{weight_property}' is a datetime, expected a numeric trip property"
            )));
        }
        let spec = ProjectionSpec {
            name: self.projection_name.clone(),
            weight_property: weight_property.to_string(),
        };
        let node_count = self.store.project(&spec)?;
        if node_count == 0 {
            return Ok(vec![]);
        }
        let parameters = RankParameters {
            max_iterations,
            damping_factor: self.damping_factor,
        };
        let ranked = self.store.rank(&spec, &parameters)?;
        log::debug!("ranked {} locations by '{weight_property}'", ranked.len());
        Ok(select_extremes(ranked))
    }

    /// one path with the fewest trips between two locations, ignoring trip
    /// direction. empty if either location is missing or they are not
    /// connected.
    pub fn shortest_path(&self, start: i64, end: i64) -> Result<Vec<PathStep>, TripGraphError> {
        let names = self.store.shortest_path(start, end)?;
        Ok(names.into_iter().map(|name| PathStep { name }).collect())
    }

    /// [`Self::shortest_path`] wrapped as a list holding zero or one path.
    pub fn bfs(&self, start: i64, end: i64) -> Result<Vec<ShortestPath>, TripGraphError> {
        let names = self.store.shortest_path(start, end)?;
        if names.is_empty() {
            Ok(vec![])
        } else {
            Ok(vec![ShortestPath::from(names)])
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// orders ranked locations by score descending, then name ascending, and
/// returns `[first, last]`. a single location is both first and last.
pub fn select_extremes(ranked: Vec<RankedLocation>) -> Vec<RankedLocation> {
    let sorted = ranked
        .into_iter()
        .sorted_by_key(|r| (Reverse(OrderedFloat(r.score)), r.name))
        .collect_vec();
    match (sorted.first(), sorted.last()) {
        (Some(max), Some(min)) => vec![max.clone(), min.clone()],
        _ => vec![],
    }
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

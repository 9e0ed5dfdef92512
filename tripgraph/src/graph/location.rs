use serde::{Deserialize, Serialize};

/// a location node with its ranking score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLocation {
    pub name: i64,
    pub score: f64,
}

/// one location along a shortest path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub name: i64,
}

/// a shortest path between two locations, start to end inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPath {
    pub path: Vec<PathStep>,
}

impl From<Vec<i64>> for ShortestPath {
    fn from(value: Vec<i64>) -> Self {
        Self {
            path: value.into_iter().map(|name| PathStep { name }).collect(),
        }
    }
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// the set of taxi zone location ids a trip must start and end in
/// to be loaded into the graph. read once from configuration and never
/// modified afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<i64>", into = "Vec<i64>")]
pub struct AllowedZoneSet(BTreeSet<i64>);

impl AllowedZoneSet {
    pub fn contains(&self, location_id: i64) -> bool {
        self.0.contains(&location_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &i64> {
        self.0.iter()
    }
}

impl From<Vec<i64>> for AllowedZoneSet {
    fn from(value: Vec<i64>) -> Self {
        Self(value.into_iter().collect())
    }
}

impl From<AllowedZoneSet> for Vec<i64> {
    fn from(value: AllowedZoneSet) -> Self {
        value.0.into_iter().collect()
    }
}

impl FromIterator<i64> for AllowedZoneSet {
    fn from_iter<T: IntoIterator<Item = i64>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

use serde::{Deserialize, Serialize};

use crate::{config::AllowedZoneSet, ingest::RawTripRow};

/// a predicate over a raw trip row. a row is kept only if every configured
/// filter accepts it. null values never pass a predicate that reads them.
///
/// configured in TOML as a tagged table, for example
/// `{ type = "min_fare", value = 2.5 }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum TripFilter {
    /// pickup location must be in the allowed zone set.
    #[serde(rename = "pickup_zone")]
    PickupZone,
    /// dropoff location must be in the allowed zone set.
    #[serde(rename = "dropoff_zone")]
    DropoffZone,
    /// trip distance must be strictly greater than `value`.
    #[serde(rename = "min_distance")]
    MinDistance { value: f64 },
    /// fare amount must be strictly greater than `value`.
    #[serde(rename = "min_fare")]
    MinFare { value: f64 },
}

impl TripFilter {
    pub fn accepts(&self, row: &RawTripRow, zones: &AllowedZoneSet) -> bool {
        match self {
            TripFilter::PickupZone => row
                .pickup_location_id
                .map(|id| zones.contains(id))
                .unwrap_or(false),
            TripFilter::DropoffZone => row
                .dropoff_location_id
                .map(|id| zones.contains(id))
                .unwrap_or(false),
            TripFilter::MinDistance { value } => {
                row.trip_distance.map(|d| d > *value).unwrap_or(false)
            }
            TripFilter::MinFare { value } => row.fare_amount.map(|f| f > *value).unwrap_or(false),
        }
    }
}

impl std::fmt::Display for TripFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripFilter::PickupZone => write!(f, "pickup_zone"),
            TripFilter::DropoffZone => write!(f, "dropoff_zone"),
            TripFilter::MinDistance { value } => write!(f, "trip_distance > {value}"),
            TripFilter::MinFare { value } => write!(f, "fare_amount > {value}"),
        }
    }
}

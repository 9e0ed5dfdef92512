use serde::{Deserialize, Serialize};

use crate::{ingest::timestamp_ops, TripGraphError};

pub const PICKUP_DATETIME: &str = "tpep_pickup_datetime";
pub const DROPOFF_DATETIME: &str = "tpep_dropoff_datetime";
pub const PICKUP_LOCATION_ID: &str = "PULocationID";
pub const DROPOFF_LOCATION_ID: &str = "DOLocationID";
pub const TRIP_DISTANCE: &str = "trip_distance";
pub const FARE_AMOUNT: &str = "fare_amount";

/// the six source columns kept from a trip file, in staging file order.
pub const TRIP_COLUMNS: [&str; 6] = [
    PICKUP_DATETIME,
    DROPOFF_DATETIME,
    PICKUP_LOCATION_ID,
    DROPOFF_LOCATION_ID,
    TRIP_DISTANCE,
    FARE_AMOUNT,
];

/// a trip row as read from the source file after projection and column
/// casting. any value may be null upstream. timestamps are still in
/// whatever textual form the source produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTripRow {
    #[serde(rename = "tpep_pickup_datetime")]
    pub pickup_datetime: Option<String>,
    #[serde(rename = "tpep_dropoff_datetime")]
    pub dropoff_datetime: Option<String>,
    #[serde(rename = "PULocationID")]
    pub pickup_location_id: Option<i64>,
    #[serde(rename = "DOLocationID")]
    pub dropoff_location_id: Option<i64>,
    #[serde(rename = "trip_distance")]
    pub trip_distance: Option<f64>,
    #[serde(rename = "fare_amount")]
    pub fare_amount: Option<f64>,
}

/// a filtered trip with normalized timestamps. this is the row type of the
/// staging CSV, so the serialized field names are the header the bulk load
/// query reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    #[serde(rename = "tpep_pickup_datetime")]
    pub pickup_datetime: String,
    #[serde(rename = "tpep_dropoff_datetime")]
    pub dropoff_datetime: String,
    #[serde(rename = "PULocationID")]
    pub pickup_location_id: i64,
    #[serde(rename = "DOLocationID")]
    pub dropoff_location_id: i64,
    #[serde(rename = "trip_distance")]
    pub trip_distance: f64,
    #[serde(rename = "fare_amount")]
    pub fare_amount: f64,
}

impl TryFrom<&RawTripRow> for TripRecord {
    type Error = TripGraphError;

    fn try_from(row: &RawTripRow) -> Result<Self, Self::Error> {
        let pickup = required(&row.pickup_datetime, PICKUP_DATETIME)?;
        let dropoff = required(&row.dropoff_datetime, DROPOFF_DATETIME)?;
        Ok(TripRecord {
            pickup_datetime: timestamp_ops::normalize_timestamp(pickup)?,
            dropoff_datetime: timestamp_ops::normalize_timestamp(dropoff)?,
            pickup_location_id: *required(&row.pickup_location_id, PICKUP_LOCATION_ID)?,
            dropoff_location_id: *required(&row.dropoff_location_id, DROPOFF_LOCATION_ID)?,
            trip_distance: *required(&row.trip_distance, TRIP_DISTANCE)?,
            fare_amount: *required(&row.fare_amount, FARE_AMOUNT)?,
        })
    }
}

fn required<'a, T>(value: &'a Option<T>, column: &str) -> Result<&'a T, TripGraphError> {
    value
        .as_ref()
        .ok_or_else(|| TripGraphError::TransformError(format!("column '{column}' is null")))
}

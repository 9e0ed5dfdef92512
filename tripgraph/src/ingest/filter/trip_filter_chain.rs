use std::{collections::HashSet, mem::discriminant};

use itertools::Itertools;

use crate::{
    config::{AllowedZoneSet, IngestConfig},
    ingest::{filter::TripFilter, RawTripRow},
    TripGraphError,
};

/// the AND of a list of [`TripFilter`]s, evaluated against one zone set.
#[derive(Debug, Clone)]
pub struct TripFilterChain {
    zones: AllowedZoneSet,
    filters: Vec<TripFilter>,
}

impl TryFrom<&IngestConfig> for TripFilterChain {
    type Error = TripGraphError;

    fn try_from(value: &IngestConfig) -> Result<Self, Self::Error> {
        TripFilterChain::new(value.zones.clone(), value.filters.clone())
    }
}

impl TripFilterChain {
    /// builds a filter chain. each filter type may appear at most once, and both
    /// zone filters are required: every location written to the graph must be
    /// a member of the zone set.
    pub fn new(zones: AllowedZoneSet, filters: Vec<TripFilter>) -> Result<Self, TripGraphError> {
        let mut seen = HashSet::new();
        if !filters.iter().all(|f| seen.insert(discriminant(f))) {
            let listed = filters.iter().join(", ");
            return Err(TripGraphError::InvalidUserInput(format!(
                "each trip filter can be listed at most once, found [{listed}]"
            )));
        }
        for required in [TripFilter::PickupZone, TripFilter::DropoffZone] {
            if !filters.contains(&required) {
                return Err(TripGraphError::InvalidUserInput(format!(
                    "trip filters must include '{required}'"
                )));
            }
        }
        Ok(Self { zones, filters })
    }

    pub fn accepts(&self, row: &RawTripRow) -> bool {
        self.filters.iter().all(|f| f.accepts(row, &self.zones))
    }

    /// keeps the rows accepted by every filter, preserving input order.
    pub fn apply<'a>(&self, rows: &'a [RawTripRow]) -> Vec<&'a RawTripRow> {
        rows.iter().filter(|row| self.accepts(row)).collect()
    }

    pub fn zones(&self) -> &AllowedZoneSet {
        &self.zones
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn bronx_chain() -> TripFilterChain {
        let zones = AllowedZoneSet::from(vec![3, 18, 47, 159, 212]);
        TripFilterChain::new(
            zones,
            vec![
                TripFilter::PickupZone,
                TripFilter::DropoffZone,
                TripFilter::MinDistance { value: 0.1 },
                TripFilter::MinFare { value: 2.5 },
            ],
        )
        .unwrap()
    }

    fn row(pu: i64, dropoff: i64, distance: f64, fare: f64) -> RawTripRow {
        RawTripRow {
            pickup_datetime: Some(String::from("2022-03-01 00:13:08")),
            dropoff_datetime: Some(String::from("2022-03-01 00:24:35")),
            pickup_location_id: Some(pu),
            dropoff_location_id: Some(dropoff),
            trip_distance: Some(distance),
            fare_amount: Some(fare),
        }
    }

    #[test]
    fn test_distance_predicate_drops_short_trip() {
        let chain = bronx_chain();
        let rows = vec![row(3, 18, 1.0, 5.0), row(3, 18, 0.05, 5.0)];
        let kept = chain.apply(&rows);
        assert_eq!(kept, vec![&rows[0]]);
    }

    #[test]
    fn test_each_predicate_drops_rows() {
        let chain = bronx_chain();
        assert!(chain.accepts(&row(159, 212, 2.0, 10.0)));
        assert!(!chain.accepts(&row(1, 212, 2.0, 10.0)), "pickup outside zones");
        assert!(!chain.accepts(&row(159, 1, 2.0, 10.0)), "dropoff outside zones");
        assert!(!chain.accepts(&row(159, 212, 0.0, 10.0)), "distance too small");
        assert!(!chain.accepts(&row(159, 212, 2.0, 2.0)), "fare too small");
    }

    #[test]
    fn test_thresholds_are_strict() {
        let chain = bronx_chain();
        assert!(!chain.accepts(&row(3, 18, 0.1, 5.0)));
        assert!(!chain.accepts(&row(3, 18, 1.0, 2.5)));
        assert!(chain.accepts(&row(3, 18, 0.11, 2.51)));
    }

    #[test]
    fn test_nulls_never_pass() {
        let chain = bronx_chain();
        let base = row(3, 18, 1.0, 5.0);
        let cases = vec![
            RawTripRow {
                pickup_location_id: None,
                ..base.clone()
            },
            RawTripRow {
                dropoff_location_id: None,
                ..base.clone()
            },
            RawTripRow {
                trip_distance: None,
                ..base.clone()
            },
            RawTripRow {
                fare_amount: None,
                ..base.clone()
            },
        ];
        for case in cases {
            assert!(!chain.accepts(&case), "{case:?}");
        }
    }

    #[test]
    fn test_order_does_not_change_result() {
        let zones = AllowedZoneSet::from(vec![3, 18]);
        let reversed = TripFilterChain::new(
            zones,
            vec![
                TripFilter::MinFare { value: 2.5 },
                TripFilter::MinDistance { value: 0.1 },
                TripFilter::DropoffZone,
                TripFilter::PickupZone,
            ],
        )
        .unwrap();
        let forward = bronx_chain();
        let rows = vec![
            row(3, 18, 1.0, 5.0),
            row(3, 18, 0.05, 5.0),
            row(3, 99, 1.0, 5.0),
            row(18, 3, 3.0, 1.0),
        ];
        assert_eq!(forward.apply(&rows), reversed.apply(&rows));
    }

    #[test]
    fn test_duplicate_filter_rejected() {
        let result = TripFilterChain::new(
            AllowedZoneSet::from(vec![3]),
            vec![
                TripFilter::PickupZone,
                TripFilter::DropoffZone,
                TripFilter::MinFare { value: 2.5 },
                TripFilter::MinFare { value: 3.5 },
            ],
        );
        assert!(matches!(result, Err(TripGraphError::InvalidUserInput(_))));
    }

    #[test]
    fn test_zone_filters_required() {
        let result = TripFilterChain::new(
            AllowedZoneSet::from(vec![3]),
            vec![TripFilter::PickupZone, TripFilter::MinFare { value: 2.5 }],
        );
        assert!(matches!(result, Err(TripGraphError::InvalidUserInput(_))));
    }
}

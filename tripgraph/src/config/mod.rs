mod tripgraph_config;
mod zone_set;

pub use tripgraph_config::{
    AnalyticsConfig, ConfigOverrides, DatabaseConfig, IngestConfig, TripGraphConfig,
    DEFAULT_CONFIG,
};
pub use zone_set::AllowedZoneSet;

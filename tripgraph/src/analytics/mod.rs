mod gateway;

pub use gateway::{select_extremes, AnalyticsGateway};

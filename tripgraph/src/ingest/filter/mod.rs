mod trip_filter;
mod trip_filter_chain;

pub use trip_filter::TripFilter;
pub use trip_filter_chain::TripFilterChain;

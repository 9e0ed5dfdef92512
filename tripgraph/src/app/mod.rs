mod tripgraph_app;

pub use tripgraph_app::{TripGraphApp, TripGraphOperation};

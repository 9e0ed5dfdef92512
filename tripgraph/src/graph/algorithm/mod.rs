//! graph algorithms used by [`crate::graph::MemoryGraphStore`]. both work on
//! dense node indices assigned by the caller.
mod bfs;
mod pagerank;

pub use bfs::shortest_undirected_path;
pub use pagerank::{page_rank, WeightedDigraph, CONVERGENCE_TOLERANCE};

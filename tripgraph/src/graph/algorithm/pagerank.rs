use crate::graph::RankParameters;

/// iteration stops early once no score changes by more than this.
pub const CONVERGENCE_TOLERANCE: f64 = 1e-7;

/// a directed graph with weighted edges, stored as incoming adjacency lists.
/// parallel edges are kept and each contributes its own weight.
#[derive(Debug, Clone, Default)]
pub struct WeightedDigraph {
    incoming: Vec<Vec<(usize, f64)>>,
    out_weight: Vec<f64>,
}

impl WeightedDigraph {
    pub fn new(node_count: usize) -> Self {
        Self {
            incoming: vec![Vec::new(); node_count],
            out_weight: vec![0.0; node_count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.incoming.len()
    }

    /// adds an edge. both endpoints must be less than `node_count`.
    pub fn add_edge(&mut self, source: usize, target: usize, weight: f64) {
        self.incoming[target].push((source, weight));
        self.out_weight[source] += weight;
    }
}

/// weighted PageRank by power iteration.
///
/// every node starts at `1 - d` and is updated as
/// `(1 - d) + d * sum(score[u] * w(u, v) / out_weight[u])` over incoming edges.
/// nodes without outgoing weight keep their rank (no teleport redistribution).
/// runs at most `max_iterations` rounds.
pub fn page_rank(graph: &WeightedDigraph, parameters: &RankParameters) -> Vec<f64> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    let d = parameters.damping_factor;
    let base_score = 1.0 - d;
    let mut scores = vec![base_score; n];
    let mut next_scores = vec![0.0; n];

    for iteration in 0..parameters.max_iterations {
        let mut max_diff: f64 = 0.0;
        for (node, incoming) in graph.incoming.iter().enumerate() {
            let sum_incoming: f64 = incoming
                .iter()
                .filter(|(source, _)| graph.out_weight[*source] > 0.0)
                .map(|(source, weight)| scores[*source] * weight / graph.out_weight[*source])
                .sum();
            next_scores[node] = base_score + d * sum_incoming;
            max_diff = max_diff.max((next_scores[node] - scores[node]).abs());
        }
        std::mem::swap(&mut scores, &mut next_scores);
        if max_diff < CONVERGENCE_TOLERANCE {
            log::debug!("pagerank converged after {} iterations", iteration + 1);
            break;
        }
    }
    scores
}

#[cfg(test)]
mod test {
    use super::*;

    fn parameters(max_iterations: usize) -> RankParameters {
        RankParameters {
            max_iterations,
            damping_factor: 0.85,
        }
    }

    #[test]
    fn test_empty_graph() {
        let graph = WeightedDigraph::new(0);
        assert!(page_rank(&graph, &parameters(20)).is_empty());
    }

    #[test]
    fn test_chain_scores_increase_downstream() {
        let mut graph = WeightedDigraph::new(3);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(1, 2, 1.0);
        let scores = page_rank(&graph, &parameters(20));
        assert!(scores[0] < scores[1]);
        assert!(scores[1] < scores[2]);
        assert!((scores[0] - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_weights_split_rank() {
        // 0 sends three times as much weight to 2 as to 1
        let mut graph = WeightedDigraph::new(3);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(0, 2, 3.0);
        let scores = page_rank(&graph, &parameters(20));
        assert!(scores[2] > scores[1]);
        let expected_1 = 0.15 + 0.85 * 0.15 * 0.25;
        let expected_2 = 0.15 + 0.85 * 0.15 * 0.75;
        assert!((scores[1] - expected_1).abs() < 1e-9);
        assert!((scores[2] - expected_2).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_cycle_is_uniform() {
        let mut graph = WeightedDigraph::new(3);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(1, 2, 1.0);
        graph.add_edge(2, 0, 1.0);
        let scores = page_rank(&graph, &parameters(50));
        assert!((scores[0] - scores[1]).abs() < 1e-9);
        assert!((scores[1] - scores[2]).abs() < 1e-9);
    }

    #[test]
    fn test_iteration_bound_is_respected() {
        let mut graph = WeightedDigraph::new(3);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(1, 2, 1.0);
        // after a single round node 2 has only seen node 1's initial score
        let scores = page_rank(&graph, &parameters(1));
        assert!((scores[2] - (0.15 + 0.85 * 0.15)).abs() < 1e-12);
    }
}

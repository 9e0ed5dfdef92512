use std::collections::VecDeque;

/// breadth-first search for a path with the fewest edges from `source` to
/// `target` over an adjacency list. returns node indices from source to target
/// inclusive, or `None` if the target is unreachable. neighbors are visited in
/// list order, so the first shortest path found is deterministic.
pub fn shortest_undirected_path(
    neighbors: &[Vec<usize>],
    source: usize,
    target: usize,
) -> Option<Vec<usize>> {
    if source >= neighbors.len() || target >= neighbors.len() {
        return None;
    }
    let mut parent: Vec<Option<usize>> = vec![None; neighbors.len()];
    let mut visited = vec![false; neighbors.len()];
    let mut queue = VecDeque::new();
    visited[source] = true;
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        if current == target {
            let mut path = vec![target];
            let mut curr = parent[target];
            while let Some(idx) = curr {
                path.push(idx);
                curr = parent[idx];
            }
            path.reverse();
            return Some(path);
        }
        for &next in &neighbors[current] {
            if !visited[next] {
                visited[next] = true;
                parent[next] = Some(current);
                queue.push_back(next);
            }
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_same_node() {
        let neighbors = vec![vec![1], vec![0]];
        assert_eq!(shortest_undirected_path(&neighbors, 0, 0), Some(vec![0]));
    }

    #[test]
    fn test_prefers_fewest_edges() {
        // 0-1-2-3 and a shortcut 0-3
        let neighbors = vec![vec![1, 3], vec![0, 2], vec![1, 3], vec![2, 0]];
        assert_eq!(shortest_undirected_path(&neighbors, 0, 3), Some(vec![0, 3]));
        assert_eq!(shortest_undirected_path(&neighbors, 1, 3), Some(vec![1, 0, 3]));
    }

    #[test]
    fn test_unreachable() {
        let neighbors = vec![vec![1], vec![0], vec![]];
        assert_eq!(shortest_undirected_path(&neighbors, 0, 2), None);
        assert_eq!(shortest_undirected_path(&neighbors, 0, 5), None);
    }
}

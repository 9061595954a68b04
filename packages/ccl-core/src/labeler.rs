//! Local DFS / Component Labeler: an iterative DFS (no recursion — input
//! graphs can be deep) that assigns each owned vertex an initial component
//! label unique within the rank, and records every foreign-edge endpoint
//! for the border exchange.

use hashbrown::HashMap;

use crate::graph::{Label, LocalSubgraph, VertexId};

/// Output of one rank's local DFS pass.
#[derive(Debug, Clone)]
pub struct LabelingResult {
    /// `labels[offset]` is the initial label of vertex `lsg.lo() + offset`.
    pub labels: Vec<Label>,
    /// For every local vertex with at least one foreign neighbor, its list
    /// of foreign neighbor ids.
    pub local_to_foreign: HashMap<VertexId, Vec<VertexId>>,
    /// For every foreign vertex referenced by this rank, the local vertices
    /// that reference it.
    pub foreign_to_local: HashMap<VertexId, Vec<VertexId>>,
}

impl LabelingResult {
    /// Distinct initial labels produced, in ascending order. Used to seed
    /// the CAG's union-find.
    pub fn distinct_labels(&self) -> Vec<Label> {
        let mut labels: Vec<Label> = self.labels.clone();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

/// Runs the iterative DFS over every vertex owned by `lsg`, in id order.
pub fn label_components(lsg: &LocalSubgraph) -> LabelingResult {
    let n = lsg.len();
    let mut visited = vec![false; n];
    let mut labels = vec![0 as Label; n];
    let mut local_to_foreign: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
    let mut foreign_to_local: HashMap<VertexId, Vec<VertexId>> = HashMap::new();

    let mut next_label: Label = lsg.lo();
    let mut stack: Vec<usize> = Vec::new();

    for start_offset in 0..n {
        if visited[start_offset] {
            continue;
        }

        visited[start_offset] = true;
        stack.push(start_offset);

        while let Some(offset) = stack.pop() {
            labels[offset] = next_label;
            let v = lsg.vertex_at(offset);

            for &w in lsg.neighbors(v) {
                if lsg.owns(w) {
                    let w_offset = lsg.offset(w);
                    if !visited[w_offset] {
                        visited[w_offset] = true;
                        stack.push(w_offset);
                    }
                } else {
                    local_to_foreign.entry(v).or_default().push(w);
                    foreign_to_local.entry(w).or_default().push(v);
                }
            }
        }

        next_label += 1;
    }

    LabelingResult {
        labels,
        local_to_foreign,
        foreign_to_local,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(neighbors: &[VertexId]) -> Vec<VertexId> {
        neighbors.to_vec()
    }

    #[test]
    fn single_component_gets_one_label() {
        // 0 - 1 - 2, all owned locally.
        let lsg = LocalSubgraph::new(0, 2, vec![row(&[1]), row(&[0, 2]), row(&[1])]);
        let result = label_components(&lsg);
        assert_eq!(result.distinct_labels().len(), 1);
        assert_eq!(result.labels[0], result.labels[1]);
        assert_eq!(result.labels[1], result.labels[2]);
    }

    #[test]
    fn disconnected_pairs_get_distinct_labels() {
        // {0,1} and {2,3} disconnected.
        let lsg = LocalSubgraph::new(0, 3, vec![row(&[1]), row(&[0]), row(&[3]), row(&[2])]);
        let result = label_components(&lsg);
        assert_eq!(result.distinct_labels().len(), 2);
        assert_eq!(result.labels[0], result.labels[1]);
        assert_eq!(result.labels[2], result.labels[3]);
        assert_ne!(result.labels[0], result.labels[2]);
    }

    #[test]
    fn foreign_edges_are_recorded_both_ways() {
        // rank owns [5,6]; vertex 5 has a foreign neighbor 2, vertex 6 is isolated locally.
        let lsg = LocalSubgraph::new(5, 6, vec![row(&[2]), row(&[])]);
        let result = label_components(&lsg);
        assert_eq!(result.local_to_foreign.get(&5), Some(&vec![2]));
        assert_eq!(result.foreign_to_local.get(&2), Some(&vec![5]));
        assert!(!result.local_to_foreign.contains_key(&6));
        // 5 and 6 are separate local components since there's no local edge between them.
        assert_ne!(result.labels[0], result.labels[1]);
    }

    #[test]
    fn labels_start_at_lo() {
        let lsg = LocalSubgraph::new(100, 101, vec![row(&[]), row(&[])]);
        let result = label_components(&lsg);
        assert_eq!(result.labels, vec![100, 101]);
    }
}

//! A trivially-correct sequential connected-components solver, used only
//! as the property-test matrix's ground truth. Deliberately simple: a
//! single-threaded union-find over every edge, nothing distributed about
//! it.

use ccl_core::{Label, VertexId};
use hashbrown::HashMap;

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        UnionFind { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[ra.max(rb)] = ra.min(rb);
        }
    }
}

/// Computes the component label of every vertex `0..rows.len()` directly
/// from the full adjacency list, with no partitioning involved.
pub fn sequential_components(rows: &[Vec<VertexId>]) -> Vec<Label> {
    let mut uf = UnionFind::new(rows.len());
    for (v, neighbors) in rows.iter().enumerate() {
        for &n in neighbors {
            uf.union(v, n as usize);
        }
    }
    (0..rows.len()).map(|v| uf.find(v) as Label).collect()
}

/// Two labelings describe the same partition of vertices into components
/// iff they induce the same equivalence classes, even when the concrete
/// label values differ between the two solvers.
pub fn same_partition(a: &[Label], b: &[Label]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a_to_b: HashMap<Label, Label> = HashMap::new();
    let mut b_to_a: HashMap<Label, Label> = HashMap::new();

    for (&la, &lb) in a.iter().zip(b.iter()) {
        match (a_to_b.get(&la), b_to_a.get(&lb)) {
            (Some(&mapped_b), Some(&mapped_a)) => {
                if mapped_b != lb || mapped_a != la {
                    return false;
                }
            }
            (None, None) => {
                a_to_b.insert(la, lb);
                b_to_a.insert(lb, la);
            }
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_graph_is_one_component() {
        let rows = vec![vec![1], vec![0, 2], vec![1]];
        let labels = sequential_components(&rows);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
    }

    #[test]
    fn disjoint_pairs_are_distinct_components() {
        let rows = vec![vec![1], vec![0], vec![3], vec![2]];
        let labels = sequential_components(&rows);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn same_partition_ignores_concrete_label_values() {
        assert!(same_partition(&[0, 0, 1], &[7, 7, 3]));
        assert!(!same_partition(&[0, 0, 1], &[7, 3, 3]));
        assert!(!same_partition(&[0, 0], &[0, 0, 0]));
    }
}

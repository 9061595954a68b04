//! Final Relabel: once the reduction tree completes, every rank holds the
//! same fully-contracted CAG restricted to its own range, and resolving
//! each local vertex's provisional label through `find` yields the final
//! component id.

use crate::{cag::Cag, graph::Label};

/// Replaces every label in `labels` with its union-find root. Idempotent:
/// calling it again after the CAG has stabilized is a no-op.
pub fn relabel(labels: &mut [Label], cag: &mut Cag) {
    for label in labels.iter_mut() {
        *label = cag.find(*label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relabel_resolves_through_the_union_find() {
        let mut cag = Cag::new(0, 10);
        cag.seed_root(1);
        cag.seed_root(2);
        cag.nodes.insert(1, crate::cag::CagNode::new_for_merge(1, false));
        cag.nodes.insert(2, crate::cag::CagNode::new_for_merge(2, false));
        cag.contract_edge(1, 2).unwrap();

        let mut labels = vec![1, 2, 1, 2];
        relabel(&mut labels, &mut cag);
        assert_eq!(labels, vec![1, 1, 1, 1]);
    }

    #[test]
    fn relabel_is_idempotent() {
        let mut cag = Cag::new(0, 10);
        let mut labels = vec![5, 7, 5];
        relabel(&mut labels, &mut cag);
        let first = labels.clone();
        relabel(&mut labels, &mut cag);
        assert_eq!(labels, first);
    }
}

//! Border Exchange: publishes `(local vertex id, initial label)` for every
//! vertex with at least one foreign edge, and resolves the global
//! `foreign_id -> label` mapping every rank needs to build its CAG.

use hashbrown::HashMap;

use crate::{
    graph::{Label, VertexId},
    labeler::LabelingResult,
    transport::Transport,
};

/// Flattens `(vertex, label)` pairs for every local vertex that has at
/// least one foreign neighbor, as
/// `[local_vertex_id, label, local_vertex_id, label, ...]`.
pub fn border_payload(labeling: &LabelingResult, lo: VertexId) -> Vec<i32> {
    let mut payload = Vec::with_capacity(labeling.local_to_foreign.len() * 2);
    for (&v, _) in &labeling.local_to_foreign {
        let offset = (v - lo) as usize;
        payload.push(v);
        payload.push(labeling.labels[offset]);
    }
    payload
}

/// Runs an all-gather-of-sizes then an all-gather-v and returns the
/// resulting `foreign_id -> label` map. Ordering is immaterial and
/// duplicates cannot occur because each id appears on exactly one owning
/// rank.
pub fn exchange_borders(
    transport: &dyn Transport,
    labeling: &LabelingResult,
    lo: VertexId,
) -> HashMap<VertexId, Label> {
    let payload = border_payload(labeling, lo);
    let sizes = transport.all_gather_sizes(payload.len());
    let flat = transport.all_gather_v(&payload, &sizes);

    let mut map = HashMap::with_capacity(flat.len() / 2);
    let mut it = flat.into_iter();
    while let (Some(vertex), Some(label)) = (it.next(), it.next()) {
        map.insert(vertex, label);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::LocalSubgraph;
    use crate::labeler::label_components;

    #[test]
    fn payload_contains_only_border_vertices() {
        let lsg = LocalSubgraph::new(0, 2, vec![vec![10], vec![], vec![]]);
        let labeling = label_components(&lsg);
        let payload = border_payload(&labeling, 0);
        assert_eq!(payload, vec![0, labeling.labels[0]]);
    }
}

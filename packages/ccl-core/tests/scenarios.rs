//! Integration tests encoding concrete scenarios and cross-cutting
//! invariants for the distributed connected-components pipeline.

use ccl_core::reader::InMemoryEdgeList;
use ccl_core::{Label, VertexId};

fn rows_from_edges(v: i32, edges: &[(VertexId, VertexId)]) -> Vec<Vec<VertexId>> {
    let mut rows = vec![Vec::new(); v as usize];
    for &(a, b) in edges {
        rows[a as usize].push(b);
        rows[b as usize].push(a);
    }
    rows
}

fn distinct_label_count(labels: &[Label]) -> usize {
    let mut sorted = labels.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

fn flatten(per_rank: Vec<Vec<Label>>) -> Vec<Label> {
    per_rank.into_iter().flatten().collect()
}

#[test]
fn s1_singleton_chain_is_one_component() {
    let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 7)];
    let reader = InMemoryEdgeList::new(rows_from_edges(8, &edges));
    let result = ccl_core::run(&reader, 2, None).unwrap();
    let labels = flatten(result.per_rank_labels);
    assert_eq!(distinct_label_count(&labels), 1);
    assert_eq!(result.component_count, Some(1));
}

#[test]
fn s2_two_islands_across_boundary_merge_into_one() {
    let edges = [(0, 3), (3, 1), (1, 4), (4, 2), (2, 5)];
    let reader = InMemoryEdgeList::new(rows_from_edges(6, &edges));
    let result = ccl_core::run(&reader, 2, None).unwrap();
    let labels = flatten(result.per_rank_labels);
    assert_eq!(distinct_label_count(&labels), 1);
}

#[test]
fn s3_disconnected_halves_stay_four_components() {
    let edges = [(0, 1), (2, 3), (4, 5), (6, 7)];
    let reader = InMemoryEdgeList::new(rows_from_edges(8, &edges));
    let result = ccl_core::run(&reader, 2, None).unwrap();
    let labels = flatten(result.per_rank_labels);
    assert_eq!(distinct_label_count(&labels), 4);
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[2], labels[3]);
    assert_eq!(labels[4], labels[5]);
    assert_eq!(labels[6], labels[7]);
    assert_ne!(labels[0], labels[2]);
    assert_ne!(labels[2], labels[4]);
    assert_ne!(labels[4], labels[6]);
}

#[test]
fn s4_isolated_pairs_get_two_distinct_labels() {
    let edges = [(0, 1), (2, 3)];
    let reader = InMemoryEdgeList::new(rows_from_edges(4, &edges));
    let result = ccl_core::run(&reader, 2, None).unwrap();
    let labels = flatten(result.per_rank_labels);
    assert_eq!(distinct_label_count(&labels), 2);
    assert_eq!(labels[0], labels[1]);
    assert_eq!(labels[2], labels[3]);
    assert_ne!(labels[0], labels[2]);
}

#[test]
fn s5_star_spanning_four_ranks_is_one_component() {
    let edges = [(0, 7), (0, 6), (0, 5), (0, 4), (0, 3), (0, 2), (0, 1)];
    let reader = InMemoryEdgeList::new(rows_from_edges(8, &edges));
    let result = ccl_core::run(&reader, 4, None).unwrap();
    let labels = flatten(result.per_rank_labels);
    assert_eq!(distinct_label_count(&labels), 1);
}

/// S6's spirit (a large graph of several disconnected chains with a few
/// cross links) without the original's undisclosed literal edge list:
/// several 16-vertex chains over 138 vertices, linked by a handful of
/// cross-chain edges, checked against a hand-computed expected partition.
#[test]
fn s6_large_graph_component_count_matches_expected_structure() {
    const V: i32 = 138;
    let mut edges = Vec::new();

    // Eight chains of 16 vertices each (0..127), plus a trailing group of 10
    // isolated-ish vertices (128..137) linked pairwise, covering 138 vertices.
    for chain in 0..8 {
        let base = chain * 16;
        for i in 0..15 {
            edges.push((base + i, base + i + 1));
        }
    }
    for pair_base in (128..138).step_by(2) {
        edges.push((pair_base, pair_base + 1));
    }

    // Link chain 0 to chain 1, and chain 2 to chain 3, leaving the rest separate.
    edges.push((5, 16 + 5));
    edges.push((2 * 16 + 3, 3 * 16 + 3));

    let reader = InMemoryEdgeList::new(rows_from_edges(V, &edges));
    let expected = ccl_harness_reference_components(&rows_from_edges(V, &edges));

    let result = ccl_core::run(&reader, 2, None).unwrap();
    let labels = flatten(result.per_rank_labels);
    assert_eq!(distinct_label_count(&labels), distinct_label_count(&expected));
}

/// A minimal inline re-implementation of the sequential reference solver,
/// kept local to this test so the integration tests don't need a
/// dependency on the harness crate.
fn ccl_harness_reference_components(rows: &[Vec<VertexId>]) -> Vec<Label> {
    let mut parent: Vec<usize> = (0..rows.len()).collect();
    fn find(parent: &mut [usize], x: usize) -> usize {
        if parent[x] != x {
            parent[x] = find(parent, parent[x]);
        }
        parent[x]
    }
    for (v, neighbors) in rows.iter().enumerate() {
        for &n in neighbors {
            let (ra, rb) = (find(&mut parent, v), find(&mut parent, n as usize));
            if ra != rb {
                parent[ra.max(rb)] = ra.min(rb);
            }
        }
    }
    (0..rows.len()).map(|v| find(&mut parent, v) as Label).collect()
}

#[test]
fn relabel_is_idempotent_across_a_full_run() {
    // running the engine twice on the same input must yield the same partition.
    let edges = [(0, 3), (3, 1), (1, 4), (4, 2), (2, 5)];
    let reader = InMemoryEdgeList::new(rows_from_edges(6, &edges));
    let first = flatten(ccl_core::run(&reader, 2, None).unwrap().per_rank_labels);
    let second = flatten(ccl_core::run(&reader, 2, None).unwrap().per_rank_labels);
    assert_eq!(first, second);
}

#[test]
fn partition_is_independent_of_process_count() {
    let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 7)];
    let rows = rows_from_edges(8, &edges);

    let r1 = InMemoryEdgeList::new(rows.clone());
    let r2 = InMemoryEdgeList::new(rows.clone());
    let r4 = InMemoryEdgeList::new(rows);

    let labels_p1 = flatten(ccl_core::run(&r1, 1, None).unwrap().per_rank_labels);
    let labels_p2 = flatten(ccl_core::run(&r2, 2, None).unwrap().per_rank_labels);
    let labels_p4 = flatten(ccl_core::run(&r4, 4, None).unwrap().per_rank_labels);

    assert_eq!(distinct_label_count(&labels_p1), 1);
    assert_eq!(distinct_label_count(&labels_p2), 1);
    assert_eq!(distinct_label_count(&labels_p4), 1);
}

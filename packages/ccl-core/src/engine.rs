//! Top-level orchestration: spawns `P` OS threads under one
//! `std::thread::scope`, each running one rank through local labeling,
//! border exchange, CAG construction, the butterfly reduction tree, and
//! final relabeling.

use crate::{
    border::exchange_borders,
    cag::Cag,
    error::EngineError,
    graph::{Label, LocalSubgraph, VertexId},
    labeler::label_components,
    logger::Logger,
    merge::merge_and_contract,
    partition::partition_range,
    reader::IndexedEdgeReader,
    relabel::relabel,
    transport::{ChannelTransport, Transport, build_mesh},
    wire::{deserialize_cag, serialize_cag},
};

/// Output of one complete run: every rank's final labels, in rank order,
/// plus the global component count rank 0 collected.
#[derive(Debug, Clone)]
pub struct EngineResult {
    /// `per_rank_labels[r][i]` is the final label of vertex `lo_r + i`.
    pub per_rank_labels: Vec<Vec<Label>>,
    pub component_count: Option<usize>,
}

/// One rank's contribution once its pipeline finishes: its own final
/// labels, plus the global component count if this rank was rank 0 and
/// therefore the target of the result-collection gather.
struct RankOutput {
    labels: Vec<Label>,
    component_count: Option<usize>,
}

/// Runs the full distributed connected-components computation against
/// `reader`, using `p` simulated ranks.
///
/// Validates the startup requirement (`V >= P`, `P` a power of two)
/// before spawning anything.
pub fn run(reader: &dyn IndexedEdgeReader, p: usize, logger: Option<&Logger>) -> Result<EngineResult, EngineError> {
    let v = reader.vertex_count();

    if p == 0 || !p.is_power_of_two() {
        return Err(EngineError::Configuration(format!("process count {p} is not a power of two")));
    }
    if (v as i64) < p as i64 {
        return Err(EngineError::Configuration(format!("vertex count {v} is smaller than process count {p}")));
    }

    let mesh = build_mesh(p);
    let rounds = p.trailing_zeros() as usize;

    if let Some(logger) = logger {
        logger.info(&format!("starting run: V={v}, P={p}, rounds={rounds}"));
    }

    let results: Vec<Result<RankOutput, EngineError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = mesh
            .into_iter()
            .map(|transport| {
                scope.spawn(move || {
                    let (lo, hi) = partition_range(v, p, transport.rank());
                    let rows = reader
                        .read_range(lo, hi)
                        .map_err(|e| EngineError::Configuration(format!("reading range [{lo},{hi}]: {e}")))?;
                    run_rank(&transport, lo, hi, rows, rounds)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("rank thread panicked")).collect()
    });

    let mut per_rank_labels = Vec::with_capacity(p);
    let mut component_count = None;
    for result in results {
        let rank_output = result?;
        if rank_output.component_count.is_some() {
            component_count = rank_output.component_count;
        }
        per_rank_labels.push(rank_output.labels);
    }

    if let Some(logger) = logger {
        logger.info("run complete");
    }

    Ok(EngineResult { per_rank_labels, component_count })
}

/// One rank's full pipeline: label, exchange borders, seed the CAG, run
/// the butterfly reduction, relabel, then ship the set of distinct final
/// labels this rank holds to rank 0 via `gather_to_root`, which unions
/// them into the total component count (rank 0 only).
fn run_rank(
    transport: &ChannelTransport,
    lo: VertexId,
    hi: VertexId,
    rows: Vec<Vec<VertexId>>,
    rounds: usize,
) -> Result<RankOutput, EngineError> {
    let lsg = LocalSubgraph::new(lo, hi, rows);
    let labeling = label_components(&lsg);

    let border_map = exchange_borders(transport, &labeling, lo);

    let mut cag = Cag::new(lo, hi);
    cag.seed_from_labeling(&labeling);
    for (&local_v, foreigns) in &labeling.local_to_foreign {
        let offset = (local_v - lo) as usize;
        let local_label = labeling.labels[offset];
        for &foreign_v in foreigns {
            let foreign_label = *border_map.get(&foreign_v).ok_or_else(|| {
                EngineError::Protocol(format!("no label published for foreign vertex {foreign_v}"))
            })?;
            cag.add_cross_edge(local_label, foreign_label);
        }
    }

    for i in 0..rounds {
        let partner = transport.rank() ^ (1 << i);
        let outgoing = serialize_cag(&cag);
        let incoming = transport.sendrecv(partner, &outgoing);
        let partner_cag = deserialize_cag(&incoming)?;
        merge_and_contract(&mut cag, partner_cag)?;
    }

    let mut labels = labeling.labels;
    relabel(&mut labels, &mut cag);

    let mut distinct_labels = labels.clone();
    distinct_labels.sort_unstable();
    distinct_labels.dedup();

    let component_count = transport.gather_to_root(&distinct_labels).map(|per_rank_distinct| {
        let mut all: Vec<Label> = per_rank_distinct.into_iter().flatten().collect();
        all.sort_unstable();
        all.dedup();
        all.len()
    });

    Ok(RankOutput { labels, component_count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::InMemoryEdgeList;

    #[test]
    fn single_rank_single_component() {
        let reader = InMemoryEdgeList::new(vec![vec![1], vec![0, 2], vec![1]]);
        let result = run(&reader, 1, None).unwrap();
        assert_eq!(result.per_rank_labels.len(), 1);
        let labels = &result.per_rank_labels[0];
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(result.component_count, Some(1));
    }

    #[test]
    fn two_ranks_one_crossing_edge_merges_into_one_component() {
        // vertices 0..=3, rank 0 owns [0,1], rank 1 owns [2,3]; edge (1,2) crosses.
        let reader = InMemoryEdgeList::new(vec![vec![], vec![2], vec![1], vec![]]);
        let result = run(&reader, 2, None).unwrap();
        assert_eq!(result.per_rank_labels.len(), 2);
        let label_1 = result.per_rank_labels[0][1];
        let label_2 = result.per_rank_labels[1][0];
        assert_eq!(label_1, label_2, "vertices 1 and 2 must land in the same component");
        assert_eq!(result.component_count, Some(3), "{{0}}, {{1,2}}, {{3}}");
    }

    #[test]
    fn four_ranks_single_chain_collapses_to_one_component() {
        // a chain 0-1-2-3-4-5-6-7 split across 4 ranks of 2 vertices each.
        let rows = vec![
            vec![1],
            vec![0, 2],
            vec![1, 3],
            vec![2, 4],
            vec![3, 5],
            vec![4, 6],
            vec![5, 7],
            vec![6],
        ];
        let reader = InMemoryEdgeList::new(rows);
        let result = run(&reader, 4, None).unwrap();
        assert_eq!(result.component_count, Some(1));
        let first_label = result.per_rank_labels[0][0];
        for labels in &result.per_rank_labels {
            for &label in labels {
                assert_eq!(label, first_label);
            }
        }
    }

    #[test]
    fn rejects_a_process_count_that_is_not_a_power_of_two() {
        let reader = InMemoryEdgeList::new(vec![vec![]; 6]);
        assert!(matches!(run(&reader, 3, None), Err(EngineError::Configuration(_))));
    }

    #[test]
    fn rejects_fewer_vertices_than_processes() {
        let reader = InMemoryEdgeList::new(vec![vec![]; 2]);
        assert!(matches!(run(&reader, 4, None), Err(EngineError::Configuration(_))));
    }
}

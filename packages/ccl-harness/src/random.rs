//! Random graph generation for the property-test matrix.

use ccl_core::VertexId;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Builds an undirected graph on `vertex_count` vertices with
/// approximately `edge_count` edges, as adjacency rows indexed `0..vertex_count`
/// (row `i` is vertex `i`'s neighbor list).
///
/// Edges are uniformly random pairs; duplicates and self-loops are
/// possible and intentionally left unfiltered, matching the engine's
/// "no ingest-time dedup" assumption.
pub fn generate_graph(seed: u64, vertex_count: i32, edge_count: usize) -> Vec<Vec<VertexId>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows: Vec<Vec<VertexId>> = vec![Vec::new(); vertex_count as usize];

    if vertex_count <= 1 {
        return rows;
    }

    for _ in 0..edge_count {
        let a = rng.gen_range(0..vertex_count);
        let b = rng.gen_range(0..vertex_count);
        if a == b {
            continue;
        }
        rows[a as usize].push(b);
        rows[b as usize].push(a);
    }

    rows
}

/// Serializes `rows` into the flat-file format `FlatFileEdgeReader` reads:
/// a header line with the vertex count, then one `i n1 n2 ... -1` line per
/// vertex.
pub fn to_flat_file_text(rows: &[Vec<VertexId>]) -> String {
    let mut out = String::new();
    out.push_str(&rows.len().to_string());
    out.push('\n');
    for (i, neighbors) in rows.iter().enumerate() {
        out.push_str(&i.to_string());
        for n in neighbors {
            out.push(' ');
            out.push_str(&n.to_string());
        }
        out.push_str(" -1\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_rows_are_symmetric() {
        let rows = generate_graph(42, 50, 100);
        for (v, neighbors) in rows.iter().enumerate() {
            for &n in neighbors {
                assert!(
                    rows[n as usize].contains(&(v as VertexId)),
                    "edge ({v},{n}) is not mirrored back from {n}"
                );
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_graph() {
        let a = generate_graph(7, 30, 60);
        let b = generate_graph(7, 30, 60);
        assert_eq!(a, b);
    }

    #[test]
    fn flat_file_text_starts_with_the_vertex_count_header() {
        let rows = generate_graph(1, 20, 40);
        let text = to_flat_file_text(&rows);
        assert!(text.starts_with("20\n"));
        assert_eq!(text.lines().count(), 21);
    }
}

//! Indexed edge-list readers: the input file format is treated as an
//! external collaborator behind a trait, so the engine itself never cares
//! whether the rows come from memory, a flat file, or (in tests) a
//! hand-built fixture.

use anyhow::{Context, bail};

use crate::graph::VertexId;

/// An indexed edge-list store: supports reading the total vertex count and
/// reading adjacency rows for a contiguous range. Implementations must
/// self-check that each row's first entry equals the vertex it belongs
/// to. `Send + Sync` because the engine shares one reader by reference
/// across every simulated rank's thread.
pub trait IndexedEdgeReader: Send + Sync {
    /// Total number of vertices in the graph, numbered `0..vertex_count()`.
    fn vertex_count(&self) -> VertexId;

    /// Returns the neighbor lists for vertices `lo..=hi`, one row per
    /// vertex, in order. `rows[i]` is the neighbor list of vertex `lo + i`.
    fn read_range(&self, lo: VertexId, hi: VertexId) -> anyhow::Result<Vec<Vec<VertexId>>>;
}

/// An in-memory edge list, built directly from adjacency rows. Used by
/// tests and by the property-testing harness's random graph generator.
pub struct InMemoryEdgeList {
    rows: Vec<Vec<VertexId>>,
}

impl InMemoryEdgeList {
    /// `rows[i]` is the neighbor list of vertex `i`; this constructor does
    /// not validate the self-check invariant since in-memory callers build
    /// rows directly rather than parsing them from a wire format.
    pub fn new(rows: Vec<Vec<VertexId>>) -> Self {
        InMemoryEdgeList { rows }
    }
}

impl IndexedEdgeReader for InMemoryEdgeList {
    fn vertex_count(&self) -> VertexId {
        self.rows.len() as VertexId
    }

    fn read_range(&self, lo: VertexId, hi: VertexId) -> anyhow::Result<Vec<Vec<VertexId>>> {
        if lo < 0 || hi < lo || hi >= self.vertex_count() {
            bail!("read_range: invalid range [{lo}, {hi}] for {} vertices", self.vertex_count());
        }
        Ok(self.rows[lo as usize..=hi as usize].to_vec())
    }
}

/// The on-disk flat-file encoding of an indexed edge list: a first line
/// with the vertex count `V`, followed by `V` lines, one per vertex in id
/// order, each a whitespace-separated row `i n1 n2 ... -1` (the leading
/// `i` must equal the row's own vertex id; `-1` terminates the row, not
/// the file).
pub struct FlatFileEdgeReader {
    rows: Vec<Vec<VertexId>>,
}

impl FlatFileEdgeReader {
    pub fn open(path: &std::path::Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading edge list file {}", path.display()))?;
        Self::parse(&text)
    }

    fn parse(text: &str) -> anyhow::Result<Self> {
        let mut lines = text.lines();
        let vertex_count: usize = lines
            .next()
            .context("edge list file is empty: missing vertex count header")?
            .trim()
            .parse()
            .context("edge list file: vertex count header is not an integer")?;

        let mut rows = Vec::with_capacity(vertex_count);
        for expected_id in 0..vertex_count {
            let line = lines
                .next()
                .with_context(|| format!("edge list file: missing row for vertex {expected_id}"))?;
            let mut values = line.split_whitespace().map(|tok| {
                tok.parse::<VertexId>()
                    .with_context(|| format!("edge list file: non-integer token {tok:?} in row {expected_id}"))
            });

            let first = values
                .next()
                .with_context(|| format!("edge list file: empty row for vertex {expected_id}"))??;
            if first as usize != expected_id {
                bail!("edge list file: row {expected_id} self-check failed, found leading id {first}");
            }

            let mut neighbors = Vec::new();
            for v in values {
                let v = v?;
                if v == -1 {
                    break;
                }
                neighbors.push(v);
            }
            rows.push(neighbors);
        }

        Ok(FlatFileEdgeReader { rows })
    }
}

impl IndexedEdgeReader for FlatFileEdgeReader {
    fn vertex_count(&self) -> VertexId {
        self.rows.len() as VertexId
    }

    fn read_range(&self, lo: VertexId, hi: VertexId) -> anyhow::Result<Vec<Vec<VertexId>>> {
        if lo < 0 || hi < lo || hi >= self.vertex_count() {
            bail!("read_range: invalid range [{lo}, {hi}] for {} vertices", self.vertex_count());
        }
        Ok(self.rows[lo as usize..=hi as usize].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_reader_slices_the_requested_range() {
        let reader = InMemoryEdgeList::new(vec![vec![1], vec![0, 2], vec![1]]);
        assert_eq!(reader.vertex_count(), 3);
        assert_eq!(reader.read_range(1, 2).unwrap(), vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn flat_file_reader_parses_rows_and_checks_leading_id() {
        let text = "3\n0 1 -1\n1 0 2 -1\n2 1 -1\n";
        let reader = FlatFileEdgeReader::parse(text).unwrap();
        assert_eq!(reader.vertex_count(), 3);
        assert_eq!(reader.read_range(0, 2).unwrap(), vec![vec![1], vec![0, 2], vec![1]]);
    }

    #[test]
    fn flat_file_reader_rejects_a_mismatched_leading_id() {
        let text = "2\n0 1 -1\n5 0 -1\n";
        assert!(FlatFileEdgeReader::parse(text).is_err());
    }

    #[test]
    fn flat_file_reader_rejects_a_missing_row() {
        let text = "2\n0 1 -1\n";
        assert!(FlatFileEdgeReader::parse(text).is_err());
    }
}

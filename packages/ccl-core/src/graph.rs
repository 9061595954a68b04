//! The Local Subgraph (LSG): the adjacency rows a single rank owns, with
//! local/foreign neighbor classification baked into the lookup rather than
//! recomputed at every traversal step.

/// A vertex id, globally unique and contiguous across the whole graph.
/// Matches the wire format's 32-bit integers exactly (see `crate::wire`),
/// which bounds the engine to graphs with at most `i32::MAX` vertices.
pub type VertexId = i32;

/// An initial or final component label. Labels live in the same id space as
/// vertices (`label = lo_r + component_index`), so `Label` and `VertexId`
/// are the same representation; they are kept as distinct aliases to make
/// call sites self-documenting about which meaning is intended.
pub type Label = i32;

/// One rank's slice of the graph: the contiguous range `[lo, hi]` of vertex
/// ids it owns, and for each owned vertex its full neighbor list (which may
/// reference vertices outside `[lo, hi]`).
#[derive(Debug, Clone)]
pub struct LocalSubgraph {
    lo: VertexId,
    hi: VertexId,
    rows: Vec<Vec<VertexId>>,
}

impl LocalSubgraph {
    /// `rows[i]` must be the neighbor list of vertex `lo + i`. Neighbor
    /// lists are treated as sets; duplicates are tolerated but never relied
    /// on, and are not deduplicated at ingest.
    pub fn new(lo: VertexId, hi: VertexId, rows: Vec<Vec<VertexId>>) -> Self {
        assert!(lo <= hi, "empty or inverted vertex range [{lo}, {hi}]");
        assert_eq!(
            rows.len(),
            (hi - lo + 1) as usize,
            "row count must match the owned range"
        );
        LocalSubgraph { lo, hi, rows }
    }

    pub fn lo(&self) -> VertexId {
        self.lo
    }

    pub fn hi(&self) -> VertexId {
        self.hi
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `true` if `v` falls inside this rank's owned range.
    pub fn owns(&self, v: VertexId) -> bool {
        v >= self.lo && v <= self.hi
    }

    /// The offset of an owned vertex within `rows`.
    pub fn offset(&self, v: VertexId) -> usize {
        debug_assert!(self.owns(v), "vertex {v} is not owned by this subgraph");
        (v - self.lo) as usize
    }

    pub fn vertex_at(&self, offset: usize) -> VertexId {
        self.lo + offset as VertexId
    }

    pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
        &self.rows[self.offset(v)]
    }

    /// Iterates owned vertices in id order, the order the local DFS walks
    /// them in.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.rows.len()).map(|offset| self.vertex_at(offset))
    }
}

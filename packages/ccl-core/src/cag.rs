//! The Component-Adjacency Graph (CAG): a compressed graph whose nodes are
//! labels (local or foreign) and whose edges represent boundary
//! connectivity. The union-find that drives merging lives inside the CAG.

use hashbrown::{HashMap, HashSet};

use crate::{
    error::EngineError,
    graph::{Label, VertexId},
    labeler::LabelingResult,
};

/// One CAG node. `is_foreign = false` means this rank holds the full
/// membership information for the component `id` represents; `true` means
/// this rank only knows the label exists and has edges into it.
#[derive(Debug, Clone)]
pub struct CagNode {
    pub id: Label,
    pub is_foreign: bool,
    pub neighbors: HashSet<Label>,
    /// Transient flag, valid for only one contract pass: set when a
    /// still-foreign node is adjacent to this one, so a local-local
    /// contraction touching it gets deferred instead of erasing the
    /// foreign-edge bookkeeping the next merge round still needs.
    pub next_to_foreign: bool,
}

impl CagNode {
    fn new(id: Label, is_foreign: bool) -> Self {
        CagNode {
            id,
            is_foreign,
            neighbors: HashSet::new(),
            next_to_foreign: false,
        }
    }

    /// Same as `new`, exposed to other modules in this crate that build
    /// nodes directly from a deserialized wire node while merging in a
    /// partner's CAG.
    pub(crate) fn new_for_merge(id: Label, is_foreign: bool) -> Self {
        Self::new(id, is_foreign)
    }
}

/// Nodes plus the union-find that merges them, scoped to the contiguous
/// vertex range `[lo, hi]` this CAG currently represents. `parent` is the
/// union-find itself: a key absent from it is its own root, so `find` is
/// safe to call on a foreign label that was never inserted at all.
#[derive(Debug, Clone)]
pub struct Cag {
    pub nodes: HashMap<Label, CagNode>,
    parent: HashMap<Label, Label>,
    pub lo: VertexId,
    pub hi: VertexId,
}

impl Cag {
    pub fn new(lo: VertexId, hi: VertexId) -> Self {
        Cag {
            nodes: HashMap::new(),
            parent: HashMap::new(),
            lo,
            hi,
        }
    }

    /// `find(x)`: returns `x` unchanged if it has no entry (including
    /// labels that were never inserted into the union-find at all); walks
    /// parent pointers to the root otherwise, compressing the path fully
    /// so every traversed node points directly at the root afterwards.
    pub fn find(&mut self, x: Label) -> Label {
        let mut root = x;
        while let Some(&parent) = self.parent.get(&root) {
            if parent == root {
                break;
            }
            root = parent;
        }

        // Path compression: re-walk from x, pointing every node directly at root.
        let mut cur = x;
        while cur != root {
            let next = self.parent[&cur];
            self.parent.insert(cur, root);
            cur = next;
        }

        root
    }

    /// Registers `label` as a fresh root (`uf[label] = label`), without
    /// creating a node. Used when seeding the union-find from a freshly
    /// produced set of component labels.
    pub fn seed_root(&mut self, label: Label) {
        self.parent.entry(label).or_insert(label);
    }

    fn ensure_root(&mut self, label: Label) {
        self.parent.insert(label, label);
    }

    /// Adds a local node (seeding its union-find root) for every distinct
    /// label `labeling` produced.
    pub fn seed_from_labeling(&mut self, labeling: &LabelingResult) {
        for label in labeling.distinct_labels() {
            self.seed_root(label);
            self.nodes.entry(label).or_insert_with(|| CagNode::new(label, false));
        }
    }

    /// Adds an undirected edge between a local label and a foreign label.
    /// Both endpoints are inserted as nodes if absent.
    pub fn add_cross_edge(&mut self, local_label: Label, foreign_label: Label) {
        self.ensure_root(local_label);
        self.nodes
            .entry(local_label)
            .or_insert_with(|| CagNode::new(local_label, false));

        if !self.parent.contains_key(&foreign_label) {
            self.ensure_root(foreign_label);
        }
        self.nodes
            .entry(foreign_label)
            .or_insert_with(|| CagNode::new(foreign_label, true));

        if local_label != foreign_label {
            self.nodes.get_mut(&local_label).unwrap().neighbors.insert(foreign_label);
            self.nodes.get_mut(&foreign_label).unwrap().neighbors.insert(local_label);
        }
    }

    /// Contracts edge `(a, b)`: caller guarantees `a = find(a)`, `b =
    /// find(b)`, `a != b`. The smaller id always wins, applied to the
    /// already-resolved roots, never the raw labels a caller started
    /// with — so the caller, not this function, is responsible for
    /// resolving and ordering `a`/`b` before calling.
    pub fn contract_edge(&mut self, a: Label, b: Label) -> Result<(), EngineError> {
        if a == b {
            return Err(EngineError::InvariantViolation(format!(
                "attempted to contract self-loop at label {a}"
            )));
        }
        let (a, b) = (a.min(b), a.max(b));

        let b_node = self.nodes.remove(&b).ok_or_else(|| {
            EngineError::InvariantViolation(format!("contractEdge: node {b} is not a root"))
        })?;

        {
            let a_node = self
                .nodes
                .get_mut(&a)
                .ok_or_else(|| EngineError::InvariantViolation(format!("contractEdge: node {a} is not a root")))?;
            a_node.neighbors.remove(&b);
            for n in &b_node.neighbors {
                if *n != a {
                    a_node.neighbors.insert(*n);
                }
            }
        }

        for n in b_node.neighbors {
            if n == a {
                continue;
            }
            if let Some(neighbor_node) = self.nodes.get_mut(&n) {
                neighbor_node.neighbors.remove(&b);
                neighbor_node.neighbors.insert(a);
            }
        }

        self.parent.insert(b, a);
        Ok(())
    }

    /// All local (non-foreign) node ids, the ones eligible to appear as
    /// endpoints when collecting local-local contraction candidates.
    pub fn local_node_ids(&self) -> Vec<Label> {
        self.nodes
            .values()
            .filter(|n| !n.is_foreign)
            .map(|n| n.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_is_identity_for_unknown_label() {
        let mut cag = Cag::new(0, 10);
        assert_eq!(cag.find(42), 42);
    }

    #[test]
    fn find_compresses_path() {
        let mut cag = Cag::new(0, 10);
        cag.seed_root(1);
        cag.seed_root(2);
        cag.seed_root(3);
        cag.nodes.insert(1, CagNode::new(1, false));
        cag.nodes.insert(2, CagNode::new(2, false));
        cag.nodes.insert(3, CagNode::new(3, false));
        cag.contract_edge(1, 2).unwrap(); // uf[2] = 1
        cag.contract_edge(1, 3).unwrap(); // uf[3] = 1
        assert_eq!(cag.find(2), 1);
        assert_eq!(cag.find(3), 1);
    }

    #[test]
    fn contract_merges_neighbors_and_drops_self_loops() {
        let mut cag = Cag::new(0, 10);
        for l in [1, 2, 3] {
            cag.seed_root(l);
            cag.nodes.insert(l, CagNode::new(l, false));
        }
        // 1 - 2, 2 - 3
        cag.nodes.get_mut(&1).unwrap().neighbors.insert(2);
        cag.nodes.get_mut(&2).unwrap().neighbors.insert(1);
        cag.nodes.get_mut(&2).unwrap().neighbors.insert(3);
        cag.nodes.get_mut(&3).unwrap().neighbors.insert(2);

        cag.contract_edge(1, 2).unwrap();
        assert!(!cag.nodes.contains_key(&2));
        assert!(!cag.nodes[&1].neighbors.contains(&1), "must not create a self-loop");
        assert!(cag.nodes[&1].neighbors.contains(&3));
        assert!(cag.nodes[&3].neighbors.contains(&1));
        assert!(!cag.nodes[&3].neighbors.contains(&2));
    }
}

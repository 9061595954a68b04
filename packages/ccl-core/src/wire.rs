//! CAG serialization: `[lo, hi, (id, isForeign?1:0, |neighbors|, n1, n2,
//! ...), ..., -1]`. The union-find is never transmitted; both sides keep
//! their own and stay consistent because contractions always pick the
//! smaller id as the new root.

use hashbrown::HashSet;

use crate::{
    cag::{Cag, CagNode},
    error::EngineError,
    graph::VertexId,
};

pub fn serialize_cag(cag: &Cag) -> Vec<i32> {
    let mut stream = Vec::new();
    stream.push(cag.lo);
    stream.push(cag.hi);

    for node in cag.nodes.values() {
        stream.push(node.id);
        stream.push(if node.is_foreign { 1 } else { 0 });
        stream.push(node.neighbors.len() as i32);
        stream.extend(node.neighbors.iter().copied());
    }

    stream.push(-1);
    stream
}

/// A bare-bones deserialized CAG: just `lo`, `hi`, and the node list, with
/// no union-find attached — the receiving side resolves everything
/// through its own `find` instead.
pub struct WireCag {
    pub lo: VertexId,
    pub hi: VertexId,
    pub nodes: Vec<CagNode>,
}

pub fn deserialize_cag(stream: &[i32]) -> Result<WireCag, EngineError> {
    let mut it = stream.iter().copied();
    let lo = it
        .next()
        .ok_or_else(|| EngineError::Protocol("empty CAG stream: missing lo".into()))?;
    let hi = it
        .next()
        .ok_or_else(|| EngineError::Protocol("truncated CAG stream: missing hi".into()))?;

    let mut nodes = Vec::new();
    loop {
        let id = it
            .next()
            .ok_or_else(|| EngineError::Protocol("truncated CAG stream: missing node id or terminator".into()))?;
        if id == -1 {
            break;
        }

        let is_foreign_flag = it
            .next()
            .ok_or_else(|| EngineError::Protocol("truncated CAG stream: missing isForeign flag".into()))?;
        let neighbor_count = it
            .next()
            .ok_or_else(|| EngineError::Protocol("truncated CAG stream: missing neighbor count".into()))?;

        if neighbor_count < 0 {
            return Err(EngineError::Protocol(format!(
                "negative neighbor count {neighbor_count} for node {id}"
            )));
        }

        let mut neighbors = HashSet::with_capacity(neighbor_count as usize);
        for _ in 0..neighbor_count {
            let n = it.next().ok_or_else(|| {
                EngineError::Protocol(format!("truncated CAG stream: expected {neighbor_count} neighbors for node {id}"))
            })?;
            neighbors.insert(n);
        }

        nodes.push(CagNode {
            id,
            is_foreign: is_foreign_flag != 0,
            neighbors,
            next_to_foreign: false,
        });
    }

    Ok(WireCag { lo, hi, nodes })
}

//! CAG Merge + Contract: integrates a partner CAG into the local one,
//! reclassifies nodes, drops fully-absorbed foreign nodes, and contracts
//! every local-local edge.

use crate::{cag::Cag, error::EngineError, wire::WireCag};

/// Integrates `partner` into `local`, then contracts every local-local
/// edge it can (deferring any whose far endpoint is still adjacent to a
/// foreign node).
pub fn merge_and_contract(local: &mut Cag, partner: WireCag) -> Result<(), EngineError> {
    merge(local, &partner)?;
    drop_absorbed_foreign_nodes(local, partner.lo, partner.hi);
    contract_local_edges(local)?;

    let new_lo = local.lo.min(partner.lo);
    let new_hi = local.hi.max(partner.hi);
    let adjacent = local.hi + 1 == partner.lo || partner.hi + 1 == local.lo;
    if !adjacent {
        return Err(EngineError::InvariantViolation(format!(
            "merged ranges [{}, {}] and [{}, {}] are not adjacent",
            local.lo, local.hi, partner.lo, partner.hi
        )));
    }
    local.lo = new_lo;
    local.hi = new_hi;

    Ok(())
}

fn merge(local: &mut Cag, partner: &WireCag) -> Result<(), EngineError> {
    for node in &partner.nodes {
        let rid = local.find(node.id);

        if !local.nodes.contains_key(&rid) {
            local.seed_root(rid);
            let mut new_node = crate::cag::CagNode::new_for_merge(rid, node.is_foreign);
            new_node.next_to_foreign = false;
            local.nodes.insert(rid, new_node);
        } else {
            let existing_is_foreign = local.nodes[&rid].is_foreign;
            if existing_is_foreign && !node.is_foreign {
                local.nodes.get_mut(&rid).unwrap().is_foreign = false;
            } else if !existing_is_foreign && !node.is_foreign {
                return Err(EngineError::InvariantViolation(format!(
                    "label {rid} is claimed as local by both sides of the merge"
                )));
            }
            // existing local & partner foreign, or existing foreign & partner foreign: keep as-is.
        }

        let resolved_neighbors: Vec<_> = node.neighbors.iter().map(|&n| local.find(n)).collect();
        let node_entry = local.nodes.get_mut(&rid).unwrap();
        for rn in resolved_neighbors {
            if rn != rid {
                node_entry.neighbors.insert(rn);
            }
        }
    }

    Ok(())
}

/// Drops nodes whose id lies in the partner's range and are still foreign
/// after the merge: components entirely inside the partner's range that
/// ended up with no local edges incident to them. Removes the node from
/// every remaining neighbor's edge set too.
fn drop_absorbed_foreign_nodes(
    local: &mut Cag,
    partner_lo: crate::graph::VertexId,
    partner_hi: crate::graph::VertexId,
) {
    let to_drop: Vec<_> = local
        .nodes
        .values()
        .filter(|n| n.is_foreign && n.id >= partner_lo && n.id <= partner_hi)
        .map(|n| n.id)
        .collect();

    for id in &to_drop {
        if let Some(node) = local.nodes.remove(id) {
            for neighbor in node.neighbors {
                if let Some(neighbor_node) = local.nodes.get_mut(&neighbor) {
                    neighbor_node.neighbors.remove(id);
                }
            }
        }
    }
}

/// Contracts every edge whose both endpoints are local nodes, deferring any
/// edge whose far endpoint is still adjacent to a foreign node until a
/// later round (see `next_to_foreign` on `CagNode`).
fn contract_local_edges(local: &mut Cag) -> Result<(), EngineError> {
    mark_next_to_foreign(local);

    let mut candidates: Vec<(i32, i32)> = Vec::new();
    let local_ids = local.local_node_ids();
    for &u in &local_ids {
        for &v in &local.nodes[&u].neighbors {
            if u < v && !local.nodes.get(&v).map(|n| n.is_foreign).unwrap_or(true) {
                candidates.push((u, v));
            }
        }
    }
    candidates.sort_unstable();

    for (u, v) in candidates {
        let ru = local.find(u);
        let rv = local.find(v);
        if ru == rv {
            continue;
        }
        let (a, b) = (ru.min(rv), ru.max(rv));

        let Some(b_node) = local.nodes.get(&b) else {
            continue; // already contracted away by an earlier candidate in this pass
        };
        if b_node.next_to_foreign {
            continue; // defer: preserve foreign bookkeeping until both sides share a rank
        }

        local.contract_edge(a, b)?;
    }

    Ok(())
}

fn mark_next_to_foreign(local: &mut Cag) {
    for node in local.nodes.values_mut() {
        node.next_to_foreign = false;
    }

    let foreign_neighbors: Vec<i32> = local
        .nodes
        .values()
        .filter(|n| n.is_foreign)
        .flat_map(|n| n.neighbors.iter().copied())
        .collect();

    for id in foreign_neighbors {
        if let Some(node) = local.nodes.get_mut(&id) {
            node.next_to_foreign = true;
        }
    }
}

//! Message passing substrate: the engine is written against the
//! `Transport` trait rather than directly against threads or sockets, so
//! the reduction-tree and border-exchange code reads the same whether a
//! rank's peer lives in another thread, another process, or (in tests) a
//! stub.
//!
//! `ChannelTransport` is the one production implementation: it simulates
//! P peer processes as P OS threads joined under one
//! `std::thread::scope`, wired together with `crossbeam-channel` rendezvous
//! channels. A pairwise sendrecv uses a dedicated channel pair between each
//! ordered pair of ranks; collectives (all-gather, gather-to-root) go
//! through a barrier-guarded shared slot table instead of routing through
//! pairwise channels, since their fan-in/fan-out shape doesn't match a
//! single sender/receiver pair.

use std::sync::{Arc, Barrier, Mutex};

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::graph::Label;

/// Everything a rank needs to exchange data with its peers during one run
/// of the engine. Implementors only need to honor the collective contract
/// (every rank calls the same collective, in the same order, the same
/// number of times); nothing here assumes a specific transport.
pub trait Transport: Send + Sync {
    /// This rank's index, `0..size()`.
    fn rank(&self) -> usize;

    /// Total number of ranks.
    fn size(&self) -> usize;

    /// Exchanges `payload` with `partner`: sends `payload` to `partner` and
    /// returns whatever `partner` sent back. Used for the butterfly
    /// reduction tree's pairwise CAG exchange.
    fn sendrecv(&self, partner: usize, payload: &[i32]) -> Vec<i32>;

    /// All-gather of one `usize` per rank: every rank learns every other
    /// rank's border payload length before the payloads themselves are
    /// exchanged.
    fn all_gather_sizes(&self, local_size: usize) -> Vec<usize>;

    /// All-gather-v: every rank contributes `payload` (whose length must
    /// equal the corresponding entry of `sizes`, as produced by a prior
    /// `all_gather_sizes` call) and receives the concatenation of every
    /// rank's payload, in rank order.
    fn all_gather_v(&self, payload: &[i32], sizes: &[usize]) -> Vec<i32>;

    /// Gathers one `Vec<Label>` per rank to rank 0; every other rank gets
    /// `None`. Every rank must call this once its local labels are final,
    /// so rank 0 can union the gathered sets into the global component
    /// count.
    fn gather_to_root(&self, local_labels: &[Label]) -> Option<Vec<Vec<Label>>>;
}

/// One rank's end of a `ChannelTransport` mesh: a full P×P matrix of
/// rendezvous channels for pairwise sendrecv, plus a shared slot table and
/// barriers for collectives.
pub struct ChannelTransport {
    rank: usize,
    size: usize,
    senders: Vec<Sender<Vec<i32>>>,
    receivers: Vec<Receiver<Vec<i32>>>,
    collective: Arc<CollectiveState>,
}

struct CollectiveState {
    barrier: Barrier,
    sizes_slots: Mutex<Vec<Vec<usize>>>,
    payload_slots: Mutex<Vec<Vec<i32>>>,
    gather_slots: Mutex<Vec<Vec<Label>>>,
}

/// Builds `p` linked `ChannelTransport` endpoints, one per rank, ready to
/// be moved into `p` threads (e.g. via `std::thread::scope`).
pub fn build_mesh(p: usize) -> Vec<ChannelTransport> {
    assert!(p > 0, "build_mesh: p must be positive");

    // channels[i][j] carries messages sent from i to j (rendezvous: bounded(0)).
    let mut channels: Vec<Vec<Option<(Sender<Vec<i32>>, Receiver<Vec<i32>>)>>> =
        (0..p).map(|_| (0..p).map(|_| None).collect()).collect();
    for i in 0..p {
        for j in 0..p {
            let (tx, rx) = bounded(0);
            channels[i][j] = Some((tx, rx));
        }
    }

    let collective = Arc::new(CollectiveState {
        barrier: Barrier::new(p),
        sizes_slots: Mutex::new(vec![Vec::new(); p]),
        payload_slots: Mutex::new(vec![Vec::new(); p]),
        gather_slots: Mutex::new(vec![Vec::new(); p]),
    });

    let mut senders_by_rank: Vec<Vec<Sender<Vec<i32>>>> = (0..p).map(|_| Vec::with_capacity(p)).collect();
    let mut receivers_by_rank: Vec<Vec<Receiver<Vec<i32>>>> = (0..p).map(|_| Vec::with_capacity(p)).collect();

    for i in 0..p {
        for j in 0..p {
            let (tx, rx) = channels[i][j].take().unwrap();
            // rank i sends on senders_by_rank[i][j]; rank j receives the same
            // message on receivers_by_rank[j][i].
            senders_by_rank[i].push(tx);
            receivers_by_rank[j].push(rx);
        }
    }

    (0..p)
        .map(|r| ChannelTransport {
            rank: r,
            size: p,
            senders: std::mem::take(&mut senders_by_rank[r]),
            receivers: std::mem::take(&mut receivers_by_rank[r]),
            collective: collective.clone(),
        })
        .collect()
}

impl Transport for ChannelTransport {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn sendrecv(&self, partner: usize, payload: &[i32]) -> Vec<i32> {
        assert_ne!(partner, self.rank, "sendrecv: a rank cannot be its own partner");

        let to_partner = self.senders[partner].clone();
        let from_partner = self.receivers[partner].clone();
        let outgoing = payload.to_vec();

        // Avoid deadlock on the rendezvous channels: the lower-ranked side
        // sends first, the higher-ranked side receives first, then both
        // flip. Both ranks of a pair compute the same partner id, so this
        // ordering is consistent on both ends.
        if self.rank < partner {
            to_partner.send(outgoing).expect("sendrecv: partner channel closed");
            from_partner.recv().expect("sendrecv: partner channel closed")
        } else {
            let incoming = from_partner.recv().expect("sendrecv: partner channel closed");
            to_partner.send(outgoing).expect("sendrecv: partner channel closed");
            incoming
        }
    }

    fn all_gather_sizes(&self, local_size: usize) -> Vec<usize> {
        {
            let mut slots = self.collective.sizes_slots.lock().unwrap();
            slots[self.rank] = vec![local_size];
        }
        self.collective.barrier.wait();
        let result = self.collective.sizes_slots.lock().unwrap().iter().map(|s| s[0]).collect();
        self.collective.barrier.wait();
        result
    }

    fn all_gather_v(&self, payload: &[i32], sizes: &[usize]) -> Vec<i32> {
        debug_assert_eq!(sizes[self.rank], payload.len());
        {
            let mut slots = self.collective.payload_slots.lock().unwrap();
            slots[self.rank] = payload.to_vec();
        }
        self.collective.barrier.wait();
        let result = self
            .collective
            .payload_slots
            .lock()
            .unwrap()
            .iter()
            .flat_map(|p| p.iter().copied())
            .collect::<Vec<_>>();
        self.collective.barrier.wait();
        result
    }

    fn gather_to_root(&self, local_labels: &[Label]) -> Option<Vec<Vec<Label>>> {
        {
            let mut slots = self.collective.gather_slots.lock().unwrap();
            slots[self.rank] = local_labels.to_vec();
        }
        self.collective.barrier.wait();
        let result = if self.rank == 0 {
            Some(self.collective.gather_slots.lock().unwrap().clone())
        } else {
            None
        };
        self.collective.barrier.wait();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sendrecv_exchanges_payloads_between_two_ranks() {
        let mesh = build_mesh(2);
        let mut iter = mesh.into_iter();
        let r0 = iter.next().unwrap();
        let r1 = iter.next().unwrap();

        std::thread::scope(|s| {
            s.spawn(|| {
                let reply = r0.sendrecv(1, &[1, 2, 3]);
                assert_eq!(reply, vec![9, 8, 7]);
            });
            s.spawn(|| {
                let reply = r1.sendrecv(0, &[9, 8, 7]);
                assert_eq!(reply, vec![1, 2, 3]);
            });
        });
    }

    #[test]
    fn all_gather_sizes_collects_every_rank_in_order() {
        let mesh = build_mesh(3);
        let results: Vec<Vec<usize>> = std::thread::scope(|s| {
            let handles: Vec<_> = mesh
                .into_iter()
                .enumerate()
                .map(|(i, t)| s.spawn(move || t.all_gather_sizes(i + 1)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for sizes in &results {
            assert_eq!(sizes, &vec![1, 2, 3]);
        }
    }

    #[test]
    fn gather_to_root_only_populates_rank_zero() {
        let mesh = build_mesh(2);
        let results: Vec<Option<Vec<Vec<Label>>>> = std::thread::scope(|s| {
            let handles: Vec<_> = mesh
                .into_iter()
                .enumerate()
                .map(|(i, t)| s.spawn(move || t.gather_to_root(&[i as Label])))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(results[0], Some(vec![vec![0], vec![1]]));
        assert_eq!(results[1], None);
    }
}

use std::sync::Mutex;

use tracing::{trace, warn};

use common::Region;

use crate::error::{SimError, SimResult};
use crate::node::{self, NodeId};
use crate::physics;
use crate::store::Handle;
use crate::tree::TreeShared;

/// One slot in a leaf's segment list. `in_margin` marks entries inside the
/// leaf's boundary band, tracked for cross-region collision narrowing.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SegmentEntry {
    pub(crate) handle: Handle,
    pub(crate) in_margin: bool,
}

/// The leaf's own lists. Only the leaf's job invocation mutates them; the
/// lock exists so neighbors can take consistent snapshot copies and so the
/// drain/compact critical sections never expose a half-updated state.
struct LeafLists {
    /// Entities resident in this leaf, unique per handle between ticks.
    segments: Vec<SegmentEntry>,
    /// Offsets into `segments`, one per margin-flagged entry.
    margin: Vec<usize>,
    /// Segment offsets to purge during this tick's compact phase.
    outbound: Vec<usize>,
}

pub(crate) struct LeafNode {
    pub(crate) region: Region,
    /// The region inset by the margin width. Entities outside it but inside
    /// the full region are in the boundary band.
    pub(crate) interior: Region,
    /// Adjacent leaves in +X, -X, +Z, -Z order, resolved once after the
    /// tree is built. Non-owning arena ids.
    pub(crate) neighbors: [Option<NodeId>; 4],
    transfer_capacity: usize,
    pending: Mutex<Vec<(Handle, bool)>>,
    lists: Mutex<LeafLists>,
}

impl LeafNode {
    pub(crate) fn new(region: Region, margin_width: f32, transfer_capacity: usize) -> Self {
        Self {
            region,
            interior: region.shrunk(margin_width),
            neighbors: [None; 4],
            transfer_capacity,
            pending: Mutex::new(Vec::new()),
            lists: Mutex::new(LeafLists {
                segments: Vec::new(),
                margin: Vec::new(),
                outbound: Vec::new(),
            }),
        }
    }

    /// Queues an entity for adoption by this leaf. Drained at the start of
    /// the leaf's next update; rejected when the queue is full.
    pub(crate) fn queue_add(&self, handle: Handle, in_margin: bool) -> SimResult<()> {
        let mut pending = self.pending.lock().expect("pending queue lock poisoned");
        if pending.len() >= self.transfer_capacity {
            return Err(SimError::CapacityExceeded {
                capacity: self.transfer_capacity,
            });
        }
        pending.push((handle, in_margin));
        Ok(())
    }

    pub(crate) fn has_pending_room(&self) -> bool {
        self.pending.lock().expect("pending queue lock poisoned").len() < self.transfer_capacity
    }

    pub(crate) fn transfer_capacity(&self) -> usize {
        self.transfer_capacity
    }

    /// The four-phase update: drain pending adds, integrate physics,
    /// classify and migrate, compact. Each phase restores the list
    /// invariants before the next begins.
    pub(crate) fn update(&self, shared: &TreeShared, dt: f32) {
        self.drain_pending();
        self.integrate(shared, dt);
        self.classify(shared);
        self.compact();
    }

    fn drain_pending(&self) {
        let mut pending = self.pending.lock().expect("pending queue lock poisoned");
        if pending.is_empty() {
            return;
        }
        let mut lists = self.lists.lock().expect("leaf lists lock poisoned");
        for (handle, in_margin) in pending.drain(..) {
            lists.segments.push(SegmentEntry { handle, in_margin });
            if in_margin {
                let offset = lists.segments.len() - 1;
                lists.margin.push(offset);
            }
        }
    }

    fn integrate(&self, shared: &TreeShared, dt: f32) {
        let segments = self.segments_snapshot();
        for entry in &segments {
            let _ = shared
                .store
                .with_mut(entry.handle, |body| physics::integrate(body, dt, &shared.world));
        }
    }

    /// Two passes over a snapshot taken at phase start; the leaf is the sole
    /// structural writer, so the snapshot is exact. Interior entries are
    /// promoted into the margin band or migrated out; margin entries are
    /// migrated out or demoted back to the interior.
    fn classify(&self, shared: &TreeShared) {
        let (segments, margin) = self.lists_snapshot();

        for (offset, entry) in segments.iter().enumerate() {
            if entry.in_margin {
                continue;
            }
            let Ok(body) = shared.store.get(entry.handle) else {
                continue;
            };
            let (x, z) = (body.position.x, body.position.z);
            if self.interior.contains(x, z) {
                continue;
            }
            if self.region.contains(x, z) {
                // Entered the boundary band but not left the region.
                let mut lists = self.lists.lock().expect("leaf lists lock poisoned");
                lists.segments[offset].in_margin = true;
                lists.margin.push(offset);
            } else if self.migrate(shared, entry.handle, x, z) {
                let mut lists = self.lists.lock().expect("leaf lists lock poisoned");
                lists.outbound.push(offset);
            }
        }

        for &offset in &margin {
            let entry = segments[offset];
            if !entry.in_margin {
                continue;
            }
            let Ok(body) = shared.store.get(entry.handle) else {
                continue;
            };
            let (x, z) = (body.position.x, body.position.z);
            if !self.region.contains(x, z) {
                if self.migrate(shared, entry.handle, x, z) {
                    let mut lists = self.lists.lock().expect("leaf lists lock poisoned");
                    lists.outbound.push(offset);
                }
            } else if self.interior.contains(x, z) {
                // Back inside the interior; the stale margin offset is
                // dropped during compact.
                let mut lists = self.lists.lock().expect("leaf lists lock poisoned");
                lists.segments[offset].in_margin = false;
            }
        }
    }

    /// Hands an entity that left this region to the leaf owning its new
    /// position. Returns true only once the destination accepted it, so the
    /// caller never records a removal for an entity nobody adopted.
    fn migrate(&self, shared: &TreeShared, handle: Handle, x: f32, z: f32) -> bool {
        {
            let lists = self.lists.lock().expect("leaf lists lock poisoned");
            if lists.outbound.len() >= self.transfer_capacity {
                trace!(handle = handle.raw(), "transfer-out list full, deferring migration");
                return false;
            }
        }

        let direct = self
            .neighbors
            .iter()
            .copied()
            .flatten()
            .find(|&id| shared.nodes[id as usize].region().contains(x, z));
        let destination = direct.or_else(|| {
            // Moved diagonally past a corner; resolve from the root.
            node::leaf_for_position(&shared.nodes, shared.root, x, z)
        });

        let Some(destination) = destination else {
            warn!(
                handle = handle.raw(),
                x, z, "no leaf contains migrated position, keeping entity in place"
            );
            return false;
        };
        let Some(leaf) = shared.nodes[destination as usize].as_leaf() else {
            return false;
        };

        let in_margin = !leaf.interior.contains(x, z);
        match leaf.queue_add(handle, in_margin) {
            Ok(()) => true,
            Err(_) => {
                trace!(
                    handle = handle.raw(),
                    "destination pending queue full, deferring migration"
                );
                false
            }
        }
    }

    /// Removes every transferred-out entry and every stale margin offset.
    /// Removing segment offset `i` shifts every margin offset above `i` down
    /// by one so the remaining offsets stay valid.
    fn compact(&self) {
        let mut lists = self.lists.lock().expect("leaf lists lock poisoned");

        if !lists.outbound.is_empty() {
            let mut outbound = std::mem::take(&mut lists.outbound);
            outbound.sort_unstable();
            for &offset in outbound.iter().rev() {
                lists.segments.remove(offset);
                lists.margin.retain(|&m| m != offset);
                for m in lists.margin.iter_mut() {
                    if *m > offset {
                        *m -= 1;
                    }
                }
            }
        }

        let LeafLists {
            segments, margin, ..
        } = &mut *lists;
        margin.retain(|&m| segments[m].in_margin);
    }

    /// Local pairwise collisions, then margin entities against every entity
    /// the neighbors' margin lists point to. Both passes stop at the first
    /// overlapping partner per entity (per neighbor for the cross pass).
    pub(crate) fn check_collisions(&self, shared: &TreeShared) {
        let (segments, margin) = self.lists_snapshot();

        for i in 0..segments.len() {
            let handle = segments[i].handle;
            let Ok(body) = shared.store.get(handle) else {
                continue;
            };
            for (j, other) in segments.iter().enumerate() {
                if i == j {
                    continue;
                }
                let Ok(other_body) = shared.store.get(other.handle) else {
                    continue;
                };
                if collisions::overlaps(&body, &other_body) {
                    let _ = shared
                        .store
                        .with_pair_mut(handle, other.handle, collisions::resolve);
                    break;
                }
            }
        }

        for &offset in &margin {
            let Some(entry) = segments.get(offset) else {
                continue;
            };
            let handle = entry.handle;
            let Ok(body) = shared.store.get(handle) else {
                continue;
            };
            for neighbor_id in self.neighbors.iter().copied().flatten() {
                let Some(neighbor) = shared.nodes[neighbor_id as usize].as_leaf() else {
                    continue;
                };
                // Work off a copy; the neighbor may be resizing its lists on
                // another worker. The copy can run one tick stale.
                let (neighbor_segments, neighbor_margin) = neighbor.lists_snapshot();
                if neighbor_segments.is_empty() || neighbor_margin.is_empty() {
                    continue;
                }
                for &m in &neighbor_margin {
                    let Some(other) = neighbor_segments.get(m) else {
                        continue;
                    };
                    if other.handle == handle {
                        continue;
                    }
                    let Ok(other_body) = shared.store.get(other.handle) else {
                        continue;
                    };
                    if collisions::overlaps(&body, &other_body) {
                        let _ = shared
                            .store
                            .with_pair_mut(handle, other.handle, collisions::resolve);
                        break;
                    }
                }
            }
        }
    }

    fn segments_snapshot(&self) -> Vec<SegmentEntry> {
        self.lists
            .lock()
            .expect("leaf lists lock poisoned")
            .segments
            .clone()
    }

    /// A consistent copy of the segment and margin lists, taken under the
    /// lists lock.
    pub(crate) fn lists_snapshot(&self) -> (Vec<SegmentEntry>, Vec<usize>) {
        let lists = self.lists.lock().expect("leaf lists lock poisoned");
        (lists.segments.clone(), lists.margin.clone())
    }

    pub(crate) fn pending_snapshot(&self) -> Vec<(Handle, bool)> {
        self.pending
            .lock()
            .expect("pending queue lock poisoned")
            .clone()
    }
}

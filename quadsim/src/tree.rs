use std::sync::Arc;

use fxhash::FxHashSet;
use tracing::debug;

use common::{Body, Region};

use crate::config::Config;
use crate::error::{SimError, SimResult};
use crate::node::{self, Node, NodeId};
use crate::pool::WorkerPool;
use crate::store::{EntityStore, Handle};

/// State shared between the tree handle and the worker threads. The arena
/// topology is immutable after construction; all per-tick mutation goes
/// through the leaves' and the store's own locks.
pub(crate) struct TreeShared {
    pub(crate) world: Region,
    pub(crate) store: EntityStore,
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) leaves: Vec<NodeId>,
}

/// One leaf's unit of work for a tick: the four-phase update, then the
/// collision pass.
pub(crate) fn run_leaf_job(shared: &TreeShared, id: NodeId, dt: f32) {
    if let Node::Leaf(leaf) = &shared.nodes[id as usize] {
        leaf.update(shared, dt);
        leaf.check_collisions(shared);
    }
}

/// Where an entity currently lives: the index of its leaf (in leaf-list
/// order, see [`SpatialTree::all_leaf_regions`]) and its margin flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub leaf: usize,
    pub in_margin: bool,
}

/// Population counts across the whole tree. `resident` counts segment-list
/// entries, `pending` counts entities parked in a destination's pending
/// queue mid-migration, `unique` the distinct handles across both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    pub resident: usize,
    pub pending: usize,
    pub unique: usize,
}

impl Census {
    pub fn total(&self) -> usize {
        self.resident + self.pending
    }
}

/// The partition tree: owns the entity store, the node arena, and the
/// worker pool. `tick` takes `&mut self`, so read access like
/// [`SpatialTree::for_each_entity`] can never overlap a running tick.
pub struct SpatialTree {
    // Declared before `shared` so workers are joined before the arena and
    // store they reference are dropped.
    pool: WorkerPool,
    shared: Arc<TreeShared>,
}

impl SpatialTree {
    pub fn new(world: Region) -> Self {
        Self::new_with_config(world, Config::default())
    }

    pub fn new_with_config(world: Region, config: Config) -> Self {
        let mut nodes = Vec::new();
        let root = node::build(&mut nodes, 0, world, &config);

        let mut leaves = Vec::new();
        node::collect_leaves(&nodes, root, &mut leaves);
        node::compute_neighbors(&mut nodes, root, &leaves);

        debug!(
            depth = config.depth,
            leaves = leaves.len(),
            workers = config.workers,
            "spatial tree built"
        );

        let shared = Arc::new(TreeShared {
            world,
            store: EntityStore::with_capacity(config.entity_capacity),
            nodes,
            root,
            leaves,
        });
        let pool = WorkerPool::spawn(config.workers, Arc::clone(&shared));

        SpatialTree { pool, shared }
    }

    /// Inserts a body into the store and routes it into the leaf owning its
    /// position. Spawning outside the world region fails with
    /// [`SimError::LookupFailed`]; a full destination queue fails with
    /// [`SimError::CapacityExceeded`] and leaves the store untouched.
    pub fn add_entity(&mut self, body: Body) -> SimResult<Handle> {
        let (x, z) = (body.position.x, body.position.z);
        let leaf_id = node::leaf_for_position(&self.shared.nodes, self.shared.root, x, z)
            .ok_or(SimError::LookupFailed { x, z })?;
        let Some(leaf) = self.shared.nodes[leaf_id as usize].as_leaf() else {
            return Err(SimError::LookupFailed { x, z });
        };
        if !leaf.has_pending_room() {
            return Err(SimError::CapacityExceeded {
                capacity: leaf.transfer_capacity(),
            });
        }

        let handle = self.shared.store.insert(body);
        let in_margin = !leaf.interior.contains(x, z);
        leaf.queue_add(handle, in_margin)?;
        Ok(handle)
    }

    /// One synchronous fork-join simulation step. Returns once every leaf
    /// finished both its update and its collision pass.
    pub fn tick(&mut self, dt: f32) {
        if self.pool.worker_count() == 0 {
            for &leaf in &self.shared.leaves {
                run_leaf_job(&self.shared, leaf, dt);
            }
        } else {
            self.pool.run_tick(&self.shared.leaves, dt);
        }
    }

    /// A copy of the entity's current state.
    pub fn entity(&self, handle: Handle) -> SimResult<Body> {
        self.shared.store.get(handle)
    }

    /// Read-only iteration over every entity, for rendering collaborators.
    pub fn for_each_entity(&self, f: impl FnMut(Handle, &Body)) {
        self.shared.store.for_each(f);
    }

    pub fn entity_count(&self) -> usize {
        self.shared.store.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.shared.leaves.len()
    }

    /// Adds `amount` to every body's vertical velocity. Input-handling seam.
    pub fn impulse_all(&mut self, amount: f32) {
        self.shared.store.for_each_mut(|_, body| {
            body.velocity.y += amount;
        });
    }

    /// Every leaf's region, in the same order `Placement::leaf` indexes.
    pub fn all_leaf_regions(&self, out: &mut Vec<Region>) {
        for &leaf_id in &self.shared.leaves {
            out.push(*self.shared.nodes[leaf_id as usize].region());
        }
    }

    /// Scans the leaves for the entity's current placement. Entities parked
    /// in a pending queue mid-migration report `None` until the destination
    /// drains them.
    pub fn locate(&self, handle: Handle) -> Option<Placement> {
        for (index, &leaf_id) in self.shared.leaves.iter().enumerate() {
            let Some(leaf) = self.shared.nodes[leaf_id as usize].as_leaf() else {
                continue;
            };
            let (segments, _) = leaf.lists_snapshot();
            if let Some(entry) = segments.iter().find(|entry| entry.handle == handle) {
                return Some(Placement {
                    leaf: index,
                    in_margin: entry.in_margin,
                });
            }
        }
        None
    }

    /// Counts residents and in-transit entities across every leaf. With no
    /// capacity rejections, `unique` equals the store population: entities
    /// are never lost or duplicated by migration.
    pub fn census(&self) -> Census {
        let mut seen: FxHashSet<u32> = FxHashSet::default();
        let mut census = Census::default();
        for &leaf_id in &self.shared.leaves {
            let Some(leaf) = self.shared.nodes[leaf_id as usize].as_leaf() else {
                continue;
            };
            let (segments, _) = leaf.lists_snapshot();
            census.resident += segments.len();
            for entry in &segments {
                seen.insert(entry.handle.raw());
            }
            let pending = leaf.pending_snapshot();
            census.pending += pending.len();
            for (handle, _) in &pending {
                seen.insert(handle.raw());
            }
        }
        census.unique = seen.len();
        census
    }
}

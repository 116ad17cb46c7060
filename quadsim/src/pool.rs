use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::node::NodeId;
use crate::tree::{run_leaf_job, TreeShared};

struct PoolState {
    /// Leaf jobs not yet claimed this tick.
    queue: Vec<NodeId>,
    /// Leaf jobs claimed but not yet finished.
    in_flight: Vec<NodeId>,
    /// Bumped once per dispatched tick. Workers record the epoch they
    /// completed, so a late signal from a previous tick can never be
    /// mistaken for the current tick finishing.
    epoch: u64,
    completed: u64,
    dt: f32,
    running: bool,
}

struct PoolShared {
    state: Mutex<PoolState>,
    work_ready: Condvar,
    tick_done: Condvar,
}

/// Fixed set of worker threads created once and kept for the tree's
/// lifetime. Each tick publishes the leaf list as a job queue; `run_tick`
/// returns only after every job's update and collision pass completed.
pub(crate) struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub(crate) fn spawn(count: usize, tree: Arc<TreeShared>) -> Self {
        let shared = Arc::new(PoolShared {
            state: Mutex::new(PoolState {
                queue: Vec::new(),
                in_flight: Vec::new(),
                epoch: 0,
                completed: 0,
                dt: 0.0,
                running: true,
            }),
            work_ready: Condvar::new(),
            tick_done: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(count);
        for index in 0..count {
            let pool = Arc::clone(&shared);
            let tree = Arc::clone(&tree);
            let handle = thread::Builder::new()
                .name(format!("quadsim-worker-{index}"))
                .spawn(move || worker_loop(&pool, &tree))
                .expect("failed to spawn worker thread");
            workers.push(handle);
        }
        if count > 0 {
            debug!(workers = count, "worker pool started");
        }

        WorkerPool { shared, workers }
    }

    pub(crate) fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Fork-join dispatch of one tick. Blocks the caller until the queue and
    /// the in-flight set are both empty for this tick's epoch.
    pub(crate) fn run_tick(&self, leaves: &[NodeId], dt: f32) {
        let mut state = self.shared.state.lock().expect("pool state lock poisoned");
        state.epoch += 1;
        let target = state.epoch;
        state.dt = dt;
        state.queue.clear();
        state.queue.extend_from_slice(leaves);
        state.in_flight.clear();

        if state.queue.is_empty() {
            state.completed = target;
        } else {
            self.shared.work_ready.notify_all();
        }

        while state.completed < target {
            state = self
                .shared
                .tick_done
                .wait(state)
                .expect("pool state lock poisoned");
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock().expect("pool state lock poisoned");
            state.running = false;
        }
        self.shared.work_ready.notify_all();
        let count = self.workers.len();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        if count > 0 {
            debug!(workers = count, "worker pool stopped");
        }
    }
}

fn worker_loop(pool: &PoolShared, tree: &TreeShared) {
    loop {
        let (job, dt) = {
            let mut state = pool.state.lock().expect("pool state lock poisoned");
            loop {
                if !state.running {
                    return;
                }
                if let Some(job) = state.queue.pop() {
                    state.in_flight.push(job);
                    break (job, state.dt);
                }
                state = pool
                    .work_ready
                    .wait(state)
                    .expect("pool state lock poisoned");
            }
        };

        // The job runs outside the pool lock; leaves synchronize among
        // themselves through their own locks.
        run_leaf_job(tree, job, dt);

        let mut state = pool.state.lock().expect("pool state lock poisoned");
        if let Some(slot) = state.in_flight.iter().position(|&id| id == job) {
            state.in_flight.swap_remove(slot);
        }
        if state.queue.is_empty() && state.in_flight.is_empty() && state.completed < state.epoch {
            state.completed = state.epoch;
            pool.tick_done.notify_all();
        }
    }
}

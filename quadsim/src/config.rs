#[derive(Debug, Clone)]
pub struct Config {
    /// Partition recursion levels. Depth 0 keeps the whole world in a single
    /// leaf; each extra level splits every region into four.
    pub depth: u32,
    /// Worker threads servicing leaf jobs. 0 runs every tick inline on the
    /// calling thread.
    pub workers: usize,
    /// Width of the boundary band inset from every leaf edge.
    pub margin_width: f32,
    /// Expected total entity count. Sizes the per-leaf transfer queues.
    pub entity_capacity: usize,
}

impl Config {
    /// Capacity of each leaf's pending-add and transfer-out lists.
    pub(crate) fn transfer_capacity(&self) -> usize {
        (self.entity_capacity / 4).max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            depth: 4,
            workers: num_cpus::get(),
            margin_width: common::DEFAULT_MARGIN,
            entity_capacity: 50_000,
        }
    }
}

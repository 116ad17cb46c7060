use std::sync::{Mutex, RwLock};

use common::Body;

use crate::error::{SimError, SimResult};

/// Stable identifier for an entity in the store, assigned on insertion and
/// valid for the entity's whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(u32);

impl Handle {
    pub fn from_raw(raw: u32) -> Self {
        Handle(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Append-only store of entity records. Entries sit behind individual locks
/// because cross-boundary collision resolution writes the velocities of two
/// bodies owned by leaves running on different workers.
pub struct EntityStore {
    bodies: RwLock<Vec<Mutex<Body>>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            bodies: RwLock::new(Vec::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bodies: RwLock::new(Vec::with_capacity(capacity)),
        }
    }

    pub fn insert(&self, body: Body) -> Handle {
        let mut bodies = self.bodies.write().expect("entity store lock poisoned");
        bodies.push(Mutex::new(body));
        Handle((bodies.len() - 1) as u32)
    }

    pub fn len(&self) -> usize {
        self.bodies.read().expect("entity store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of the record. Fails with [`SimError::InvalidHandle`] past the
    /// end of the store.
    pub fn get(&self, handle: Handle) -> SimResult<Body> {
        let bodies = self.bodies.read().expect("entity store lock poisoned");
        let slot = bodies.get(handle.index()).ok_or(SimError::InvalidHandle {
            handle: handle.raw(),
            len: bodies.len(),
        })?;
        let body = *slot.lock().expect("entity lock poisoned");
        Ok(body)
    }

    pub(crate) fn with_mut<R>(
        &self,
        handle: Handle,
        f: impl FnOnce(&mut Body) -> R,
    ) -> SimResult<R> {
        let bodies = self.bodies.read().expect("entity store lock poisoned");
        let slot = bodies.get(handle.index()).ok_or(SimError::InvalidHandle {
            handle: handle.raw(),
            len: bodies.len(),
        })?;
        let mut body = slot.lock().expect("entity lock poisoned");
        Ok(f(&mut body))
    }

    /// Locked access to two distinct records. Locks are always taken in
    /// ascending handle order so concurrent pair resolutions cannot deadlock.
    pub(crate) fn with_pair_mut(
        &self,
        a: Handle,
        b: Handle,
        f: impl FnOnce(&mut Body, &mut Body),
    ) -> SimResult<()> {
        if a == b {
            return Ok(());
        }
        let bodies = self.bodies.read().expect("entity store lock poisoned");
        let len = bodies.len();
        let slot_a = bodies.get(a.index()).ok_or(SimError::InvalidHandle {
            handle: a.raw(),
            len,
        })?;
        let slot_b = bodies.get(b.index()).ok_or(SimError::InvalidHandle {
            handle: b.raw(),
            len,
        })?;
        if a.index() < b.index() {
            let mut body_a = slot_a.lock().expect("entity lock poisoned");
            let mut body_b = slot_b.lock().expect("entity lock poisoned");
            f(&mut body_a, &mut body_b);
        } else {
            let mut body_b = slot_b.lock().expect("entity lock poisoned");
            let mut body_a = slot_a.lock().expect("entity lock poisoned");
            f(&mut body_a, &mut body_b);
        }
        Ok(())
    }

    pub fn for_each(&self, mut f: impl FnMut(Handle, &Body)) {
        let bodies = self.bodies.read().expect("entity store lock poisoned");
        for (index, slot) in bodies.iter().enumerate() {
            let body = slot.lock().expect("entity lock poisoned");
            f(Handle(index as u32), &body);
        }
    }

    pub(crate) fn for_each_mut(&self, mut f: impl FnMut(Handle, &mut Body)) {
        let bodies = self.bodies.read().expect("entity store lock poisoned");
        for (index, slot) in bodies.iter().enumerate() {
            let mut body = slot.lock().expect("entity lock poisoned");
            f(Handle(index as u32), &mut body);
        }
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

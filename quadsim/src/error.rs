use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimError {
    /// A bounded transfer queue is full. The triggering request is rejected
    /// and the entity stays where it was; callers may retry next tick.
    CapacityExceeded { capacity: usize },
    /// No leaf region contains the given position.
    LookupFailed { x: f32, z: f32 },
    /// A handle past the end of the entity store. Handles are never
    /// invalidated, so this indicates a caller bug rather than a normal case.
    InvalidHandle { handle: u32, len: usize },
}

pub type SimResult<T> = Result<T, SimError>;

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::CapacityExceeded { capacity } => {
                write!(
                    f,
                    "transfer queue is full (capacity: {}), request rejected",
                    capacity
                )
            }
            SimError::LookupFailed { x, z } => {
                write!(
                    f,
                    "no leaf region contains the position (x: {}, z: {})",
                    x, z
                )
            }
            SimError::InvalidHandle { handle, len } => {
                write!(
                    f,
                    "handle {} is out of range for an entity store of {} entries",
                    handle, len
                )
            }
        }
    }
}

impl std::error::Error for SimError {}

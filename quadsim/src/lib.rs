pub mod config;
pub mod error;
pub mod store;
pub mod tree;

mod leaf;
mod node;
mod physics;
mod pool;

pub use config::Config;
pub use error::{SimError, SimResult};
pub use store::{EntityStore, Handle};
pub use tree::{Census, Placement, SpatialTree};

pub mod body;
pub mod region;

pub use body::Body;
pub use region::Region;

pub use nalgebra::Vector3;

/// Downward acceleration applied to every body each tick.
pub const GRAVITY: f32 = -19.81;

/// Fraction of vertical speed kept after a floor bounce.
pub const FLOOR_DAMPING: f32 = 0.7;

/// Coefficient of restitution for body-body contacts (0 = inelastic).
pub const RESTITUTION: f32 = 0.01;

/// Energy retained by a contact impulse (0.9 = 10% reduction).
pub const CONTACT_DAMPING: f32 = 0.9;

/// Horizontal speed cap in world units per second.
pub const MAX_SPEED: f32 = 2.5;

pub const MAX_SPEED_SQUARED: f32 = MAX_SPEED * MAX_SPEED;

/// Default half extent of a spawned body on each axis.
pub const BODY_HALF_EXTENT: f32 = 0.05;

/// Default width of the boundary band along a region's edges.
pub const DEFAULT_MARGIN: f32 = BODY_HALF_EXTENT * 4.0;

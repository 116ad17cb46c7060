use nalgebra::Vector3;

use common::{Body, CONTACT_DAMPING, MAX_SPEED, MAX_SPEED_SQUARED, RESTITUTION};

/// Axis-aligned overlap test on all three axes.
pub fn overlaps(a: &Body, b: &Body) -> bool {
    (a.position.x - b.position.x).abs() < a.half_extent.x + b.half_extent.x
        && (a.position.y - b.position.y).abs() < a.half_extent.y + b.half_extent.y
        && (a.position.z - b.position.z).abs() < a.half_extent.z + b.half_extent.z
}

/// Impulse-based resolution of a contact between two bodies. Separating
/// pairs are left alone; degenerate contacts (coincident centers) are
/// skipped rather than resolved along an arbitrary axis.
pub fn resolve(a: &mut Body, b: &mut Body) {
    let delta: Vector3<f32> = a.position - b.position;
    let Some(normal) = delta.try_normalize(f32::EPSILON) else {
        return;
    };

    // Relative velocity along the contact normal. Positive means the pair
    // is already separating.
    let closing = (a.velocity - b.velocity).dot(&normal);
    if closing > 0.0 {
        return;
    }

    let impulse = -(1.0 + RESTITUTION) * closing * CONTACT_DAMPING;

    a.velocity += normal * impulse;
    b.velocity -= normal * impulse;

    cap_horizontal_speed(a);
    cap_horizontal_speed(b);
}

/// Rescales the horizontal (x, z) velocity components so their magnitude
/// never exceeds [`MAX_SPEED`]. Vertical velocity is untouched.
pub fn cap_horizontal_speed(body: &mut Body) {
    let horizontal_sq = body.velocity.x * body.velocity.x + body.velocity.z * body.velocity.z;
    if horizontal_sq > MAX_SPEED_SQUARED {
        let scale = MAX_SPEED / horizontal_sq.sqrt();
        body.velocity.x *= scale;
        body.velocity.z *= scale;
    }
}

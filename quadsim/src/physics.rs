use common::{Body, Region, FLOOR_DAMPING, GRAVITY};

const FLOOR_Y: f32 = 0.0;

/// One integration step for a single body: gravity, position update, floor
/// and wall contact, horizontal speed cap. Walls exist only on the two
/// partitioned axes; the floor is the world's single vertical constraint.
pub(crate) fn integrate(body: &mut Body, dt: f32, world: &Region) {
    body.velocity.y += GRAVITY * dt;
    body.position += body.velocity * dt;

    if body.position.y - body.half_extent.y < FLOOR_Y {
        body.position.y = FLOOR_Y + body.half_extent.y;
        body.velocity.y = -body.velocity.y * FLOOR_DAMPING;
    }

    if body.position.x - body.half_extent.x < world.min_x
        || body.position.x + body.half_extent.x > world.max_x
    {
        body.velocity.x = -body.velocity.x;
    }
    if body.position.z - body.half_extent.z < world.min_z
        || body.position.z + body.half_extent.z > world.max_z
    {
        body.velocity.z = -body.velocity.z;
    }

    collisions::cap_horizontal_speed(body);
}

use common::{Body, Region, Vector3, BODY_HALF_EXTENT};

use rand::Rng;

#[test]
fn test_region_contains() {
    let region = Region::new(-10.0, -30.0, 30.0, 30.0);
    assert!(region.contains(0.0, 0.0));
    assert!(region.contains(-10.0, 30.0));
    assert!(region.contains(30.0, -30.0));
    assert!(!region.contains(-10.1, 0.0));
    assert!(!region.contains(0.0, 30.1));
}

#[test]
fn test_region_quadrants_tile_the_region() {
    let region = Region::new(0.0, 0.0, 8.0, 4.0);
    assert_eq!(region.quadrant(0), Region::new(0.0, 0.0, 4.0, 2.0));
    assert_eq!(region.quadrant(1), Region::new(4.0, 0.0, 8.0, 2.0));
    assert_eq!(region.quadrant(2), Region::new(0.0, 2.0, 4.0, 4.0));
    assert_eq!(region.quadrant(3), Region::new(4.0, 2.0, 8.0, 4.0));
}

#[test]
fn test_quadrant_index_matches_quadrant() {
    let region = Region::new(-2.0, -2.0, 2.0, 2.0);
    for index in 0..4 {
        let quarter = region.quadrant(index);
        let (x, z) = quarter.center();
        assert_eq!(region.quadrant_index(x, z), index);
    }
    // The midpoint itself routes to the high/high quadrant.
    assert_eq!(region.quadrant_index(0.0, 0.0), 3);
}

#[test]
fn test_shrunk_insets_every_edge() {
    let region = Region::new(0.0, 0.0, 10.0, 10.0);
    let interior = region.shrunk(0.5);
    assert_eq!(interior, Region::new(0.5, 0.5, 9.5, 9.5));
    assert!(region.contains(0.2, 5.0));
    assert!(!interior.contains(0.2, 5.0));
}

#[test]
fn test_random_point_inside_stays_inside() {
    let region = Region::new(-10.0, -30.0, 30.0, 30.0);
    let interior = region.shrunk(1.0);
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let (x, z) = region.random_point_inside(1.0, &mut rng);
        assert!(interior.contains(x, z));
    }
}

#[test]
fn test_random_point_inside_degenerate_region() {
    let region = Region::new(0.0, 0.0, 1.0, 1.0);
    let mut rng = rand::thread_rng();
    // Inset wider than the region must not panic.
    let (x, z) = region.random_point_inside(5.0, &mut rng);
    assert_eq!((x, z), (5.0, 5.0));
}

#[test]
fn test_body_cube_defaults() {
    let body = Body::cube(1.0, 2.0, 3.0);
    assert_eq!(body.position, Vector3::new(1.0, 2.0, 3.0));
    assert_eq!(
        body.half_extent,
        Vector3::new(BODY_HALF_EXTENT, BODY_HALF_EXTENT, BODY_HALF_EXTENT)
    );
    assert_eq!(body.velocity, Vector3::zeros());
    assert!((body.bottom() - (2.0 - BODY_HALF_EXTENT)).abs() < 1e-6);
}

#[test]
fn test_body_builders() {
    let body = Body::cube(0.0, 0.0, 0.0)
        .with_velocity(1.0, -2.0, 3.0)
        .with_tint(0.5, 0.25, 0.125);
    assert_eq!(body.velocity, Vector3::new(1.0, -2.0, 3.0));
    assert_eq!(body.tint, Vector3::new(0.5, 0.25, 0.125));
}

#[test]
fn test_random_velocity_cap_input() {
    // Sanity check the rng helper range form used by scene setup.
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let v: f32 = rng.gen_range(-1.0..=1.0);
        assert!((-1.0..=1.0).contains(&v));
    }
}

use collisions::{cap_horizontal_speed, overlaps, resolve};
use common::{Body, MAX_SPEED};

#[test]
fn test_overlap_on_all_axes() {
    let a = Body::cube(0.0, 0.0, 0.0);
    let b = Body::cube(0.08, 0.0, 0.0);
    assert!(overlaps(&a, &b));
    assert!(overlaps(&b, &a));
}

#[test]
fn test_no_overlap_when_separated_on_one_axis() {
    let a = Body::cube(0.0, 0.0, 0.0);
    // Overlapping on x and z, separated on y.
    let b = Body::cube(0.05, 0.5, 0.05);
    assert!(!overlaps(&a, &b));
}

#[test]
fn test_touching_faces_do_not_overlap() {
    let a = Body::cube(0.0, 0.0, 0.0);
    let b = Body::cube(0.1, 0.0, 0.0);
    assert!(!overlaps(&a, &b));
}

#[test]
fn test_head_on_resolution_inverts_approach() {
    let mut a = Body::cube(-0.04, 0.0, 0.0).with_velocity(1.0, 0.0, 0.0);
    let mut b = Body::cube(0.04, 0.0, 0.0).with_velocity(-1.0, 0.0, 0.0);
    assert!(overlaps(&a, &b));

    resolve(&mut a, &mut b);

    // Approach inverted, within the damping factor.
    assert!(a.velocity.x < 0.0);
    assert!(b.velocity.x > 0.0);

    // The post-resolution relative velocity along the contact normal must
    // not be an approach.
    let normal = (a.position - b.position).normalize();
    let separating = (a.velocity - b.velocity).dot(&normal);
    assert!(separating >= 0.0);
}

#[test]
fn test_separating_pair_is_untouched() {
    let mut a = Body::cube(-0.04, 0.0, 0.0).with_velocity(-1.0, 0.0, 0.0);
    let mut b = Body::cube(0.04, 0.0, 0.0).with_velocity(1.0, 0.0, 0.0);
    let before = (a, b);

    resolve(&mut a, &mut b);

    assert_eq!(a, before.0);
    assert_eq!(b, before.1);
}

#[test]
fn test_coincident_centers_are_skipped() {
    let mut a = Body::cube(1.0, 1.0, 1.0).with_velocity(0.5, 0.0, 0.0);
    let mut b = Body::cube(1.0, 1.0, 1.0).with_velocity(-0.5, 0.0, 0.0);
    let before = (a, b);

    resolve(&mut a, &mut b);

    assert_eq!(a, before.0);
    assert_eq!(b, before.1);
}

#[test]
fn test_cap_leaves_slow_bodies_alone() {
    let mut body = Body::cube(0.0, 0.0, 0.0).with_velocity(1.0, -8.0, 1.0);
    cap_horizontal_speed(&mut body);
    assert_eq!(body.velocity.x, 1.0);
    assert_eq!(body.velocity.z, 1.0);
    assert_eq!(body.velocity.y, -8.0);
}

#[test]
fn test_cap_rescales_horizontal_only() {
    let mut body = Body::cube(0.0, 0.0, 0.0).with_velocity(30.0, -8.0, 40.0);
    cap_horizontal_speed(&mut body);

    let horizontal = (body.velocity.x * body.velocity.x + body.velocity.z * body.velocity.z).sqrt();
    assert!((horizontal - MAX_SPEED).abs() < 1e-4);
    // Direction preserved, vertical untouched.
    assert!((body.velocity.x / body.velocity.z - 30.0 / 40.0).abs() < 1e-4);
    assert_eq!(body.velocity.y, -8.0);
}

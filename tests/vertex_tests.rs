mod support;

use nalgebra::{Point3, Vector2, Vector3};
use pg_csg::{float_types::EPSILON, mesh::vertex::Vertex};

use crate::support::approx_eq;

#[test]
fn new_has_zero_uv() {
    let v = Vertex::new(Point3::new(1.0, 2.0, 3.0), Vector3::y());
    assert_eq!(v.uv, Vector2::zeros());
    assert_eq!(v.normal, Vector3::y());
}

#[test]
fn flip_keeps_position_and_uv() {
    let mut v = Vertex::with_uv(Point3::new(1.0, 0.0, 0.0), Vector3::x(), Vector2::new(0.25, 0.75));
    v.flip();
    assert_eq!(v.pos, Point3::new(1.0, 0.0, 0.0));
    assert_eq!(v.normal, -Vector3::x());
    assert_eq!(v.uv, Vector2::new(0.25, 0.75));
}

#[test]
fn interpolate_endpoints() {
    let a = Vertex::with_uv(Point3::origin(), Vector3::x(), Vector2::new(0.0, 0.0));
    let b = Vertex::with_uv(Point3::new(2.0, 4.0, 6.0), Vector3::y(), Vector2::new(1.0, 1.0));

    assert_eq!(a.interpolate(&b, 0.0), a);
    assert_eq!(a.interpolate(&b, 1.0), b);
}

#[test]
fn interpolate_midpoint_lerps_every_attribute() {
    let a = Vertex::with_uv(Point3::origin(), Vector3::x(), Vector2::new(0.0, 1.0));
    let b = Vertex::with_uv(Point3::new(2.0, 4.0, 6.0), Vector3::y(), Vector2::new(1.0, 0.0));

    let mid = a.interpolate(&b, 0.5);
    assert_eq!(mid.pos, Point3::new(1.0, 2.0, 3.0));
    // the normal is a plain lerp and is not renormalized
    assert_eq!(mid.normal, Vector3::new(0.5, 0.5, 0.0));
    assert_eq!(mid.uv, Vector2::new(0.5, 0.5));
}

#[test]
fn distance_to() {
    let a = Vertex::new(Point3::origin(), Vector3::z());
    let b = Vertex::new(Point3::new(3.0, 4.0, 0.0), Vector3::z());
    assert!(approx_eq(a.distance_to(&b), 5.0, EPSILON));
}

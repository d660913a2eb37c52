#![cfg(feature = "stl-io")]

mod support;

use nalgebra::{Point3, Vector3};
use pg_csg::{io::IoError, mesh::Solid, soup::TriangleSoup};
use std::io::Cursor;

use crate::support::approx_eq;

#[test]
fn binary_round_trip() {
    let cube = Solid::<()>::cuboid(0.0, 1.0, 0.0, 1.0, 0.0, 1.0, None);
    let bytes = cube.to_stl_binary("cube").unwrap();
    assert_eq!(bytes.len(), 84 + 12 * 50);

    let loaded = Solid::<()>::from_stl(&mut Cursor::new(bytes), None).unwrap();
    assert_eq!(loaded.polygons.len(), 12);
    assert!(approx_eq(loaded.volume(), 1.0, 1e-6));
}

#[test]
fn ascii_round_trip() {
    let ball = TriangleSoup::sphere(1, 2.0, Point3::origin());
    let text = ball.to_stl_ascii("ball");
    assert!(text.starts_with("solid ball"));
    assert!(text.trim_end().ends_with("endsolid ball"));

    let loaded = TriangleSoup::from_stl_bytes(text.as_bytes()).unwrap();
    assert_eq!(loaded.triangle_count(), ball.triangle_count());
    assert!(loaded.validate().is_ok());
}

#[test]
fn loaded_normals_follow_the_facets() {
    let cube = TriangleSoup::cuboid(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
    let bytes = cube.to_stl_binary("cube").unwrap();
    let loaded = TriangleSoup::from_stl_bytes(&bytes).unwrap();

    for (tri, normal) in loaded.positions.chunks_exact(3).zip(loaded.normals.chunks_exact(3)) {
        let facing = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
        assert!(facing.dot(&normal[0]) > 0.0);
        assert_eq!(normal[0], normal[1]);
        assert_eq!(normal[1], normal[2]);
    }
}

#[test]
fn truncated_input_is_an_error() {
    let bytes = Solid::<()>::cuboid(0.0, 1.0, 0.0, 1.0, 0.0, 1.0, None)
        .to_stl_binary("cube")
        .unwrap();
    let result = TriangleSoup::from_stl_bytes(&bytes[..100]);
    assert!(matches!(result, Err(IoError::StdIo(_))));
}

#[test]
fn degenerate_facets_keep_a_stored_normal() {
    let text = "solid slivers
facet normal 0 0 1
  outer loop
    vertex 0 0 0
    vertex 1 0 0
    vertex 2 0 0
  endloop
endfacet
facet normal 0 0 0
  outer loop
    vertex 0 0 1
    vertex 1 0 1
    vertex 2 0 1
  endloop
endfacet
facet normal 0 0 0
  outer loop
    vertex 0 0 0
    vertex 1 0 0
    vertex 0 1 0
  endloop
endfacet
endsolid slivers
";
    let loaded = TriangleSoup::from_stl_bytes(text.as_bytes()).unwrap();

    // the collinear facet with a zero normal is the only one dropped
    assert_eq!(loaded.triangle_count(), 2);
    assert_eq!(loaded.normals[0], Vector3::z());
    assert_eq!(loaded.positions[2], Point3::new(2.0, 0.0, 0.0));
    assert!(approx_eq(loaded.normals[3].z, 1.0, 1e-12));
}

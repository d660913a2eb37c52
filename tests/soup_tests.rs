mod support;

use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use pg_csg::{
    errors::ValidationError,
    float_types::{PI, Real, TAU},
    mesh::{Solid, vertex::Vertex},
    soup::TriangleSoup,
    triangulated::Triangulated3D,
};

use crate::support::approx_eq;

fn triangle() -> [Vertex; 3] {
    [
        Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
        Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
        Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
    ]
}

/// Volume of a prism over a regular `n`-gon inscribed in `radius`.
fn prism_volume(radius: Real, n: usize, height: Real) -> Real {
    0.5 * n as Real * radius * radius * (TAU / n as Real).sin() * height
}

#[test]
fn validate_accepts_well_formed_soup() {
    let mut soup = TriangleSoup::default();
    soup.push_triangle(triangle());
    assert_eq!(soup.vertex_count(), 3);
    assert_eq!(soup.triangle_count(), 1);
    assert!(soup.validate().is_ok());

    // uvs are optional
    soup.uvs.clear();
    assert!(soup.validate().is_ok());
    assert_eq!(soup.triangles()[0][2].uv, Vector2::zeros());
}

#[test]
fn validate_rejects_mismatched_attributes() {
    let mut soup = TriangleSoup::default();
    soup.push_triangle(triangle());
    soup.normals.pop();
    assert_eq!(
        soup.validate(),
        Err(ValidationError::AttributeCount {
            attribute: "normals",
            expected: 3,
            found: 2,
        })
    );

    let mut soup = TriangleSoup::default();
    soup.push_triangle(triangle());
    soup.uvs.push(Vector2::zeros());
    assert!(matches!(
        soup.validate(),
        Err(ValidationError::AttributeCount { attribute: "uvs", .. })
    ));
}

#[test]
fn validate_rejects_partial_triangles() {
    let mut soup = TriangleSoup::default();
    soup.push_triangle(triangle());
    soup.positions.push(Point3::origin());
    soup.normals.push(Vector3::z());
    soup.uvs.push(Vector2::zeros());
    assert_eq!(soup.validate(), Err(ValidationError::IncompleteTriangle(4)));
    assert!(Solid::<()>::from_soup(&soup, None).is_err());
}

#[test]
fn validate_rejects_non_finite_positions() {
    let mut soup = TriangleSoup::default();
    soup.push_triangle(triangle());
    soup.positions[1].y = Real::NAN;
    assert!(matches!(
        soup.validate(),
        Err(ValidationError::InvalidCoordinate(_))
    ));
}

#[test]
fn degenerate_triangles_are_skipped() {
    let mut soup = TriangleSoup::default();
    soup.push_triangle(triangle());
    soup.push_triangle([
        Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
        Vertex::new(Point3::new(1.0, 1.0, 1.0), Vector3::z()),
        Vertex::new(Point3::new(2.0, 2.0, 2.0), Vector3::z()),
    ]);

    let solid = Solid::<()>::from_soup(&soup, None).unwrap();
    assert_eq!(solid.polygons.len(), 1);
}

#[test]
fn primitives_are_closed_and_outward() {
    let cube = TriangleSoup::cuboid(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
    let sphere = TriangleSoup::sphere(2, 1.0, Point3::new(1.0, 2.0, 3.0));
    let cylinder = TriangleSoup::cylinder(Point3::origin(), Point3::new(0.0, 0.0, 2.0), 0.5, 16);
    let cone = TriangleSoup::cone(Point3::new(1.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0), 1.0, 24);

    assert_eq!(cube.triangle_count(), 12);
    assert_eq!(sphere.triangle_count(), 8 * 16);
    assert_eq!(cylinder.triangle_count(), 4 * 16);
    assert_eq!(cone.triangle_count(), 2 * 24);

    for soup in [&cube, &sphere, &cylinder, &cone] {
        assert!(soup.validate().is_ok());
        let solid = Solid::<()>::from_soup(soup, None).unwrap();
        assert_eq!(solid.polygons.len(), soup.triangle_count());
        assert!(solid.volume() > 0.0);
        #[cfg(feature = "hashmap")]
        assert!(solid.is_watertight());
    }
}

#[test]
fn primitive_volumes() {
    let cube = Solid::<()>::from_soup(&TriangleSoup::cuboid(0.0, 1.0, 0.0, 2.0, 0.0, 3.0), None).unwrap();
    assert!(approx_eq(cube.volume(), 6.0, 1e-9));
    assert!(approx_eq(cube.surface_area(), 22.0, 1e-9));

    let cylinder: Solid<()> = Solid::cylinder(
        Point3::new(0.0, -1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        0.5,
        36,
        None,
    );
    assert!(approx_eq(cylinder.volume(), prism_volume(0.5, 36, 2.0), 1e-9));

    let cone: Solid<()> = Solid::cone(Point3::origin(), Point3::new(0.0, 0.0, 3.0), 1.0, 32, None);
    assert!(approx_eq(cone.volume(), prism_volume(1.0, 32, 3.0) / 3.0, 1e-9));

    let ball: Solid<()> = Solid::sphere(3, 1.0, Point3::origin(), None);
    let exact = 4.0 / 3.0 * PI;
    assert!(ball.volume() < exact);
    assert!(ball.volume() > 0.9 * exact);
}

#[test]
fn cylinder_follows_its_axis() {
    let soup = TriangleSoup::cylinder(Point3::new(1.0, 1.0, 1.0), Point3::new(1.0, 1.0, 5.0), 0.5, 12);
    let bb = soup.bounding_box();
    assert!(approx_eq(bb.mins.z, 1.0, 1e-9));
    assert!(approx_eq(bb.maxs.z, 5.0, 1e-9));
    assert!(approx_eq(bb.maxs.x, 1.5, 1e-9));

    // a downward axis is the degenerate case for the rotation
    let down = TriangleSoup::cylinder(Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, -1.0, 0.0), 0.5, 12);
    let solid = Solid::<()>::from_soup(&down, None).unwrap();
    assert!(solid.volume() > 0.0);
}

#[test]
fn hollow_cylinder_is_open() {
    let soup = TriangleSoup::hollow_cylinder(Point3::origin(), Point3::new(0.0, 1.0, 0.0), 1.0, 8);
    assert_eq!(soup.triangle_count(), 2 * 8);
    #[cfg(feature = "hashmap")]
    assert!(!Solid::<()>::from_soup(&soup, None).unwrap().is_watertight());
}

#[test]
fn zero_detail_is_empty() {
    assert!(TriangleSoup::cylinder(Point3::origin(), Point3::new(0.0, 1.0, 0.0), 1.0, 0).is_empty());
    assert!(TriangleSoup::cone(Point3::origin(), Point3::new(0.0, 1.0, 0.0), 1.0, 0).is_empty());
}

#[test]
fn reverse_winding_turns_inside_out() {
    let soup = TriangleSoup::cuboid(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
    let reversed = soup.reverse_winding();
    let solid = Solid::<()>::from_soup(&reversed, None).unwrap();
    assert!(approx_eq(solid.volume(), -8.0, 1e-9));
    assert_eq!(reversed.normals[0], -soup.normals[0]);
    assert_eq!(reversed.reverse_winding(), soup);
}

#[test]
fn transform_and_center() {
    let soup = TriangleSoup::cuboid(2.0, 4.0, 0.0, 2.0, 0.0, 2.0);
    let centered = soup.center();
    let bb = centered.bounding_box();
    assert_eq!(bb.mins, Point3::new(-1.0, -1.0, -1.0));
    assert_eq!(bb.maxs, Point3::new(1.0, 1.0, 1.0));

    let scaled = soup.transform(&Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0)));
    let solid = Solid::<()>::from_soup(&scaled, None).unwrap();
    assert!(approx_eq(solid.volume(), 16.0, 1e-9));
    for n in &scaled.normals {
        assert!(approx_eq(n.norm(), 1.0, 1e-9));
    }
}

#[test]
fn concatenation() {
    let a = TriangleSoup::cuboid(0.0, 1.0, 0.0, 1.0, 0.0, 1.0);
    let mut b = TriangleSoup::cuboid(2.0, 3.0, 0.0, 1.0, 0.0, 1.0);
    b.uvs.clear();

    let joined = &a + &b;
    assert_eq!(joined.triangle_count(), 24);
    assert_eq!(joined.uvs.len(), joined.positions.len());
    assert!(joined.validate().is_ok());

    let owned = b.clone() + a.clone();
    assert_eq!(owned.uvs.len(), owned.positions.len());
    assert_eq!(owned.count_triangles(), 24);
}

//! The classic rounded-cube-minus-three-cylinders scene, end to end.

mod support;

use nalgebra::Point3;
use pg_csg::{
    float_types::{PI, Real},
    mesh::Solid,
    traits::CSGOps,
};

use std::sync::LazyLock;

use crate::support::approx_eq;

const CYLINDER_RADIUS: Real = 0.5;
const CYLINDER_DETAIL: usize = 36;
const SPHERE_RADIUS: Real = 1.35;

fn scene() -> Solid<()> {
    let cube = Solid::<()>::cuboid(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0, None);
    let sphere = Solid::<()>::sphere(3, SPHERE_RADIUS, Point3::origin(), None);
    let cylinder = |from: [Real; 3], to: [Real; 3]| {
        Solid::<()>::cylinder(
            Point3::from(from),
            Point3::from(to),
            CYLINDER_RADIUS,
            CYLINDER_DETAIL,
            None,
        )
    };
    let x = cylinder([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
    let y = cylinder([0.0, -1.0, 0.0], [0.0, 1.0, 0.0]);
    let z = cylinder([0.0, 0.0, -1.0], [0.0, 0.0, 1.0]);

    (&cube & &sphere) - (&x | &y | &z)
}

static SCENE: LazyLock<Solid<()>> = LazyLock::new(scene);

#[test]
fn scene_volume_and_area() {
    let cube: Solid<()> = Solid::cuboid(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0, None);
    let sphere: Solid<()> = Solid::sphere(3, SPHERE_RADIUS, Point3::origin(), None);
    let rounded = &cube & &sphere;
    assert!(approx_eq(rounded.volume(), 7.3837, 1e-3));

    let result = &*SCENE;
    assert!(!result.is_empty());
    assert!(result.volume() < rounded.volume());
    assert!(approx_eq(result.volume(), 4.0987, 1e-3));
    assert!(approx_eq(result.surface_area(), 26.0125, 1e-3));
}

#[test]
fn scene_vertices_stay_inside_the_operands() {
    let result = &*SCENE;
    // the tessellated cylinders are inscribed in their radius
    let min_axis_distance = CYLINDER_RADIUS * (PI / CYLINDER_DETAIL as Real).cos() - 1e-6;

    for v in result.vertices() {
        let p = v.pos;
        for c in [p.x, p.y, p.z] {
            assert!(c.abs() <= 1.0 + 1e-6, "{p} leaves the cube");
        }
        assert!(p.coords.norm() <= SPHERE_RADIUS + 1e-6, "{p} leaves the sphere");

        let axis_distances = [
            (p.y * p.y + p.z * p.z).sqrt(),
            (p.x * p.x + p.z * p.z).sqrt(),
            (p.x * p.x + p.y * p.y).sqrt(),
        ];
        for d in axis_distances {
            assert!(d >= min_axis_distance, "{p} lies inside a cylinder");
        }
    }
}

#[test]
fn scene_polygons_stay_on_their_planes() {
    let result = &*SCENE;
    for polygon in &result.polygons {
        // cut pieces keep the plane of the face they were cut from
        for v in &polygon.vertices {
            assert!(polygon.plane.signed_distance(&v.pos).abs() < 1e-6);
        }
    }
    assert!(result.volume() > 0.0);
}

#[cfg(feature = "hashmap")]
#[test]
fn scene_is_watertight_after_closing_seams() {
    let result = &*SCENE;
    let closed = result.close_seams();

    assert!(closed.is_watertight());
    assert_eq!(closed.open_edge_count(), 0);
    // closing seams only adds vertices on existing edges
    assert_eq!(closed.polygons.len(), result.polygons.len());
    assert!(closed.triangle_count() >= result.triangle_count());
    assert!(approx_eq(closed.volume(), result.volume(), 1e-4));
    assert!(approx_eq(closed.surface_area(), result.surface_area(), 1e-4));
}

#[cfg(feature = "hashmap")]
#[test]
fn closed_scene_survives_transforms() {
    let closed = SCENE.close_seams();

    let moved = closed.translate(1.0, 0.0, 0.0);
    assert_eq!(moved.polygons.len(), closed.polygons.len());
    assert!(approx_eq(moved.surface_area(), closed.surface_area(), 1e-6));
    assert!(approx_eq(moved.volume(), closed.volume(), 1e-6));
    assert!(moved.is_watertight());

    let turned = closed.rotate(0.0, 0.0, 90.0);
    assert_eq!(turned.polygons.len(), closed.polygons.len());
    assert!(approx_eq(turned.surface_area(), closed.surface_area(), 1e-6));
    for polygon in &turned.polygons {
        for v in &polygon.vertices {
            assert!(polygon.plane.signed_distance(&v.pos).abs() < 1e-6);
        }
    }
}

#[test]
fn scene_mesh_buffers() {
    let result = &*SCENE;
    let buffers = result.mesh();

    assert_eq!(buffers.triangle_count(), result.triangle_count());
    assert_eq!(buffers.positions.len(), buffers.normals.len());
    assert_eq!(buffers.uvs.len() / 2, buffers.vertex_count());
    assert_eq!(buffers.interleaved().len(), buffers.vertex_count() * 8);
}

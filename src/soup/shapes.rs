//! Primitive generators. Every closed primitive is wound counter-clockwise
//! seen from outside, with outward normals.

use crate::float_types::{EPSILON, FRAC_PI_2, PI, Real, TAU};
use crate::soup::TriangleSoup;
use nalgebra::{Isometry3, Point3, Rotation3, Translation3, UnitQuaternion, Vector2, Vector3};

/// Octahedron faces, refined by [`TriangleSoup::sphere`].
const OCTAHEDRON_POSITIONS: [[Real; 3]; 6] = [
    [0.0, 0.0, -1.0],
    [1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];
const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 3, 4],
    [0, 4, 1],
    [5, 4, 3],
    [5, 1, 4],
    [2, 3, 0],
    [1, 2, 0],
    [3, 2, 5],
    [2, 1, 5],
];

/// Corner order of the two triangles of each cuboid face.
const CUBOID_FACE_TRIANGLES: [[usize; 6]; 2] = [[0, 3, 2, 0, 1, 3], [0, 3, 1, 0, 2, 3]];

impl TriangleSoup {
    /// An axis-aligned box spanning `[x1, x2] × [y1, y2] × [z1, z2]`:
    /// 12 triangles, two per face.
    ///
    /// ```rust
    /// # use pg_csg::soup::TriangleSoup;
    /// let cube = TriangleSoup::cuboid(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);
    /// assert_eq!(cube.triangle_count(), 12);
    /// ```
    pub fn cuboid(x1: Real, x2: Real, y1: Real, y2: Real, z1: Real, z2: Real) -> TriangleSoup {
        let faces: [([[Real; 3]; 4], [Real; 3], [[Real; 2]; 4]); 6] = [
            (
                [[x1, y1, z1], [x1, y1, z2], [x1, y2, z1], [x1, y2, z2]],
                [-1.0, 0.0, 0.0],
                [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]],
            ),
            (
                [[x2, y1, z1], [x2, y1, z2], [x2, y2, z1], [x2, y2, z2]],
                [1.0, 0.0, 0.0],
                [[1.0, 0.0], [0.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
            ),
            (
                [[x1, y2, z1], [x1, y2, z2], [x2, y2, z1], [x2, y2, z2]],
                [0.0, 1.0, 0.0],
                [[0.0, 1.0], [0.0, 0.0], [1.0, 1.0], [1.0, 0.0]],
            ),
            (
                [[x1, y1, z1], [x1, y1, z2], [x2, y1, z1], [x2, y1, z2]],
                [0.0, -1.0, 0.0],
                [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]],
            ),
            (
                [[x1, y1, z1], [x1, y2, z1], [x2, y1, z1], [x2, y2, z1]],
                [0.0, 0.0, -1.0],
                [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]],
            ),
            (
                [[x1, y1, z2], [x1, y2, z2], [x2, y1, z2], [x2, y2, z2]],
                [0.0, 0.0, 1.0],
                [[1.0, 0.0], [1.0, 1.0], [0.0, 0.0], [0.0, 1.0]],
            ),
        ];

        let mut soup = TriangleSoup::default();
        for (i, (corners, normal, uvs)) in faces.iter().enumerate() {
            for &j in &CUBOID_FACE_TRIANGLES[i % 2] {
                soup.positions.push(Point3::from(corners[j]));
                soup.normals.push(Vector3::from(*normal));
                soup.uvs.push(Vector2::from(uvs[j]));
            }
        }
        soup
    }

    /// A sphere made by subdividing an octahedron `detail` times and pushing
    /// the new vertices onto the sphere: `8 · 4^detail` triangles.
    ///
    /// Texture coordinates are spherical; triangles straddling the seam are
    /// wrapped to one side of it.
    pub fn sphere(detail: u32, radius: Real, center: Point3<Real>) -> TriangleSoup {
        let mut soup = TriangleSoup::default();
        for face in OCTAHEDRON_FACES {
            let corners = face.map(|i| Vector3::from(OCTAHEDRON_POSITIONS[i]));
            subdivide_sphere_face(&mut soup, detail, corners, radius, &center);
        }
        soup
    }

    /// A closed cylinder from `p1` to `p2` with `detail` segments around:
    /// each segment adds a triangle to both caps and two to the side.
    pub fn cylinder(p1: Point3<Real>, p2: Point3<Real>, radius: Real, detail: usize) -> TriangleSoup {
        cylinder_soup(p1, p2, radius, detail, false)
    }

    /// The side wall of [`TriangleSoup::cylinder`] without caps. Open, so
    /// not usable as a boolean operand.
    pub fn hollow_cylinder(
        p1: Point3<Real>,
        p2: Point3<Real>,
        radius: Real,
        detail: usize,
    ) -> TriangleSoup {
        cylinder_soup(p1, p2, radius, detail, true)
    }

    /// A cone with its apex at `p1` and its base disk of `radius` at `p2`.
    pub fn cone(p1: Point3<Real>, p2: Point3<Real>, radius: Real, detail: usize) -> TriangleSoup {
        let mut soup = TriangleSoup::default();
        if detail == 0 {
            return soup;
        }

        let (placement, length) = axis_placement(&p1, &p2);
        let (y1, y2) = (-length / 2.0, length / 2.0);
        // Side normals lean toward the apex
        let ny = -(FRAC_PI_2 - length.atan2(radius)).sin() * radius;

        for (a1, a2) in segment_angles(detail) {
            let (x1, z1) = (a1.cos() * radius, a1.sin() * radius);
            let (x2, z2) = (a2.cos() * radius, a2.sin() * radius);
            let n1 = Vector3::new(x1, ny, z1).normalize();
            let n2 = Vector3::new(x2, ny, z2).normalize();
            let uv1 = disk_uv(a1);
            let uv2 = disk_uv(a2);
            let middle = Vector2::new(0.5, 0.5);

            let local = [
                ([0.0, y2, 0.0], Vector3::y(), middle),
                ([x2, y2, z2], Vector3::y(), uv1),
                ([x1, y2, z1], Vector3::y(), uv2),
                ([0.0, y1, 0.0], -Vector3::y(), middle),
                ([x1, y2, z1], n1, uv2),
                ([x2, y2, z2], n2, uv1),
            ];
            for (position, normal, uv) in local {
                soup.positions.push(placement * Point3::from(position));
                soup.normals.push(placement.rotation * normal);
                soup.uvs.push(uv);
            }
        }
        soup
    }
}

fn subdivide_sphere_face(
    soup: &mut TriangleSoup,
    detail: u32,
    [a, b, c]: [Vector3<Real>; 3],
    radius: Real,
    center: &Point3<Real>,
) {
    if detail > 0 {
        let ab = ((a + b) / 2.0).normalize();
        let ac = ((a + c) / 2.0).normalize();
        let bc = ((b + c) / 2.0).normalize();
        subdivide_sphere_face(soup, detail - 1, [a, ab, ac], radius, center);
        subdivide_sphere_face(soup, detail - 1, [b, bc, ab], radius, center);
        subdivide_sphere_face(soup, detail - 1, [c, ac, bc], radius, center);
        subdivide_sphere_face(soup, detail - 1, [ab, bc, ac], radius, center);
        return;
    }

    let mut uvs = [a, b, c].map(|n| {
        Vector2::new(
            0.5 + n.x.atan2(n.z) / TAU,
            0.5 + n.y.clamp(-1.0, 1.0).asin() / PI,
        )
    });
    let straddles_seam = (uvs[0].x - uvs[1].x).abs() > 0.5
        || (uvs[0].x - uvs[2].x).abs() > 0.5
        || (uvs[1].x - uvs[2].x).abs() > 0.5;
    if straddles_seam {
        for uv in &mut uvs {
            uv.x = (uv.x + 1.0) % 1.0;
        }
    }

    for (n, uv) in [a, b, c].into_iter().zip(uvs) {
        soup.positions.push(center + n * radius);
        soup.normals.push(n);
        soup.uvs.push(uv);
    }
}

fn cylinder_soup(
    p1: Point3<Real>,
    p2: Point3<Real>,
    radius: Real,
    detail: usize,
    hollow: bool,
) -> TriangleSoup {
    let mut soup = TriangleSoup::default();
    if detail == 0 {
        return soup;
    }

    let (placement, length) = axis_placement(&p1, &p2);
    let (y1, y2) = (-length / 2.0, length / 2.0);

    for (a1, a2) in segment_angles(detail) {
        let (x1, z1) = (a1.cos() * radius, a1.sin() * radius);
        let (x2, z2) = (a2.cos() * radius, a2.sin() * radius);
        let n1 = Vector3::new(a1.cos(), 0.0, a1.sin());
        let n2 = Vector3::new(a2.cos(), 0.0, a2.sin());
        let uv1 = disk_uv(a1);
        let uv2 = disk_uv(a2);
        let middle = Vector2::new(0.5, 0.5);
        let u1 = a1 % TAU;
        let u2 = if a2 % TAU < u1 { a2 % TAU + TAU } else { a2 % TAU };

        let caps = [
            ([0.0, y1, 0.0], -Vector3::y(), middle),
            ([x1, y1, z1], -Vector3::y(), uv1),
            ([x2, y1, z2], -Vector3::y(), uv2),
            ([0.0, y2, 0.0], Vector3::y(), middle),
            ([x2, y2, z2], Vector3::y(), uv2),
            ([x1, y2, z1], Vector3::y(), uv1),
        ];
        let side = [
            ([x1, y1, z1], n1, Vector2::new(u1, 0.0)),
            ([x1, y2, z1], n1, Vector2::new(u1, 1.0)),
            ([x2, y1, z2], n2, Vector2::new(u2, 0.0)),
            ([x2, y1, z2], n2, Vector2::new(u2, 0.0)),
            ([x1, y2, z1], n1, Vector2::new(u1, 1.0)),
            ([x2, y2, z2], n2, Vector2::new(u2, 1.0)),
        ];

        let mut vertices = Vec::with_capacity(caps.len() + side.len());
        if !hollow {
            vertices.extend(caps);
        }
        vertices.extend(side);
        for (position, normal, uv) in vertices {
            soup.positions.push(placement * Point3::from(position));
            soup.normals.push(placement.rotation * normal);
            soup.uvs.push(uv);
        }
    }
    soup
}

/// Pairs of consecutive angles splitting the full circle into `detail` segments.
fn segment_angles(detail: usize) -> impl Iterator<Item = (Real, Real)> {
    let step = TAU / detail as Real;
    (0..detail).map(move |i| (i as Real * step, (i + 1) as Real * step))
}

fn disk_uv(angle: Real) -> Vector2<Real> {
    Vector2::new(0.5 + angle.cos() * 0.5, 0.5 + angle.sin() * 0.5)
}

/// Rigid motion taking the local frame (axis along +y, centered at the
/// origin) onto the segment `p1 → p2`, plus the segment length.
fn axis_placement(p1: &Point3<Real>, p2: &Point3<Real>) -> (Isometry3<Real>, Real) {
    let axis = p2 - p1;
    let length = axis.norm();
    let center = p1 + axis / 2.0;

    let rotation = if length < EPSILON {
        Rotation3::identity()
    } else {
        // rotation_between has no unique answer for opposite vectors
        Rotation3::rotation_between(&Vector3::y(), &axis)
            .unwrap_or_else(|| Rotation3::from_axis_angle(&Vector3::x_axis(), PI))
    };

    let placement = Isometry3::from_parts(
        Translation3::from(center.coords),
        UnitQuaternion::from_rotation_matrix(&rotation),
    );
    (placement, length)
}

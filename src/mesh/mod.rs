//! `Solid` struct and implementations of the `CSGOps` trait for `Solid`

use crate::errors::ValidationError;
use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::mesh::{
    bsp::{BspOps, DefaultBspOps, Node},
    plane::Plane,
    polygon::Polygon,
    vertex::Vertex,
};
use crate::soup::TriangleSoup;
use crate::traits::CSGOps;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use std::{fmt::Debug, sync::OnceLock};
use tracing::{debug, warn};

pub mod bsp;
pub mod buffers;
pub mod measure;
pub mod plane;
pub mod polygon;
pub mod shapes;
mod triangulated;
pub mod vertex;

#[cfg(feature = "hashmap")]
pub mod manifold;

pub use buffers::MeshBuffers;

/// Floats per vertex in the interleaved `position, normal, uv` layout.
pub const INTERLEAVED_STRIDE: usize = 8;

/// A closed polygonal solid, the unit of boolean composition.
///
/// Boolean operations borrow their operands and return a new `Solid`, so one
/// solid can appear in any number of expressions.
#[derive(Clone, Debug)]
pub struct Solid<S: Clone + Send + Sync + Debug> {
    /// Boundary polygons, wound counter-clockwise seen from outside
    pub polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,

    /// Metadata
    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync + Debug> Solid<S> {
    /// Build a Solid from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        Self::from_polygon_vec(polygons.to_vec(), None)
    }

    fn from_polygon_vec(polygons: Vec<Polygon<S>>, metadata: Option<S>) -> Self {
        Solid {
            polygons,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Build a Solid with one polygon per triangle.
    ///
    /// Triangles whose corners do not span a plane are skipped with a warning;
    /// real-world meshes routinely carry a few of them.
    pub fn from_triangles(triangles: &[[Vertex; 3]], metadata: Option<S>) -> Self {
        let mut polygons = Vec::with_capacity(triangles.len());
        let mut skipped = 0usize;

        for triangle in triangles {
            match Polygon::new(triangle.to_vec(), metadata.clone()) {
                Ok(polygon) => polygons.push(polygon),
                Err(error) => {
                    debug!("Skipping triangle: {}", error);
                    skipped += 1;
                },
            }
        }

        if skipped > 0 {
            warn!(
                "Skipped {} degenerate triangles out of {}",
                skipped,
                triangles.len()
            );
        }

        Self::from_polygon_vec(polygons, metadata)
    }

    /// Build a Solid from a [`TriangleSoup`], validating its attribute arrays
    /// first.
    pub fn from_soup(soup: &TriangleSoup, metadata: Option<S>) -> Result<Self, ValidationError> {
        soup.validate()?;
        Ok(Self::from_triangles(&soup.triangles(), metadata))
    }

    /// Build a Solid from interleaved `position(3), normal(3), uv(2)` floats,
    /// three vertices per triangle, as produced by [`MeshBuffers::interleaved`].
    pub fn from_interleaved(data: &[f32], metadata: Option<S>) -> Result<Self, ValidationError> {
        if data.len() % INTERLEAVED_STRIDE != 0 {
            return Err(ValidationError::Other(format!(
                "interleaved data holds {} floats, not a multiple of the stride {}",
                data.len(),
                INTERLEAVED_STRIDE
            )));
        }

        let vertices: Vec<Vertex> = data
            .chunks_exact(INTERLEAVED_STRIDE)
            .map(|c| {
                Vertex::with_uv(
                    Point3::new(c[0] as Real, c[1] as Real, c[2] as Real),
                    Vector3::new(c[3] as Real, c[4] as Real, c[5] as Real),
                    Vector2::new(c[6] as Real, c[7] as Real),
                )
            })
            .collect();

        if vertices.len() % 3 != 0 {
            return Err(ValidationError::IncompleteTriangle(vertices.len()));
        }

        let triangles: Vec<[Vertex; 3]> = vertices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect();

        Ok(Self::from_triangles(&triangles, metadata))
    }

    /// `true` when the solid has no polygons.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Helper to collect all vertices from the Solid.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.iter().copied())
            .collect()
    }

    /// `true` when the bounding boxes of the two solids share no point, so no
    /// polygon of one can reach the other.
    fn bounds_are_disjoint(&self, other: &Solid<S>) -> bool {
        !self.bounding_box().intersects(&other.bounding_box())
    }

    /// Union using an explicit set of BSP operations (e.g. a seeded random
    /// splitting strategy).
    pub fn union_with<O: BspOps<S>>(&self, other: &Solid<S>, ops: &O) -> Solid<S> {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }

        if self.bounds_are_disjoint(other) {
            let mut polygons = self.polygons.clone();
            polygons.extend_from_slice(&other.polygons);
            return Self::from_polygon_vec(polygons, self.metadata.clone());
        }

        // each tree holds its whole boundary
        let mut a = Node::new();
        let mut b = Node::new();
        ops.build(&mut a, &self.polygons);
        ops.build(&mut b, &other.polygons);

        ops.clip_to(&mut a, &b);
        ops.clip_to(&mut b, &a);
        ops.invert(&mut b);
        ops.clip_to(&mut b, &a);
        ops.invert(&mut b);
        let b_polygons = ops.all_polygons(&b);
        ops.build(&mut a, &b_polygons);

        let final_polys = ops.all_polygons(&a);

        debug!(
            "union: {} + {} polygons -> {}",
            self.polygons.len(),
            other.polygons.len(),
            final_polys.len()
        );

        Self::from_polygon_vec(final_polys, self.metadata.clone())
    }

    /// Difference using an explicit set of BSP operations.
    pub fn difference_with<O: BspOps<S>>(&self, other: &Solid<S>, ops: &O) -> Solid<S> {
        if self.is_empty() {
            return Self::from_polygon_vec(Vec::new(), self.metadata.clone());
        }
        if other.is_empty() {
            return self.clone();
        }

        if self.bounds_are_disjoint(other) {
            return self.clone();
        }

        let mut a = Node::new();
        let mut b = Node::new();
        ops.build(&mut a, &self.polygons);
        ops.build(&mut b, &other.polygons);

        ops.invert(&mut a);
        ops.clip_to(&mut a, &b);
        ops.clip_to(&mut b, &a);
        ops.invert(&mut b);
        ops.clip_to(&mut b, &a);
        ops.invert(&mut b);
        let b_polygons = ops.all_polygons(&b);
        ops.build(&mut a, &b_polygons);
        ops.invert(&mut a);

        let final_polys = ops.all_polygons(&a);

        debug!(
            "difference: {} - {} polygons -> {}",
            self.polygons.len(),
            other.polygons.len(),
            final_polys.len()
        );

        Self::from_polygon_vec(final_polys, self.metadata.clone())
    }

    /// Intersection using an explicit set of BSP operations.
    pub fn intersection_with<O: BspOps<S>>(&self, other: &Solid<S>, ops: &O) -> Solid<S> {
        if self.is_empty() || other.is_empty() || self.bounds_are_disjoint(other) {
            return Self::from_polygon_vec(Vec::new(), self.metadata.clone());
        }

        let mut a = Node::new();
        let mut b = Node::new();
        ops.build(&mut a, &self.polygons);
        ops.build(&mut b, &other.polygons);

        ops.invert(&mut a);
        ops.clip_to(&mut b, &a);
        ops.invert(&mut b);
        ops.clip_to(&mut a, &b);
        ops.clip_to(&mut b, &a);
        let b_polygons = ops.all_polygons(&b);
        ops.build(&mut a, &b_polygons);
        ops.invert(&mut a);

        let final_polys = ops.all_polygons(&a);

        debug!(
            "intersection: {} & {} polygons -> {}",
            self.polygons.len(),
            other.polygons.len(),
            final_polys.len()
        );

        Self::from_polygon_vec(final_polys, self.metadata.clone())
    }

    /// Triangulate each polygon in the Solid returning a Solid containing triangles
    pub fn triangulate(&self) -> Solid<S> {
        let triangles = self
            .polygons
            .iter()
            .flat_map(|poly| {
                poly.triangulate().into_iter().map(move |triangle| {
                    Polygon::with_plane(triangle.to_vec(), poly.plane, poly.metadata.clone())
                })
            })
            .collect::<Vec<_>>();

        Self::from_polygon_vec(triangles, self.metadata.clone())
    }

    /// Number of triangles the fan triangulation produces.
    pub fn triangle_count(&self) -> usize {
        self.polygons
            .iter()
            .map(|p| p.vertices.len().saturating_sub(2))
            .sum()
    }
}

impl<S: Clone + Send + Sync + Debug> CSGOps for Solid<S> {
    /// Returns a new empty Solid
    fn new() -> Self {
        Solid {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        }
    }

    /// Return a new Solid representing union of the two Solids.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Solid<S>) -> Solid<S> {
        self.union_with(other, &DefaultBspOps::<S>::new())
    }

    /// Return a new Solid representing difference of the two Solids.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Solid<S>) -> Solid<S> {
        self.difference_with(other, &DefaultBspOps::<S>::new())
    }

    /// Return a new Solid representing intersection of the two Solids.
    ///
    /// ```text
    /// let c = a.intersection(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn intersection(&self, other: &Solid<S>) -> Solid<S> {
        self.intersection_with(other, &DefaultBspOps::<S>::new())
    }

    /// Apply an arbitrary 3D transform (as a 4x4 matrix) to the solid.
    ///
    /// Normals go through the inverse transpose. Mirroring transforms reverse
    /// the winding so faces keep pointing outward.
    fn transform(&self, mat: &Matrix4<Real>) -> Solid<S> {
        let inverse = mat.try_inverse();
        let normal_matrix = match inverse {
            Some(inverse) => inverse.transpose(),
            None => {
                warn!("Transform matrix is not invertible; normals use the matrix itself");
                *mat
            },
        };
        let mirrored = mat.fixed_view::<3, 3>(0, 0).determinant() < 0.0;

        let mut polygons = Vec::with_capacity(self.polygons.len());
        let mut dropped = 0usize;

        for poly in &self.polygons {
            let mut vertices: Vec<Vertex> = poly
                .vertices
                .iter()
                .map(|v| {
                    let normal = normal_matrix.transform_vector(&v.normal);
                    Vertex::with_uv(
                        mat.transform_point(&v.pos),
                        normal.try_normalize(0.0).unwrap_or(normal),
                        v.uv,
                    )
                })
                .collect();
            if mirrored {
                vertices.reverse();
            }

            // carry the cached plane through the transform
            let plane = if inverse.is_some() {
                normal_matrix
                    .transform_vector(&poly.plane.normal)
                    .try_normalize(Real::EPSILON)
                    .map(|n| Plane::from_normal(n, n.dot(&vertices[0].pos.coords)))
            } else {
                Plane::from_vertices(&vertices).ok()
            };

            match plane {
                Some(plane) => {
                    polygons.push(Polygon::with_plane(vertices, plane, poly.metadata.clone()))
                },
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            warn!("Transform collapsed {} polygons; they were dropped", dropped);
        }

        Self::from_polygon_vec(polygons, self.metadata.clone())
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);

            for poly in &self.polygons {
                for v in &poly.vertices {
                    mins = mins.inf(&v.pos);
                    maxs = maxs.sup(&v.pos);
                }
            }

            // If still uninitialized (e.g., no polygons), return a trivial AABB at origin
            if mins.x > maxs.x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }

            Aabb::new(mins, maxs)
        })
    }

    /// Invalidates object's cached bounding box.
    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Invert this Solid (flip inside vs. outside)
    fn inverse(&self) -> Solid<S> {
        let mut solid = self.clone();
        for p in &mut solid.polygons {
            p.flip();
        }
        solid
    }
}

macro_rules! impl_boolean_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl<S: Clone + Send + Sync + Debug> std::ops::$trait<&Solid<S>> for &Solid<S> {
            type Output = Solid<S>;

            fn $method(self, rhs: &Solid<S>) -> Solid<S> {
                CSGOps::$op(self, rhs)
            }
        }

        impl<S: Clone + Send + Sync + Debug> std::ops::$trait<Solid<S>> for &Solid<S> {
            type Output = Solid<S>;

            fn $method(self, rhs: Solid<S>) -> Solid<S> {
                CSGOps::$op(self, &rhs)
            }
        }

        impl<S: Clone + Send + Sync + Debug> std::ops::$trait<&Solid<S>> for Solid<S> {
            type Output = Solid<S>;

            fn $method(self, rhs: &Solid<S>) -> Solid<S> {
                CSGOps::$op(&self, rhs)
            }
        }

        impl<S: Clone + Send + Sync + Debug> std::ops::$trait<Solid<S>> for Solid<S> {
            type Output = Solid<S>;

            fn $method(self, rhs: Solid<S>) -> Solid<S> {
                CSGOps::$op(&self, &rhs)
            }
        }
    };
}

// a | b, a & b, a - b
impl_boolean_operator!(BitOr, bitor, union);
impl_boolean_operator!(BitAnd, bitand, intersection);
impl_boolean_operator!(Sub, sub, difference);

// !a
impl<S: Clone + Send + Sync + Debug> std::ops::Not for &Solid<S> {
    type Output = Solid<S>;

    fn not(self) -> Solid<S> {
        self.inverse()
    }
}

impl<S: Clone + Send + Sync + Debug> std::ops::Not for Solid<S> {
    type Output = Solid<S>;

    fn not(mut self) -> Solid<S> {
        for p in &mut self.polygons {
            p.flip();
        }
        self
    }
}

//! Convex planar polygons

use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::Point3;

/// A polygon, defined by a list of vertices and the plane they lie on.
/// - `S` is the generic metadata type, stored as `Option<S>`. It is carried
///   through splitting untouched (material or group identity).
///
/// Vertices are assumed to be coplanar and convex; neither is verified.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<S: Clone> {
    /// Vertices defining the polygon's shape, counter-clockwise seen from the front
    pub vertices: Vec<Vertex>,

    /// The plane on which this polygon lies, derived from the first three vertices
    pub plane: Plane,

    /// Generic metadata associated with the polygon
    pub metadata: Option<S>,
}

impl<S: Clone> Polygon<S> {
    /// Create a polygon from vertices, deriving its plane from the first three.
    ///
    /// Fails when there are fewer than three vertices or the first three do not
    /// span a plane.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Result<Self, ValidationError> {
        let plane = Plane::from_vertices(&vertices)?;
        Ok(Polygon {
            vertices,
            plane,
            metadata,
        })
    }

    /// Create a polygon on a known plane. Used for pieces cut from a larger
    /// polygon, whose own first three vertices may be nearly collinear.
    pub const fn with_plane(vertices: Vec<Vertex>, plane: Plane, metadata: Option<S>) -> Self {
        Polygon {
            vertices,
            plane,
            metadata,
        }
    }

    /// Reverses winding order, flips vertex normals, and flips the plane normal
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Returns a flipped copy of this polygon.
    pub fn flipped(&self) -> Self {
        let mut polygon = self.clone();
        polygon.flip();
        polygon
    }

    /// Iterate over the polygon's edges `(v[i], v[i+1])`, wrapping around.
    pub fn edges(&self) -> impl Iterator<Item = (&Vertex, &Vertex)> {
        self.vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
    }

    /// Fan-triangulate around the first vertex: `(0, i-1, i)` for `i` in `2..n`.
    ///
    /// Correct for convex polygons, which BSP clipping preserves.
    ///
    /// ```rust
    /// # use nalgebra::{Point3, Vector3};
    /// # use pg_csg::mesh::{polygon::Polygon, vertex::Vertex};
    /// let square: Polygon<()> = Polygon::new(
    ///     vec![
    ///         Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
    ///         Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
    ///         Vertex::new(Point3::new(1.0, 1.0, 0.0), Vector3::z()),
    ///         Vertex::new(Point3::new(0.0, 1.0, 0.0), Vector3::z()),
    ///     ],
    ///     None,
    /// )
    /// .unwrap();
    /// let triangles = square.triangulate();
    /// assert_eq!(triangles.len(), 2);
    /// assert_eq!(triangles[1][0].pos, Point3::new(0.0, 0.0, 0.0));
    /// ```
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        let anchor = match self.vertices.first() {
            Some(v) => *v,
            None => return Vec::new(),
        };

        self.vertices
            .windows(2)
            .skip(1)
            .map(|pair| [anchor, pair[0], pair[1]])
            .collect()
    }

    /// Surface area, summed over the fan triangles.
    pub fn area(&self) -> Real {
        self.triangulate()
            .iter()
            .map(|[a, b, c]| (b.pos - a.pos).cross(&(c.pos - a.pos)).norm() * 0.5)
            .sum()
    }

    /// Axis-aligned bounding box of the polygon's vertices.
    pub fn bounding_box(&self) -> Aabb {
        let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
        let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
        for v in &self.vertices {
            mins = mins.inf(&v.pos);
            maxs = maxs.sup(&v.pos);
        }
        Aabb::new(mins, maxs)
    }

    /// Returns a reference to the metadata, if any.
    pub const fn metadata(&self) -> Option<&S> {
        self.metadata.as_ref()
    }

    /// Sets the metadata to the given value.
    pub fn set_metadata(&mut self, data: S) {
        self.metadata = Some(data);
    }
}

//! Oriented planes and the polygon splitting primitive the BSP tree is built on.

use crate::errors::ValidationError;
use crate::float_types::{Real, tolerance};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};

// Plane classification constants. A polygon's classification is the bitwise
// OR of its vertices' classifications.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// An oriented plane `normal · p = w`.
///
/// The front half-space is the one the normal points into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along normal (plane equation: n·p = w)
    pub w: Real,
}

impl Plane {
    /// Create a new plane from a normal vector and distance.
    /// The normal is normalized; a zero normal is kept as-is.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let normal = normal.try_normalize(0.0).unwrap_or(normal);
        Plane { normal, w }
    }

    /// Create a plane through three points.
    ///
    /// The normal direction follows the right-hand rule: `(b-a) × (c-a)`, so a
    /// counter-clockwise triangle seen from outside faces outward.
    ///
    /// Coincident or collinear points span no plane and are rejected instead of
    /// producing a NaN normal.
    ///
    /// ```rust
    /// # use nalgebra::Point3;
    /// # use pg_csg::mesh::plane::Plane;
    /// let plane = Plane::from_points(
    ///     Point3::new(0.0, 0.0, 1.0),
    ///     Point3::new(1.0, 0.0, 1.0),
    ///     Point3::new(0.0, 1.0, 1.0),
    /// )
    /// .unwrap();
    /// assert_eq!(plane.normal.z, 1.0);
    /// assert_eq!(plane.w, 1.0);
    ///
    /// let line = Plane::from_points(
    ///     Point3::origin(),
    ///     Point3::new(1.0, 1.0, 1.0),
    ///     Point3::new(2.0, 2.0, 2.0),
    /// );
    /// assert!(line.is_err());
    /// ```
    pub fn from_points(
        a: Point3<Real>,
        b: Point3<Real>,
        c: Point3<Real>,
    ) -> Result<Self, ValidationError> {
        let cross = (b - a).cross(&(c - a));
        let length_squared = cross.norm_squared();

        if !length_squared.is_finite() || length_squared < Real::EPSILON * Real::EPSILON {
            return Err(ValidationError::DegeneratePlane { a, b, c });
        }

        let normal = cross / length_squared.sqrt();
        Ok(Plane {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    /// Create a plane from a convex polygon's vertices.
    ///
    /// The fan triangles `(v0, vi, vi+1)` are tried in order, so collinear
    /// leading corners (a vertex inserted on the first edge) are skipped.
    pub fn from_vertices(vertices: &[Vertex]) -> Result<Self, ValidationError> {
        let [first, rest @ ..] = vertices else {
            return Err(ValidationError::TooFewVertices(0));
        };
        if rest.len() < 2 {
            return Err(ValidationError::TooFewVertices(vertices.len()));
        }

        let mut first_error = None;
        for pair in rest.windows(2) {
            match Self::from_points(first.pos, pair[0].pos, pair[1].pos) {
                Ok(plane) => return Ok(plane),
                Err(error) => {
                    first_error.get_or_insert(error);
                },
            }
        }
        Err(first_error.unwrap_or(ValidationError::TooFewVertices(vertices.len())))
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane (reverse normal and distance)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Return a flipped copy of this plane
    pub fn flipped(&self) -> Self {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance `normal · point − w`; positive in front.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as [`FRONT`], [`BACK`] or [`COPLANAR`] using the
    /// crate tolerance.
    #[inline]
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let eps = tolerance();
        let distance = self.signed_distance(point);
        if distance < -eps {
            BACK
        } else if distance > eps {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Classify a polygon with respect to the plane.
    /// Returns a bitmask of COPLANAR, FRONT, and BACK.
    pub fn classify_polygon<S: Clone>(&self, polygon: &Polygon<S>) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Splits a polygon by this plane, appending the results to four buckets.
    ///
    /// * Coplanar polygons go to `coplanar_front` when they face the same way as
    ///   the plane and to `coplanar_back` otherwise.
    /// * Polygons entirely on one side move whole into `front` or `back`.
    /// * Spanning polygons are cut along the plane; the intersection vertex of
    ///   every crossing edge is shared by both pieces. Pieces left with fewer
    ///   than three vertices are dropped.
    ///
    /// Cut pieces keep the parent's plane and metadata.
    pub fn split_polygon_into<S: Clone>(
        &self,
        polygon: Polygon<S>,
        coplanar_front: &mut Vec<Polygon<S>>,
        coplanar_back: &mut Vec<Polygon<S>>,
        front: &mut Vec<Polygon<S>>,
        back: &mut Vec<Polygon<S>>,
    ) {
        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon);
                } else {
                    coplanar_back.push(polygon);
                }
            },
            FRONT => front.push(polygon),
            BACK => back.push(polygon),
            _ => {
                let vertex_count = polygon.vertices.len();
                let mut front_vertices = Vec::with_capacity(vertex_count + 1);
                let mut back_vertices = Vec::with_capacity(vertex_count + 1);

                for i in 0..vertex_count {
                    let j = (i + 1) % vertex_count;
                    let (ti, tj) = (types[i], types[j]);
                    let vi = &polygon.vertices[i];
                    let vj = &polygon.vertices[j];

                    if ti != BACK {
                        front_vertices.push(*vi);
                    }
                    if ti != FRONT {
                        back_vertices.push(*vi);
                    }

                    if (ti | tj) == SPANNING {
                        // ti and tj lie on opposite sides, so the denominator
                        // is at least 2·tolerance in magnitude.
                        let t = (self.w - self.normal.dot(&vi.pos.coords))
                            / self.normal.dot(&(vj.pos - vi.pos));
                        let intersection = vi.interpolate(vj, t);
                        front_vertices.push(intersection);
                        back_vertices.push(intersection);
                    }
                }

                if front_vertices.len() >= 3 {
                    front.push(Polygon::with_plane(
                        front_vertices,
                        polygon.plane,
                        polygon.metadata.clone(),
                    ));
                }
                if back_vertices.len() >= 3 {
                    back.push(Polygon::with_plane(
                        back_vertices,
                        polygon.plane,
                        polygon.metadata,
                    ));
                }
            },
        }
    }

    /// Splits a polygon by this plane, returning four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon<S: Clone>(
        &self,
        polygon: &Polygon<S>,
    ) -> (
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
    ) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        self.split_polygon_into(
            polygon.clone(),
            &mut coplanar_front,
            &mut coplanar_back,
            &mut front,
            &mut back,
        );

        (coplanar_front, coplanar_back, front, back)
    }
}

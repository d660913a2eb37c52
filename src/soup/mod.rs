//! Raw triangle soups: the construction input of a [`Solid`](crate::mesh::Solid)
//!
//! A soup is three parallel attribute arrays, three consecutive vertices per
//! triangle, exactly as a renderer would upload them.

use crate::errors::ValidationError;
use crate::float_types::Real;
use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::mesh::vertex::Vertex;
use crate::triangulated::Triangulated3D;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use std::ops::{Add, AddAssign};

pub mod shapes;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleSoup {
    pub positions: Vec<Point3<Real>>,
    pub normals: Vec<Vector3<Real>>,
    /// Either one texture coordinate per position or empty
    pub uvs: Vec<Vector2<Real>>,
}

impl TriangleSoup {
    pub const fn new(
        positions: Vec<Point3<Real>>,
        normals: Vec<Vector3<Real>>,
        uvs: Vec<Vector2<Real>>,
    ) -> Self {
        TriangleSoup {
            positions,
            normals,
            uvs,
        }
    }

    /// Append one triangle.
    pub fn push_triangle(&mut self, triangle: [Vertex; 3]) {
        for v in triangle {
            self.positions.push(v.pos);
            self.normals.push(v.normal);
            self.uvs.push(v.uv);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check that the attribute arrays agree and hold whole triangles of
    /// finite coordinates.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let expected = self.positions.len();

        if self.normals.len() != expected {
            return Err(ValidationError::AttributeCount {
                attribute: "normals",
                expected,
                found: self.normals.len(),
            });
        }
        if !self.uvs.is_empty() && self.uvs.len() != expected {
            return Err(ValidationError::AttributeCount {
                attribute: "uvs",
                expected,
                found: self.uvs.len(),
            });
        }
        if expected % 3 != 0 {
            return Err(ValidationError::IncompleteTriangle(expected));
        }
        if let Some(bad) = self
            .positions
            .iter()
            .find(|p| p.coords.iter().any(|c| !c.is_finite()))
        {
            return Err(ValidationError::InvalidCoordinate(*bad));
        }

        Ok(())
    }

    /// Group the attribute arrays into triangles. A trailing partial
    /// triangle is ignored; missing uvs read as zero.
    pub fn triangles(&self) -> Vec<[Vertex; 3]> {
        let vertex = |i: usize| {
            Vertex::with_uv(
                self.positions[i],
                self.normals.get(i).copied().unwrap_or_else(Vector3::zeros),
                self.uvs.get(i).copied().unwrap_or_else(Vector2::zeros),
            )
        };

        (0..self.triangle_count())
            .map(|t| [vertex(3 * t), vertex(3 * t + 1), vertex(3 * t + 2)])
            .collect()
    }

    /// Transform positions by `matrix` and normals by its inverse transpose.
    pub fn transform(&self, matrix: &Matrix4<Real>) -> TriangleSoup {
        let normal_matrix = matrix
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or(*matrix);

        TriangleSoup {
            positions: self
                .positions
                .iter()
                .map(|p| matrix.transform_point(p))
                .collect(),
            normals: self
                .normals
                .iter()
                .map(|n| {
                    let n = normal_matrix.transform_vector(n);
                    n.try_normalize(0.0).unwrap_or(n)
                })
                .collect(),
            uvs: self.uvs.clone(),
        }
    }

    /// Reverse the winding of every triangle and negate the normals, turning
    /// the surface inside out.
    pub fn reverse_winding(&self) -> TriangleSoup {
        let mut soup = self.clone();
        for chunk in soup.positions.chunks_exact_mut(3) {
            chunk.swap(1, 2);
        }
        for chunk in soup.normals.chunks_exact_mut(3) {
            chunk.swap(1, 2);
        }
        for n in &mut soup.normals {
            *n = -*n;
        }
        for chunk in soup.uvs.chunks_exact_mut(3) {
            chunk.swap(1, 2);
        }
        soup
    }

    /// Bounds of all positions; a point at the origin when empty.
    pub fn bounding_box(&self) -> Aabb {
        let Some(first) = self.positions.first() else {
            return Aabb::new(Point3::origin(), Point3::origin());
        };
        let (mins, maxs) = self
            .positions
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
        Aabb::new(mins, maxs)
    }

    /// Translate so that the bounding-box center sits at the origin.
    pub fn center(&self) -> TriangleSoup {
        let offset = self.bounding_box().center().coords;
        TriangleSoup {
            positions: self.positions.iter().map(|p| p - offset).collect(),
            normals: self.normals.clone(),
            uvs: self.uvs.clone(),
        }
    }
}

impl AddAssign<&TriangleSoup> for TriangleSoup {
    fn add_assign(&mut self, other: &TriangleSoup) {
        // Keep uvs aligned with positions when only one side carries them
        if self.uvs.is_empty() != other.uvs.is_empty() {
            self.uvs.resize(self.positions.len(), Vector2::zeros());
        }
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        if other.uvs.is_empty() {
            if !self.uvs.is_empty() {
                self.uvs.resize(self.positions.len(), Vector2::zeros());
            }
        } else {
            self.uvs.extend_from_slice(&other.uvs);
        }
    }
}

impl Add for TriangleSoup {
    type Output = TriangleSoup;

    fn add(mut self, other: TriangleSoup) -> TriangleSoup {
        self += &other;
        self
    }
}

impl Add<&TriangleSoup> for &TriangleSoup {
    type Output = TriangleSoup;

    fn add(self, other: &TriangleSoup) -> TriangleSoup {
        let mut soup = self.clone();
        soup += other;
        soup
    }
}

impl Triangulated3D for TriangleSoup {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for triangle in self.triangles() {
            f(triangle);
        }
    }
}

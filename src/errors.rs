//! Validation errors

use crate::float_types::Real;
use nalgebra::Point3;

/// All the possible validation issues we might encounter while turning raw
/// triangle data into solids.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Three points that do not span a plane (coincident or collinear)
    #[error("(DegeneratePlane) Points {a}, {b}, {c} do not define a plane")]
    DegeneratePlane {
        a: Point3<Real>,
        b: Point3<Real>,
        c: Point3<Real>,
    },
    /// A polygon has fewer than the minimal three vertices
    #[error("(TooFewVertices) A polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    /// A coordinate is NaN or infinite
    #[error("(InvalidCoordinate) The coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point3<Real>),
    /// Parallel attribute arrays disagree on the vertex count
    #[error("(AttributeCount) {attribute} holds {found} values, expected {expected}")]
    AttributeCount {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
    /// The vertex count is not a multiple of three
    #[error("(IncompleteTriangle) {0} vertices do not form whole triangles")]
    IncompleteTriangle(usize),
    /// In general, anything else
    #[error("{0}")]
    Other(String),
}

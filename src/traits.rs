use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::{EPSILON, Real};
use crate::mesh::plane::Plane;
use nalgebra::{Matrix3, Matrix4, Rotation3, Translation3, Vector3};

/// Boolean composition plus rigid and affine placement.
///
/// Every operation borrows its operands and returns a fresh value.
pub trait CSGOps: Sized + Clone {
    fn new() -> Self;
    fn union(&self, other: &Self) -> Self;
    fn difference(&self, other: &Self) -> Self;
    fn intersection(&self, other: &Self) -> Self;
    fn transform(&self, matrix: &Matrix4<Real>) -> Self;
    fn bounding_box(&self) -> Aabb;
    fn invalidate_bounding_box(&mut self);
    fn inverse(&self) -> Self;

    /// Move by `offset`.
    fn translate_vector(&self, offset: Vector3<Real>) -> Self {
        self.transform(&Translation3::from(offset).to_homogeneous())
    }

    /// Move by `(x, y, z)`.
    fn translate(&self, x: Real, y: Real, z: Real) -> Self {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Move so the bounding-box center lands on the origin.
    fn center(&self) -> Self {
        self.translate_vector(-self.bounding_box().center().coords)
    }

    /// Rotate by Euler angles in degrees, about x first, then y, then z.
    fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Self {
        let rotation = Rotation3::from_euler_angles(
            x_deg.to_radians(),
            y_deg.to_radians(),
            z_deg.to_radians(),
        );
        self.transform(&rotation.to_homogeneous())
    }

    /// Scale along each axis. Negative factors mirror.
    fn scale(&self, sx: Real, sy: Real, sz: Real) -> Self {
        self.transform(&Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz)))
    }

    /// Reflect about `plane`. A plane without a usable normal leaves the
    /// shape unchanged.
    fn mirror(&self, plane: Plane) -> Self {
        let length = plane.normal().norm();
        if length < EPSILON {
            return self.clone();
        }
        let normal = plane.normal() / length;
        let on_plane = normal * (plane.offset() / length);

        // Householder reflection I - 2nnᵀ about the plane through `on_plane`
        let householder = Matrix3::identity() - 2.0 * normal * normal.transpose();
        let reflection = Translation3::from(on_plane).to_homogeneous()
            * householder.to_homogeneous()
            * Translation3::from(-on_plane).to_homogeneous();

        self.transform(&reflection)
    }
}

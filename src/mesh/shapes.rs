//! Primitive solids

use crate::float_types::Real;
use crate::mesh::Solid;
use crate::soup::TriangleSoup;
use nalgebra::Point3;
use std::fmt::Debug;

impl<S: Clone + Send + Sync + Debug> Solid<S> {
    /// Build a solid from generated soup; generators never emit malformed
    /// attribute arrays, so only degenerate triangles can be dropped.
    fn from_generated(soup: TriangleSoup, metadata: Option<S>) -> Self {
        Self::from_triangles(&soup.triangles(), metadata)
    }

    /// An axis-aligned box spanning `[x1, x2] × [y1, y2] × [z1, z2]`.
    ///
    /// ```rust
    /// # use pg_csg::mesh::Solid;
    /// let cube = Solid::<()>::cuboid(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0, None);
    /// assert_eq!(cube.polygons.len(), 12);
    /// assert!((cube.volume() - 8.0).abs() < 1e-9);
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn cuboid(
        x1: Real,
        x2: Real,
        y1: Real,
        y2: Real,
        z1: Real,
        z2: Real,
        metadata: Option<S>,
    ) -> Self {
        Self::from_generated(TriangleSoup::cuboid(x1, x2, y1, y2, z1, z2), metadata)
    }

    /// A subdivided-octahedron sphere with `8 · 4^detail` triangles.
    pub fn sphere(detail: u32, radius: Real, center: Point3<Real>, metadata: Option<S>) -> Self {
        Self::from_generated(TriangleSoup::sphere(detail, radius, center), metadata)
    }

    /// A closed cylinder from `p1` to `p2` with `detail` segments.
    pub fn cylinder(
        p1: Point3<Real>,
        p2: Point3<Real>,
        radius: Real,
        detail: usize,
        metadata: Option<S>,
    ) -> Self {
        Self::from_generated(TriangleSoup::cylinder(p1, p2, radius, detail), metadata)
    }

    /// A cone with its apex at `p1` and base disk at `p2`.
    pub fn cone(
        p1: Point3<Real>,
        p2: Point3<Real>,
        radius: Real,
        detail: usize,
        metadata: Option<S>,
    ) -> Self {
        Self::from_generated(TriangleSoup::cone(p1, p2, radius, detail), metadata)
    }
}

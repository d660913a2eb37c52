//! Enclosed volume and surface area

use crate::float_types::Real;
use crate::mesh::Solid;
use std::fmt::Debug;

impl<S: Clone + Send + Sync + Debug> Solid<S> {
    /// Signed enclosed volume by the divergence theorem:
    ///
    /// ```text
    /// V = Σ (a · (b × c)) / 6
    /// ```
    ///
    /// summed over the fan triangles. Positive for a closed, outward-facing
    /// surface, negative once inverted. Meaningless for open surfaces.
    pub fn volume(&self) -> Real {
        self.polygons
            .iter()
            .flat_map(|p| p.triangulate())
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)))
            .sum::<Real>()
            / 6.0
    }

    /// Total area of all polygons.
    pub fn surface_area(&self) -> Real {
        self.polygons.iter().map(|p| p.area()).sum()
    }
}

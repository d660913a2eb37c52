//! Flat vertex arrays for a renderer

use crate::mesh::Solid;
use crate::mesh::INTERLEAVED_STRIDE;
use crate::triangulated::Triangulated3D;
use std::fmt::Debug;

/// Three parallel flat arrays ready for upload to a GPU vertex buffer:
/// `positions` (xyz), `normals` (xyz) and `uvs` (uv), three vertices per
/// triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
}

impl MeshBuffers {
    /// Collect the triangles of any triangulated shape.
    pub fn from_triangulated<T: Triangulated3D>(shape: &T) -> Self {
        let mut buffers = MeshBuffers::default();

        shape.visit_triangles(|tri| {
            #[allow(clippy::unnecessary_cast)]
            for v in &tri {
                buffers
                    .positions
                    .extend([v.pos.x as f32, v.pos.y as f32, v.pos.z as f32]);
                buffers
                    .normals
                    .extend([v.normal.x as f32, v.normal.y as f32, v.normal.z as f32]);
                buffers.uvs.extend([v.uv.x as f32, v.uv.y as f32]);
            }
        });

        buffers
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleave into one `position(3), normal(3), uv(2)` array per vertex.
    pub fn interleaved(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.vertex_count() * INTERLEAVED_STRIDE);
        for ((position, normal), uv) in self
            .positions
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .zip(self.uvs.chunks_exact(2))
        {
            data.extend_from_slice(position);
            data.extend_from_slice(normal);
            data.extend_from_slice(uv);
        }
        data
    }
}

impl<S: Clone + Send + Sync + Debug> Solid<S> {
    /// Fan-triangulate every polygon into flat position/normal/uv arrays.
    ///
    /// ```rust
    /// # use pg_csg::mesh::Solid;
    /// let cube = Solid::<()>::cuboid(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0, None);
    /// let buffers = cube.mesh();
    /// assert_eq!(buffers.triangle_count(), 12);
    /// assert_eq!(buffers.positions.len(), 12 * 3 * 3);
    /// assert_eq!(buffers.uvs.len(), 12 * 3 * 2);
    /// ```
    pub fn mesh(&self) -> MeshBuffers {
        MeshBuffers::from_triangulated(self)
    }
}

use crate::mesh::Solid;
use crate::mesh::vertex::Vertex;
use crate::triangulated::Triangulated3D;

impl<S: Clone + Send + Sync + std::fmt::Debug> Triangulated3D for Solid<S> {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for poly in &self.polygons {
            for tri in poly.triangulate() {
                f(tri);
            }
        }
    }
}

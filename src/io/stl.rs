use crate::float_types::Real;
use crate::io::IoError;
use crate::mesh::Solid;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use crate::soup::TriangleSoup;
use crate::triangulated::Triangulated3D;
use nalgebra::{Point3, Vector2, Vector3};
use std::fmt::Debug;
use std::io::{Cursor, Read, Seek};
use tracing::{debug, warn};

/// Facet normal from the triangle's corners, falling back to the first
/// vertex normal for slivers.
fn facet_normal(tri: &[Vertex; 3]) -> Vector3<Real> {
    Plane::from_points(tri[0].pos, tri[1].pos, tri[2].pos)
        .map(|plane| plane.normal)
        .unwrap_or(tri[0].normal)
}

/// Export to ASCII STL
/// Convert any triangulated shape to an **ASCII STL** string with the given `name`.
///
/// ```rust
/// # use pg_csg::mesh::Solid;
/// let solid = Solid::<()>::cuboid(0.0, 1.0, 0.0, 1.0, 0.0, 1.0, None);
/// let text = solid.to_stl_ascii("my_solid");
/// assert!(text.starts_with("solid my_solid"));
/// assert_eq!(text.matches("facet normal").count(), 12);
/// ```
pub fn to_stl_ascii<T: Triangulated3D>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("solid {name}\n"));

    shape.visit_triangles(|tri| {
        let n = facet_normal(&tri);
        out.push_str(&format!(
            "  facet normal {:.6} {:.6} {:.6}\n",
            n.x, n.y, n.z
        ));
        out.push_str("    outer loop\n");
        for v in &tri {
            let p = v.pos;
            out.push_str(&format!(
                "      vertex {:.6} {:.6} {:.6}\n",
                p.x, p.y, p.z
            ));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });

    out.push_str(&format!("endsolid {name}\n"));
    out
}

/// Export to BINARY STL (returns `Vec<u8>`)
///
/// The resulting `Vec<u8>` can then be written to a file or handled in memory:
///
/// ```rust
/// # use pg_csg::mesh::Solid;
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let object = Solid::<()>::cuboid(0.0, 1.0, 0.0, 1.0, 0.0, 1.0, None);
/// let bytes = object.to_stl_binary("my_solid")?;
/// assert_eq!(bytes.len(), 84 + 12 * 50);
/// # Ok(())
/// # }
/// ```
pub fn to_stl_binary<T: Triangulated3D>(shape: &T, _name: &str) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::new();

    shape.visit_triangles(|tri| {
        let n = facet_normal(&tri);
        #[allow(clippy::unnecessary_cast)]
        {
            triangles.push(Triangle {
                normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: tri.map(|v| {
                    let p = v.pos;
                    Vertex::new([p.x as f32, p.y as f32, p.z as f32])
                }),
            });
        }
    });

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

impl TriangleSoup {
    /// Read a binary or ASCII STL stream.
    ///
    /// Every facet gets its stored normal on all three corners. A facet stored
    /// with a zero normal gets one computed from its corners, and is skipped
    /// when its corners do not span a plane.
    pub fn from_stl<R: Read + Seek>(reader: &mut R) -> Result<TriangleSoup, IoError> {
        let stl = stl_io::read_stl(reader)?;
        debug!(
            "Loaded STL: {} vertices, {} faces",
            stl.vertices.len(),
            stl.faces.len()
        );

        let mut soup = TriangleSoup::default();
        let mut skipped = 0usize;

        for face in &stl.faces {
            let mut corners = [Point3::origin(); 3];
            for (corner, &index) in corners.iter_mut().zip(&face.vertices) {
                let v = stl.vertices.get(index).ok_or_else(|| {
                    IoError::MalformedInput(format!(
                        "face references vertex {index} of {}",
                        stl.vertices.len()
                    ))
                })?;
                *corner = Point3::new(v.0[0] as Real, v.0[1] as Real, v.0[2] as Real);
            }

            let stored = Vector3::new(
                face.normal.0[0] as Real,
                face.normal.0[1] as Real,
                face.normal.0[2] as Real,
            );

            // a zero stored normal is recomputed; a facet with neither is skipped
            let normal = match stored.try_normalize(0.0) {
                Some(normal) => normal,
                None => match Plane::from_points(corners[0], corners[1], corners[2]) {
                    Ok(plane) => plane.normal,
                    Err(_) => {
                        skipped += 1;
                        continue;
                    },
                },
            };

            for corner in corners {
                soup.positions.push(corner);
                soup.normals.push(normal);
                soup.uvs.push(Vector2::zeros());
            }
        }

        if skipped > 0 {
            warn!("Skipped {} degenerate STL facets", skipped);
        }

        Ok(soup)
    }

    /// Read STL data held in memory.
    pub fn from_stl_bytes(bytes: &[u8]) -> Result<TriangleSoup, IoError> {
        Self::from_stl(&mut Cursor::new(bytes))
    }

    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self, name: &str) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self, name)
    }
}

impl<S: Clone + Debug + Send + Sync> Solid<S> {
    /// Read a binary or ASCII STL stream into a solid.
    pub fn from_stl<R: Read + Seek>(reader: &mut R, metadata: Option<S>) -> Result<Self, IoError> {
        let soup = TriangleSoup::from_stl(reader)?;
        Ok(Self::from_triangles(&soup.triangles(), metadata))
    }

    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self, name: &str) -> std::io::Result<Vec<u8>> {
        self::to_stl_binary(self, name)
    }
}

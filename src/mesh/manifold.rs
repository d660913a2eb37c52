//! Watertightness checks and T-junction repair

use crate::float_types::{Real, tolerance};
use crate::mesh::Solid;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use std::fmt::Debug;
use tracing::debug;

const QUANTIZATION_FACTOR: Real = 1e7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct QuantizedPoint(i64, i64, i64);

fn quantize_point(p: &Point3<Real>) -> QuantizedPoint {
    QuantizedPoint(
        (p.x * QUANTIZATION_FACTOR).round() as i64,
        (p.y * QUANTIZATION_FACTOR).round() as i64,
        (p.z * QUANTIZATION_FACTOR).round() as i64,
    )
}

impl<S: Clone + Debug + Send + Sync> Solid<S> {
    /// Count the undirected triangle edges not shared by exactly two
    /// triangles.
    ///
    /// Uses a `QUANTIZATION_FACTOR` for `Real` coordinates
    pub fn open_edge_count(&self) -> usize {
        let mut edge_counts: HashMap<(QuantizedPoint, QuantizedPoint), u32> = HashMap::new();

        for poly in &self.polygons {
            for tri in poly.triangulate() {
                // We'll look at edges (0->1, 1->2, 2->0).
                for &(i0, i1) in &[(0, 1), (1, 2), (2, 0)] {
                    let p0 = quantize_point(&tri[i0].pos);
                    let p1 = quantize_point(&tri[i1].pos);

                    // Order them so (p0, p1) and (p1, p0) become the same key
                    let key = if p0 < p1 { (p0, p1) } else { (p1, p0) };
                    *edge_counts.entry(key).or_insert(0) += 1;
                }
            }
        }

        edge_counts.values().filter(|&&count| count != 2).count()
    }

    /// Checks if the Solid is closed
    ///
    /// ### Returns
    /// Returns `true` if every edge of the fan triangulation appears exactly 2 times
    ///
    /// BSP clipping leaves T-junctions wherever one face was cut and its
    /// neighbour was not; run [`Solid::close_seams`] first on boolean results.
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count() == 0
    }

    /// Insert into every polygon edge the vertices of other polygons that lie
    /// on that edge's interior, so that neighbouring faces share edges exactly.
    ///
    /// Inserted vertices take the position of the vertex they match and
    /// interpolate normal and uv along the edge. Polygon planes are kept.
    pub fn close_seams(&self) -> Solid<S> {
        let eps = tolerance();

        // Unique positions, sorted by x for range lookups
        let mut seen = HashSet::new();
        let mut points: Vec<Point3<Real>> = self
            .polygons
            .iter()
            .flat_map(|p| p.vertices.iter().map(|v| v.pos))
            .filter(|p| seen.insert(quantize_point(p)))
            .collect();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));

        let mut inserted = 0usize;
        let polygons: Vec<Polygon<S>> = self
            .polygons
            .iter()
            .map(|poly| {
                let mut vertices = Vec::with_capacity(poly.vertices.len());
                for (a, b) in poly.edges() {
                    vertices.push(*a);
                    let on_edge = points_on_edge(&points, a, b, eps);
                    inserted += on_edge.len();
                    vertices.extend(on_edge);
                }
                Polygon::with_plane(vertices, poly.plane, poly.metadata.clone())
            })
            .collect();

        debug!("close_seams: inserted {} vertices", inserted);

        let mut solid = self.clone();
        solid.polygons = polygons;
        solid
    }
}

/// Points strictly inside segment `a→b` (within `eps` of the segment and not
/// quantizing onto either end), as vertices ordered from `a` to `b`.
fn points_on_edge(points: &[Point3<Real>], a: &Vertex, b: &Vertex, eps: Real) -> Vec<Vertex> {
    let direction = b.pos - a.pos;
    let length_squared = direction.norm_squared();
    if length_squared <= eps * eps {
        return Vec::new();
    }

    let min_x = a.pos.x.min(b.pos.x) - eps;
    let max_x = a.pos.x.max(b.pos.x) + eps;
    let start = points.partition_point(|p| p.x < min_x);
    let ends = [quantize_point(&a.pos), quantize_point(&b.pos)];

    let mut found: Vec<(Real, Point3<Real>)> = points[start..]
        .iter()
        .take_while(|p| p.x <= max_x)
        .filter_map(|p| {
            let t = (p - a.pos).dot(&direction) / length_squared;
            let closest = a.pos + direction * t;
            let interior = t > 0.0 && t < 1.0 && !ends.contains(&quantize_point(p));
            (interior && (p - closest).norm() < eps).then_some((t, *p))
        })
        .collect();
    found.sort_by(|x, y| x.0.total_cmp(&y.0));

    found
        .into_iter()
        .map(|(t, p)| {
            let mut vertex = a.interpolate(b, t);
            vertex.pos = p;
            vertex
        })
        .collect()
}

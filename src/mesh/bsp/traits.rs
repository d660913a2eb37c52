//! Traits defining BSP tree operations for dependency inversion

use crate::float_types::Real;
use crate::mesh::bsp::node::Node;
use crate::mesh::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::mesh::polygon::Polygon;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

/// Core BSP operations trait - implements algorithms on BSP nodes
pub trait BspOps<S: Clone + Send + Sync> {
    /// Invert all polygons in the BSP tree
    fn invert(&self, node: &mut Node<S>);

    /// Remove all parts of `polygons` that are inside this BSP tree
    fn clip_polygons(&self, node: &Node<S>, polygons: &[Polygon<S>]) -> Vec<Polygon<S>>;

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    fn clip_to(&self, node: &mut Node<S>, other: &Node<S>);

    /// Build a BSP tree from the given polygons
    fn build(&self, node: &mut Node<S>, polygons: &[Polygon<S>]);

    /// Return all polygons in this BSP tree
    fn all_polygons(&self, node: &Node<S>) -> Vec<Polygon<S>>;
}

/// Trait for picking the plane a BSP node splits on
pub trait SplittingPlaneStrategy<S: Clone> {
    /// Pick a splitting plane from a set of polygons, `None` only when the
    /// set is empty.
    fn pick_best_splitting_plane(&self, polygons: &[Polygon<S>]) -> Option<Plane>;
}

/// Splits on the first polygon's plane. Deterministic and cheap; the tree
/// shape follows the input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstPolygonStrategy;

impl<S: Clone> SplittingPlaneStrategy<S> for FirstPolygonStrategy {
    fn pick_best_splitting_plane(&self, polygons: &[Polygon<S>]) -> Option<Plane> {
        polygons.first().map(|p| p.plane)
    }
}

/// Scores a sample of candidate planes by how many polygons they would cut
/// and how unevenly they would divide the rest, and picks the cheapest.
#[derive(Debug, Clone)]
pub struct BalancedSplittingStrategy {
    pub span_weight: Real,
    pub balance_weight: Real,
    pub sample_size: usize,
}

impl Default for BalancedSplittingStrategy {
    fn default() -> Self {
        Self {
            span_weight: 8.0,
            balance_weight: 1.0,
            sample_size: 20,
        }
    }
}

impl<S: Clone> SplittingPlaneStrategy<S> for BalancedSplittingStrategy {
    fn pick_best_splitting_plane(&self, polygons: &[Polygon<S>]) -> Option<Plane> {
        let mut best_plane = polygons.first()?.plane;
        let mut best_score = Real::MAX;

        // Take a sample of polygons as candidate planes
        let sample_size = polygons.len().min(self.sample_size.max(1));

        polygons.iter().take(sample_size).for_each(|p| {
            let plane = &p.plane;
            let (num_front, num_back, num_spanning) = polygons
                .iter()
                .map(|poly| match plane.classify_polygon(poly) {
                    COPLANAR => (0, 0, 0),
                    FRONT => (1, 0, 0),
                    BACK => (0, 1, 0),
                    _ => (0, 0, 1),
                })
                .fold((0i64, 0i64, 0i64), |acc, x| {
                    (acc.0 + x.0, acc.1 + x.1, acc.2 + x.2)
                });

            let score = self.span_weight * num_spanning as Real
                + self.balance_weight * ((num_front - num_back) as Real).abs();

            if score < best_score {
                best_score = score;
                best_plane = *plane;
            }
        });

        Some(best_plane)
    }
}

/// Splits on a uniformly random polygon's plane.
///
/// Guards against skewed trees on structured input. The generator is seeded
/// explicitly so trees are reproducible; the resulting geometry does not
/// depend on the seed beyond floating point noise.
#[derive(Debug)]
pub struct RandomSplittingStrategy {
    rng: Mutex<StdRng>,
}

impl RandomSplittingStrategy {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl<S: Clone> SplittingPlaneStrategy<S> for RandomSplittingStrategy {
    fn pick_best_splitting_plane(&self, polygons: &[Polygon<S>]) -> Option<Plane> {
        if polygons.is_empty() {
            return None;
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let index = rng.random_range(0..polygons.len());
        Some(polygons[index].plane)
    }
}

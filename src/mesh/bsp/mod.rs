//! Binary Space Partitioning (BSP) tree implementation
//!
//! This module provides BSP tree operations with dependency inversion,
//! allowing for different algorithm implementations (serial/parallel) and
//! different splitting-plane strategies.

pub mod node;
pub mod serial;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use node::Node;
pub use serial::SerialBspOps;
pub use traits::{
    BalancedSplittingStrategy, BspOps, FirstPolygonStrategy, RandomSplittingStrategy,
    SplittingPlaneStrategy,
};

#[cfg(feature = "parallel")]
pub use parallel::ParallelBspOps;

/// The operations used by [`Node`]'s convenience methods and by the boolean
/// operators on [`Solid`](crate::mesh::Solid).
#[cfg(not(feature = "parallel"))]
pub type DefaultBspOps<S> = SerialBspOps<FirstPolygonStrategy, S>;

/// The operations used by [`Node`]'s convenience methods and by the boolean
/// operators on [`Solid`](crate::mesh::Solid).
#[cfg(feature = "parallel")]
pub type DefaultBspOps<S> = ParallelBspOps<FirstPolygonStrategy, S>;

use crate::mesh::polygon::Polygon;
use std::fmt::Debug;

impl<S: Clone + Send + Sync + Debug> Node<S> {
    /// Creates a new BSP tree from polygons
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        let mut node = Self::new();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Invert all polygons in the BSP tree, turning the solid inside out
    pub fn invert(&mut self) {
        DefaultBspOps::<S>::new().invert(self);
    }

    /// Remove the parts of `polygons` that are inside this BSP tree
    pub fn clip_polygons(&self, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        DefaultBspOps::<S>::new().clip_polygons(self, polygons)
    }

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    pub fn clip_to(&mut self, bsp: &Node<S>) {
        DefaultBspOps::<S>::new().clip_to(self, bsp);
    }

    /// Return all polygons in this BSP tree
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        DefaultBspOps::<S>::new().all_polygons(self)
    }

    /// Build a BSP tree from the given polygons
    pub fn build(&mut self, polygons: &[Polygon<S>]) {
        DefaultBspOps::<S>::new().build(self, polygons);
    }
}

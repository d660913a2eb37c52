//! Parallel implementation of BSP operations
//!
//! Tree traversal stays sequential; the work at each node (splitting its
//! polygon batch against the node plane) is spread over the rayon pool.
//! Results are identical to [`SerialBspOps`](super::serial::SerialBspOps),
//! including polygon order.

use rayon::prelude::*;

use crate::mesh::bsp::node::Node;
use crate::mesh::bsp::traits::{BspOps, FirstPolygonStrategy, SplittingPlaneStrategy};
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use std::fmt::Debug;

/// Parallel implementation of BSP operations
pub struct ParallelBspOps<SP: SplittingPlaneStrategy<S> = FirstPolygonStrategy, S: Clone = ()> {
    splitting_strategy: SP,
    _phantom: std::marker::PhantomData<S>,
}

impl<S: Clone> ParallelBspOps<FirstPolygonStrategy, S> {
    pub const fn new() -> Self {
        Self {
            splitting_strategy: FirstPolygonStrategy,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S: Clone> Default for ParallelBspOps<FirstPolygonStrategy, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<SP: SplittingPlaneStrategy<S>, S: Clone> ParallelBspOps<SP, S> {
    pub const fn with_strategy(strategy: SP) -> Self {
        Self {
            splitting_strategy: strategy,
            _phantom: std::marker::PhantomData,
        }
    }
}

type Buckets<S> = (
    Vec<Polygon<S>>,
    Vec<Polygon<S>>,
    Vec<Polygon<S>>,
    Vec<Polygon<S>>,
);

fn empty_buckets<S: Clone>() -> Buckets<S> {
    (Vec::new(), Vec::new(), Vec::new(), Vec::new())
}

/// Split each polygon in parallel; gather results in input order.
fn par_split_all<S: Clone + Send + Sync>(plane: &Plane, polygons: Vec<Polygon<S>>) -> Buckets<S> {
    polygons
        .into_par_iter()
        .fold(empty_buckets, |mut acc, polygon| {
            plane.split_polygon_into(polygon, &mut acc.0, &mut acc.1, &mut acc.2, &mut acc.3);
            acc
        })
        .reduce(empty_buckets, |mut acc, x| {
            acc.0.extend(x.0);
            acc.1.extend(x.1);
            acc.2.extend(x.2);
            acc.3.extend(x.3);
            acc
        })
}

impl<SP: SplittingPlaneStrategy<S> + Sync, S: Clone + Send + Sync + Debug> ParallelBspOps<SP, S> {
    pub(crate) fn clip_owned(&self, node: &Node<S>, polygons: Vec<Polygon<S>>) -> Vec<Polygon<S>> {
        let mut result = Vec::with_capacity(polygons.len());
        let mut stack = vec![(node, polygons)];

        while let Some((current, polygons)) = stack.pop() {
            let Some(plane) = current.plane.as_ref() else {
                result.extend(polygons);
                continue;
            };

            let (mut coplanar_front, mut coplanar_back, mut front, mut back) =
                par_split_all(plane, polygons);
            front.append(&mut coplanar_front);
            back.append(&mut coplanar_back);

            if let Some(back_node) = current.back.as_deref() {
                stack.push((back_node, back));
            }
            match current.front.as_deref() {
                Some(front_node) => stack.push((front_node, front)),
                None => result.append(&mut front),
            }
        }

        result
    }
}

impl<SP: SplittingPlaneStrategy<S> + Sync, S: Clone + Send + Sync + Debug> BspOps<S>
    for ParallelBspOps<SP, S>
{
    fn invert(&self, node: &mut Node<S>) {
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            current.polygons.par_iter_mut().for_each(Polygon::flip);
            current.plane = current.plane.map(|plane| plane.flipped());
            std::mem::swap(&mut current.front, &mut current.back);

            stack.extend(
                [&mut current.front, &mut current.back]
                    .into_iter()
                    .filter_map(|child| child.as_deref_mut()),
            );
        }
    }

    fn clip_polygons(&self, node: &Node<S>, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        self.clip_owned(node, polygons.to_vec())
    }

    fn clip_to(&self, node: &mut Node<S>, bsp: &Node<S>) {
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            let kept = self.clip_owned(bsp, std::mem::take(&mut current.polygons));
            current.polygons = kept;

            stack.extend(
                [&mut current.front, &mut current.back]
                    .into_iter()
                    .filter_map(|child| child.as_deref_mut()),
            );
        }
    }

    fn build(&self, node: &mut Node<S>, polygons: &[Polygon<S>]) {
        let mut stack = vec![(node, polygons.to_vec())];

        while let Some((current, polygons)) = stack.pop() {
            if polygons.is_empty() {
                continue;
            }

            let Node {
                plane,
                front: front_node,
                back: back_node,
                polygons: node_polygons,
            } = current;

            if plane.is_none() {
                *plane = self.splitting_strategy.pick_best_splitting_plane(&polygons);
            }
            let Some(plane) = *plane else {
                continue;
            };

            let (coplanar_front, coplanar_back, front, back) = par_split_all(&plane, polygons);
            node_polygons.extend(coplanar_front);
            node_polygons.extend(coplanar_back);

            if !front.is_empty() {
                let child = front_node.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((child.as_mut(), front));
            }
            if !back.is_empty() {
                let child = back_node.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((child.as_mut(), back));
            }
        }
    }

    fn all_polygons(&self, node: &Node<S>) -> Vec<Polygon<S>> {
        // Collection is memory bound; the serial walk is as fast
        let mut result = Vec::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            result.extend_from_slice(&current.polygons);

            if let Some(back) = current.back.as_deref() {
                stack.push(back);
            }
            if let Some(front) = current.front.as_deref() {
                stack.push(front);
            }
        }
        result
    }
}

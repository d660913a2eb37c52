//! Serial implementation of BSP operations
//!
//! Every traversal keeps an explicit work stack instead of recursing, so
//! deep trees (convex inputs produce one node per plane, stacked in a line)
//! cannot overflow the thread stack.

use crate::mesh::bsp::node::Node;
use crate::mesh::bsp::traits::{BspOps, FirstPolygonStrategy, SplittingPlaneStrategy};
use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use std::fmt::Debug;

/// Serial implementation of BSP operations
pub struct SerialBspOps<SP: SplittingPlaneStrategy<S> = FirstPolygonStrategy, S: Clone = ()> {
    splitting_strategy: SP,
    _phantom: std::marker::PhantomData<S>,
}

impl<S: Clone> SerialBspOps<FirstPolygonStrategy, S> {
    pub const fn new() -> Self {
        Self {
            splitting_strategy: FirstPolygonStrategy,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S: Clone> Default for SerialBspOps<FirstPolygonStrategy, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<SP: SplittingPlaneStrategy<S>, S: Clone> SerialBspOps<SP, S> {
    pub const fn with_strategy(strategy: SP) -> Self {
        Self {
            splitting_strategy: strategy,
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Split a batch of polygons against `plane` into
/// `(coplanar_front, coplanar_back, front, back)`.
#[allow(clippy::type_complexity)]
fn split_all<S: Clone>(
    plane: &Plane,
    polygons: Vec<Polygon<S>>,
) -> (
    Vec<Polygon<S>>,
    Vec<Polygon<S>>,
    Vec<Polygon<S>>,
    Vec<Polygon<S>>,
) {
    let mut coplanar_front = Vec::new();
    let mut coplanar_back = Vec::new();
    let mut front = Vec::with_capacity(polygons.len());
    let mut back = Vec::with_capacity(polygons.len());

    for polygon in polygons {
        plane.split_polygon_into(
            polygon,
            &mut coplanar_front,
            &mut coplanar_back,
            &mut front,
            &mut back,
        );
    }

    (coplanar_front, coplanar_back, front, back)
}

impl<SP: SplittingPlaneStrategy<S>, S: Clone + Send + Sync + Debug> SerialBspOps<SP, S> {
    /// Clip an owned polygon list against the tree rooted at `node`.
    ///
    /// Output order matches the recursive formulation: everything that ends up
    /// in the front subtree precedes everything in the back subtree.
    pub(crate) fn clip_owned(&self, node: &Node<S>, polygons: Vec<Polygon<S>>) -> Vec<Polygon<S>> {
        let mut result = Vec::with_capacity(polygons.len());
        let mut stack = vec![(node, polygons)];

        while let Some((current, polygons)) = stack.pop() {
            let Some(plane) = current.plane.as_ref() else {
                result.extend(polygons);
                continue;
            };

            let (mut coplanar_front, mut coplanar_back, mut front, mut back) =
                split_all(plane, polygons);
            front.append(&mut coplanar_front);
            back.append(&mut coplanar_back);

            // Back is pushed first so the front subtree is finished before it.
            // Without a back child, the back set is inside the solid and dropped.
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

impl<SP: SplittingPlaneStrategy<S>, S: Clone + Send + Sync + Debug> BspOps<S> for SerialBspOps<SP, S> {
    fn invert(&self, node: &mut Node<S>) {
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            current.polygons.iter_mut().for_each(Polygon::flip);
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

    fn all_polygons(&self, node: &Node<S>) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![node];

        // Pre-order: node, then front subtree, then back subtree
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

            // Choose the splitting plane if not already set
            if plane.is_none() {
                *plane = self.splitting_strategy.pick_best_splitting_plane(&polygons);
            }
            let Some(plane) = *plane else {
                continue;
            };

            let (coplanar_front, coplanar_back, front, back) = split_all(&plane, polygons);
            node_polygons.extend(coplanar_front);
            node_polygons.extend(coplanar_back);

            // Build child nodes using lazy initialization pattern
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
}

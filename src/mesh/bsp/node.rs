//! BSP tree node data structure

use crate::mesh::plane::Plane;
use crate::mesh::polygon::Polygon;
use std::fmt::Debug;

/// A BSP tree node, containing polygons plus optional front/back subtrees
#[derive(Debug, Clone)]
pub struct Node<S: Clone> {
    /// Splitting plane for this node *or* **None** for an empty tree.
    pub plane: Option<Plane>,

    /// Subtree for the *front* half‑space.
    pub front: Option<Box<Node<S>>>,

    /// Subtree for the *back* half‑space.
    pub back: Option<Box<Node<S>>>,

    /// Polygons that lie *exactly* on `plane`, facing either way
    /// (after the node has been built).
    pub polygons: Vec<Polygon<S>>,
}

impl<S: Clone + Send + Sync + Debug> Default for Node<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Send + Sync + Debug> Node<S> {
    /// Create a new empty BSP node
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// `true` when the tree holds no splitting plane and no polygons.
    pub const fn is_empty(&self) -> bool {
        self.plane.is_none() && self.polygons.is_empty()
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(current) = stack.pop() {
            count += 1;
            stack.extend(
                [&current.front, &current.back]
                    .into_iter()
                    .filter_map(|child| child.as_deref()),
            );
        }
        count
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((current, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for child in [&current.front, &current.back].into_iter().flatten() {
                stack.push((&**child, depth + 1));
            }
        }
        deepest
    }
}

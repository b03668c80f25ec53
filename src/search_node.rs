use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// A node of the search tree. Nodes never change after creation; the lattice position is the key
/// under which the node is stored in its [SearchTree].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchNode {
    /// Index of the parent node in the same tree. [None] for the root.
    pub parent: Option<usize>,
    /// Cost of the path from the root.
    pub g: f64,
    /// Straight line estimate of the remaining cost.
    pub h: f64,
}

impl SearchNode {
    pub fn new(parent: Option<usize>, g: f64, h: f64) -> SearchNode {
        SearchNode { parent, g, h }
    }

    pub fn f(&self) -> f64 {
        self.g + self.h
    }
}

/// Arena holding every node generated during one search run. Children refer to their parents by
/// index, so any number of frontier nodes can share the same ancestor chain. Because a lattice
/// point is stored at most once, the key set doubles as the visited set.
#[derive(Clone, Debug, Default)]
pub struct SearchTree {
    nodes: FxIndexMap<Point, SearchNode>,
}

impl SearchTree {
    pub fn new() -> SearchTree {
        SearchTree::default()
    }

    /// Stores a node and returns its index, or [None] if the position was generated before. The
    /// first node generated for a position always wins.
    pub fn insert(&mut self, position: Point, node: SearchNode) -> Option<usize> {
        match self.nodes.entry(position) {
            Vacant(e) => {
                let index = e.index();
                e.insert(node);
                Some(index)
            }
            Occupied(_) => None,
        }
    }

    pub fn contains(&self, position: &Point) -> bool {
        self.nodes.contains_key(position)
    }

    pub fn get(&self, index: usize) -> Option<(&Point, &SearchNode)> {
        self.nodes.get_index(index)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Positions from the root down to the node at `index`.
    pub fn path(&self, index: usize) -> Vec<Point> {
        let mut path: Vec<Point> =
            std::iter::successors(Some(index), |&i| self.nodes.get_index(i)?.1.parent)
                .filter_map(|i| self.nodes.get_index(i).map(|(p, _)| *p))
                .collect();
        path.reverse();
        path
    }
}

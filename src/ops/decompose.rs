//! Rooted decomposition of a bond graph into branches and annotated bonds.
//!
//! Two independent products are derived from a [`Topology`]:
//!
//! - **Paths**: a depth-first walk from a chosen root emits one root-to-leaf key sequence
//!   per leaf reached. The visited set is scoped to the current path and unwound on
//!   backtrack, so sibling branches start from a clean slate. The walk assumes tree-like
//!   connectivity; inside a ring a branch stops where it meets an atom already on the path.
//! - **Annotated edges**: every bond is reported in both directions with its length and one
//!   representative bond angle measured against a third atom.

use crate::geometry;
use crate::model::{
    graph::BondGraph,
    topology::Topology,
    types::{KeyMode, Point},
};
use crate::ops::error::Error;
use std::collections::HashSet;
use std::fmt;

/// Angle reported for a bond whose endpoints have no other neighbor to measure against.
///
/// This is a placeholder, not a measured value.
pub const NO_BOND_ANGLE: f64 = 0.0;

/// Root-to-leaf sequence of node keys, root first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    keys: Vec<i32>,
}

impl Path {
    pub fn keys(&self) -> &[i32] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn root(&self) -> Option<i32> {
        self.keys.first().copied()
    }

    pub fn leaf(&self) -> Option<i32> {
        self.keys.last().copied()
    }

    pub fn contains(&self, key: i32) -> bool {
        self.keys.contains(&key)
    }
}

impl From<Vec<i32>> for Path {
    fn from(keys: Vec<i32>) -> Self {
        Self { keys }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

/// One direction of a bond with its geometry.
///
/// Both directions of a bond carry the same length and the same angle; the angle is measured
/// once per bond, not once per direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedEdge {
    pub from: i32,
    pub to: i32,
    /// Bond length in ångströms.
    pub bond_length: f64,
    /// Representative bond angle in degrees, or [`NO_BOND_ANGLE`].
    pub bond_angle: f64,
}

/// Paths and annotated edges derived from one root.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub root: i32,
    /// What the node keys in `root`, `paths`, and `edges` identify.
    pub key_mode: KeyMode,
    /// Paths sorted longest-first; equal lengths keep traversal order.
    pub paths: Vec<Path>,
    pub edges: Vec<AnnotatedEdge>,
}

/// Read-only view over a [`Topology`] producing paths and annotated edges.
pub struct GraphDecomposer<'a> {
    topology: &'a Topology,
}

impl<'a> GraphDecomposer<'a> {
    pub fn new(topology: &'a Topology) -> Self {
        Self { topology }
    }

    /// Enumerates every root-to-leaf path reachable from `root`.
    ///
    /// Neighbors are explored in ascending key order and paths are returned in the order
    /// their leaves are reached. A root without bonds yields the single path `[root]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownIdentifier`] when `root` is not a node of the graph.
    pub fn paths_from(&self, root: i32) -> Result<Vec<Path>, Error> {
        let graph = self.topology.graph();
        if !graph.contains(root) {
            return Err(Error::unknown_identifier(root, self.topology.key_mode()));
        }

        let mut walk = Walk::new(graph);
        walk.visit(root, None);
        Ok(walk.paths)
    }

    /// Annotates every bond with its length and a representative angle.
    ///
    /// For a bond `(parent, child)` with `parent < child`, the angle is measured at `parent`
    /// toward its first other neighbor. When `parent` has none, it is measured at `child`
    /// toward the child's first other neighbor. When neither has one, the angle is
    /// [`NO_BOND_ANGLE`]. Each bond yields the forward edge followed by the reverse edge,
    /// with bonds ordered by `(parent, child)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownIdentifier`] if a graph key has no atom in the structure.
    pub fn annotated_edges(&self) -> Result<Vec<AnnotatedEdge>, Error> {
        let graph = self.topology.graph();
        let mut edges = Vec::with_capacity(graph.bond_count() * 2);

        for (parent, neighbors) in graph.iter() {
            for &child in neighbors.iter().filter(|&&c| parent < c) {
                let parent_pos = self.position(parent)?;
                let child_pos = self.position(child)?;

                let bond_length = geometry::distance(&parent_pos, &child_pos);

                let bond_angle =
                    if let Some(third) = neighbors.iter().copied().find(|&t| t != child) {
                        geometry::angle(&child_pos, &parent_pos, &self.position(third)?)
                    } else if let Some(third) = graph.neighbors_of(child).find(|&t| t != parent)
                    {
                        geometry::angle(&parent_pos, &child_pos, &self.position(third)?)
                    } else {
                        NO_BOND_ANGLE
                    };

                edges.push(AnnotatedEdge {
                    from: parent,
                    to: child,
                    bond_length,
                    bond_angle,
                });
                edges.push(AnnotatedEdge {
                    from: child,
                    to: parent,
                    bond_length,
                    bond_angle,
                });
            }
        }

        Ok(edges)
    }

    /// Runs both products for `root`, with paths sorted longest-first.
    pub fn decompose(&self, root: i32) -> Result<Decomposition, Error> {
        let mut paths = self.paths_from(root)?;
        sort_longest_first(&mut paths);
        let edges = self.annotated_edges()?;

        log::debug!(
            "decomposed from root {}: {} paths, {} directed edges",
            root,
            paths.len(),
            edges.len()
        );

        Ok(Decomposition {
            root,
            key_mode: self.topology.key_mode(),
            paths,
            edges,
        })
    }

    fn position(&self, key: i32) -> Result<Point, Error> {
        self.topology
            .position_of(key)
            .ok_or_else(|| Error::unknown_identifier(key, self.topology.key_mode()))
    }
}

/// Orders paths by descending length; ties keep their relative order.
pub fn sort_longest_first(paths: &mut [Path]) {
    paths.sort_by(|a, b| b.len().cmp(&a.len()));
}

/// Scratch state of one depth-first walk; never outlives the call that created it.
struct Walk<'g> {
    graph: &'g BondGraph,
    visited: HashSet<i32>,
    path: Vec<i32>,
    paths: Vec<Path>,
}

impl<'g> Walk<'g> {
    fn new(graph: &'g BondGraph) -> Self {
        Self {
            graph,
            visited: HashSet::new(),
            path: Vec::new(),
            paths: Vec::new(),
        }
    }

    fn visit(&mut self, current: i32, parent: Option<i32>) {
        let graph = self.graph;
        self.visited.insert(current);
        self.path.push(current);

        let mut descended = false;
        for neighbor in graph.neighbors_of(current) {
            if Some(neighbor) != parent && !self.visited.contains(&neighbor) {
                descended = true;
                self.visit(neighbor, Some(current));
            }
        }

        if !descended {
            self.paths.push(Path::from(self.path.clone()));
        }

        self.path.pop();
        self.visited.remove(&current);
    }
}

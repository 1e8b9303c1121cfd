//! Undirected adjacency structure keyed by atom serial or residue id.
//!
//! Neighbor sets are ordered, so every traversal over the graph (path enumeration, edge
//! annotation, report rendering) visits nodes in ascending key order and is reproducible
//! run to run.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Symmetric bond graph.
///
/// Every node known to the graph has an entry, including nodes without any bond, so
/// isolated atoms remain visible to reporting. Bonds are stored in both directions; the
/// only mutation available, [`BondGraph::add_bond`], keeps the two directions in sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BondGraph {
    adjacency: BTreeMap<i32, BTreeSet<i32>>,
}

impl BondGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node without bonds. Existing neighbors are left untouched.
    pub fn add_node(&mut self, key: i32) {
        self.adjacency.entry(key).or_default();
    }

    /// Connects `a` and `b` in both directions.
    ///
    /// # Returns
    ///
    /// `true` when the bond was new. Self-bonds are rejected and return `false`.
    pub fn add_bond(&mut self, a: i32, b: i32) -> bool {
        if a == b {
            return false;
        }
        let inserted = self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        inserted
    }

    pub fn contains(&self, key: i32) -> bool {
        self.adjacency.contains_key(&key)
    }

    /// Neighbor set of `key`, or `None` when the node is unknown.
    pub fn neighbors(&self, key: i32) -> Option<&BTreeSet<i32>> {
        self.adjacency.get(&key)
    }

    /// Iterates the neighbors of `key` in ascending order; empty for unknown nodes.
    pub fn neighbors_of(&self, key: i32) -> impl Iterator<Item = i32> + '_ {
        self.adjacency.get(&key).into_iter().flatten().copied()
    }

    pub fn degree(&self, key: i32) -> usize {
        self.adjacency.get(&key).map_or(0, BTreeSet::len)
    }

    pub fn is_bonded(&self, a: i32, b: i32) -> bool {
        self.adjacency.get(&a).is_some_and(|n| n.contains(&b))
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected bonds.
    pub fn bond_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.adjacency.keys().copied()
    }

    /// Iterates `(key, neighbors)` pairs in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &BTreeSet<i32>)> {
        self.adjacency.iter().map(|(k, n)| (*k, n))
    }

    /// Keys of nodes without any bond.
    pub fn isolated(&self) -> impl Iterator<Item = i32> + '_ {
        self.adjacency
            .iter()
            .filter(|(_, n)| n.is_empty())
            .map(|(k, _)| *k)
    }

    /// Each undirected bond once, as `(smaller, larger)`, in ascending order.
    pub fn bonds(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.adjacency.iter().flat_map(|(&a, neighbors)| {
            neighbors
                .iter()
                .copied()
                .filter(move |&b| a < b)
                .map(move |b| (a, b))
        })
    }
}

impl fmt::Display for BondGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BondGraph {{ nodes: {}, bonds: {} }}",
            self.node_count(),
            self.bond_count()
        )
    }
}

//! A structure paired with the bond graph inferred from it.
//!
//! The topology owns both halves so they are created and dropped together. Position lookups
//! by graph key are indexed once at construction; derived data (paths, annotated edges,
//! repositioned copies) borrows from it and never mutates it.

use super::atom::AtomRecord;
use super::graph::BondGraph;
use super::structure::Structure;
use super::types::{KeyMode, Point};
use std::collections::HashMap;
use std::fmt;

/// Bond graph overlay for a [`Structure`].
#[derive(Debug, Clone)]
pub struct Topology {
    structure: Structure,
    graph: BondGraph,
    key_mode: KeyMode,
    index: HashMap<i32, usize>,
}

impl Topology {
    /// Builds a topology from a structure and a graph keyed under `key_mode`.
    ///
    /// A debug assert checks that every graph node resolves to an atom of the structure.
    ///
    /// # Arguments
    ///
    /// * `structure` - Atoms the graph was inferred from.
    /// * `graph` - Adjacency keyed by serial or residue id.
    /// * `key_mode` - Which atom field the graph keys refer to.
    pub fn new(structure: Structure, graph: BondGraph, key_mode: KeyMode) -> Self {
        let index = Self::index_keys(&structure, key_mode);
        debug_assert!(
            graph.keys().all(|k| index.contains_key(&k)),
            "Bond graph references a key absent from the structure"
        );
        Self {
            structure,
            graph,
            key_mode,
            index,
        }
    }

    fn index_keys(structure: &Structure, key_mode: KeyMode) -> HashMap<i32, usize> {
        let mut index = HashMap::with_capacity(structure.atom_count());
        for (i, atom) in structure.iter_atoms().enumerate() {
            index.entry(atom.key(key_mode)).or_insert(i);
        }
        index
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    pub fn graph(&self) -> &BondGraph {
        &self.graph
    }

    pub fn key_mode(&self) -> KeyMode {
        self.key_mode
    }

    pub fn atom_count(&self) -> usize {
        self.structure.atom_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.bond_count()
    }

    /// Atom represented by a graph key; for residue keys, the residue's first atom.
    pub fn atom_of(&self, key: i32) -> Option<&AtomRecord> {
        self.index
            .get(&key)
            .map(|&i| &self.structure.atoms()[i])
    }

    pub fn position_of(&self, key: i32) -> Option<Point> {
        self.atom_of(key).map(|a| a.pos)
    }

    pub fn into_parts(self) -> (Structure, BondGraph) {
        (self.structure, self.graph)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Topology {{ atoms: {}, bonds: {}, keys: {} }}",
            self.atom_count(),
            self.bond_count(),
            self.key_mode
        )
    }
}

//! Core data structures for atoms, structures, and inferred bond graphs.
//!
//! Records come out of the PDB reader, are grouped into a [`structure::Structure`], and are
//! paired with a [`graph::BondGraph`] inside a [`topology::Topology`] once bonds have been
//! perceived. Operations in `ops` consume these types and produce derived data.

pub mod atom;
pub mod graph;
pub mod structure;
pub mod topology;
pub mod types;

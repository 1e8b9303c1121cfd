//! # LipidForge
//!
//! **LipidForge** infers bonding topology from bare 3-D coordinates and uses it to take lipid-like molecules apart and put them back in a new orientation. Bonds are perceived from interatomic distances alone, the resulting graph is decomposed into rooted branches with annotated bond geometry, and whole structures or individual residues are rigidly rotated so an internal direction lines up with a target.
//!
//! ## Features
//!
//! - **Distance-based bond perception** – `BondGraphBuilder` connects every pair of atoms closer than a cutoff (2.0 Å by default), keyed by atom serial or residue number, with an optional Rayon-parallel pair scan.
//! - **Rooted decomposition** – `GraphDecomposer` enumerates root-to-leaf paths by depth-first search and annotates every bond with its length and a representative bond angle.
//! - **Rigid repositioning** – `Repositioner` builds a closed-form rotation matrix (including the anti-parallel case) and applies it about a pivot, preserving every internal distance.
//! - **Pluggable direction estimators** – head-to-tail, explicit atom selection, and principal-axis strategies implement `DirectionEstimator`.
//! - **PDB I/O** – a lenient fixed-column reader with per-line diagnostics, a writer with `REMARK` and `CONECT` support, and a plain-text graph report.

mod model;
mod utils;

pub mod geometry;
pub mod io;
pub mod ops;

pub use model::atom::AtomRecord;
pub use model::graph::BondGraph;
pub use model::structure::Structure;
pub use model::topology::Topology;
pub use model::types::{KeyMode, Point, RecordKind, Vector};

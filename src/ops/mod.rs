//! Operations that infer, decompose, and reorient molecular topology.
//!
//! Bond perception turns a structure into a [`Topology`](crate::Topology), the decomposer
//! derives rooted paths and annotated bonds from it, and the repositioner rigidly rotates
//! structures toward target directions. All submodules share one error type.

mod decompose;
mod error;
mod orientation;
mod reposition;
mod topology;

pub use topology::{BondGraphBuilder, DEFAULT_BOND_CUTOFF};

pub use decompose::{
    AnnotatedEdge, Decomposition, GraphDecomposer, NO_BOND_ANGLE, Path, sort_longest_first,
};

pub use orientation::{
    AtomSelectionEstimator, DirectionEstimator, HeadTailEstimator, Orientation,
    PrincipalAxisEstimator,
};

pub use reposition::{DEFAULT_TARGET, OrientationPlan, Repositioner};

pub use error::Error;

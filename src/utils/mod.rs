//! Cross-cutting helpers that are not tied to the molecular model.
//!
//! Currently this is the optional parallel-iteration shim used by the pairwise bond scan and
//! by whole-structure rotation.

pub mod parallel;

//! Rigid reorientation of whole structures or individual residues.
//!
//! Every operation builds one rotation matrix per rigid group and applies it about a pivot
//! to all atoms of that group, so intra-group distances and angles are preserved. Inputs are
//! never modified; each call returns a new [`Structure`] whose atoms keep their identity and
//! metadata.

use crate::geometry::{self, RotationMatrix};
use crate::model::{
    atom::AtomRecord,
    structure::Structure,
    types::{KeyMode, Point, Vector},
};
use crate::ops::error::Error;
use crate::ops::orientation::{DirectionEstimator, HeadTailEstimator, Orientation};
use crate::utils::parallel::*;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Target used for residues that have no explicit entry in an [`OrientationPlan`].
pub const DEFAULT_TARGET: [f64; 3] = [0.0, 0.0, 1.0];

/// Per-residue target directions.
///
/// Plans are usually loaded from TOML:
///
/// ```toml
/// default = [0.0, 0.0, 1.0]
///
/// [residues]
/// 1 = [1.0, 0.0, 0.0]
/// 2 = [0.0, -1.0, 0.0]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationPlan {
    default: Vector,
    targets: BTreeMap<i32, Vector>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlanFile {
    #[serde(default)]
    default: Option<[f64; 3]>,
    #[serde(default)]
    residues: BTreeMap<String, [f64; 3]>,
}

impl Default for OrientationPlan {
    fn default() -> Self {
        Self {
            default: Vector::from(DEFAULT_TARGET),
            targets: BTreeMap::new(),
        }
    }
}

impl OrientationPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback target for residues without an entry.
    pub fn with_default(mut self, target: Vector) -> Self {
        self.default = target;
        self
    }

    /// Adds or replaces the target of one residue.
    pub fn with_target(mut self, residue_id: i32, target: Vector) -> Self {
        self.targets.insert(residue_id, target);
        self
    }

    /// Parses a plan from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPlan`] for malformed TOML, unknown fields, residue keys that
    /// are not integers, and vectors that are non-finite or zero.
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        let file: PlanFile = toml::from_str(content)
            .map_err(|e| Error::invalid_plan(format!("malformed TOML: {}", e.message())))?;

        let mut plan = Self::new();
        if let Some(default) = file.default {
            plan.default = checked_vector("default", default)?;
        }

        for (key, raw) in file.residues {
            let residue_id: i32 = key.trim().parse().map_err(|_| {
                Error::invalid_plan(format!("residue key '{}' is not an integer", key))
            })?;
            let target = checked_vector(&format!("residue {}", residue_id), raw)?;
            plan.targets.insert(residue_id, target);
        }

        Ok(plan)
    }

    pub fn default_target(&self) -> Vector {
        self.default
    }

    /// Explicit target of a residue, if the plan names it.
    pub fn explicit_target(&self, residue_id: i32) -> Option<Vector> {
        self.targets.get(&residue_id).copied()
    }

    /// Target of a residue, falling back to the plan default.
    pub fn target_for(&self, residue_id: i32) -> Vector {
        self.explicit_target(residue_id).unwrap_or(self.default)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

fn checked_vector(label: &str, raw: [f64; 3]) -> Result<Vector, Error> {
    if raw.iter().any(|c| !c.is_finite()) {
        return Err(Error::invalid_plan(format!(
            "{} target {:?} has non-finite components",
            label, raw
        )));
    }
    let v = Vector::from(raw);
    if v.norm() == 0.0 {
        return Err(Error::invalid_plan(format!("{} target is the zero vector", label)));
    }
    Ok(v)
}

/// Rigid repositioner parameterized by the strategy that infers directions.
#[derive(Debug, Clone, Default)]
pub struct Repositioner<E = HeadTailEstimator> {
    estimator: E,
}

impl Repositioner<HeadTailEstimator> {
    /// Creates a repositioner using the head-to-tail heuristic.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotates every atom about `pivot` so that `from` ends up pointing along `to`.
    ///
    /// Neither direction needs unit length. A zero direction yields an unchanged copy. The
    /// estimator plays no part, so callers write `Repositioner::reposition(..)` directly.
    ///
    /// # Arguments
    ///
    /// * `structure` - Atoms to reposition; left untouched.
    /// * `pivot` - Fixed point of the rotation.
    /// * `from` - Current internal direction.
    /// * `to` - Direction `from` should be aligned with.
    pub fn reposition(
        structure: &Structure,
        pivot: &Point,
        from: &Vector,
        to: &Vector,
    ) -> Structure {
        let rotation = geometry::rotation_matrix(from, to);
        Structure::from_atoms(rotate_atoms(structure.atoms(), &rotation, pivot))
    }
}

impl<E: DirectionEstimator> Repositioner<E> {
    pub fn with_estimator(estimator: E) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    /// Repositions about the atom with serial `root`.
    ///
    /// When `from` is `None`, the direction comes from the configured estimator while the
    /// pivot stays at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownIdentifier`] when `root` is absent, or the estimator's error
    /// when a direction has to be inferred and cannot be.
    pub fn reposition_about(
        &self,
        structure: &Structure,
        root: i32,
        from: Option<Vector>,
        to: &Vector,
    ) -> Result<Structure, Error> {
        let pivot = structure
            .atom_by_serial(root)
            .map(|a| a.pos)
            .ok_or_else(|| Error::unknown_identifier(root, KeyMode::Serial))?;

        let from = match from {
            Some(direction) => direction,
            None => self.estimator.estimate(structure.atoms())?.direction,
        };

        Ok(Repositioner::reposition(structure, &pivot, &from, to))
    }

    /// Repositions about the estimator's own pivot and direction.
    ///
    /// Returns the repositioned copy together with the orientation it was derived from.
    pub fn reposition_estimated(
        &self,
        structure: &Structure,
        to: &Vector,
    ) -> Result<(Structure, Orientation), Error> {
        let orientation = self.estimator.estimate(structure.atoms())?;
        let moved = Repositioner::reposition(
            structure,
            &orientation.pivot,
            &orientation.direction,
            to,
        );
        Ok((moved, orientation))
    }

    /// Reorients each residue independently toward its planned target.
    ///
    /// Residues are processed in order of first appearance and the output lists their atoms
    /// group by group. A residue missing from the plan uses the plan default; a residue whose
    /// direction cannot be estimated is copied through unchanged. Both cases are logged at
    /// `warn`.
    pub fn reposition_residues(&self, structure: &Structure, plan: &OrientationPlan) -> Structure {
        let mut atoms = Vec::with_capacity(structure.atom_count());

        for (residue_id, group) in structure.group_by_residue() {
            let target = match plan.explicit_target(residue_id) {
                Some(target) => target,
                None => {
                    log::warn!(
                        "residue {} has no target direction, using default [{:.3}, {:.3}, {:.3}]",
                        residue_id,
                        plan.default.x,
                        plan.default.y,
                        plan.default.z
                    );
                    plan.default
                }
            };

            match self.estimator.estimate(&group) {
                Ok(orientation) => {
                    log::debug!(
                        "residue {}: pivot {:?}, {} atoms",
                        residue_id,
                        orientation.head,
                        group.len()
                    );
                    let rotation = geometry::rotation_matrix(&orientation.direction, &target);
                    atoms.extend(rotate_atoms(&group, &rotation, &orientation.pivot));
                }
                Err(e) => {
                    log::warn!("residue {} left in place: {}", residue_id, e);
                    atoms.extend(group);
                }
            }
        }

        Structure::from_atoms(atoms)
    }
}

fn rotate_atoms(
    atoms: &[AtomRecord],
    rotation: &RotationMatrix,
    pivot: &Point,
) -> Vec<AtomRecord> {
    atoms
        .par_iter()
        .map(|atom| atom.moved_to(geometry::rotate_about_pivot(&atom.pos, rotation, pivot)))
        .collect()
}

//! Strategies for deriving a molecule's pivot and internal direction.
//!
//! A [`DirectionEstimator`] inspects a set of atoms and reports the point to rotate about
//! together with the direction that should end up aligned with a target. The repositioner
//! only depends on the trait, so estimators can be swapped without touching it.

use crate::geometry;
use crate::model::{
    atom::AtomRecord,
    types::{KeyMode, Point, Vector},
};
use crate::ops::error::Error;
use nalgebra::Matrix3;
use smol_str::SmolStr;

/// Magnitudes at or below this are treated as "no direction".
const DEGENERATE_NORM: f64 = 1e-12;

/// Pivot and direction derived from a set of atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Point the rotation is applied about.
    pub pivot: Point,
    /// Internal direction, not necessarily unit length.
    pub direction: Vector,
    /// Serial of the atom serving as pivot, when the pivot is an atom.
    pub head: Option<i32>,
}

/// Capability to infer an [`Orientation`] from atoms.
pub trait DirectionEstimator {
    /// Estimates the orientation of `atoms`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectionUnavailable`] when no meaningful direction exists, and
    /// [`Error::UnknownIdentifier`] when a configured atom is absent.
    fn estimate(&self, atoms: &[AtomRecord]) -> Result<Orientation, Error>;
}

impl<T: DirectionEstimator + ?Sized> DirectionEstimator for &T {
    fn estimate(&self, atoms: &[AtomRecord]) -> Result<Orientation, Error> {
        (**self).estimate(atoms)
    }
}

impl<T: DirectionEstimator + ?Sized> DirectionEstimator for Box<T> {
    fn estimate(&self, atoms: &[AtomRecord]) -> Result<Orientation, Error> {
        (**self).estimate(atoms)
    }
}

/// Head-to-tail heuristic for lipid-like molecules.
///
/// The head is the first atom whose name contains the highest-priority designator that
/// matches anywhere in the molecule; with no match at all, the first atom is used. The
/// direction is the mean of the vectors from the head to the `k` atoms farthest from it.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadTailEstimator {
    designators: Vec<SmolStr>,
    distal_count: usize,
}

impl Default for HeadTailEstimator {
    fn default() -> Self {
        Self {
            designators: vec![SmolStr::new_static("N"), SmolStr::new_static("P")],
            distal_count: 2,
        }
    }
}

impl HeadTailEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the head designators, searched in the given priority order.
    pub fn designators<I, S>(mut self, designators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.designators = designators.into_iter().map(Into::into).collect();
        self
    }

    /// Sets how many distal atoms are averaged; zero is treated as one.
    pub fn distal_count(mut self, k: usize) -> Self {
        self.distal_count = k.max(1);
        self
    }

    pub fn designator_list(&self) -> &[SmolStr] {
        &self.designators
    }

    pub fn distal_count_value(&self) -> usize {
        self.distal_count
    }

    /// Picks the head atom of `atoms`.
    pub fn find_head<'a>(&self, atoms: &'a [AtomRecord]) -> Option<&'a AtomRecord> {
        self.designators
            .iter()
            .find_map(|d| atoms.iter().find(|a| a.name.contains(d.as_str())))
            .or_else(|| atoms.first())
    }

    /// The `k` atoms farthest from `head`, farthest first.
    ///
    /// Equal distances keep input order.
    pub fn distal_atoms<'a>(
        &self,
        atoms: &'a [AtomRecord],
        head: &AtomRecord,
    ) -> Vec<&'a AtomRecord> {
        let mut candidates: Vec<(&AtomRecord, f64)> = atoms
            .iter()
            .filter(|a| a.serial != head.serial)
            .map(|a| (a, a.distance(head)))
            .collect();
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        candidates
            .into_iter()
            .take(self.distal_count)
            .map(|(a, _)| a)
            .collect()
    }
}

impl DirectionEstimator for HeadTailEstimator {
    fn estimate(&self, atoms: &[AtomRecord]) -> Result<Orientation, Error> {
        let head = self
            .find_head(atoms)
            .ok_or_else(|| Error::direction_unavailable("no atoms to estimate from"))?;

        let tails = self.distal_atoms(atoms, head);
        let tail_positions: Vec<Point> = tails.iter().map(|a| a.pos).collect();
        let direction = mean_offset(&head.pos, &tail_positions).ok_or_else(|| {
            Error::direction_unavailable(format!(
                "head atom {} has no distinct distal atoms",
                head.serial
            ))
        })?;

        log::debug!(
            "head atom {} ({}), tail atoms {:?}",
            head.serial,
            head.name,
            tails.iter().map(|a| a.serial).collect::<Vec<_>>()
        );

        Ok(Orientation {
            pivot: head.pos,
            direction,
            head: Some(head.serial),
        })
    }
}

/// Orientation from explicitly chosen atoms, addressed by serial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomSelectionEstimator {
    head: i32,
    tails: Vec<i32>,
}

impl AtomSelectionEstimator {
    pub fn new(head: i32, tails: impl IntoIterator<Item = i32>) -> Self {
        Self {
            head,
            tails: tails.into_iter().collect(),
        }
    }
}

impl DirectionEstimator for AtomSelectionEstimator {
    fn estimate(&self, atoms: &[AtomRecord]) -> Result<Orientation, Error> {
        let lookup = |serial: i32| {
            atoms
                .iter()
                .find(|a| a.serial == serial)
                .ok_or_else(|| Error::unknown_identifier(serial, KeyMode::Serial))
        };

        let head = lookup(self.head)?;
        let tail_positions = self
            .tails
            .iter()
            .map(|&s| lookup(s).map(|a| a.pos))
            .collect::<Result<Vec<_>, _>>()?;

        let direction = mean_offset(&head.pos, &tail_positions).ok_or_else(|| {
            Error::direction_unavailable(format!(
                "selected tail atoms do not define a direction from atom {}",
                head.serial
            ))
        })?;

        Ok(Orientation {
            pivot: head.pos,
            direction,
            head: Some(head.serial),
        })
    }
}

/// Orientation along the axis of largest positional spread.
///
/// The pivot is the geometric center. The axis is the eigenvector of the gyration tensor
/// with the largest eigenvalue, signed so that it points toward the atom farthest from
/// the center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrincipalAxisEstimator;

impl DirectionEstimator for PrincipalAxisEstimator {
    fn estimate(&self, atoms: &[AtomRecord]) -> Result<Orientation, Error> {
        if atoms.len() < 2 {
            return Err(Error::direction_unavailable(
                "a principal axis needs at least two atoms",
            ));
        }

        let n = atoms.len() as f64;
        let centroid = Point::from(
            atoms
                .iter()
                .fold(Vector::zeros(), |acc, a| acc + a.pos.coords)
                / n,
        );

        let gyration = atoms.iter().fold(Matrix3::zeros(), |acc, a| {
            let d = a.pos - centroid;
            acc + d * d.transpose()
        }) / n;

        let eigen = gyration.symmetric_eigen();
        let largest = eigen.eigenvalues.imax();
        if eigen.eigenvalues[largest] <= DEGENERATE_NORM {
            return Err(Error::direction_unavailable("all atoms coincide"));
        }

        let mut axis: Vector = eigen.eigenvectors.column(largest).into_owned();

        let farthest = atoms
            .iter()
            .map(|a| a.pos - centroid)
            .max_by(|a, b| a.norm().total_cmp(&b.norm()))
            .unwrap_or_else(Vector::zeros);
        if geometry::dot(&axis, &farthest) < 0.0 {
            axis = -axis;
        }

        Ok(Orientation {
            pivot: centroid,
            direction: geometry::normalize(&axis),
            head: None,
        })
    }
}

/// Mean of `tip - origin` over `tips`, or `None` when it vanishes.
fn mean_offset(origin: &Point, tips: &[Point]) -> Option<Vector> {
    if tips.is_empty() {
        return None;
    }
    let sum = tips
        .iter()
        .fold(Vector::zeros(), |acc, tip| acc + (tip - origin));
    let mean = sum / tips.len() as f64;
    (mean.norm() > DEGENERATE_NORM).then_some(mean)
}

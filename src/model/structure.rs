use super::atom::AtomRecord;
use super::types::{KeyMode, Point, Vector};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Ordered collection of atom records loaded from one coordinate file.
///
/// Input order is preserved; it drives bond-scan order, head-atom search, and the order in
/// which records are written back out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    atoms: Vec<AtomRecord>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_atoms(atoms: Vec<AtomRecord>) -> Self {
        Self { atoms }
    }

    pub fn add_atom(&mut self, atom: AtomRecord) {
        debug_assert!(
            self.atom_by_serial(atom.serial).is_none(),
            "Attempted to add a duplicate atom serial '{}'",
            atom.serial
        );
        self.atoms.push(atom);
    }

    pub fn clear(&mut self) {
        self.atoms.clear();
    }

    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    pub fn into_atoms(self) -> Vec<AtomRecord> {
        self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter_atoms(&self) -> std::slice::Iter<'_, AtomRecord> {
        self.atoms.iter()
    }

    pub fn iter_atoms_mut(&mut self) -> std::slice::IterMut<'_, AtomRecord> {
        self.atoms.iter_mut()
    }

    pub fn atom_by_serial(&self, serial: i32) -> Option<&AtomRecord> {
        self.atoms.iter().find(|a| a.serial == serial)
    }

    /// First atom, in input order, carrying the given residue id.
    pub fn first_in_residue(&self, residue_id: i32) -> Option<&AtomRecord> {
        self.atoms.iter().find(|a| a.residue_id == residue_id)
    }

    /// Resolves a bond-graph key to the atom it stands for.
    ///
    /// Residue keys resolve to the first atom of that residue.
    pub fn atom_by_key(&self, key: i32, mode: KeyMode) -> Option<&AtomRecord> {
        match mode {
            KeyMode::Serial => self.atom_by_serial(key),
            KeyMode::Residue => self.first_in_residue(key),
        }
    }

    /// Residue ids in order of first appearance.
    pub fn residue_ids(&self) -> Vec<i32> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for atom in &self.atoms {
            if seen.insert(atom.residue_id) {
                order.push(atom.residue_id);
            }
        }
        order
    }

    pub fn residue_count(&self) -> usize {
        self.residue_ids().len()
    }

    /// Splits the atoms into per-residue groups.
    ///
    /// Groups appear in order of each residue's first atom; atoms inside a group keep their
    /// relative input order even when a residue is interleaved with others.
    pub fn group_by_residue(&self) -> Vec<(i32, Vec<AtomRecord>)> {
        let mut slots: HashMap<i32, usize> = HashMap::new();
        let mut groups: Vec<(i32, Vec<AtomRecord>)> = Vec::new();

        for atom in &self.atoms {
            let slot = *slots.entry(atom.residue_id).or_insert_with(|| {
                groups.push((atom.residue_id, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(atom.clone());
        }

        groups
    }

    /// Arithmetic mean of all positions, or the origin for an empty structure.
    pub fn geometric_center(&self) -> Point {
        if self.atoms.is_empty() {
            return Point::origin();
        }

        let sum = self
            .atoms
            .iter()
            .fold(Vector::zeros(), |acc, a| acc + a.pos.coords);
        Point::from(sum / self.atoms.len() as f64)
    }
}

impl FromIterator<AtomRecord> for Structure {
    fn from_iter<I: IntoIterator<Item = AtomRecord>>(iter: I) -> Self {
        Self::from_atoms(iter.into_iter().collect())
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structure {{ atoms: {}, residues: {} }}",
            self.atom_count(),
            self.residue_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Structure {
        Structure::from_atoms(vec![
            AtomRecord::new(1, "N", 1, Point::new(0.0, 0.0, 0.0)),
            AtomRecord::new(2, "P", 1, Point::new(1.0, 0.0, 0.0)),
            AtomRecord::new(3, "N", 2, Point::new(10.0, 0.0, 0.0)),
            AtomRecord::new(4, "C1", 1, Point::new(2.0, 0.0, 0.0)),
            AtomRecord::new(5, "P", 2, Point::new(11.0, 0.0, 0.0)),
        ])
    }

    #[test]
    fn structure_new_is_empty() {
        let structure = Structure::new();

        assert!(structure.is_empty());
        assert_eq!(structure.atom_count(), 0);
        assert_eq!(structure.residue_count(), 0);
    }

    #[test]
    fn atom_by_serial_finds_matching_record() {
        let structure = sample();

        assert_eq!(structure.atom_by_serial(4).map(|a| a.name.as_str()), Some("C1"));
        assert!(structure.atom_by_serial(99).is_none());
    }

    #[test]
    fn atom_by_key_resolves_residue_to_first_atom() {
        let structure = sample();

        let atom = structure.atom_by_key(2, KeyMode::Residue).unwrap();
        assert_eq!(atom.serial, 3);

        let atom = structure.atom_by_key(2, KeyMode::Serial).unwrap();
        assert_eq!(atom.name, "P");
    }

    #[test]
    fn residue_ids_follow_first_appearance() {
        assert_eq!(sample().residue_ids(), vec![1, 2]);
    }

    #[test]
    fn group_by_residue_keeps_relative_order_for_interleaved_atoms() {
        let groups = sample().group_by_residue();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, 1);
        let serials: Vec<_> = groups[0].1.iter().map(|a| a.serial).collect();
        assert_eq!(serials, vec![1, 2, 4]);
        assert_eq!(groups[1].0, 2);
        let serials: Vec<_> = groups[1].1.iter().map(|a| a.serial).collect();
        assert_eq!(serials, vec![3, 5]);
    }

    #[test]
    fn geometric_center_averages_positions() {
        let structure = Structure::from_atoms(vec![
            AtomRecord::new(1, "A", 1, Point::new(2.0, 0.0, 0.0)),
            AtomRecord::new(2, "B", 1, Point::new(4.0, 2.0, -2.0)),
        ]);

        let center = structure.geometric_center();
        assert!((center - Point::new(3.0, 1.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn geometric_center_of_empty_structure_is_origin() {
        assert_eq!(Structure::new().geometric_center(), Point::origin());
    }

    #[test]
    fn structure_collects_from_iterator() {
        let structure: Structure = (1..=3)
            .map(|i| AtomRecord::new(i, "C", 1, Point::new(i as f64, 0.0, 0.0)))
            .collect();

        assert_eq!(structure.atom_count(), 3);
    }

    #[test]
    fn structure_display_reports_counts() {
        assert_eq!(sample().to_string(), "Structure { atoms: 5, residues: 2 }");
    }
}

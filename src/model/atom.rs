//! Per-line atom record as read from a fixed-column coordinate file.
//!
//! Records are the unit every other layer works with: the bond builder reads their keys and
//! positions, the decomposer looks positions up by key, and the repositioner copies them with
//! a new position. Optional columns (occupancy, temperature factor, chain, segment) are carried
//! through untouched and never consulted by the geometry code.

use super::types::{KeyMode, Point, RecordKind};
use smol_str::SmolStr;
use std::fmt;

/// Labeled atom with identity, residue membership, and Cartesian position.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Atom serial number; unique within a structure.
    pub serial: i32,
    /// Atom name as written in the file (e.g. `P`, `C21`, `NC3`).
    pub name: SmolStr,
    /// Residue name (e.g. `POPC`), possibly empty.
    pub residue_name: SmolStr,
    /// Residue sequence number.
    pub residue_id: i32,
    /// Cartesian coordinates measured in ångströms.
    pub pos: Point,
    pub occupancy: Option<f64>,
    pub temp_factor: Option<f64>,
    pub chain_id: Option<char>,
    /// Segment identifier (columns 73-76); some lipid tools store the chain here instead.
    pub segment_id: Option<SmolStr>,
    pub kind: RecordKind,
}

impl AtomRecord {
    /// Creates a record with the mandatory fields; optional columns start empty.
    ///
    /// # Arguments
    ///
    /// * `serial` - Atom serial number.
    /// * `name` - Atom label such as `"P"` or `"C218"`.
    /// * `residue_id` - Residue sequence number.
    /// * `pos` - Position in ångströms.
    pub fn new(serial: i32, name: &str, residue_id: i32, pos: Point) -> Self {
        Self {
            serial,
            name: SmolStr::new(name),
            residue_name: SmolStr::default(),
            residue_id,
            pos,
            occupancy: None,
            temp_factor: None,
            chain_id: None,
            segment_id: None,
            kind: RecordKind::Atom,
        }
    }

    /// Sets the residue name, returning the updated record.
    pub fn with_residue_name(mut self, residue_name: &str) -> Self {
        self.residue_name = SmolStr::new(residue_name);
        self
    }

    /// Returns the bond-graph key of this record under the given key mode.
    pub fn key(&self, mode: KeyMode) -> i32 {
        match mode {
            KeyMode::Serial => self.serial,
            KeyMode::Residue => self.residue_id,
        }
    }

    /// Euclidean distance to another record in ångströms.
    pub fn distance(&self, other: &AtomRecord) -> f64 {
        nalgebra::distance(&self.pos, &other.pos)
    }

    /// Returns a copy of this record moved to `pos`, with all metadata preserved.
    pub fn moved_to(&self, pos: Point) -> Self {
        Self {
            pos,
            ..self.clone()
        }
    }

    /// Infers a chemical element symbol from the atom name.
    ///
    /// The common organic elements are recognized from the first letter, so `Cl` and `Ca`
    /// resolve to carbon and `Na` to nitrogen. Otherwise a short list of two-letter symbols is tried before falling
    /// back to the first character. An empty name yields an empty symbol.
    pub fn element_symbol(&self) -> &str {
        let name = self.name.as_str();
        let Some(first) = name.chars().next() else {
            return "";
        };

        if matches!(first, 'H' | 'C' | 'N' | 'O' | 'P' | 'S') {
            return &name[..1];
        }

        if let Some(two) = name.get(..2) {
            if matches!(two, "Br" | "Mg" | "Fe") {
                return two;
            }
        }

        &name[..first.len_utf8()]
    }
}

impl fmt::Display for AtomRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AtomRecord {{ serial: {}, name: \"{}\", residue: {}, pos: [{:.3}, {:.3}, {:.3}] }}",
            self.serial, self.name, self.residue_id, self.pos.x, self.pos.y, self.pos.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_record_new_leaves_optional_fields_empty() {
        let atom = AtomRecord::new(7, "C21", 3, Point::new(1.0, 2.0, 3.0));

        assert_eq!(atom.serial, 7);
        assert_eq!(atom.name, "C21");
        assert_eq!(atom.residue_id, 3);
        assert_eq!(atom.residue_name, "");
        assert!(atom.occupancy.is_none());
        assert!(atom.temp_factor.is_none());
        assert!(atom.chain_id.is_none());
        assert!(atom.segment_id.is_none());
        assert_eq!(atom.kind, RecordKind::Atom);
    }

    #[test]
    fn atom_record_key_follows_mode() {
        let atom = AtomRecord::new(12, "P", 4, Point::origin());

        assert_eq!(atom.key(KeyMode::Serial), 12);
        assert_eq!(atom.key(KeyMode::Residue), 4);
    }

    #[test]
    fn atom_record_distance_calculates_correctly() {
        let a = AtomRecord::new(1, "A", 1, Point::new(0.0, 0.0, 0.0));
        let b = AtomRecord::new(2, "B", 1, Point::new(3.0, 4.0, 0.0));

        assert!((a.distance(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn atom_record_moved_to_preserves_metadata() {
        let mut atom = AtomRecord::new(5, "O11", 2, Point::new(1.0, 1.0, 1.0))
            .with_residue_name("POPC");
        atom.occupancy = Some(0.5);
        atom.temp_factor = Some(12.25);
        atom.chain_id = Some('B');
        atom.segment_id = Some(SmolStr::new("MEMB"));
        atom.kind = RecordKind::Hetatm;

        let moved = atom.moved_to(Point::new(-1.0, 0.0, 2.0));

        assert_eq!(moved.pos, Point::new(-1.0, 0.0, 2.0));
        assert_eq!(moved.serial, atom.serial);
        assert_eq!(moved.name, atom.name);
        assert_eq!(moved.residue_name, atom.residue_name);
        assert_eq!(moved.occupancy, atom.occupancy);
        assert_eq!(moved.temp_factor, atom.temp_factor);
        assert_eq!(moved.chain_id, atom.chain_id);
        assert_eq!(moved.segment_id, atom.segment_id);
        assert_eq!(moved.kind, atom.kind);
    }

    #[test]
    fn element_symbol_recognizes_single_letter_organics() {
        let cases = [("C218", "C"), ("H91", "H"), ("N", "N"), ("O14", "O"), ("P", "P")];
        for (name, expected) in cases {
            let atom = AtomRecord::new(1, name, 1, Point::origin());
            assert_eq!(atom.element_symbol(), expected, "name {}", name);
        }
    }

    #[test]
    fn element_symbol_recognizes_two_letter_symbols() {
        for name in ["Br", "Mg", "Fe"] {
            let atom = AtomRecord::new(1, name, 1, Point::origin());
            assert_eq!(atom.element_symbol(), name);
        }
    }

    #[test]
    fn element_symbol_prefers_single_letter_for_ambiguous_names() {
        for (name, expected) in [("Ca", "C"), ("Cl", "C"), ("Na", "N")] {
            let atom = AtomRecord::new(1, name, 1, Point::origin());
            assert_eq!(atom.element_symbol(), expected, "name {}", name);
        }
    }

    #[test]
    fn element_symbol_falls_back_to_first_character() {
        let atom = AtomRecord::new(1, "ZN1", 1, Point::origin());
        assert_eq!(atom.element_symbol(), "Z");

        let empty = AtomRecord::new(1, "", 1, Point::origin());
        assert_eq!(empty.element_symbol(), "");
    }

    #[test]
    fn atom_record_display_formats_correctly() {
        let atom = AtomRecord::new(3, "P", 1, Point::new(1.234, -5.678, 9.012));

        let expected = "AtomRecord { serial: 3, name: \"P\", residue: 1, pos: [1.234, -5.678, 9.012] }";
        assert_eq!(atom.to_string(), expected);
    }
}

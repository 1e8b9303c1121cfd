use nalgebra::{Point3, Vector3};
use std::fmt;
use std::str::FromStr;

pub type Point = Point3<f64>;

pub type Vector = Vector3<f64>;

/// Identifier used as the node key of a bond graph.
///
/// Atom-level graphs key nodes by the record serial number. Coarse-grained inputs, where
/// every bead carries its own residue number, are keyed by residue id instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyMode {
    #[default]
    Serial,
    Residue,
}

/// Record type of a coordinate line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordKind {
    #[default]
    Atom,
    Hetatm,
}

impl KeyMode {
    pub fn name(&self) -> &'static str {
        match self {
            KeyMode::Serial => "serial",
            KeyMode::Residue => "residue",
        }
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for KeyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "serial" | "atom" => Ok(KeyMode::Serial),
            "residue" | "resid" => Ok(KeyMode::Residue),
            _ => Err(format!("Invalid key mode: {}", s)),
        }
    }
}

impl RecordKind {
    /// Six-column record label as it appears at the start of a coordinate line.
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Atom => "ATOM  ",
            RecordKind::Hetatm => "HETATM",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label().trim_end())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ATOM" => Ok(RecordKind::Atom),
            "HETATM" => Ok(RecordKind::Hetatm),
            _ => Err(format!("Invalid record kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_mode_parses_aliases_case_insensitively() {
        assert_eq!("serial".parse::<KeyMode>(), Ok(KeyMode::Serial));
        assert_eq!("Residue".parse::<KeyMode>(), Ok(KeyMode::Residue));
        assert_eq!("RESID".parse::<KeyMode>(), Ok(KeyMode::Residue));
        assert!("chain".parse::<KeyMode>().is_err());
    }

    #[test]
    fn key_mode_display_round_trips_through_from_str() {
        for mode in [KeyMode::Serial, KeyMode::Residue] {
            assert_eq!(mode.to_string().parse::<KeyMode>(), Ok(mode));
        }
    }

    #[test]
    fn record_kind_label_is_six_columns_wide() {
        assert_eq!(RecordKind::Atom.label().len(), 6);
        assert_eq!(RecordKind::Hetatm.label().len(), 6);
        assert_eq!(RecordKind::Atom.to_string(), "ATOM");
    }

    #[test]
    fn record_kind_from_str_trims_padding() {
        assert_eq!("ATOM  ".parse::<RecordKind>(), Ok(RecordKind::Atom));
        assert_eq!("HETATM".parse::<RecordKind>(), Ok(RecordKind::Hetatm));
        assert!("REMARK".parse::<RecordKind>().is_err());
    }
}

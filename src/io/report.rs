//! Plain-text report of a structure and its rooted decomposition.

use crate::io::error::Error;
use crate::model::structure::Structure;
use crate::ops::Decomposition;
use std::io::Write;

/// Writes the atom table, the annotated edge table, and the path listing.
///
/// The `ORIGINAL` table identifies atoms by the decomposition's node key, so residue-keyed
/// reports list residue ids there. Bond lengths are printed to four decimals and bond
/// angles to two.
pub fn write_graph_report<W: Write>(
    mut writer: W,
    structure: &Structure,
    decomposition: &Decomposition,
) -> Result<(), Error> {
    let io = |e| Error::from_io(e, None);

    writeln!(writer, "ORIGINAL").map_err(io)?;
    writeln!(
        writer,
        "{:>5}{:>8}{:>10}{:>10}{:>10}",
        "ID", "Elem", "X", "Y", "Z"
    )
    .map_err(io)?;
    writeln!(writer, "{}", "-".repeat(43)).map_err(io)?;
    for atom in structure.iter_atoms() {
        writeln!(
            writer,
            "{:>5}{:>8}{:>10.3}{:>10.3}{:>10.3}",
            atom.key(decomposition.key_mode),
            atom.element_symbol(),
            atom.pos.x,
            atom.pos.y,
            atom.pos.z
        )
        .map_err(io)?;
    }

    writeln!(writer).map_err(io)?;
    writeln!(writer, "GRAPH").map_err(io)?;
    writeln!(
        writer,
        "{:<8}{:<8}{:<15}{:<12}",
        "Parent", "Child", "Bond Length", "Bond Angle"
    )
    .map_err(io)?;
    writeln!(
        writer,
        "{:<8}{:<8}{:<15}{:<12}",
        "------", "-----", "-----------", "----------"
    )
    .map_err(io)?;
    for edge in &decomposition.edges {
        writeln!(
            writer,
            "{:<8}{:<8}{:<15.4}{:<12.2}",
            edge.from, edge.to, edge.bond_length, edge.bond_angle
        )
        .map_err(io)?;
    }

    writeln!(writer).map_err(io)?;
    writeln!(
        writer,
        "PATHS (root {}, {} total)",
        decomposition.root,
        decomposition.paths.len()
    )
    .map_err(io)?;
    for (i, path) in decomposition.paths.iter().enumerate() {
        writeln!(writer, "{:>4}. [{}] {}", i + 1, path.len(), path).map_err(io)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{atom::AtomRecord, types::Point};
    use crate::model::types::KeyMode;
    use crate::ops::{AnnotatedEdge, Path};

    fn sample() -> (Structure, Decomposition) {
        let structure = Structure::from_atoms(vec![
            AtomRecord::new(1, "N", 1, Point::new(0.0, 0.0, 0.0)),
            AtomRecord::new(2, "C1", 1, Point::new(1.5, 0.0, 0.0)),
        ]);
        let decomposition = Decomposition {
            root: 1,
            key_mode: KeyMode::Serial,
            paths: vec![Path::from(vec![1, 2])],
            edges: vec![
                AnnotatedEdge {
                    from: 1,
                    to: 2,
                    bond_length: 1.5,
                    bond_angle: 0.0,
                },
                AnnotatedEdge {
                    from: 2,
                    to: 1,
                    bond_length: 1.5,
                    bond_angle: 0.0,
                },
            ],
        };
        (structure, decomposition)
    }

    fn render() -> String {
        let (structure, decomposition) = sample();
        render_with(&structure, &decomposition)
    }

    fn render_with(structure: &Structure, decomposition: &Decomposition) -> String {
        let mut buffer = Vec::new();
        write_graph_report(&mut buffer, structure, decomposition).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn report_lists_atoms_in_original_section() {
        let output = render();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "ORIGINAL");
        assert_eq!(lines[1], "   ID    Elem         X         Y         Z");
        assert_eq!(lines[3], "    1       N     0.000     0.000     0.000");
        assert_eq!(lines[4], "    2       C     1.500     0.000     0.000");
    }

    #[test]
    fn report_formats_edges_with_fixed_precision() {
        let output = render();

        assert!(output.contains("\nGRAPH\n"));
        assert!(output.contains("1       2       1.5000         0.00        \n"));
        assert!(output.contains("2       1       1.5000         0.00        \n"));
    }

    #[test]
    fn report_ends_with_paths() {
        let output = render();

        assert!(output.contains("PATHS (root 1, 1 total)"));
        assert_eq!(output.lines().last(), Some("   1. [2] 1 -> 2"));
    }

    #[test]
    fn residue_keyed_report_lists_residue_ids() {
        let structure = Structure::from_atoms(vec![
            AtomRecord::new(11, "NC3", 7, Point::new(0.0, 0.0, 0.0)),
            AtomRecord::new(12, "PO4", 8, Point::new(0.0, 0.0, 1.5)),
        ]);
        let decomposition = Decomposition {
            root: 7,
            key_mode: KeyMode::Residue,
            paths: vec![Path::from(vec![7, 8])],
            edges: Vec::new(),
        };

        let output = render_with(&structure, &decomposition);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[3], "    7       N     0.000     0.000     0.000");
        assert_eq!(lines[4], "    8       P     0.000     0.000     1.500");
        assert!(output.contains("PATHS (root 7, 1 total)"));
    }
}

use crate::io::error::Error;
use crate::model::{
    atom::AtomRecord, structure::Structure, topology::Topology, types::KeyMode,
};
use std::collections::BTreeMap;
use std::io::Write;

pub fn write_structure<W: Write>(writer: W, structure: &Structure) -> Result<(), Error> {
    write_structure_with_remarks::<W, &str>(writer, structure, &[])
}

/// Writes `REMARK` lines ahead of the atom records.
///
/// Multi-line remark text becomes one `REMARK` line per text line.
pub fn write_structure_with_remarks<W: Write, S: AsRef<str>>(
    writer: W,
    structure: &Structure,
    remarks: &[S],
) -> Result<(), Error> {
    let mut ctx = WriterContext::new(writer);

    ctx.write_remarks(remarks)?;

    ctx.write_atoms(structure)?;

    ctx.write_end()?;

    Ok(())
}

/// Writes the atoms followed by `CONECT` records for every bond.
///
/// Only serial-keyed topologies can be written; residue keys do not name atoms.
pub fn write_topology<W: Write>(writer: W, topology: &Topology) -> Result<(), Error> {
    if topology.key_mode() != KeyMode::Serial {
        return Err(Error::inconsistent_data(
            "PDB",
            None,
            format!(
                "CONECT records need atom serial keys, graph is keyed by {}",
                topology.key_mode()
            ),
        ));
    }

    let mut ctx = WriterContext::new(writer);

    ctx.write_atoms(topology.structure())?;

    ctx.write_connects(topology)?;

    ctx.write_end()?;

    Ok(())
}

struct WriterContext<W> {
    writer: W,
}

impl<W: Write> WriterContext<W> {
    fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_remarks<S: AsRef<str>>(&mut self, remarks: &[S]) -> Result<(), Error> {
        for remark in remarks {
            for line in remark.as_ref().lines() {
                writeln!(self.writer, "REMARK {}", line).map_err(|e| Error::from_io(e, None))?;
            }
        }
        Ok(())
    }

    fn write_atoms(&mut self, structure: &Structure) -> Result<(), Error> {
        for atom in structure.iter_atoms() {
            self.write_atom_record(atom)?;
        }
        Ok(())
    }

    fn write_atom_record(&mut self, atom: &AtomRecord) -> Result<(), Error> {
        let atom_name = if atom.name.chars().count() >= 4 {
            format!("{:<4}", truncate(&atom.name, 4))
        } else {
            format!(" {:<3}", atom.name)
        };

        writeln!(
            self.writer,
            "{:6}{:>5} {:4} {:<4}{:1}{:>4}    {:8.3}{:8.3}{:8.3}{:6.2}{:6.2}      {:<4}{:>2}",
            atom.kind.label(),
            atom.serial % 100000,
            atom_name,
            truncate(&atom.residue_name, 4),
            atom.chain_id.unwrap_or(' '),
            atom.residue_id % 10000,
            atom.pos.x,
            atom.pos.y,
            atom.pos.z,
            atom.occupancy.unwrap_or(1.0),
            atom.temp_factor.unwrap_or(0.0),
            atom.segment_id.as_deref().map(|s| truncate(s, 4)).unwrap_or(""),
            truncate(atom.element_symbol(), 2).to_uppercase()
        )
        .map_err(|e| Error::from_io(e, None))
    }

    fn write_connects(&mut self, topology: &Topology) -> Result<(), Error> {
        let graph = topology.graph();
        let mut adjacency: BTreeMap<i32, Vec<i32>> = BTreeMap::new();

        for (a, b) in graph.bonds() {
            for serial in [a, b] {
                if topology.atom_of(serial).is_none() {
                    return Err(Error::inconsistent_data(
                        "PDB",
                        None,
                        format!("bond references atom serial {} that was not written", serial),
                    ));
                }
            }
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }

        for (src_serial, mut targets) in adjacency {
            targets.sort();
            targets.dedup();

            for chunk in targets.chunks(4) {
                write!(self.writer, "CONECT{:5}", src_serial)
                    .map_err(|e| Error::from_io(e, None))?;
                for target in chunk {
                    write!(self.writer, "{:5}", target).map_err(|e| Error::from_io(e, None))?;
                }
                writeln!(self.writer).map_err(|e| Error::from_io(e, None))?;
            }
        }

        Ok(())
    }

    fn write_end(&mut self) -> Result<(), Error> {
        writeln!(self.writer, "END   ").map_err(|e| Error::from_io(e, None))
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

use crate::io::error::Error;
use crate::model::{
    atom::AtomRecord,
    structure::Structure,
    types::{Point, RecordKind},
};
use smol_str::SmolStr;
use std::collections::HashSet;
use std::io::BufRead;
use std::str::FromStr;

const FORMAT: &str = "PDB";

/// Shortest line that still carries all three coordinates.
const MIN_RECORD_LEN: usize = 54;

/// Reads every well-formed `ATOM`/`HETATM` record, logging the lines that were skipped.
///
/// # Errors
///
/// Fails on an I/O error, or with [`Error::EmptyStructure`] when no record could be read.
pub fn read<R: BufRead>(reader: R) -> Result<Structure, Error> {
    let (structure, skipped) = read_with_diagnostics(reader)?;
    for diagnostic in &skipped {
        log::warn!("{}", diagnostic);
    }
    Ok(structure)
}

/// Reads every well-formed `ATOM`/`HETATM` record and returns the skipped lines' errors.
///
/// Lines that are not atom records, or are too short to hold coordinates, are ignored
/// silently whatever their encoding. Atom records that are not valid UTF-8, have
/// unparsable fields, or repeat a serial already seen are skipped and reported as
/// [`Error::Parse`].
pub fn read_with_diagnostics<R: BufRead>(reader: R) -> Result<(Structure, Vec<Error>), Error> {
    let mut atoms = Vec::new();
    let mut seen = HashSet::new();
    let mut skipped = Vec::new();

    for (index, raw) in reader.split(b'\n').enumerate() {
        let line_num = index + 1;
        let mut raw = raw.map_err(|e| Error::from_io(e, None))?;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }

        let kind = if raw.starts_with(b"ATOM") {
            RecordKind::Atom
        } else if raw.starts_with(b"HETATM") {
            RecordKind::Hetatm
        } else {
            continue;
        };

        if raw.len() < MIN_RECORD_LEN {
            continue;
        }

        let line = match String::from_utf8(raw) {
            Ok(line) => line,
            Err(_) => {
                skipped.push(Error::parse(
                    FORMAT,
                    None,
                    line_num,
                    "record is not valid UTF-8",
                ));
                continue;
            }
        };

        match parse_atom_record(&line, line_num, kind) {
            Ok(atom) if !seen.insert(atom.serial) => skipped.push(Error::parse(
                FORMAT,
                None,
                line_num,
                format!("duplicate atom serial {}", atom.serial),
            )),
            Ok(atom) => atoms.push(atom),
            Err(e) => skipped.push(e),
        }
    }

    if atoms.is_empty() {
        return Err(Error::empty_structure(None));
    }

    log::debug!(
        "read {} atom records, skipped {} malformed lines",
        atoms.len(),
        skipped.len()
    );

    Ok((Structure::from_atoms(atoms), skipped))
}

fn parse_atom_record(line: &str, line_num: usize, kind: RecordKind) -> Result<AtomRecord, Error> {
    let field = |start: usize, end: usize, what: &str| {
        column(line, start, end)
            .map(str::trim)
            .ok_or_else(|| Error::parse(FORMAT, None, line_num, format!("unreadable {}", what)))
    };
    let number = |start: usize, end: usize, what: &str| -> Result<f64, Error> {
        let text = field(start, end, what)?;
        f64::from_str(text).map_err(|_| {
            Error::parse(
                FORMAT,
                None,
                line_num,
                format!("invalid {} '{}'", what, text),
            )
        })
    };
    let optional = |start: usize, end: usize| -> Option<f64> {
        column(line, start, end)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse().ok())
    };

    let serial_text = field(6, 11, "atom serial")?;
    let serial = serial_text.parse::<i32>().map_err(|_| {
        Error::parse(
            FORMAT,
            None,
            line_num,
            format!("invalid atom serial '{}'", serial_text),
        )
    })?;

    let name = field(12, 16, "atom name")?;
    let residue_name = field(17, 21, "residue name")?;
    let chain_id = column(line, 21, 22).and_then(|s| s.chars().next()).filter(|c| *c != ' ');

    let residue_text = field(22, 26, "residue number")?;
    let residue_id = residue_text.parse::<i32>().map_err(|_| {
        Error::parse(
            FORMAT,
            None,
            line_num,
            format!("invalid residue number '{}'", residue_text),
        )
    })?;

    let x = number(30, 38, "x coordinate")?;
    let y = number(38, 46, "y coordinate")?;
    let z = number(46, 54, "z coordinate")?;

    let segment_id = column(line, 72, 76)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SmolStr::new);

    Ok(AtomRecord {
        serial,
        name: SmolStr::new(name),
        residue_name: SmolStr::new(residue_name),
        residue_id,
        pos: Point::new(x, y, z),
        occupancy: optional(54, 60),
        temp_factor: optional(60, 66),
        chain_id,
        segment_id,
        kind,
    })
}

/// Character columns `start..end`, clipped to the end of the line.
///
/// Returns `None` when the line ends before `start`.
fn column(line: &str, start: usize, end: usize) -> Option<&str> {
    if line.is_ascii() {
        return line.get(start..end.min(line.len()));
    }
    if start > line.chars().count() {
        return None;
    }
    let offset = |col: usize| {
        line.char_indices()
            .nth(col)
            .map_or(line.len(), |(index, _)| index)
    };
    line.get(offset(start)..offset(end))
}

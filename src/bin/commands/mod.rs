use std::fs::File;
use std::io::{self as stdio, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;

use lipid_forge::io::{read_pdb_structure, write_pdb_structure_with_remarks, write_pdb_topology};
use lipid_forge::{KeyMode, Structure, Topology, Vector};

pub mod bonds;
pub mod paths;
pub mod reposition;

/// Aggregated IO parameters shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct IoParameters {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Loads a PDB structure from the configured input source.
pub fn load_input(params: &IoParameters) -> Result<Structure> {
    if let Some(path) = &params.input {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input file {}", path.display()))?;
        read_structure(BufReader::new(file))
            .with_context(|| format!("Failed to parse PDB input from {}", path.display()))
    } else {
        let stdin = stdio::stdin();
        if stdin.is_terminal() {
            bail!(
                "No --input provided and stdin is a TTY. Provide -i/--input or pipe a PDB file into lipidforge."
            );
        }
        read_structure(BufReader::new(stdin.lock()))
            .context("Failed to parse PDB input from stdin")
    }
}

/// Saves a structure, preceded by `REMARK` lines, to the configured output destination.
pub fn save_output(
    structure: &Structure,
    remarks: &[String],
    params: &IoParameters,
) -> Result<()> {
    with_output(params.output.as_deref(), |writer| {
        write_pdb_structure_with_remarks(writer, structure, remarks).map_err(anyhow::Error::new)
    })
}

/// Saves a topology with `CONECT` records; residue-keyed graphs fall back to plain atoms.
pub fn save_topology(topology: &Topology, params: &IoParameters) -> Result<()> {
    if topology.key_mode() != KeyMode::Serial {
        log::info!(
            "Graph is keyed by {}; writing atoms without CONECT records",
            topology.key_mode()
        );
        return save_output(topology.structure(), &[], params);
    }

    with_output(params.output.as_deref(), |writer| {
        write_pdb_topology(writer, topology).map_err(anyhow::Error::new)
    })
}

fn read_structure<R: BufRead>(reader: R) -> Result<Structure> {
    read_pdb_structure(reader).map_err(anyhow::Error::new)
}

fn with_output<F>(output: Option<&Path>, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write(&mut writer)
                .with_context(|| format!("Failed to write PDB output to {}", path.display()))?;
            writer.flush().context("Failed to flush output writer")?;
        }
        None => {
            let stdout = stdio::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            write(&mut writer).context("Failed to write PDB output to stdout")?;
            writer.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

/// Wraps long-running operations with a spinner rendered to stderr.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{} ✓", message)),
        Err(_) => spinner.abandon_with_message(format!("{} ✗", message)),
    }

    result
}

/// Parses a direction written as `X,Y,Z`.
pub fn parse_vector(text: &str) -> Result<Vector, String> {
    let components = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid vector '{}': {}", text, e))?;

    match components.as_slice() {
        [x, y, z] if x.is_finite() && y.is_finite() && z.is_finite() => {
            Ok(Vector::new(*x, *y, *z))
        }
        [_, _, _] => Err(format!("vector '{}' has non-finite components", text)),
        _ => Err(format!(
            "expected three comma-separated components, got '{}'",
            text
        )),
    }
}

pub fn format_vector(v: &Vector) -> String {
    format!("{:.3},{:.3},{:.3}", v.x, v.y, v.z)
}

pub fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> stdio::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{}│", inner)?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}

/// Returns true when stdout is a TTY and no explicit output file was supplied.
pub fn interactive_stdout_requested(params: &IoParameters) -> bool {
    params.output.is_none() && stdio::stdout().is_terminal()
}

/// Ensures commands do not dump structured output directly into an interactive terminal.
pub fn ensure_noninteractive_stdout(command: &str, params: &IoParameters) -> Result<()> {
    if interactive_stdout_requested(params) {
        bail!(
            "Refusing to stream {command} results to an interactive terminal. Use -o/--output or pipe the command into a file."
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_vector_accepts_signed_components() {
        assert_eq!(parse_vector("0,0,-1").unwrap(), Vector::new(0.0, 0.0, -1.0));
        assert_eq!(
            parse_vector(" 1.5, -2 ,3e1").unwrap(),
            Vector::new(1.5, -2.0, 30.0)
        );
    }

    #[test]
    fn parse_vector_rejects_wrong_arity_and_garbage() {
        assert!(parse_vector("1,2").is_err());
        assert!(parse_vector("1,2,3,4").is_err());
        assert!(parse_vector("x,0,0").is_err());
        assert!(parse_vector("inf,0,0").is_err());
    }

    #[test]
    fn format_vector_uses_three_decimals() {
        assert_eq!(format_vector(&Vector::new(1.0, -0.5, 2.25)), "1.000,-0.500,2.250");
    }
}

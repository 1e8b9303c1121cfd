use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use lipid_forge::ops::{BondGraphBuilder, DEFAULT_BOND_CUTOFF};
use lipid_forge::{KeyMode, Structure, Topology};

use crate::commands::{print_boxed_label, run_with_spinner};

/// Perceives bonds from interatomic distances and reports the connectivity.
#[derive(Debug, Args)]
pub struct BondsArgs {
    /// Bonding cutoff distance (Å); pairs strictly closer are bonded.
    #[arg(long, default_value_t = DEFAULT_BOND_CUTOFF)]
    pub cutoff: f64,
    /// Graph node key: `serial` (one node per atom) or `residue`.
    #[arg(long, default_value_t = KeyMode::Serial)]
    pub key: KeyMode,
}

/// Builds the bond graph and prints a connectivity summary to stderr.
pub fn run(structure: Structure, args: &BondsArgs) -> Result<Topology> {
    let topology = run_with_spinner("Perceiving bonds", || {
        Ok(BondGraphBuilder::new()
            .cutoff(args.cutoff)
            .key_mode(args.key)
            .build(structure))
    })?;

    print_tables(&topology, args)?;
    Ok(topology)
}

fn print_tables(topology: &Topology, args: &BondsArgs) -> Result<()> {
    let graph = topology.graph();
    let mut stderr = io::stderr().lock();

    print_boxed_label(&mut stderr, "Connectivity Summary")?;
    let mut summary = Table::new();
    summary.set_format(*format::consts::FORMAT_BOX_CHARS);
    summary.set_titles(row!["Metric", "Value"]);
    summary.add_row(row!["Atoms", topology.atom_count()]);
    summary.add_row(row!["Nodes", graph.node_count()]);
    summary.add_row(row!["Bonds", graph.bond_count()]);
    summary.add_row(row!["Isolated Nodes", graph.isolated().count()]);
    summary.add_row(row!["Cutoff (Å)", format!("{:.3}", args.cutoff)]);
    summary.add_row(row!["Key Mode", args.key]);
    summary
        .print(&mut stderr)
        .context("Failed to render connectivity summary")?;
    writeln!(&mut stderr)?;

    print_boxed_label(&mut stderr, "Neighbors")?;
    let mut neighbors = Table::new();
    neighbors.set_format(*format::consts::FORMAT_BOX_CHARS);
    neighbors.set_titles(row!["Key", "Name", "Degree", "Neighbors"]);
    for (key, partners) in graph.iter() {
        let name = topology
            .atom_of(key)
            .map(|atom| match args.key {
                KeyMode::Serial => atom.name.to_string(),
                KeyMode::Residue => atom.residue_name.to_string(),
            })
            .unwrap_or_default();
        let listed = partners
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        neighbors.add_row(row![key, name, partners.len(), listed]);
    }
    neighbors
        .print(&mut stderr)
        .context("Failed to render neighbor table")?;

    Ok(())
}

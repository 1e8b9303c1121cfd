use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::IoParameters;
use commands::{bonds, paths, reposition};

#[derive(Parser, Debug)]
#[command(
    name = "lipidforge",
    about = "A command-line tool for bond perception, branch decomposition, and rigid repositioning of lipid-like molecules.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Input PDB file path. When omitted, stdin is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    input: Option<PathBuf>,
    /// Output PDB file path. When omitted, stdout is used.
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Perceive bonds and summarize the connectivity.
    Bonds(bonds::BondsArgs),
    /// Enumerate rooted paths and annotate bond lengths and angles.
    Paths(paths::PathsArgs),
    /// Rotate the structure or each residue toward a target direction.
    Reposition(reposition::RepositionArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let io_params = IoParameters {
        input: cli.input.clone(),
        output: cli.output.clone(),
    };

    match cli.command {
        Command::Bonds(args) => {
            let structure = commands::load_input(&io_params)?;
            let topology = bonds::run(structure, &args)?;
            if !commands::interactive_stdout_requested(&io_params) {
                commands::save_topology(&topology, &io_params)?;
            }
        }
        Command::Paths(args) => {
            let structure = commands::load_input(&io_params)?;
            let structure = paths::run(structure, &args)?;
            if !commands::interactive_stdout_requested(&io_params) {
                commands::save_output(&structure, &[], &io_params)?;
            }
        }
        Command::Reposition(args) => {
            commands::ensure_noninteractive_stdout("reposition", &io_params)?;
            let structure = commands::load_input(&io_params)?;
            let (moved, remarks) = reposition::run(&structure, &args)?;
            commands::save_output(&moved, &remarks, &io_params)?;
        }
    }

    Ok(())
}

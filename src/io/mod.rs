mod error;
mod pdb;
mod report;

pub use pdb::reader::{
    read as read_pdb_structure, read_with_diagnostics as read_pdb_with_diagnostics,
};
pub use pdb::writer::{
    write_structure as write_pdb_structure,
    write_structure_with_remarks as write_pdb_structure_with_remarks,
    write_topology as write_pdb_topology,
};

pub use report::write_graph_report;

pub use error::Error;

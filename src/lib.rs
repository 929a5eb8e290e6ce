use std::path::Path;

use clap::ValueEnum;
use error::GraphResult;
use graphs::graph_factory::read_fmi;
use search::{ch::contracted_graph::ContractedGraph, PathFinding};
use utility::{get_progressspinner, read_bincode};

pub mod error;
pub mod graphs;
pub mod search;
pub mod utility;

pub use search::ch::contraction::{preprocess, ContractionParams};
pub use search::ch::priority::OrderingStrategy;

#[derive(Debug, ValueEnum, Clone)]
pub enum FileType {
    /// Contracted graph in bincode format
    CH,
    /// Uncontracted graph in FMI text format, searched with Dijkstra
    FMI,
}

pub fn reading_pathfinder(path: &Path, file_type: &FileType) -> GraphResult<Box<dyn PathFinding>> {
    let pathfinder: Box<dyn PathFinding> = match file_type {
        FileType::CH => {
            let spinner = get_progressspinner("Reading contracted graph");
            let contracted_graph: ContractedGraph = read_bincode(path)?;
            spinner.finish_and_clear();
            Box::new(contracted_graph)
        }
        FileType::FMI => Box::new(read_fmi(path)?),
    };
    Ok(pathfinder)
}

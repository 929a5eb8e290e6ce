use std::{path::PathBuf, time::Instant};

use clap::Parser;
use hierarchy_paths::{
    graphs::graph_factory::read_fmi,
    preprocess,
    utility::{read_json, write_bincode},
    ContractionParams, OrderingStrategy,
};
use log::info;

/// Contracts a graph and writes the resulting hierarchy in bincode format.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Infile in .fmi format
    #[arg(short, long)]
    graph: PathBuf,
    /// Outfile in .bincode format
    #[arg(short, long)]
    contracted_graph: PathBuf,
    /// Contraction parameters in .json format
    #[arg(short, long)]
    params: Option<PathBuf>,
    /// Overrides the ordering strategy of the parameters
    #[arg(short, long, value_enum)]
    strategy: Option<OrderingStrategy>,
    /// Overrides the settle budget of witness searches
    #[arg(short, long)]
    max_settles: Option<usize>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut params: ContractionParams = match &args.params {
        Some(path) => read_json(path).expect("could not read contraction parameters"),
        None => ContractionParams::default(),
    };
    if let Some(strategy) = args.strategy {
        params.strategy = strategy;
    }
    if args.max_settles.is_some() {
        params.max_settles = args.max_settles;
    }
    info!("Using {:?}", params);

    info!("Loading graph");
    let start = Instant::now();
    let graph = read_fmi(&args.graph).expect("could not read graph");
    info!("it took {:?} to load graph", start.elapsed());

    info!("Starting contracted graph generation");
    let start = Instant::now();
    let contracted_graph = preprocess(graph, &params).expect("contraction failed");
    info!(
        "Generating contracted graph took {:?}, {} shortcuts",
        start.elapsed(),
        contracted_graph.shortcuts().count()
    );

    info!("Writing contracted graph to file");
    write_bincode(&args.contracted_graph, &contracted_graph)
        .expect("could not write contracted graph");
}

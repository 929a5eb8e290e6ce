use std::path::PathBuf;

use clap::Parser;
use hierarchy_paths::{
    graphs::graph_factory::read_fmi,
    utility::{generate_random_pair_test_cases, write_json},
};
use log::info;

/// Generates `number_of_test_cases` many random pair test cases with Dijkstra
/// for the graph specified at `graph`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Infile in .fmi format
    #[arg(short, long)]
    graph: PathBuf,
    /// Number of test cases to generate
    #[arg(short, long)]
    number_of_test_cases: u32,
    /// Seed of the random pairs
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// Path of the test cases
    #[arg(short, long)]
    test_cases: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    info!("Reading graph");
    let graph = read_fmi(&args.graph).expect("could not read graph");

    let test_cases = generate_random_pair_test_cases(&graph, args.number_of_test_cases, args.seed);

    info!("Writing {} test cases", test_cases.len());
    write_json(&args.test_cases, &test_cases).expect("could not write test cases");
}

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use hierarchy_paths::{
    graphs::graph_factory::read_fmi,
    reading_pathfinder,
    search::path::ShortestPathTestCase,
    utility::{read_json, validate_path_and_time, write_json},
    FileType,
};
use log::info;

/// Answers the requests of `test_cases` with `pathfinder`, checks every path
/// against `graph` and reports the average query time.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Contracted graph or plain graph
    #[arg(short, long)]
    pathfinder: PathBuf,
    /// Format of the pathfinder file
    #[arg(short, long, value_enum, default_value_t = FileType::CH)]
    file_type: FileType,
    /// Graph in `.fmi` format
    #[arg(short, long)]
    graph: PathBuf,
    /// Path of the test cases
    #[arg(short, long)]
    test_cases: PathBuf,
    /// Path where the results shall be saved
    #[arg(long)]
    timing_results: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    info!("Reading test cases");
    let test_cases: Vec<ShortestPathTestCase> =
        read_json(&args.test_cases).expect("could not read test cases");

    info!("Reading graph");
    let graph = read_fmi(&args.graph).expect("could not read graph");

    info!("Reading pathfinder");
    let path_finder =
        reading_pathfinder(&args.pathfinder, &args.file_type).expect("could not read pathfinder");

    info!("Testing & validating");
    let results = match validate_path_and_time(&test_cases, &*path_finder, &graph) {
        Ok(results) => results,
        Err(err) => panic!("pathfinder is wrong: {}", err),
    };
    let average = results
        .iter()
        .map(|result| result.timing_in_seconds)
        .sum::<f64>()
        / results.len().max(1) as f64;

    println!(
        "All correct. Took {:?} per query averaged over {} queries",
        Duration::from_secs_f64(average),
        test_cases.len()
    );

    if let Some(timing_results) = args.timing_results {
        info!("Writing timing results");
        write_json(&timing_results, &results).expect("could not write timing results");
    }
}

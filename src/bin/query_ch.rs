use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use clap::Parser;
use hierarchy_paths::{
    search::ch::{
        contracted_graph::ContractedGraph,
        pathfinding::{QueryControl, SearchState},
    },
    utility::read_bincode,
};

/// Answers a single query on a contracted graph and prints the unpacked path.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Contracted graph in .bincode format
    #[arg(short, long)]
    contracted_graph: PathBuf,
    #[arg(short, long)]
    source: u32,
    #[arg(short, long)]
    target: u32,
    /// Gives up after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let contracted_graph: ContractedGraph =
        read_bincode(&args.contracted_graph).expect("could not read contracted graph");

    let mut control = QueryControl::default();
    if let Some(timeout_ms) = args.timeout_ms {
        control.deadline = Some(Instant::now() + Duration::from_millis(timeout_ms));
    }

    let mut state = SearchState::new();
    let start = Instant::now();
    match contracted_graph.search(&mut state, args.source, args.target, &control) {
        Ok((meeting, weight)) => {
            let took = start.elapsed();
            let path = contracted_graph.reconstruct(&state, meeting, weight);
            println!(
                "weight {} over {} arcs, settled {} vertices, took {:?}",
                path.weight,
                path.arcs.len(),
                state.settled(),
                took
            );
            let vertices = path
                .vertices()
                .iter()
                .map(|vertex| vertex.to_string())
                .collect::<Vec<_>>();
            println!("{}", vertices.join(" "));
        }
        Err(err) => println!("{}", err),
    }
}

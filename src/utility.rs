use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path as FilePath,
    time::{Duration, Instant},
};

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressIterator, ProgressStyle};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    error::GraphResult,
    graphs::{graph_store::GraphStore, Weight},
    search::{
        dijkstra::dijkstra_one_to_one_wrapped,
        path::{Path, ShortestPathRequest, ShortestPathTestCase, ShortestPathTestTimingResult},
        PathFinding,
    },
};

/// Relative tolerance when comparing path weights summed in different order.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

pub fn get_progressbar(job_name: &str, len: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    bar.set_message(job_name.to_string());
    if let Ok(style) =
        ProgressStyle::with_template(" {msg} {wide_bar} estimated remaining: {eta_precise}")
    {
        bar.set_style(style);
    }
    bar
}

pub fn get_progressspinner(job_name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(job_name.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn write_bincode<T: Serialize>(path: &FilePath, value: &T) -> GraphResult<()> {
    let writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(writer, value)?;
    Ok(())
}

pub fn read_bincode<T: DeserializeOwned>(path: &FilePath) -> GraphResult<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}

pub fn write_json<T: Serialize>(path: &FilePath, value: &T) -> GraphResult<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(writer, value)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &FilePath) -> GraphResult<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// `number_of_test_cases` random pairs with their Dijkstra distance. The
/// same seed gives the same pairs.
pub fn generate_random_pair_test_cases(
    graph: &GraphStore,
    number_of_test_cases: u32,
    seed: u64,
) -> Vec<ShortestPathTestCase> {
    let number_of_vertices = graph.number_of_vertices();
    if number_of_vertices == 0 {
        return Vec::new();
    }

    (0..number_of_test_cases)
        .into_par_iter()
        .progress_with(get_progressbar(
            "Generating test cases",
            number_of_test_cases as u64,
            true,
        ))
        .map(|index| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
            let request = ShortestPathRequest {
                source: rng.gen_range(0..number_of_vertices),
                target: rng.gen_range(0..number_of_vertices),
            };
            let weight = dijkstra_one_to_one_wrapped(graph, request.source, request.target)
                .map(|path| path.weight);
            ShortestPathTestCase { request, weight }
        })
        .collect()
}

pub fn weights_match(a: Weight, b: Weight) -> bool {
    (a - b).abs() <= WEIGHT_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Checks `path` against the expected outcome of `test_case`: matching
/// weight, correct endpoints and a chain of arcs that exist in `graph`.
pub fn validate_path(
    graph: &GraphStore,
    test_case: &ShortestPathTestCase,
    path: &Option<Path>,
) -> Result<(), String> {
    let ShortestPathRequest { source, target } = test_case.request;
    let (path, weight) = match (path, test_case.weight) {
        (None, None) => return Ok(()),
        (Some(_), None) => return Err("a path was found where there should be none".to_string()),
        (None, Some(_)) => return Err("no path is found but there should be one".to_string()),
        (Some(path), Some(weight)) => (path, weight),
    };

    if !weights_match(path.weight, weight) {
        return Err(format!(
            "wrong path weight {} for {} -> {}, expected {}",
            path.weight, source, target, weight
        ));
    }

    if path.arcs.is_empty() {
        return if source == target {
            Ok(())
        } else {
            Err("path is empty".to_string())
        };
    }

    let vertices = path.vertices();
    if vertices.first() != Some(&source) {
        return Err("first vertex of path is not source of request".to_string());
    }
    if vertices.last() != Some(&target) {
        return Err("last vertex of path is not target of request".to_string());
    }
    if !path.is_chained() {
        return Err("consecutive arcs do not share a vertex".to_string());
    }

    for path_arc in path.arcs.iter() {
        let arc = graph.arc(path_arc.arc);
        if arc.is_shortcut() {
            return Err(format!("path contains shortcut {}", path_arc.arc));
        }
        if !arc.permits(path_arc.tail, path_arc.head) || arc.weight != path_arc.weight {
            return Err(format!(
                "arc {} does not lead from {} to {}",
                path_arc.arc, path_arc.tail, path_arc.head
            ));
        }
    }

    if !weights_match(path.arc_weight_sum(), weight) {
        return Err("arc weights do not add up to the path weight".to_string());
    }

    Ok(())
}

/// Times every query of `test_cases` and validates the returned paths
/// afterwards.
pub fn validate_path_and_time(
    test_cases: &[ShortestPathTestCase],
    path_finder: &dyn PathFinding,
    graph: &GraphStore,
) -> Result<Vec<ShortestPathTestTimingResult>, String> {
    let mut times = Vec::with_capacity(test_cases.len());
    let mut paths = Vec::with_capacity(test_cases.len());

    for test_case in test_cases.iter().progress_with(get_progressbar(
        "Timing",
        test_cases.len() as u64,
        true,
    )) {
        let start = Instant::now();
        let path = path_finder.shortest_path(test_case.request.source, test_case.request.target);
        times.push(ShortestPathTestTimingResult {
            test_case: test_case.clone(),
            timing_in_seconds: start.elapsed().as_secs_f64(),
        });
        paths.push(path);
    }

    for (test_case, path) in test_cases.iter().zip(paths.iter()) {
        validate_path(graph, test_case, path)?;
    }

    Ok(times)
}

#![allow(dead_code)]

use hierarchy_paths::{
    graphs::{
        graph_factory::{from_tuples, ArcRecord},
        graph_store::GraphStore,
        Location,
    },
    ContractionParams, OrderingStrategy,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub fn params(strategy: OrderingStrategy, max_settles: Option<usize>) -> ContractionParams {
    ContractionParams {
        strategy,
        max_settles,
        show_progress: false,
    }
}

pub fn graph_from_arcs(number_of_vertices: u32, arcs: Vec<ArcRecord>) -> GraphStore {
    let vertices = (0..number_of_vertices).map(|id| (id, Location::new(id as f64, 0.0)));
    from_tuples(vertices, arcs).unwrap()
}

/// https://jlazarsfeld.github.io/ch.150.project/img/contraction/contract-full-1.png
pub fn small_graph() -> GraphStore {
    let arcs = [
        (0, 1, 3),
        (0, 2, 5),
        (0, 10, 3),
        (1, 2, 3),
        (1, 3, 5),
        (2, 3, 2),
        (2, 9, 2),
        (3, 4, 7),
        (3, 9, 4),
        (4, 5, 6),
        (4, 9, 3),
        (5, 6, 4),
        (5, 7, 2),
        (6, 7, 3),
        (6, 8, 5),
        (7, 8, 3),
        (7, 9, 2),
        (8, 9, 4),
        (8, 10, 6),
        (9, 10, 3),
    ]
    .into_iter()
    .map(|(tail, head, weight)| ArcRecord::two_way(tail, head, weight as f64))
    .collect();
    graph_from_arcs(11, arcs)
}

/// Random graph with integral weights, a mix of one-way and two-way arcs,
/// parallel arcs and the occasional loop.
pub fn random_graph(seed: u64, number_of_vertices: u32, number_of_arcs: u32) -> GraphStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let arcs = (0..number_of_arcs)
        .map(|_| {
            let tail = rng.gen_range(0..number_of_vertices);
            let head = rng.gen_range(0..number_of_vertices);
            let weight = rng.gen_range(0..20) as f64;
            if rng.gen_bool(0.5) {
                ArcRecord::two_way(tail, head, weight)
            } else {
                ArcRecord::one_way(tail, head, weight)
            }
        })
        .collect();
    graph_from_arcs(number_of_vertices, arcs)
}

/// `side` x `side` grid of two-way arcs with weights between 1 and 10.
pub fn grid(side: u32) -> GraphStore {
    let mut arcs = Vec::new();
    for row in 0..side {
        for column in 0..side {
            let vertex = row * side + column;
            if column + 1 < side {
                let weight = ((row * 7 + column * 13) % 10 + 1) as f64;
                arcs.push(ArcRecord::two_way(vertex, vertex + 1, weight));
            }
            if row + 1 < side {
                let weight = ((row * 11 + column * 3) % 10 + 1) as f64;
                arcs.push(ArcRecord::two_way(vertex, vertex + side, weight));
            }
        }
    }
    graph_from_arcs(side * side, arcs)
}

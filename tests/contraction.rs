mod common;

use common::{graph_from_arcs, params, random_graph, small_graph};
use hierarchy_paths::{
    error::GraphError,
    graphs::graph_factory::{from_tuples, ArcRecord},
    graphs::Location,
    preprocess, OrderingStrategy,
};

const STRATEGIES: [OrderingStrategy; 2] =
    [OrderingStrategy::SparseFirst, OrderingStrategy::EdgeDifference];

#[test]
fn levels_form_a_permutation() {
    for strategy in STRATEGIES {
        for seed in 0..4 {
            let graph = random_graph(seed, 30, 80);
            let ch = preprocess(graph, &params(strategy, None)).unwrap();

            let mut levels = ch.levels().to_vec();
            levels.sort_unstable();
            assert_eq!(levels, (0..30).collect::<Vec<_>>());
        }
    }
}

#[test]
fn shortcuts_are_sound() {
    for strategy in STRATEGIES {
        for (seed, max_settles) in [(1, None), (2, None), (3, Some(2)), (4, Some(5))] {
            let graph = random_graph(seed, 35, 100);
            let ch = preprocess(graph, &params(strategy, max_settles)).unwrap();

            for (id, arc) in ch.shortcuts() {
                let shortcut = arc.shortcut.unwrap();
                let first = ch.arc(shortcut.first);
                let second = ch.arc(shortcut.second);
                assert_eq!(arc.weight, first.weight + second.weight);

                // first connects tail and via, second via and head
                assert_eq!(first.opposite(arc.tail), Some(shortcut.via));
                assert_eq!(second.opposite(shortcut.via), Some(arc.head));

                let via_level = ch.level(shortcut.via);
                assert!(via_level < ch.level(arc.tail));
                assert!(via_level < ch.level(arc.head));

                for (from, to) in [(arc.tail, arc.head), (arc.head, arc.tail)] {
                    if !arc.permits(from, to) {
                        continue;
                    }
                    let unpacked = ch.unpack(id, from).unwrap();
                    assert_eq!(unpacked.first().unwrap().tail, from);
                    assert_eq!(unpacked.last().unwrap().head, to);
                    assert!(unpacked
                        .windows(2)
                        .all(|window| window[0].head == window[1].tail));
                    assert!(unpacked.iter().all(|path_arc| !ch.arc(path_arc.arc).is_shortcut()));
                    assert_eq!(
                        unpacked.iter().map(|path_arc| path_arc.weight).sum::<f64>(),
                        arc.weight
                    );
                }
            }
        }
    }
}

#[test]
fn contraction_is_deterministic() {
    for strategy in STRATEGIES {
        let first = preprocess(random_graph(11, 40, 120), &params(strategy, None)).unwrap();
        let second = preprocess(random_graph(11, 40, 120), &params(strategy, None)).unwrap();

        assert_eq!(first.levels(), second.levels());
        assert_eq!(first.graph().arcs(), second.graph().arcs());
    }
}

#[test]
fn triangle_witness_avoids_shortcut() {
    // A -> B (1), B -> C (1), A -> C (1.5)
    let graph = graph_from_arcs(
        3,
        vec![
            ArcRecord::one_way(0, 1, 1.0),
            ArcRecord::one_way(1, 2, 1.0),
            ArcRecord::one_way(0, 2, 1.5),
        ],
    );
    let ch = preprocess(graph, &params(OrderingStrategy::SparseFirst, None)).unwrap();

    assert_eq!(ch.level(1), 0);
    assert_eq!(ch.shortcuts().count(), 0);
    assert_eq!(ch.query(0, 2).unwrap().weight, 1.5);
    assert_eq!(ch.query(0, 1).unwrap().weight, 1.0);
}

#[test]
fn original_arcs_survive_in_the_arena() {
    let graph = small_graph();
    let originals = graph.arcs().to_vec();
    let ch = preprocess(graph, &params(OrderingStrategy::EdgeDifference, None)).unwrap();

    assert_eq!(&ch.graph().arcs()[..originals.len()], originals.as_slice());
    assert!(ch.graph().arcs()[originals.len()..]
        .iter()
        .all(|arc| arc.is_shortcut()));
}

#[test]
fn malformed_input_is_rejected() {
    let origin = Location::new(0.0, 0.0);
    let vertices = vec![(0, origin), (1, origin)];

    for weight in [-1.0, f64::NAN, f64::INFINITY] {
        let result = from_tuples(vertices.clone(), vec![ArcRecord::one_way(0, 1, weight)]);
        assert!(matches!(result, Err(GraphError::MalformedGraph { .. })));
    }

    let dangling = from_tuples(vertices, vec![ArcRecord::two_way(0, 5, 1.0)]);
    assert!(matches!(dangling, Err(GraphError::MalformedGraph { .. })));
}

#[test]
fn empty_and_isolated_graphs_contract() {
    let params = params(OrderingStrategy::SparseFirst, None);

    let empty = preprocess(graph_from_arcs(0, Vec::new()), &params).unwrap();
    assert_eq!(empty.number_of_vertices(), 0);

    let isolated = preprocess(graph_from_arcs(3, Vec::new()), &params).unwrap();
    let mut levels = isolated.levels().to_vec();
    levels.sort_unstable();
    assert_eq!(levels, vec![0, 1, 2]);
}

#[test]
fn search_graphs_only_climb() {
    for strategy in STRATEGIES {
        for seed in 0..4 {
            let ch = preprocess(random_graph(seed, 30, 80), &params(strategy, None)).unwrap();

            for vertex in 0..30 {
                for half_arc in ch.upward_arcs(vertex) {
                    assert!(ch.level(half_arc.vertex) > ch.level(vertex));
                    assert!(ch.arc(half_arc.arc).permits(vertex, half_arc.vertex));
                    assert!(!ch.is_superseded(half_arc.arc));
                }
                // Downward arcs are stored at their lower end, reversed.
                for half_arc in ch.downward_arcs(vertex) {
                    assert!(ch.level(half_arc.vertex) > ch.level(vertex));
                    assert!(ch.arc(half_arc.arc).permits(half_arc.vertex, vertex));
                    assert!(!ch.is_superseded(half_arc.arc));
                }
            }

            let arcs = ch.graph().arcs();
            for (id, arc) in arcs.iter().enumerate() {
                if ch.is_superseded(id as u32) {
                    assert!(arcs.iter().enumerate().any(|(other_id, other)| {
                        !ch.is_superseded(other_id as u32) && other.dominates(arc)
                    }));
                }
            }
        }
    }
}

#[test]
fn cheaper_shortcut_supersedes_direct_arc() {
    // 0 - 1 - 2 costs 2, the direct arc 0 - 2 costs 5.
    let graph = graph_from_arcs(
        4,
        vec![
            ArcRecord::two_way(0, 1, 1.0),
            ArcRecord::two_way(1, 2, 1.0),
            ArcRecord::two_way(0, 2, 5.0),
            ArcRecord::two_way(0, 3, 1.0),
        ],
    );
    let ch = preprocess(graph, &params(OrderingStrategy::SparseFirst, None)).unwrap();

    assert_eq!(ch.level(1), 0);
    assert!(ch.is_superseded(2));
    assert!(!ch.is_superseded(0));
    assert!((0..4).all(|vertex| ch
        .upward_arcs(vertex)
        .iter()
        .chain(ch.downward_arcs(vertex))
        .all(|half_arc| half_arc.arc != 2)));
    assert_eq!(ch.query_weight(0, 2), Ok(2.0));
    assert_eq!(ch.query_weight(2, 0), Ok(2.0));
}

use ahash::{HashMap, HashMapExt, HashSet};

use crate::{
    graphs::{graph_store::GraphStore, Vertex, Weight},
    search::collections::{
        dijkstra_data::{DijkstraData, DijkstraDataHashMap},
        vertex_distance_queue::{VertexDistanceQueue, VertexDistanceQueueBinaryHeap},
        vertex_expanded_data::{VertexExpandedData, VertexExpandedDataHashSet},
    },
};

/// Bounded Dijkstra deciding whether a candidate shortcut is needed.
///
/// The search never enters the vertex being contracted and gives up after
/// `max_settles` settled vertices. Giving up counts as "no witness", so a
/// finite bound can only add redundant shortcuts, never lose a needed one.
/// `None` is the unbounded search and the only setting that yields a minimal
/// set of shortcuts.
#[derive(Clone, Copy)]
pub struct WitnessSearch<'a> {
    graph: &'a GraphStore,
    max_settles: Option<usize>,
}

impl<'a> WitnessSearch<'a> {
    pub fn new(graph: &'a GraphStore, max_settles: Option<usize>) -> Self {
        WitnessSearch { graph, max_settles }
    }

    /// True if a path `from -> to` avoiding `via` with weight at most
    /// `max_weight` is found within the settle budget.
    pub fn exists(&self, from: Vertex, to: Vertex, via: Vertex, max_weight: Weight) -> bool {
        if from == to {
            return true;
        }
        self.witness_distances(from, via, &[to], max_weight)
            .contains_key(&to)
    }

    /// Distances from `from` to those `targets` that were settled before the
    /// search stopped. Every returned distance is at most `max_weight`.
    pub fn witness_distances(
        &self,
        from: Vertex,
        via: Vertex,
        targets: &[Vertex],
        max_weight: Weight,
    ) -> HashMap<Vertex, Weight> {
        let mut data = DijkstraDataHashMap::new();
        let mut expanded = VertexExpandedDataHashSet::new();
        let mut queue = VertexDistanceQueueBinaryHeap::new();

        let mut remaining = targets
            .iter()
            .copied()
            .filter(|&target| target != via)
            .collect::<HashSet<_>>();
        let mut found = HashMap::with_capacity(remaining.len());

        data.set_distance(from, 0.0);
        queue.insert(from, 0.0);

        let mut settled = 0;
        while !remaining.is_empty() {
            let Some((tail, distance_tail)) = queue.pop() else {
                break;
            };
            if expanded.expand(tail) {
                continue;
            }

            if remaining.remove(&tail) {
                found.insert(tail, distance_tail);
                if remaining.is_empty() {
                    break;
                }
            }

            settled += 1;
            if self.max_settles.is_some_and(|max_settles| settled >= max_settles) {
                break;
            }

            // Parallel arcs are relaxed one by one, the cheapest wins anyway.
            for (_, arc) in self.graph.arcs_of(tail) {
                let Some(head) = arc.leaving(tail) else {
                    continue;
                };
                if head == via {
                    continue;
                }
                let alternative_distance_head = distance_tail + arc.weight;
                if alternative_distance_head > max_weight {
                    continue;
                }
                let current_distance_head = data.get_distance(head).unwrap_or(Weight::INFINITY);
                if alternative_distance_head < current_distance_head {
                    data.set_distance(head, alternative_distance_head);
                    queue.insert(head, alternative_distance_head);
                }
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::WitnessSearch;
    use crate::graphs::{
        graph_factory::{from_tuples, ArcRecord},
        graph_store::GraphStore,
        Location,
    };

    fn graph(number_of_vertices: u32, arcs: Vec<ArcRecord>) -> GraphStore {
        let vertices = (0..number_of_vertices).map(|id| (id, Location::new(0.0, 0.0)));
        from_tuples(vertices, arcs).unwrap()
    }

    #[test]
    fn direct_arc_is_a_witness() {
        // A -> B -> C costs 2, A -> C costs 1.5
        let graph = graph(
            3,
            vec![
                ArcRecord::one_way(0, 1, 1.0),
                ArcRecord::one_way(1, 2, 1.0),
                ArcRecord::one_way(0, 2, 1.5),
            ],
        );
        let witness = WitnessSearch::new(&graph, None);
        assert!(witness.exists(0, 2, 1, 2.0));
        assert!(!witness.exists(0, 2, 1, 1.0));
    }

    #[test]
    fn never_passes_through_via() {
        let graph = graph(
            3,
            vec![ArcRecord::two_way(0, 1, 1.0), ArcRecord::two_way(1, 2, 1.0)],
        );
        let witness = WitnessSearch::new(&graph, None);
        assert!(!witness.exists(0, 2, 1, 10.0));
        assert!(witness.exists(0, 2, 3, 10.0));
    }

    #[test]
    fn settle_budget_gives_up() {
        // Chain 0 - 1 - 2 - 3 - 4 plus the vertex 5 as via.
        let graph = graph(
            6,
            vec![
                ArcRecord::one_way(0, 1, 1.0),
                ArcRecord::one_way(1, 2, 1.0),
                ArcRecord::one_way(2, 3, 1.0),
                ArcRecord::one_way(3, 4, 1.0),
                ArcRecord::one_way(0, 5, 1.0),
                ArcRecord::one_way(5, 4, 1.0),
            ],
        );
        assert!(WitnessSearch::new(&graph, None).exists(0, 4, 5, 4.0));
        assert!(!WitnessSearch::new(&graph, Some(2)).exists(0, 4, 5, 4.0));

        let distances = WitnessSearch::new(&graph, None).witness_distances(0, 5, &[2, 4], 3.0);
        assert_eq!(distances.get(&2), Some(&2.0));
        assert_eq!(distances.get(&4), None);
    }

    #[test]
    fn parallel_and_reversed_arcs() {
        // 0 -> 1 twice, and 1 -> 2 stored as 2 - 1 with only the backward flag.
        let graph = graph(
            4,
            vec![
                ArcRecord::one_way(0, 1, 5.0),
                ArcRecord::one_way(0, 1, 1.0),
                ArcRecord {
                    tail: 2,
                    head: 1,
                    weight: 1.0,
                    forward: false,
                    backward: true,
                    tags: None,
                },
                ArcRecord::one_way(3, 0, 1.0),
            ],
        );
        let distances = WitnessSearch::new(&graph, None).witness_distances(0, 3, &[1, 2], 10.0);
        assert_eq!(distances.get(&1), Some(&1.0));
        assert_eq!(distances.get(&2), Some(&2.0));

        // Arcs are never travelled against their direction.
        assert!(!WitnessSearch::new(&graph, None).exists(2, 0, 3, 10.0));
    }
}

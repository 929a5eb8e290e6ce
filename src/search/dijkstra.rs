use super::{
    collections::{
        dijkstra_data::{DijkstraData, DijkstraDataVec, Predecessor},
        vertex_distance_queue::{VertexDistanceQueue, VertexDistanceQueueBinaryHeap},
        vertex_expanded_data::{VertexExpandedData, VertexExpandedDataBitSet},
    },
    path::Path,
    PathFinding,
};
use crate::graphs::{graph_store::GraphStore, PathArc, Vertex, Weight};

// Plain Dijkstra over the active arcs. Reference for validating contracted
// graphs.
impl PathFinding for GraphStore {
    fn shortest_path(&self, source: Vertex, target: Vertex) -> Option<Path> {
        dijkstra_one_to_one_wrapped(self, source, target)
    }

    fn shortest_path_weight(&self, source: Vertex, target: Vertex) -> Option<Weight> {
        dijkstra_one_to_one_wrapped(self, source, target).map(|path| path.weight)
    }

    fn number_of_vertices(&self) -> u32 {
        GraphStore::number_of_vertices(self)
    }
}

pub fn dijkstra_one_to_one_wrapped(
    graph: &GraphStore,
    source: Vertex,
    target: Vertex,
) -> Option<Path> {
    if !graph.contains(source) || !graph.contains(target) {
        return None;
    }

    let mut data = DijkstraDataVec::new(graph.number_of_vertices());
    let mut expanded = VertexExpandedDataBitSet::new(graph.number_of_vertices());
    let mut queue = VertexDistanceQueueBinaryHeap::new();

    dijkstra_one_to_one(
        graph,
        &mut data,
        &mut expanded,
        &mut queue,
        source,
        target,
    );

    path_from_data(graph, &data, target)
}

pub fn dijkstra_one_to_all_wrapped(graph: &GraphStore, source: Vertex) -> DijkstraDataVec {
    let mut data = DijkstraDataVec::new(graph.number_of_vertices());
    let mut expanded = VertexExpandedDataBitSet::new(graph.number_of_vertices());
    let mut queue = VertexDistanceQueueBinaryHeap::new();

    dijkstra_one_to_all(graph, &mut data, &mut expanded, &mut queue, source);

    data
}

pub fn dijkstra_one_to_all(
    graph: &GraphStore,
    data: &mut dyn DijkstraData,
    expanded: &mut dyn VertexExpandedData,
    queue: &mut dyn VertexDistanceQueue,
    source: Vertex,
) {
    data.set_distance(source, 0.0);
    queue.insert(source, 0.0);

    while let Some((tail, distance_tail)) = queue.pop() {
        if expanded.expand(tail) {
            continue;
        }
        relax_out_arcs(graph, data, queue, tail, distance_tail);
    }
}

pub fn dijkstra_one_to_one(
    graph: &GraphStore,
    data: &mut dyn DijkstraData,
    expanded: &mut dyn VertexExpandedData,
    queue: &mut dyn VertexDistanceQueue,
    source: Vertex,
    target: Vertex,
) {
    data.set_distance(source, 0.0);
    queue.insert(source, 0.0);

    while let Some((tail, distance_tail)) = queue.pop() {
        if expanded.expand(tail) {
            continue;
        }
        if tail == target {
            break;
        }
        relax_out_arcs(graph, data, queue, tail, distance_tail);
    }
}

fn relax_out_arcs(
    graph: &GraphStore,
    data: &mut dyn DijkstraData,
    queue: &mut dyn VertexDistanceQueue,
    tail: Vertex,
    distance_tail: Weight,
) {
    for half_arc in graph.out_neighbors(tail) {
        let current_distance_head = data.get_distance(half_arc.vertex).unwrap_or(Weight::INFINITY);
        let alternative_distance_head = distance_tail + half_arc.weight;
        if alternative_distance_head < current_distance_head {
            data.set_distance(half_arc.vertex, alternative_distance_head);
            data.set_predecessor(
                half_arc.vertex,
                Predecessor {
                    vertex: tail,
                    arc: half_arc.arc,
                },
            );
            queue.insert(half_arc.vertex, alternative_distance_head);
        }
    }
}

fn path_from_data(graph: &GraphStore, data: &dyn DijkstraData, target: Vertex) -> Option<Path> {
    let weight = data.get_distance(target)?;
    let arcs = data
        .get_steps(target)?
        .into_iter()
        .map(|(head, predecessor)| PathArc {
            tail: predecessor.vertex,
            head,
            weight: graph.arc(predecessor.arc).weight,
            arc: predecessor.arc,
        })
        .collect();

    Some(Path { arcs, weight })
}

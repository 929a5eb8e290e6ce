use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Instant,
};

use ahash::HashMap;
use rayon::prelude::*;

use super::contracted_graph::ContractedGraph;
use crate::{
    error::QueryError,
    graphs::{HalfArc, Vertex, Weight},
    search::{
        collections::{
            dijkstra_data::{DijkstraData, DijkstraDataHashMap, Predecessor},
            vertex_distance_queue::{VertexDistanceQueue, VertexDistanceQueueBinaryHeap},
            vertex_expanded_data::{VertexExpandedData, VertexExpandedDataHashSet},
        },
        path::Path,
        shortcuts::unpack_into,
        PathFinding,
    },
};

/// Cooperative cancellation of a query. Checked before every queue pop.
#[derive(Clone, Copy, Default)]
pub struct QueryControl<'a> {
    pub deadline: Option<Instant>,
    pub cancelled: Option<&'a AtomicBool>,
}

impl<'a> QueryControl<'a> {
    pub fn with_deadline(deadline: Instant) -> Self {
        QueryControl {
            deadline: Some(deadline),
            cancelled: None,
        }
    }

    pub fn with_flag(cancelled: &'a AtomicBool) -> Self {
        QueryControl {
            deadline: None,
            cancelled: Some(cancelled),
        }
    }

    pub fn should_stop(&self) -> bool {
        self.cancelled
            .is_some_and(|cancelled| cancelled.load(Ordering::Relaxed))
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Bookkeeping of one search direction.
#[derive(Default)]
pub struct SearchDirection {
    pub data: DijkstraDataHashMap,
    pub expanded: VertexExpandedDataHashSet,
    pub queue: VertexDistanceQueueBinaryHeap,
}

impl SearchDirection {
    fn start(&mut self, origin: Vertex) {
        self.data.clear();
        self.expanded.clear();
        self.queue.clear();
        self.data.set_distance(origin, 0.0);
        self.queue.insert(origin, 0.0);
    }

    /// True while the queue minimum could still improve on `best`.
    fn can_improve(&self, best: Weight) -> bool {
        self.queue.peek().is_some_and(|(_, distance)| distance < best)
    }
}

/// State of a single query, owned by it. Reused between queries to keep the
/// allocations.
#[derive(Default)]
pub struct SearchState {
    pub forward: SearchDirection,
    pub backward: SearchDirection,
    /// Combined weight for every vertex settled by both directions.
    pub intersection: HashMap<Vertex, Weight>,
}

impl SearchState {
    pub fn new() -> Self {
        SearchState::default()
    }

    /// Meeting vertex with the lowest combined weight. Ties go to the smaller
    /// vertex id.
    pub fn best_meeting(&self) -> Option<(Vertex, Weight)> {
        self.intersection
            .iter()
            .map(|(&vertex, &weight)| (vertex, weight))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
    }

    /// Number of vertices settled by either direction.
    pub fn settled(&self) -> usize {
        self.forward.expanded.len() + self.backward.expanded.len()
    }
}

/// Settles the next vertex of `this` direction.
///
/// `relax` holds the arcs the direction follows, `stall` the arcs that lead
/// into a vertex from above in the sense of this direction. A vertex reached
/// cheaper over a stall arc is not expanded.
fn search_step(
    relax: &[Vec<HalfArc>],
    stall: &[Vec<HalfArc>],
    this: &mut SearchDirection,
    other: &SearchDirection,
    intersection: &mut HashMap<Vertex, Weight>,
) {
    let Some((tail, distance_tail)) = this.queue.pop() else {
        return;
    };
    if this.expanded.expand(tail) {
        return;
    }

    for half_arc in stall[tail as usize].iter() {
        if let Some(distance_higher) = this.data.get_distance(half_arc.vertex) {
            if distance_higher + half_arc.weight < distance_tail {
                return;
            }
        }
    }

    if other.expanded.is_expanded(tail) {
        if let Some(other_distance_tail) = other.data.get_distance(tail) {
            intersection.insert(tail, distance_tail + other_distance_tail);
        }
    }

    for half_arc in relax[tail as usize].iter() {
        let alternative_distance_head = distance_tail + half_arc.weight;
        let current_distance_head = this
            .data
            .get_distance(half_arc.vertex)
            .unwrap_or(Weight::INFINITY);
        if alternative_distance_head < current_distance_head {
            this.data
                .set_distance(half_arc.vertex, alternative_distance_head);
            this.data.set_predecessor(
                half_arc.vertex,
                Predecessor {
                    vertex: tail,
                    arc: half_arc.arc,
                },
            );
            this.queue.insert(half_arc.vertex, alternative_distance_head);
        }
    }
}

impl ContractedGraph {
    fn check_vertex(&self, vertex: Vertex) -> Result<(), QueryError> {
        if self.contains(vertex) {
            Ok(())
        } else {
            Err(QueryError::UnknownVertex(vertex))
        }
    }

    /// Runs both searches and returns the best meeting vertex with the path
    /// weight through it. `state` keeps the search trees for reconstruction.
    pub fn search(
        &self,
        state: &mut SearchState,
        source: Vertex,
        target: Vertex,
        control: &QueryControl,
    ) -> Result<(Vertex, Weight), QueryError> {
        self.check_vertex(source)?;
        self.check_vertex(target)?;

        let SearchState {
            forward,
            backward,
            intersection,
        } = state;
        forward.start(source);
        backward.start(target);
        intersection.clear();

        let mut best = Weight::INFINITY;
        loop {
            let forward_open = forward.can_improve(best);
            let backward_open = backward.can_improve(best);
            if !forward_open && !backward_open {
                break;
            }

            if forward_open {
                if control.should_stop() {
                    return Err(QueryError::Cancelled);
                }
                search_step(
                    self.upward_graph(),
                    self.downward_graph(),
                    forward,
                    backward,
                    intersection,
                );
            }

            if backward_open {
                if control.should_stop() {
                    return Err(QueryError::Cancelled);
                }
                search_step(
                    self.downward_graph(),
                    self.upward_graph(),
                    backward,
                    forward,
                    intersection,
                );
            }

            best = intersection
                .values()
                .copied()
                .fold(Weight::INFINITY, Weight::min);
        }

        state.best_meeting().ok_or(QueryError::NoPath {
            from: source,
            to: target,
        })
    }

    /// Rebuilds the unpacked path through `meeting` from the search trees in
    /// `state`.
    pub fn reconstruct(&self, state: &SearchState, meeting: Vertex, weight: Weight) -> Path {
        let mut arcs = Vec::new();

        // source -> meeting
        for (_, predecessor) in state.forward.data.get_steps(meeting).unwrap_or_default() {
            unpack_into(self.graph(), predecessor.arc, predecessor.vertex, &mut arcs);
        }

        // meeting -> target
        let backward_steps = state.backward.data.get_steps(meeting).unwrap_or_default();
        for (vertex, predecessor) in backward_steps.into_iter().rev() {
            unpack_into(self.graph(), predecessor.arc, vertex, &mut arcs);
        }

        Path { arcs, weight }
    }

    pub fn query(&self, source: Vertex, target: Vertex) -> Result<Path, QueryError> {
        self.query_with(source, target, &QueryControl::default())
    }

    pub fn query_with(
        &self,
        source: Vertex,
        target: Vertex,
        control: &QueryControl,
    ) -> Result<Path, QueryError> {
        let mut state = SearchState::new();
        let (meeting, weight) = self.search(&mut state, source, target, control)?;
        Ok(self.reconstruct(&state, meeting, weight))
    }

    pub fn query_weight(&self, source: Vertex, target: Vertex) -> Result<Weight, QueryError> {
        let mut state = SearchState::new();
        self.search(&mut state, source, target, &QueryControl::default())
            .map(|(_, weight)| weight)
    }

    /// Weight matrix, one row per source. Unreachable pairs and unknown
    /// vertices are `None`. Rows are computed in parallel.
    pub fn query_many_to_many(
        &self,
        sources: &[Vertex],
        targets: &[Vertex],
    ) -> Vec<Vec<Option<Weight>>> {
        sources
            .par_iter()
            .map_init(SearchState::new, |state, &source| {
                targets
                    .iter()
                    .map(|&target| {
                        self.search(state, source, target, &QueryControl::default())
                            .ok()
                            .map(|(_, weight)| weight)
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

impl PathFinding for ContractedGraph {
    fn shortest_path(&self, source: Vertex, target: Vertex) -> Option<Path> {
        self.query(source, target).ok()
    }

    fn shortest_path_weight(&self, source: Vertex, target: Vertex) -> Option<Weight> {
        self.query_weight(source, target).ok()
    }

    fn number_of_vertices(&self) -> u32 {
        ContractedGraph::number_of_vertices(self)
    }
}

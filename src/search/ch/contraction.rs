use ahash::{HashMap, HashMapExt};
use fixedbitset::FixedBitSet;
use indicatif::ParallelProgressIterator;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    contracted_graph::ContractedGraph,
    priority::{
        edge_difference_priority, sparse_priority, ContractedNeighbors, ContractionQueue,
        OrderingStrategy,
    },
    witness::WitnessSearch,
};
use crate::{
    error::{GraphError, GraphResult},
    graphs::{arc::Shortcut, graph_store::GraphStore, Level, Vertex, Weight},
    utility::get_progressbar,
};

/// Knobs of a preprocessing run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractionParams {
    pub strategy: OrderingStrategy,
    /// Settle budget of a single witness search. `None` searches until the
    /// weight bound is exceeded.
    pub max_settles: Option<usize>,
    pub show_progress: bool,
}

impl Default for ContractionParams {
    fn default() -> Self {
        ContractionParams {
            strategy: OrderingStrategy::default(),
            max_settles: None,
            show_progress: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexState {
    Uncontracted,
    Contracting,
    Contracted,
}

/// A shortcut that contracting `shortcut.via` would insert.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShortcutCandidate {
    pub tail: Vertex,
    pub head: Vertex,
    pub weight: Weight,
    pub forward: bool,
    pub backward: bool,
    pub shortcut: Shortcut,
}

/// Builds the hierarchy for `graph`.
pub fn preprocess(graph: GraphStore, params: &ContractionParams) -> GraphResult<ContractedGraph> {
    Contractor::new(graph, params.clone()).run()
}

/// Shortcuts needed to keep all distances intact once `vertex` is gone.
///
/// One witness search runs per incoming neighbor, in parallel. The result
/// only depends on the graph, not on thread scheduling.
pub fn simulate_contraction(
    graph: &GraphStore,
    witness: &WitnessSearch,
    vertex: Vertex,
) -> Vec<ShortcutCandidate> {
    let in_half_arcs = graph.in_neighbors(vertex);
    let out_half_arcs = graph.out_neighbors(vertex);
    if in_half_arcs.is_empty() || out_half_arcs.is_empty() {
        return Vec::new();
    }

    let max_out_weight = out_half_arcs
        .iter()
        .map(|half_arc| half_arc.weight)
        .fold(0.0, Weight::max);

    let directed = in_half_arcs
        .par_iter()
        .map(|in_half_arc| {
            let tail = in_half_arc.vertex;
            let targets = out_half_arcs
                .iter()
                .map(|out_half_arc| out_half_arc.vertex)
                .filter(|&head| head != tail)
                .collect::<Vec<_>>();
            if targets.is_empty() {
                return Vec::new();
            }

            let witnesses = witness.witness_distances(
                tail,
                vertex,
                &targets,
                in_half_arc.weight + max_out_weight,
            );

            out_half_arcs
                .iter()
                .filter(|out_half_arc| out_half_arc.vertex != tail)
                .filter_map(|out_half_arc| {
                    let weight = in_half_arc.weight + out_half_arc.weight;
                    if witnesses
                        .get(&out_half_arc.vertex)
                        .is_some_and(|&distance| distance <= weight)
                    {
                        return None;
                    }
                    Some(ShortcutCandidate {
                        tail,
                        head: out_half_arc.vertex,
                        weight,
                        forward: true,
                        backward: false,
                        shortcut: Shortcut {
                            via: vertex,
                            first: in_half_arc.arc,
                            second: out_half_arc.arc,
                        },
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

    merge_opposite_candidates(directed)
        .into_iter()
        .filter_map(|candidate| restrict_to_undominated(graph, candidate))
        .collect()
}

/// Folds `q -> p` into `p -> q` when both travel the same two arcs, yielding
/// one record usable in both directions.
fn merge_opposite_candidates(directed: Vec<ShortcutCandidate>) -> Vec<ShortcutCandidate> {
    let mut index = HashMap::with_capacity(directed.len());
    for (position, candidate) in directed.iter().enumerate() {
        index.insert((candidate.tail, candidate.head), position);
    }

    let mut consumed = vec![false; directed.len()];
    let mut merged = Vec::with_capacity(directed.len());
    for (position, candidate) in directed.iter().enumerate() {
        if consumed[position] {
            continue;
        }
        consumed[position] = true;

        let mut candidate = *candidate;
        if let Some(&opposite_position) = index.get(&(candidate.head, candidate.tail)) {
            let opposite = &directed[opposite_position];
            if !consumed[opposite_position]
                && opposite.shortcut.first == candidate.shortcut.second
                && opposite.shortcut.second == candidate.shortcut.first
            {
                consumed[opposite_position] = true;
                candidate.backward = true;
            }
        }
        merged.push(candidate);
    }
    merged
}

/// Drops the directions of `candidate` already served by an active arc that
/// is at most as expensive. `None` if nothing is left.
fn restrict_to_undominated(
    graph: &GraphStore,
    mut candidate: ShortcutCandidate,
) -> Option<ShortcutCandidate> {
    for (_, arc) in graph.arcs_of(candidate.tail) {
        if arc.weight > candidate.weight {
            continue;
        }
        if candidate.forward && arc.permits(candidate.tail, candidate.head) {
            candidate.forward = false;
        }
        if candidate.backward && arc.permits(candidate.head, candidate.tail) {
            candidate.backward = false;
        }
    }
    (candidate.forward || candidate.backward).then_some(candidate)
}

/// Owns the graph while it is being contracted and turns it into a
/// [`ContractedGraph`].
pub struct Contractor {
    graph: GraphStore,
    params: ContractionParams,
    strategy: OrderingStrategy,
    states: Vec<VertexState>,
    queue: ContractionQueue,
    contracted_neighbors: ContractedNeighbors,
    superseded: FixedBitSet,
    next_level: Level,
    number_of_shortcuts: usize,
}

impl Contractor {
    pub fn new(graph: GraphStore, params: ContractionParams) -> Self {
        let number_of_vertices = graph.number_of_vertices();
        Contractor {
            strategy: params.strategy,
            states: vec![VertexState::Uncontracted; number_of_vertices as usize],
            queue: ContractionQueue::new(number_of_vertices),
            contracted_neighbors: ContractedNeighbors::new(number_of_vertices),
            superseded: FixedBitSet::with_capacity(graph.number_of_arcs() as usize),
            next_level: 0,
            number_of_shortcuts: 0,
            graph,
            params,
        }
    }

    pub fn state(&self, vertex: Vertex) -> VertexState {
        self.states[vertex as usize]
    }

    pub fn run(mut self) -> GraphResult<ContractedGraph> {
        let number_of_vertices = self.graph.number_of_vertices();

        info!("Setting up queue");
        self.fill_queue();

        let pb = get_progressbar(
            "Contracting",
            number_of_vertices as u64,
            self.params.show_progress,
        );

        info!("Start contracting");
        let mut reinsertions = 0;
        while self.next_level < number_of_vertices {
            let Some((vertex, old_priority)) = self.queue.pop() else {
                return Err(GraphError::invariant(format!(
                    "queue ran empty with {} vertices left",
                    number_of_vertices - self.next_level
                )));
            };
            if self.state(vertex) != VertexState::Uncontracted {
                return Err(GraphError::invariant(format!(
                    "vertex {} was queued after being contracted",
                    vertex
                )));
            }

            if self.strategy == OrderingStrategy::SparseFirst && old_priority == f64::INFINITY {
                info!(
                    "No pass-through vertices left after {} contractions, switching to edge difference",
                    self.next_level
                );
                self.strategy = OrderingStrategy::EdgeDifference;
                self.fill_queue();
                continue;
            }

            let (priority, candidates) = self.evaluate(vertex);
            if priority > old_priority {
                reinsertions += 1;
                if reinsertions > self.queue.len() + 1 {
                    return Err(GraphError::invariant(format!(
                        "priorities keep growing, {} reinsertions in a row",
                        reinsertions
                    )));
                }
                self.queue.push(vertex, priority);
                continue;
            }
            reinsertions = 0;

            let candidates = match candidates {
                Some(candidates) => candidates,
                None => self.simulate(vertex),
            };
            self.contract(vertex, candidates)?;
            pb.inc(1);
        }
        pb.finish_and_clear();
        info!(
            "Finished contracting, added {} shortcuts",
            self.number_of_shortcuts
        );

        ContractedGraph::new(self.graph, self.superseded)
    }

    fn witness(&self) -> WitnessSearch<'_> {
        WitnessSearch::new(&self.graph, self.params.max_settles)
    }

    fn simulate(&self, vertex: Vertex) -> Vec<ShortcutCandidate> {
        simulate_contraction(&self.graph, &self.witness(), vertex)
    }

    /// Current priority of `vertex`, plus the shortcuts its contraction needs
    /// if computing the priority required them anyway.
    fn evaluate(&self, vertex: Vertex) -> (f64, Option<Vec<ShortcutCandidate>>) {
        match self.strategy {
            OrderingStrategy::SparseFirst => (sparse_priority(&self.graph, vertex), None),
            OrderingStrategy::EdgeDifference => {
                let candidates = self.simulate(vertex);
                let priority = edge_difference_priority(
                    &self.graph,
                    vertex,
                    &candidates,
                    &self.contracted_neighbors,
                );
                (priority, Some(candidates))
            }
        }
    }

    fn priority(&self, vertex: Vertex) -> f64 {
        self.evaluate(vertex).0
    }

    /// (Re)computes the priority of every uncontracted vertex.
    fn fill_queue(&mut self) {
        let vertices = self
            .graph
            .vertices()
            .filter(|&vertex| self.state(vertex) == VertexState::Uncontracted)
            .collect::<Vec<_>>();

        let pb = get_progressbar(
            "Initializing queue",
            vertices.len() as u64,
            self.params.show_progress,
        );
        let priorities = vertices
            .into_par_iter()
            .progress_with(pb)
            .map(|vertex| (vertex, self.priority(vertex)))
            .collect::<Vec<_>>();

        self.queue.clear();
        for (vertex, priority) in priorities {
            self.queue.push(vertex, priority);
        }
    }

    fn contract(&mut self, vertex: Vertex, candidates: Vec<ShortcutCandidate>) -> GraphResult<()> {
        self.states[vertex as usize] = VertexState::Contracting;
        let neighbors = self.graph.neighbors(vertex);

        debug!(
            "Contracting {} (level {}) with {} shortcuts",
            vertex,
            self.next_level,
            candidates.len()
        );

        for candidate in candidates {
            if candidate.tail == vertex || candidate.head == vertex {
                return Err(GraphError::invariant(format!(
                    "shortcut {} -> {} touches its own via vertex",
                    candidate.tail, candidate.head
                )));
            }
            let id = self.graph.add_shortcut(
                candidate.tail,
                candidate.head,
                candidate.weight,
                candidate.forward,
                candidate.backward,
                candidate.shortcut,
            )?;
            self.number_of_shortcuts += 1;

            let shortcut = self.graph.arc(id).clone();
            let dominated = self
                .graph
                .arcs_of(candidate.tail)
                .filter(|&(other, arc)| other != id && shortcut.dominates(arc))
                .map(|(other, _)| other)
                .collect::<Vec<_>>();
            self.superseded.grow(self.graph.number_of_arcs() as usize);
            for other in dominated {
                self.graph.deactivate(other);
                self.superseded.insert(other as usize);
            }
        }

        self.graph.disconnect(vertex);
        self.contracted_neighbors.update(&neighbors);
        self.graph.set_level(vertex, self.next_level)?;
        self.next_level += 1;
        self.states[vertex as usize] = VertexState::Contracted;

        let priorities = neighbors
            .par_iter()
            .map(|&neighbor| (neighbor, self.priority(neighbor)))
            .collect::<Vec<_>>();
        for (neighbor, priority) in priorities {
            if self.state(neighbor) == VertexState::Uncontracted {
                self.queue.push(neighbor, priority);
            }
        }

        Ok(())
    }
}

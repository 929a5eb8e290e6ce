use std::{cmp::Ordering, collections::BinaryHeap};

use clap::ValueEnum;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use super::contraction::ShortcutCandidate;
use crate::graphs::{graph_store::GraphStore, Vertex};

/// How the next vertex to contract is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OrderingStrategy {
    /// Contract pass-through vertices first, then fall back to edge
    /// difference for the rest.
    #[default]
    SparseFirst,
    /// Shortcuts added minus arcs removed, plus the number of neighbors
    /// contracted so far.
    EdgeDifference,
}

/// Priority of a vertex with exactly two neighbors under
/// [`OrderingStrategy::SparseFirst`].
pub const PASS_THROUGH_PRIORITY: f64 = -1.0;

/// A vertex with exactly two distinct neighbors that can be both entered and
/// left.
pub fn is_pass_through(graph: &GraphStore, vertex: Vertex) -> bool {
    graph.neighbors(vertex).len() == 2
        && !graph.in_neighbors(vertex).is_empty()
        && !graph.out_neighbors(vertex).is_empty()
}

pub fn sparse_priority(graph: &GraphStore, vertex: Vertex) -> f64 {
    if is_pass_through(graph, vertex) {
        PASS_THROUGH_PRIORITY
    } else {
        f64::INFINITY
    }
}

/// Number of shortcuts contracting `vertex` would add minus the number of
/// active arcs it would remove.
pub fn edge_difference(graph: &GraphStore, vertex: Vertex, shortcuts: &[ShortcutCandidate]) -> f64 {
    shortcuts.len() as f64 - graph.degree(vertex) as f64
}

/// Counts for every vertex how many of its neighbors are already contracted.
#[derive(Clone, Debug, Default)]
pub struct ContractedNeighbors {
    counts: Vec<u32>,
}

impl ContractedNeighbors {
    pub fn new(number_of_vertices: u32) -> Self {
        ContractedNeighbors {
            counts: vec![0; number_of_vertices as usize],
        }
    }

    pub fn count(&self, vertex: Vertex) -> u32 {
        self.counts[vertex as usize]
    }

    /// Called with the neighbors a vertex had right before its contraction.
    pub fn update(&mut self, neighbors: &[Vertex]) {
        for &neighbor in neighbors {
            self.counts[neighbor as usize] += 1;
        }
    }
}

/// Priority under [`OrderingStrategy::EdgeDifference`].
pub fn edge_difference_priority(
    graph: &GraphStore,
    vertex: Vertex,
    shortcuts: &[ShortcutCandidate],
    contracted_neighbors: &ContractedNeighbors,
) -> f64 {
    edge_difference(graph, vertex, shortcuts) + contracted_neighbors.count(vertex) as f64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct QueueElement {
    priority: OrderedFloat<f64>,
    vertex: Vertex,
    stamp: u32,
}

// Flipped so `BinaryHeap` pops the smallest priority. Ties go to the smaller
// vertex id.
impl Ord for QueueElement {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.vertex.cmp(&self.vertex))
            .then_with(|| other.stamp.cmp(&self.stamp))
    }
}

impl PartialOrd for QueueElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue over vertices with lazy invalidation.
///
/// Every push bumps the vertex's stamp. Entries carrying an older stamp are
/// dropped when they reach the top, so a vertex is never popped with a
/// priority other than the one it was pushed with last.
pub struct ContractionQueue {
    heap: BinaryHeap<QueueElement>,
    stamps: Vec<u32>,
    queued: Vec<bool>,
    len: usize,
}

impl ContractionQueue {
    pub fn new(number_of_vertices: u32) -> Self {
        ContractionQueue {
            heap: BinaryHeap::new(),
            stamps: vec![0; number_of_vertices as usize],
            queued: vec![false; number_of_vertices as usize],
            len: 0,
        }
    }

    /// Inserts `vertex` or replaces its current priority.
    pub fn push(&mut self, vertex: Vertex, priority: f64) {
        let index = vertex as usize;
        self.stamps[index] = self.stamps[index].wrapping_add(1);
        if !self.queued[index] {
            self.queued[index] = true;
            self.len += 1;
        }
        self.heap.push(QueueElement {
            priority: OrderedFloat(priority),
            vertex,
            stamp: self.stamps[index],
        });
    }

    pub fn pop(&mut self) -> Option<(Vertex, f64)> {
        while let Some(element) = self.heap.pop() {
            let index = element.vertex as usize;
            if !self.queued[index] || self.stamps[index] != element.stamp {
                continue;
            }
            self.queued[index] = false;
            self.len -= 1;
            return Some((element.vertex, element.priority.0));
        }
        None
    }

    /// Removes `vertex` if queued. Stale heap entries are dropped lazily.
    pub fn remove(&mut self, vertex: Vertex) {
        let index = vertex as usize;
        if self.queued[index] {
            self.queued[index] = false;
            self.stamps[index] = self.stamps[index].wrapping_add(1);
            self.len -= 1;
        }
    }

    pub fn contains(&self, vertex: Vertex) -> bool {
        self.queued[vertex as usize]
    }

    /// Number of queued vertices, not heap entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.queued.fill(false);
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::{edge_difference_priority, is_pass_through, ContractedNeighbors, ContractionQueue};
    use crate::graphs::{
        graph_factory::{from_tuples, ArcRecord},
        Location,
    };

    #[test]
    fn stale_entries_are_skipped() {
        let mut queue = ContractionQueue::new(4);
        queue.push(0, 5.0);
        queue.push(1, 1.0);
        queue.push(2, 3.0);
        // 1 got more expensive, 0 got cheaper.
        queue.push(1, 10.0);
        queue.push(0, 0.5);
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.pop(), Some((0, 0.5)));
        assert_eq!(queue.pop(), Some((2, 3.0)));
        assert_eq!(queue.pop(), Some((1, 10.0)));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn ties_and_removal() {
        let mut queue = ContractionQueue::new(4);
        queue.push(3, 1.0);
        queue.push(2, 1.0);
        queue.push(1, f64::INFINITY);
        queue.remove(2);
        assert!(!queue.contains(2));
        assert_eq!(queue.pop(), Some((3, 1.0)));
        assert_eq!(queue.pop(), Some((1, f64::INFINITY)));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn pass_through_needs_two_neighbors() {
        let vertices = (0..4).map(|id| (id, Location::new(0.0, 0.0)));
        let arcs = vec![
            ArcRecord::two_way(0, 1, 1.0),
            ArcRecord::two_way(1, 2, 1.0),
            ArcRecord::one_way(2, 3, 1.0),
        ];
        let graph = from_tuples(vertices, arcs).unwrap();
        assert!(is_pass_through(&graph, 1));
        assert!(is_pass_through(&graph, 2));
        assert!(!is_pass_through(&graph, 0));
        assert!(!is_pass_through(&graph, 3));
    }

    #[test]
    fn contracted_neighbors_raise_the_priority() {
        // Star around 0.
        let vertices = (0..4).map(|id| (id, Location::new(0.0, 0.0)));
        let arcs = vec![
            ArcRecord::two_way(0, 1, 1.0),
            ArcRecord::two_way(0, 2, 1.0),
            ArcRecord::two_way(0, 3, 1.0),
        ];
        let graph = from_tuples(vertices, arcs).unwrap();

        let mut contracted_neighbors = ContractedNeighbors::new(4);
        assert_eq!(
            edge_difference_priority(&graph, 1, &[], &contracted_neighbors),
            -1.0
        );

        contracted_neighbors.update(&[1, 2]);
        contracted_neighbors.update(&[1]);
        assert_eq!(contracted_neighbors.count(1), 2);
        assert_eq!(contracted_neighbors.count(3), 0);
        assert_eq!(
            edge_difference_priority(&graph, 1, &[], &contracted_neighbors),
            1.0
        );
    }
}

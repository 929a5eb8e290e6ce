use std::{cmp::Reverse, collections::BinaryHeap};

use ordered_float::OrderedFloat;

use crate::graphs::{Vertex, Weight};

/// A trait for a priority queue that manages vertices and their distances.
/// This trait is useful for graph algorithms that need to repeatedly retrieve
/// the vertex with the smallest distance (such as Dijkstra's algorithm).
///
/// The implementing structs might or might not use a decrease key operation,
/// so a vertex can be popped more than once.
pub trait VertexDistanceQueue {
    /// Clears all stored data, preparing for a new search.
    fn clear(&mut self);

    /// Inserts a vertex with its associated distance into the priority queue.
    fn insert(&mut self, vertex: Vertex, distance: Weight);

    /// Removes and returns the vertex with the smallest distance from the
    /// priority queue or none if the queue is empty.
    fn pop(&mut self) -> Option<(Vertex, Weight)>;

    /// Returns the vertex with the smallest distance without removing it.
    fn peek(&self) -> Option<(Vertex, Weight)>;

    fn is_empty(&self) -> bool {
        self.peek().is_none()
    }
}

/// A priority queue implementation using a Binary Heap. Ties are broken by
/// the smaller vertex id.
#[derive(Default)]
pub struct VertexDistanceQueueBinaryHeap {
    heap: BinaryHeap<Reverse<(OrderedFloat<Weight>, Vertex)>>,
}

impl VertexDistanceQueueBinaryHeap {
    pub fn new() -> Self {
        VertexDistanceQueueBinaryHeap::default()
    }
}

impl VertexDistanceQueue for VertexDistanceQueueBinaryHeap {
    fn clear(&mut self) {
        self.heap.clear();
    }

    fn insert(&mut self, vertex: Vertex, distance: Weight) {
        self.heap.push(Reverse((OrderedFloat(distance), vertex)));
    }

    fn pop(&mut self) -> Option<(Vertex, Weight)> {
        let Reverse((OrderedFloat(distance), vertex)) = self.heap.pop()?;

        Some((vertex, distance))
    }

    fn peek(&self) -> Option<(Vertex, Weight)> {
        self.heap
            .peek()
            .map(|&Reverse((OrderedFloat(distance), vertex))| (vertex, distance))
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

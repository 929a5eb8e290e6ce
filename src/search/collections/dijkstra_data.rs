use ahash::HashMap;

use crate::graphs::{ArcId, Vertex, Weight};

/// Step back towards the search origin: the previous vertex and the arc
/// used to get from there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Predecessor {
    pub vertex: Vertex,
    pub arc: ArcId,
}

/// Trait for handling data access in Dijkstra's algorithm.
pub trait DijkstraData {
    /// Clears all stored data, preparing for a new search.
    fn clear(&mut self);

    /// Retrieves the predecessor of a given vertex, if any.
    fn get_predecessor(&self, vertex: Vertex) -> Option<Predecessor>;

    /// Sets the predecessor for a given vertex.
    fn set_predecessor(&mut self, vertex: Vertex, predecessor: Predecessor);

    /// Retrieves the distance to a given vertex, if any.
    fn get_distance(&self, vertex: Vertex) -> Option<Weight>;

    /// Sets the distance to a given vertex.
    fn set_distance(&mut self, vertex: Vertex, distance: Weight);

    /// Predecessor steps from the search origin to `target`, in search
    /// order. Empty if `target` is the origin, `None` if it was never
    /// reached.
    fn get_steps(&self, target: Vertex) -> Option<Vec<(Vertex, Predecessor)>> {
        self.get_distance(target)?;

        let mut steps = Vec::new();
        let mut current = target;
        while let Some(predecessor) = self.get_predecessor(current) {
            steps.push((current, predecessor));
            current = predecessor.vertex;
        }
        steps.reverse();

        Some(steps)
    }
}

/// Dense storage, one slot per vertex.
pub struct DijkstraDataVec {
    predecessors: Vec<Option<Predecessor>>,
    distances: Vec<Option<Weight>>,
}

impl DijkstraDataVec {
    pub fn new(number_of_vertices: u32) -> Self {
        DijkstraDataVec {
            predecessors: vec![None; number_of_vertices as usize],
            distances: vec![None; number_of_vertices as usize],
        }
    }
}

impl DijkstraData for DijkstraDataVec {
    fn clear(&mut self) {
        self.predecessors.fill(None);
        self.distances.fill(None);
    }

    fn get_predecessor(&self, vertex: Vertex) -> Option<Predecessor> {
        self.predecessors[vertex as usize]
    }

    fn set_predecessor(&mut self, vertex: Vertex, predecessor: Predecessor) {
        self.predecessors[vertex as usize] = Some(predecessor);
    }

    fn get_distance(&self, vertex: Vertex) -> Option<Weight> {
        self.distances[vertex as usize]
    }

    fn set_distance(&mut self, vertex: Vertex, distance: Weight) {
        self.distances[vertex as usize] = Some(distance);
    }
}

/// Sparse storage for searches that touch few vertices, like CH queries and
/// witness searches.
#[derive(Default)]
pub struct DijkstraDataHashMap {
    predecessors: HashMap<Vertex, Predecessor>,
    distances: HashMap<Vertex, Weight>,
}

impl DijkstraDataHashMap {
    pub fn new() -> Self {
        DijkstraDataHashMap::default()
    }
}

impl DijkstraData for DijkstraDataHashMap {
    fn clear(&mut self) {
        self.predecessors.clear();
        self.distances.clear();
    }

    fn get_predecessor(&self, vertex: Vertex) -> Option<Predecessor> {
        self.predecessors.get(&vertex).copied()
    }

    fn set_predecessor(&mut self, vertex: Vertex, predecessor: Predecessor) {
        self.predecessors.insert(vertex, predecessor);
    }

    fn get_distance(&self, vertex: Vertex) -> Option<Weight> {
        self.distances.get(&vertex).copied()
    }

    fn set_distance(&mut self, vertex: Vertex, distance: Weight) {
        self.distances.insert(vertex, distance);
    }
}

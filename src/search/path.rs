use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::graphs::{PathArc, Vertex, Weight};

/// A path made of original arcs, in travel order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub arcs: Vec<PathArc>,
    pub weight: Weight,
}

impl Path {
    /// Visited vertices, source and target included. Empty for the path of
    /// a vertex to itself.
    pub fn vertices(&self) -> Vec<Vertex> {
        let mut vertices = Vec::with_capacity(self.arcs.len() + 1);
        if let Some(first) = self.arcs.first() {
            vertices.push(first.tail);
        }
        vertices.extend(self.arcs.iter().map(|arc| arc.head));
        vertices
    }

    /// Sum of the arc weights. Equals `weight` up to rounding.
    pub fn arc_weight_sum(&self) -> Weight {
        self.arcs.iter().map(|arc| arc.weight).sum()
    }

    /// Whether consecutive arcs share their endpoints.
    pub fn is_chained(&self) -> bool {
        self.arcs
            .iter()
            .tuple_windows()
            .all(|(first, second)| first.head == second.tail)
    }
}

/// Represents a request for finding a shortest path in a graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortestPathRequest {
    pub source: Vertex,
    pub target: Vertex,
}

/// A request together with the weight of a shortest path, if there exists
/// one. Used to validate path finders against a reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShortestPathTestCase {
    pub request: ShortestPathRequest,
    pub weight: Option<Weight>,
}

/// Outcome of timing one query of a test case.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShortestPathTestTimingResult {
    pub test_case: ShortestPathTestCase,
    pub timing_in_seconds: f64,
}

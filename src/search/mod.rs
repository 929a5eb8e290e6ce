use path::Path;

use crate::graphs::{Vertex, Weight};

pub mod ch;
pub mod collections;
pub mod dijkstra;
pub mod path;
pub mod shortcuts;

pub trait PathFinding: Send + Sync {
    fn shortest_path(&self, source: Vertex, target: Vertex) -> Option<Path>;

    fn shortest_path_weight(&self, source: Vertex, target: Vertex) -> Option<Weight>;

    fn number_of_vertices(&self) -> u32;
}

pub mod contracted_graph;
pub mod contraction;
pub mod pathfinding;
pub mod priority;
pub mod witness;

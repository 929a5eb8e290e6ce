use serde::{Deserialize, Serialize};

pub mod arc;
pub mod graph_factory;
pub mod graph_store;

pub type Vertex = u32;
pub type ArcId = u32;
pub type Weight = f64;
pub type Level = u32;
/// Handle into an external tag store. Never interpreted here.
pub type TagsId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Location {
        Location {
            latitude,
            longitude,
        }
    }
}

/// Traversal view of an arc seen from one of its endpoints: the vertex on the
/// other side, the cost of crossing and the arena index of the record.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HalfArc {
    pub vertex: Vertex,
    pub weight: Weight,
    pub arc: ArcId,
}

/// An original arc oriented in travel direction, as produced by unpacking.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathArc {
    pub tail: Vertex,
    pub head: Vertex,
    pub weight: Weight,
    pub arc: ArcId,
}

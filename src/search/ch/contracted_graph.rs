use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};

use crate::{
    error::{GraphError, GraphResult},
    graphs::{
        arc::Arc, graph_store::GraphStore, ArcId, HalfArc, Level, Location, PathArc, Vertex,
    },
    search::shortcuts::unpack,
};

/// Query-ready hierarchy.
///
/// Keeps the whole arc arena for unpacking and splits the arcs that survived
/// contraction into an upward part (arcs leaving a vertex towards a higher
/// level) and a downward part (arcs entering a vertex from a higher level,
/// stored at the lower endpoint). Immutable once built.
#[derive(Clone, Serialize, Deserialize)]
pub struct ContractedGraph {
    graph: GraphStore,
    levels: Vec<Level>,
    superseded: FixedBitSet,
    upward_graph: Vec<Vec<HalfArc>>,
    downward_graph: Vec<Vec<HalfArc>>,
}

impl ContractedGraph {
    pub(crate) fn new(graph: GraphStore, mut superseded: FixedBitSet) -> GraphResult<Self> {
        let levels = graph
            .vertices()
            .map(|vertex| {
                graph.level_of(vertex).ok_or_else(|| {
                    GraphError::invariant(format!("vertex {} was never contracted", vertex))
                })
            })
            .collect::<GraphResult<Vec<_>>>()?;
        superseded.grow(graph.number_of_arcs() as usize);

        let number_of_vertices = graph.number_of_vertices() as usize;
        let mut upward_graph = vec![Vec::new(); number_of_vertices];
        let mut downward_graph = vec![Vec::new(); number_of_vertices];

        for (id, arc) in graph.arcs().iter().enumerate() {
            if arc.is_loop() || superseded.contains(id) {
                continue;
            }
            check_via_below_endpoints(arc, &levels)?;

            for (from, to) in [(arc.tail, arc.head), (arc.head, arc.tail)] {
                if !arc.permits(from, to) {
                    continue;
                }
                if levels[from as usize] < levels[to as usize] {
                    upward_graph[from as usize].push(HalfArc {
                        vertex: to,
                        weight: arc.weight,
                        arc: id as ArcId,
                    });
                } else {
                    downward_graph[to as usize].push(HalfArc {
                        vertex: from,
                        weight: arc.weight,
                        arc: id as ArcId,
                    });
                }
            }
        }

        Ok(ContractedGraph {
            graph,
            levels,
            superseded,
            upward_graph,
            downward_graph,
        })
    }

    pub fn number_of_vertices(&self) -> u32 {
        self.graph.number_of_vertices()
    }

    pub fn contains(&self, vertex: Vertex) -> bool {
        self.graph.contains(vertex)
    }

    /// Contraction level of `vertex`. Panics for unknown vertices.
    pub fn level(&self, vertex: Vertex) -> Level {
        self.levels[vertex as usize]
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn location(&self, vertex: Vertex) -> Option<Location> {
        self.graph.location(vertex)
    }

    pub fn arc(&self, id: ArcId) -> &Arc {
        self.graph.arc(id)
    }

    /// The arc arena, originals and shortcuts.
    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// Arcs the forward search relaxes from `vertex`.
    pub fn upward_arcs(&self, vertex: Vertex) -> &[HalfArc] {
        &self.upward_graph[vertex as usize]
    }

    /// Arcs the backward search relaxes from `vertex`. `vertex` of each half
    /// arc is the higher endpoint the arc comes from.
    pub fn downward_arcs(&self, vertex: Vertex) -> &[HalfArc] {
        &self.downward_graph[vertex as usize]
    }

    pub(crate) fn upward_graph(&self) -> &[Vec<HalfArc>] {
        &self.upward_graph
    }

    pub(crate) fn downward_graph(&self) -> &[Vec<HalfArc>] {
        &self.downward_graph
    }

    /// All shortcuts ever created, in creation order.
    pub fn shortcuts(&self) -> impl Iterator<Item = (ArcId, &Arc)> + '_ {
        self.graph
            .arcs()
            .iter()
            .enumerate()
            .filter(|(_, arc)| arc.is_shortcut())
            .map(|(id, arc)| (id as ArcId, arc))
    }

    /// Whether `id` was replaced by a cheaper arc during contraction and is
    /// therefore left out of the search graphs.
    pub fn is_superseded(&self, id: ArcId) -> bool {
        self.superseded.contains(id as usize)
    }

    /// Original arcs an arc stands for, travelled starting at `from`. `None`
    /// if `from` is not an endpoint of the arc.
    pub fn unpack(&self, id: ArcId, from: Vertex) -> Option<Vec<PathArc>> {
        unpack(&self.graph, id, from)
    }
}

fn check_via_below_endpoints(arc: &Arc, levels: &[Level]) -> GraphResult<()> {
    let Some(via) = arc.via() else {
        return Ok(());
    };
    let via_level = levels[via as usize];
    if via_level >= levels[arc.tail as usize] || via_level >= levels[arc.head as usize] {
        return Err(GraphError::invariant(format!(
            "shortcut {} -> {} skips {} which is not below its endpoints",
            arc.tail, arc.head, via
        )));
    }
    Ok(())
}

use std::ops::Range;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{
    arc::{Arc, Shortcut},
    ArcId, HalfArc, Level, Location, TagsId, Vertex, Weight,
};
use crate::error::{GraphError, GraphResult};

/// In-memory directed graph.
///
/// Arc records live in an append-only arena and are addressed by [`ArcId`].
/// Every vertex additionally owns an *active adjacency*: the ids of the arcs
/// incident to it that are still part of the graph being contracted. Removing
/// an arc only drops it from the active adjacency, the arena record stays
/// untouched so shortcuts can always be unpacked.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct GraphStore {
    locations: Vec<Location>,
    levels: Vec<Option<Level>>,
    arcs: Vec<Arc>,
    active: Vec<Vec<ArcId>>,
}

impl GraphStore {
    pub fn new() -> Self {
        GraphStore::default()
    }

    pub fn add_vertex(&mut self, location: Location) -> Vertex {
        let vertex = self.locations.len() as Vertex;
        self.locations.push(location);
        self.levels.push(None);
        self.active.push(Vec::new());
        vertex
    }

    pub fn number_of_vertices(&self) -> u32 {
        self.locations.len() as u32
    }

    /// Number of arc records in the arena, including removed ones.
    pub fn number_of_arcs(&self) -> u32 {
        self.arcs.len() as u32
    }

    pub fn vertices(&self) -> Range<Vertex> {
        0..self.number_of_vertices()
    }

    pub fn contains(&self, vertex: Vertex) -> bool {
        (vertex as usize) < self.locations.len()
    }

    pub fn location(&self, vertex: Vertex) -> Option<Location> {
        self.locations.get(vertex as usize).copied()
    }

    /// Adds an original arc. Weights have to be finite and non-negative and
    /// both endpoints have to exist.
    pub fn add_arc(
        &mut self,
        tail: Vertex,
        head: Vertex,
        weight: Weight,
        forward: bool,
        backward: bool,
        tags: Option<TagsId>,
    ) -> GraphResult<ArcId> {
        let arc = Arc::original(tail, head, weight, forward, backward, tags);
        self.check_arc(&arc)?;
        Ok(self.push_arc(arc))
    }

    /// Adds a shortcut skipping `shortcut.via`. The replaced arcs have to be
    /// in the arena already.
    pub fn add_shortcut(
        &mut self,
        tail: Vertex,
        head: Vertex,
        weight: Weight,
        forward: bool,
        backward: bool,
        shortcut: Shortcut,
    ) -> GraphResult<ArcId> {
        let arc = Arc {
            tail,
            head,
            weight,
            forward,
            backward,
            shortcut: Some(shortcut),
            tags: None,
        };
        self.check_arc(&arc)?;
        for child in [shortcut.first, shortcut.second] {
            if child as usize >= self.arcs.len() {
                return Err(GraphError::malformed(format!(
                    "shortcut {} -> {} references unknown arc {}",
                    tail, head, child
                )));
            }
        }
        Ok(self.push_arc(arc))
    }

    fn check_arc(&self, arc: &Arc) -> GraphResult<()> {
        for vertex in [arc.tail, arc.head] {
            if !self.contains(vertex) {
                return Err(GraphError::malformed(format!(
                    "arc {} -> {} references unknown vertex {}",
                    arc.tail, arc.head, vertex
                )));
            }
        }
        if !arc.weight.is_finite() || arc.weight < 0.0 {
            return Err(GraphError::malformed(format!(
                "arc {} -> {} has invalid weight {}",
                arc.tail, arc.head, arc.weight
            )));
        }
        Ok(())
    }

    fn push_arc(&mut self, arc: Arc) -> ArcId {
        let id = self.arcs.len() as ArcId;
        self.active[arc.tail as usize].push(id);
        if arc.head != arc.tail {
            self.active[arc.head as usize].push(id);
        }
        self.arcs.push(arc);
        id
    }

    /// Arena lookup. Works for active and removed arcs alike.
    ///
    /// Panics if `id` was never handed out by this store.
    pub fn arc(&self, id: ArcId) -> &Arc {
        &self.arcs[id as usize]
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    /// Active arcs incident to `vertex`, in insertion order.
    pub fn arcs_of(&self, vertex: Vertex) -> impl Iterator<Item = (ArcId, &Arc)> + '_ {
        self.active
            .get(vertex as usize)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&id| (id, &self.arcs[id as usize]))
    }

    pub fn degree(&self, vertex: Vertex) -> usize {
        self.active.get(vertex as usize).map_or(0, Vec::len)
    }

    /// Drops every active arc stored as `tail -> head` from the active
    /// adjacency. Returns how many were removed.
    pub fn remove_arc(&mut self, tail: Vertex, head: Vertex) -> usize {
        let ids = self
            .arcs_of(tail)
            .filter(|(_, arc)| arc.tail == tail && arc.head == head)
            .map(|(id, _)| id)
            .collect::<Vec<_>>();
        ids.iter().for_each(|&id| self.deactivate(id));
        ids.len()
    }

    /// Drops a single arc from the active adjacency of both endpoints.
    pub fn deactivate(&mut self, id: ArcId) {
        let Arc { tail, head, .. } = self.arcs[id as usize];
        self.active[tail as usize].retain(|&other| other != id);
        self.active[head as usize].retain(|&other| other != id);
    }

    /// Drops all active arcs incident to `vertex` and returns their ids.
    pub fn disconnect(&mut self, vertex: Vertex) -> Vec<ArcId> {
        let ids = std::mem::take(&mut self.active[vertex as usize]);
        for &id in ids.iter() {
            if let Some(other) = self.arcs[id as usize].opposite(vertex) {
                if other != vertex {
                    self.active[other as usize].retain(|&other_id| other_id != id);
                }
            }
        }
        ids
    }

    /// Vertices reachable from `vertex` over a single active arc, with the
    /// cheapest such arc per neighbor. Sorted by neighbor.
    pub fn out_neighbors(&self, vertex: Vertex) -> Vec<HalfArc> {
        let half_arcs = self.arcs_of(vertex).filter_map(|(id, arc)| {
            let other = arc.leaving(vertex)?;
            Some(HalfArc {
                vertex: other,
                weight: arc.weight,
                arc: id,
            })
        });
        cheapest_per_neighbor(vertex, half_arcs)
    }

    /// Vertices that reach `vertex` over a single active arc, with the
    /// cheapest such arc per neighbor. Sorted by neighbor.
    pub fn in_neighbors(&self, vertex: Vertex) -> Vec<HalfArc> {
        let half_arcs = self.arcs_of(vertex).filter_map(|(id, arc)| {
            let other = arc.entering(vertex)?;
            Some(HalfArc {
                vertex: other,
                weight: arc.weight,
                arc: id,
            })
        });
        cheapest_per_neighbor(vertex, half_arcs)
    }

    /// Distinct vertices sharing an active arc with `vertex`, regardless of
    /// direction.
    pub fn neighbors(&self, vertex: Vertex) -> Vec<Vertex> {
        self.arcs_of(vertex)
            .filter_map(|(_, arc)| arc.opposite(vertex))
            .filter(|&other| other != vertex)
            .sorted_unstable()
            .dedup()
            .collect()
    }

    pub fn level_of(&self, vertex: Vertex) -> Option<Level> {
        self.levels.get(vertex as usize).copied().flatten()
    }

    pub fn levels(&self) -> &[Option<Level>] {
        &self.levels
    }

    /// Assigns the contraction level of `vertex`. A level is assigned once and
    /// never changes afterwards.
    pub fn set_level(&mut self, vertex: Vertex, level: Level) -> GraphResult<()> {
        let slot = self
            .levels
            .get_mut(vertex as usize)
            .ok_or_else(|| GraphError::invariant(format!("unknown vertex {}", vertex)))?;
        if let Some(current) = slot {
            return Err(GraphError::invariant(format!(
                "vertex {} already has level {}",
                vertex, current
            )));
        }
        *slot = Some(level);
        Ok(())
    }
}

fn cheapest_per_neighbor(
    vertex: Vertex,
    half_arcs: impl Iterator<Item = HalfArc>,
) -> Vec<HalfArc> {
    let mut half_arcs = half_arcs
        .filter(|half_arc| half_arc.vertex != vertex)
        .collect::<Vec<_>>();
    half_arcs.sort_by(|a, b| {
        a.vertex
            .cmp(&b.vertex)
            .then(a.weight.total_cmp(&b.weight))
            .then(a.arc.cmp(&b.arc))
    });
    half_arcs.dedup_by_key(|half_arc| half_arc.vertex);
    half_arcs
}

#[cfg(test)]
mod tests {
    use super::GraphStore;
    use crate::{
        error::GraphError,
        graphs::{arc::Shortcut, Location},
    };

    fn store_with_vertices(n: u32) -> GraphStore {
        let mut store = GraphStore::new();
        for i in 0..n {
            store.add_vertex(Location::new(i as f64, 0.0));
        }
        store
    }

    #[test]
    fn rejects_malformed_arcs() {
        let mut store = store_with_vertices(2);
        assert!(matches!(
            store.add_arc(0, 1, -1.0, true, true, None),
            Err(GraphError::MalformedGraph { .. })
        ));
        assert!(matches!(
            store.add_arc(0, 1, f64::NAN, true, true, None),
            Err(GraphError::MalformedGraph { .. })
        ));
        assert!(matches!(
            store.add_arc(0, 7, 1.0, true, true, None),
            Err(GraphError::MalformedGraph { .. })
        ));
        let shortcut = Shortcut {
            via: 1,
            first: 3,
            second: 4,
        };
        assert!(matches!(
            store.add_shortcut(0, 1, 1.0, true, false, shortcut),
            Err(GraphError::MalformedGraph { .. })
        ));
        assert_eq!(store.number_of_arcs(), 0);
    }

    #[test]
    fn neighbors_follow_flags_and_keep_cheapest() {
        let mut store = store_with_vertices(3);
        store.add_arc(0, 1, 4.0, true, false, None).unwrap();
        let cheap = store.add_arc(0, 1, 2.0, true, false, None).unwrap();
        let two_way = store.add_arc(2, 0, 1.0, true, true, None).unwrap();

        let out = store.out_neighbors(0);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].vertex, out[0].weight, out[0].arc), (1, 2.0, cheap));
        assert_eq!((out[1].vertex, out[1].arc), (2, two_way));

        let into = store.in_neighbors(0);
        assert_eq!(into.len(), 1);
        assert_eq!(into[0].vertex, 2);

        assert!(store.in_neighbors(2).iter().any(|half| half.vertex == 0));
        assert!(store.out_neighbors(1).is_empty());
        assert_eq!(store.neighbors(0), vec![1, 2]);
    }

    #[test]
    fn removal_keeps_arena_records() {
        let mut store = store_with_vertices(3);
        let a = store.add_arc(0, 1, 1.0, true, true, None).unwrap();
        store.add_arc(1, 2, 1.0, true, true, None).unwrap();

        assert_eq!(store.remove_arc(0, 1), 1);
        assert_eq!(store.remove_arc(0, 1), 0);
        assert_eq!(store.degree(0), 0);
        assert_eq!(store.degree(1), 1);
        assert_eq!(store.arc(a).head, 1);

        let removed = store.disconnect(1);
        assert_eq!(removed.len(), 1);
        assert_eq!(store.degree(2), 0);
        assert_eq!(store.number_of_arcs(), 2);
    }

    #[test]
    fn levels_are_assigned_once() {
        let mut store = store_with_vertices(2);
        assert_eq!(store.level_of(0), None);
        store.set_level(0, 0).unwrap();
        assert_eq!(store.level_of(0), Some(0));
        assert!(matches!(
            store.set_level(0, 1),
            Err(GraphError::ContractionInvariantViolation { .. })
        ));
    }
}

use ahash::HashSet;
use fixedbitset::FixedBitSet;

use crate::graphs::Vertex;

pub trait VertexExpandedData {
    /// Marks `vertex` as expanded. Returns whether it already was.
    fn expand(&mut self, vertex: Vertex) -> bool;

    fn is_expanded(&self, vertex: Vertex) -> bool;

    fn clear(&mut self);
}

pub struct VertexExpandedDataBitSet {
    expanded: FixedBitSet,
}

impl VertexExpandedDataBitSet {
    pub fn new(number_of_vertices: u32) -> Self {
        VertexExpandedDataBitSet {
            expanded: FixedBitSet::with_capacity(number_of_vertices as usize),
        }
    }
}

impl VertexExpandedData for VertexExpandedDataBitSet {
    fn expand(&mut self, vertex: Vertex) -> bool {
        self.expanded.put(vertex as usize)
    }

    fn is_expanded(&self, vertex: Vertex) -> bool {
        self.expanded.contains(vertex as usize)
    }

    fn clear(&mut self) {
        self.expanded.clear()
    }
}

#[derive(Default)]
pub struct VertexExpandedDataHashSet {
    expanded: HashSet<Vertex>,
}

impl VertexExpandedDataHashSet {
    pub fn new() -> Self {
        VertexExpandedDataHashSet::default()
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

impl VertexExpandedData for VertexExpandedDataHashSet {
    fn expand(&mut self, vertex: Vertex) -> bool {
        !self.expanded.insert(vertex)
    }

    fn is_expanded(&self, vertex: Vertex) -> bool {
        self.expanded.contains(&vertex)
    }

    fn clear(&mut self) {
        self.expanded.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{VertexExpandedData, VertexExpandedDataBitSet, VertexExpandedDataHashSet};

    #[test]
    fn expand_reports_previous_state() {
        let mut bit_set = VertexExpandedDataBitSet::new(8);
        let mut hash_set = VertexExpandedDataHashSet::new();

        for expanded in [&mut bit_set as &mut dyn VertexExpandedData, &mut hash_set] {
            assert!(!expanded.expand(5));
            assert!(expanded.expand(5));
            assert!(expanded.is_expanded(5));
            assert!(!expanded.is_expanded(4));
            expanded.clear();
            assert!(!expanded.is_expanded(5));
        }
    }
}

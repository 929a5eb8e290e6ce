use serde::{Deserialize, Serialize};

use super::{ArcId, TagsId, Vertex, Weight};

/// The two arcs a shortcut replaces. `first` connects the tail with `via`,
/// `second` connects `via` with the head. Both are arena indices, so they
/// stay resolvable after contraction removed them from the active adjacency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub via: Vertex,
    pub first: ArcId,
    pub second: ArcId,
}

/// Arc record as stored in the arena. `forward` allows travel tail -> head,
/// `backward` allows head -> tail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub tail: Vertex,
    pub head: Vertex,
    pub weight: Weight,
    pub forward: bool,
    pub backward: bool,
    pub shortcut: Option<Shortcut>,
    pub tags: Option<TagsId>,
}

impl Arc {
    pub fn original(
        tail: Vertex,
        head: Vertex,
        weight: Weight,
        forward: bool,
        backward: bool,
        tags: Option<TagsId>,
    ) -> Arc {
        Arc {
            tail,
            head,
            weight,
            forward,
            backward,
            shortcut: None,
            tags,
        }
    }

    /// The contracted vertex this arc skips, `None` for original arcs.
    pub fn via(&self) -> Option<Vertex> {
        self.shortcut.map(|shortcut| shortcut.via)
    }

    pub fn is_shortcut(&self) -> bool {
        self.shortcut.is_some()
    }

    pub fn is_loop(&self) -> bool {
        self.tail == self.head
    }

    /// The endpoint opposite to `vertex`, if `vertex` is an endpoint at all.
    pub fn opposite(&self, vertex: Vertex) -> Option<Vertex> {
        if vertex == self.tail {
            Some(self.head)
        } else if vertex == self.head {
            Some(self.tail)
        } else {
            None
        }
    }

    /// Whether the arc may be travelled from `from` to `to`.
    pub fn permits(&self, from: Vertex, to: Vertex) -> bool {
        (self.forward && from == self.tail && to == self.head)
            || (self.backward && from == self.head && to == self.tail)
    }

    /// Vertex reached when leaving `from` over this arc.
    pub fn leaving(&self, from: Vertex) -> Option<Vertex> {
        let to = self.opposite(from)?;
        self.permits(from, to).then_some(to)
    }

    /// Vertex one comes from when entering `to` over this arc.
    pub fn entering(&self, to: Vertex) -> Option<Vertex> {
        let from = self.opposite(to)?;
        self.permits(from, to).then_some(from)
    }

    /// True if every direction `other` can be travelled in is also allowed by
    /// `self`. Arcs between different vertex pairs never cover each other.
    pub fn covers(&self, other: &Arc) -> bool {
        let same_pair = (self.tail == other.tail && self.head == other.head)
            || (self.tail == other.head && self.head == other.tail);
        if !same_pair {
            return false;
        }

        let along = !other.forward || self.permits(other.tail, other.head);
        let against = !other.backward || self.permits(other.head, other.tail);
        along && against
    }

    /// `self` makes `other` redundant: it is not more expensive and can be
    /// travelled in all of `other`'s directions.
    pub fn dominates(&self, other: &Arc) -> bool {
        self.weight <= other.weight && self.covers(other)
    }
}

#[cfg(test)]
mod tests {
    use super::Arc;

    #[test]
    fn permits_respects_flags() {
        let one_way = Arc::original(0, 1, 2.0, true, false, None);
        assert!(one_way.permits(0, 1));
        assert!(!one_way.permits(1, 0));
        assert_eq!(one_way.leaving(0), Some(1));
        assert_eq!(one_way.leaving(1), None);
        assert_eq!(one_way.entering(1), Some(0));
        assert_eq!(one_way.entering(0), None);

        let reversed = Arc::original(0, 1, 2.0, false, true, None);
        assert!(reversed.permits(1, 0));
        assert!(!reversed.permits(0, 1));
    }

    #[test]
    fn dominance_requires_weight_and_direction() {
        let two_way = Arc::original(0, 1, 2.0, true, true, None);
        let cheap_one_way = Arc::original(1, 0, 1.0, false, true, None);
        let expensive_two_way = Arc::original(1, 0, 3.0, true, true, None);

        // cheap_one_way only allows 0 -> 1.
        assert!(!cheap_one_way.dominates(&two_way));
        assert!(two_way.dominates(&expensive_two_way));
        assert!(two_way.covers(&cheap_one_way));
        assert!(!two_way.dominates(&cheap_one_way));

        let elsewhere = Arc::original(0, 2, 0.5, true, true, None);
        assert!(!elsewhere.dominates(&expensive_two_way));
    }
}

use crate::graphs::{graph_store::GraphStore, ArcId, PathArc, Vertex};

/// Replaces the arc `id`, travelled starting at `from`, by the original arcs
/// it stands for, in travel order. `None` if there is no such arc or `from`
/// is none of its endpoints.
///
/// Shortcuts are resolved through the arena ids of their two children with an
/// explicit stack. Every child skips a vertex of lower level than its parent,
/// so the expansion terminates.
pub fn unpack(graph: &GraphStore, id: ArcId, from: Vertex) -> Option<Vec<PathArc>> {
    let mut path = Vec::new();
    unpack_checked(graph, id, from, &mut path)?;
    Some(path)
}

fn unpack_checked(
    graph: &GraphStore,
    id: ArcId,
    from: Vertex,
    path: &mut Vec<PathArc>,
) -> Option<()> {
    graph.arcs().get(id as usize)?.opposite(from)?;
    unpack_into(graph, id, from, path);
    Some(())
}

/// Appends the unpacked arc to `path`. `from` has to be an endpoint of `id`.
pub fn unpack_into(graph: &GraphStore, id: ArcId, from: Vertex, path: &mut Vec<PathArc>) {
    let mut stack = vec![(id, from)];

    while let Some((id, from)) = stack.pop() {
        let arc = graph.arc(id);
        debug_assert!(
            arc.opposite(from).is_some(),
            "{} is no endpoint of arc {}",
            from,
            id
        );
        let to = if from == arc.tail { arc.head } else { arc.tail };

        match arc.shortcut {
            None => path.push(PathArc {
                tail: from,
                head: to,
                weight: arc.weight,
                arc: id,
            }),
            // Pushed in reverse, the stack pops the half next to `from` first.
            Some(shortcut) if from == arc.tail => {
                stack.push((shortcut.second, shortcut.via));
                stack.push((shortcut.first, from));
            }
            Some(shortcut) => {
                stack.push((shortcut.first, shortcut.via));
                stack.push((shortcut.second, from));
            }
        }
    }
}

/// Unpacks a sequence of `(arc, from)` hops.
pub fn unpack_path(graph: &GraphStore, hops: &[(ArcId, Vertex)]) -> Option<Vec<PathArc>> {
    let mut path = Vec::new();
    for &(id, from) in hops {
        unpack_checked(graph, id, from, &mut path)?;
    }
    Some(path)
}

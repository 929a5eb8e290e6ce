use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use indicatif::ProgressIterator;
use log::info;
use serde::{Deserialize, Serialize};

use super::{graph_store::GraphStore, Location, TagsId, Vertex, Weight};
use crate::error::{GraphError, GraphResult};

/// Directed arc as delivered by the ingestion side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcRecord {
    pub tail: Vertex,
    pub head: Vertex,
    pub weight: Weight,
    pub forward: bool,
    pub backward: bool,
    pub tags: Option<TagsId>,
}

impl ArcRecord {
    pub fn one_way(tail: Vertex, head: Vertex, weight: Weight) -> ArcRecord {
        ArcRecord {
            tail,
            head,
            weight,
            forward: true,
            backward: false,
            tags: None,
        }
    }

    pub fn two_way(tail: Vertex, head: Vertex, weight: Weight) -> ArcRecord {
        ArcRecord {
            backward: true,
            ..ArcRecord::one_way(tail, head, weight)
        }
    }
}

/// Builds a store from (id, location) and arc tuples. Vertex ids may arrive
/// in any order but have to be dense and unique.
pub fn from_tuples(
    vertices: impl IntoIterator<Item = (Vertex, Location)>,
    arcs: impl IntoIterator<Item = ArcRecord>,
) -> GraphResult<GraphStore> {
    let mut vertices = vertices.into_iter().collect::<Vec<_>>();
    vertices.sort_by_key(|(id, _)| *id);

    let mut store = GraphStore::new();
    for (expected, (id, location)) in vertices.into_iter().enumerate() {
        if id as usize != expected {
            return Err(GraphError::malformed(format!(
                "vertex ids are not dense, expected {} but found {}",
                expected, id
            )));
        }
        store.add_vertex(location);
    }

    for arc in arcs {
        store.add_arc(
            arc.tail,
            arc.head,
            arc.weight,
            arc.forward,
            arc.backward,
            arc.tags,
        )?;
    }

    Ok(store)
}

/// Reads a graph in fmi format. Arcs are one-way, their type field is kept as
/// tag id.
pub fn read_fmi(path: &Path) -> GraphResult<GraphStore> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(index, line)| line.map(|line| (index + 1, line)));

    // skip comment lines
    let mut header = Vec::new();
    for line in lines.by_ref() {
        let (number, line) = line?;
        let line = line.trim().to_string();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        header.push((number, line));
        if header.len() == 2 {
            break;
        }
    }
    if header.len() != 2 {
        return Err(GraphError::malformed("missing vertex and arc counts"));
    }
    let number_of_vertices: usize = parse(&header[0].1, header[0].0)?;
    let number_of_arcs: usize = parse(&header[1].1, header[1].0)?;
    info!(
        "Reading {} vertices and {} arcs from {}",
        number_of_vertices,
        number_of_arcs,
        path.display()
    );

    let mut store = GraphStore::new();
    for line in lines
        .by_ref()
        .take(number_of_vertices)
        .progress_count(number_of_vertices as u64)
    {
        // nodeID nodeID2 latitude longitude elevation
        let (number, line) = line?;
        let values = line.split_whitespace().collect::<Vec<_>>();
        let id: Vertex = parse(field(&values, 0, number)?, number)?;
        let latitude: f64 = parse(field(&values, 2, number)?, number)?;
        let longitude: f64 = parse(field(&values, 3, number)?, number)?;
        if id != store.number_of_vertices() {
            return Err(GraphError::malformed(format!(
                "vertex {} on line {} is out of order",
                id, number
            )));
        }
        store.add_vertex(Location::new(latitude, longitude));
    }

    let mut read_arcs = 0;
    for line in lines.take(number_of_arcs).progress_count(number_of_arcs as u64) {
        // srcIDX trgIDX cost type maxspeed
        let (number, line) = line?;
        let values = line.split_whitespace().collect::<Vec<_>>();
        let tail: Vertex = parse(field(&values, 0, number)?, number)?;
        let head: Vertex = parse(field(&values, 1, number)?, number)?;
        let weight: Weight = parse(field(&values, 2, number)?, number)?;
        let tags = values.get(3).and_then(|value| value.parse::<TagsId>().ok());
        store.add_arc(tail, head, weight, true, false, tags)?;
        read_arcs += 1;
    }

    if store.number_of_vertices() as usize != number_of_vertices || read_arcs != number_of_arcs {
        return Err(GraphError::malformed(format!(
            "expected {} vertices and {} arcs but file ended after {} and {}",
            number_of_vertices,
            number_of_arcs,
            store.number_of_vertices(),
            read_arcs
        )));
    }

    Ok(store)
}

fn field<'a>(values: &[&'a str], index: usize, line: usize) -> GraphResult<&'a str> {
    values.get(index).copied().ok_or_else(|| GraphError::Parse {
        line,
        reason: format!("missing field {}", index),
    })
}

fn parse<T: FromStr>(value: &str, line: usize) -> GraphResult<T> {
    value.parse().map_err(|_| GraphError::Parse {
        line,
        reason: format!("invalid value '{}'", value),
    })
}

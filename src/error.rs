use thiserror::Error;

use crate::graphs::Vertex;

/// Errors raised while building or contracting a graph. All of them are
/// fatal for the preprocessing run that produced them.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("malformed graph: {reason}")]
    MalformedGraph { reason: String },

    #[error("contraction invariant violated: {reason}")]
    ContractionInvariantViolation { reason: String },

    #[error("unable to parse line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("bincode: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        GraphError::MalformedGraph {
            reason: reason.into(),
        }
    }

    pub fn invariant(reason: impl Into<String>) -> Self {
        GraphError::ContractionInvariantViolation {
            reason: reason.into(),
        }
    }
}

/// Outcome of a query that did not produce a path.
///
/// `NoPath` is an ordinary answer for disconnected pairs and has to be
/// handled by every caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("no path from {from} to {to}")]
    NoPath { from: Vertex, to: Vertex },

    #[error("vertex {0} is not part of the graph")]
    UnknownVertex(Vertex),

    #[error("query was cancelled")]
    Cancelled,
}

pub type GraphResult<T> = Result<T, GraphError>;

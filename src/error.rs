//! Error type shared by graph construction, the path engine and the text reader.

use thiserror::Error;

use crate::graph::VertexId;

/// Errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProximityError {
    /// Graph construction was handed no vertices.
    #[error("empty vertex list")]
    EmptyInput,

    /// A vertex id outside the graph was used as origin or lookup key.
    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),

    /// A record in the input text is incomplete.
    #[error("record {record}: {reason}")]
    MalformedRecord { record: usize, reason: String },

    /// A coordinate field could not be parsed as a finite number.
    #[error("record {record}: invalid {field} coordinate {value:?}")]
    InvalidCoordinate {
        record: usize,
        field: &'static str,
        value: String,
    },

    /// A vertex handed to graph construction has a NaN or infinite coordinate.
    #[error("{vertex} has non-finite {field} coordinate {value}")]
    NonFiniteCoordinate {
        vertex: VertexId,
        field: &'static str,
        value: f64,
    },
}

/// Result alias using [`ProximityError`].
pub type Result<T> = std::result::Result<T, ProximityError>;

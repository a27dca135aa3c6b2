use thiserror::Error;

use crate::network::NodeId;

/// Convenient result alias for the evacuation routing library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The network has no nodes, so the request origin cannot be snapped.
    #[error("no start node: the road network is empty")]
    NoStartNode,

    /// Every shelter's spare capacity is below the requested group size.
    #[error("no shelter has spare capacity for a group of {group_size}")]
    NoCapacityShelter { group_size: u32 },

    /// A start and a qualifying shelter exist but nothing connects them.
    #[error("no route found between {start} and shelter {shelter}")]
    NoPath { start: NodeId, shelter: NodeId },

    /// The search hit its expansion budget or deadline before finishing.
    #[error("route search aborted after expanding {expanded} nodes")]
    SearchAborted { expanded: usize },

    /// Raised when a request fails validation before searching.
    #[error("invalid evacuation request: {message}")]
    InvalidRequest { message: String },

    /// Raised when an edge or lookup references a node that does not exist.
    #[error("unknown node id: {id}{}", format_suggestions(.suggestions))]
    UnknownNode { id: NodeId, suggestions: Vec<String> },

    /// Raised when two nodes share an identifier during network construction.
    #[error("duplicate node id: {id}")]
    DuplicateNode { id: NodeId },

    /// Raised when edge attributes are out of range.
    #[error("invalid edge {from} -> {to}: {message}")]
    InvalidEdge {
        from: NodeId,
        to: NodeId,
        message: String,
    },

    /// Raised when updating an edge that is not part of the network.
    #[error("edge {from} -> {to} not found")]
    EdgeNotFound { from: NodeId, to: NodeId },

    /// Raised when a hazard zone fails validation.
    #[error("invalid hazard zone {id}: {message}")]
    InvalidHazard { id: String, message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error means "no route" rather than bad input.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NoStartNode | Error::NoCapacityShelter { .. } | Error::NoPath { .. }
        )
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

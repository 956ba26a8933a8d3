use actix_web::HttpResponse as Http;
use std::fmt;

use crate::cycle::Phase;

/// Failure of a scheduling callback.
///
/// Every variant fails only the node or pod it was raised for, never the process.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginError {
    /// The capacity oracle could not be reached, or its response could not be read.
    Transport(String),
    /// The oracle answered with a body of the wrong shape.
    Decode(String),
    /// The oracle answered with a non-success status.
    UnexpectedStatus { status: u16 },
    /// The score set has no entry for the requested node.
    NodeNotFound(String),
    /// Normalization was asked to work on zero candidates.
    EmptyInput,
    /// The reservation payload could not be encoded.
    Serialization(String),
    /// The cycle was cancelled before the callback completed.
    Cancelled,
    /// The callback is not legal in the cycle's current phase.
    InvalidTransition { from: Phase, to: Phase },
}

impl PluginError {
    /// Maps the error to an appropriate HTTP response.
    pub fn to_http_response(&self) -> Http {
        let msg = self.to_string();
        match self {
            PluginError::Transport(_)
            | PluginError::Decode(_)
            | PluginError::UnexpectedStatus { .. } => Http::BadGateway().body(msg),
            PluginError::NodeNotFound(_) => Http::NotFound().body(msg),
            PluginError::EmptyInput => Http::BadRequest().body(msg),
            PluginError::InvalidTransition { .. } => Http::Conflict().body(msg),
            PluginError::Cancelled => Http::ServiceUnavailable().body(msg),
            PluginError::Serialization(_) => Http::InternalServerError().body(msg),
        }
    }
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginError::Transport(msg) => write!(f, "Transport error: {}", msg),
            PluginError::Decode(msg) => write!(f, "Decode error: {}", msg),
            PluginError::UnexpectedStatus { status } => {
                write!(f, "Capacity oracle answered with status {}", status)
            }
            PluginError::NodeNotFound(node) => write!(f, "No score found for node {}", node),
            PluginError::EmptyInput => write!(f, "No scores available to normalize"),
            PluginError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            PluginError::Cancelled => write!(f, "Scheduling cycle cancelled"),
            PluginError::InvalidTransition { from, to } => {
                write!(f, "Invalid cycle transition from {} to {}", from, to)
            }
        }
    }
}

impl std::error::Error for PluginError {}

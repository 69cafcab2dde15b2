//! Error types for the HTTP service.

use std::net::AddrParseError;

use thiserror::Error;

/// Failures while turning a `/simulate` body into engine inputs.
///
/// Every variant is reported to the client the same way: status 500 with the
/// display text as the `error` field.
#[derive(Error, Debug)]
pub enum SimulateError {
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("qubits={qubits}, strength={strength} produce non-finite results")]
    NonFinite { qubits: i32, strength: f64 },
}

impl SimulateError {
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        SimulateError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures that stop the server from starting or keep it from running.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("invalid allowed origin '{0}'")]
    Origin(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

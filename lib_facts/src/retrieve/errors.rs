//! # Network Error Taxonomy
//!
//! Every failure the request executor can produce, and the [`ErrorRecord`]
//! that carries it unchanged through the data sources and the gateway.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Domain tag of every record produced by the network layer.
pub const NETWORK_DOMAIN: &str = "NetworkLayer";

/// Domain tag of records produced by the cache store boundary.
pub const CACHE_DOMAIN: &str = "CacheLayer";

/// Classified failures of a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The endpoint could not be resolved into a full URL.
    #[error("Failed to build full path to resource.")]
    InvalidUrl,
    /// The transport failed before a response was received.
    #[error("An error has occurred at the network level: {0}")]
    Transport(String),
    /// The server answered outside the 2xx range.
    #[error("Received an invalid status code from the server. Status code: {0}")]
    InvalidStatusCode(u16),
    /// A 2xx response arrived without a body.
    #[error("There was no response from the server.")]
    EmptyBody,
    /// The body did not decode into the requested type.
    #[error("A decoding error has occurred. Target type: {0}.")]
    Decode(String),
}

/// Stable kind of an [`ErrorRecord`], what callers switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidUrl,
    TransportError,
    InvalidStatusCode,
    EmptyBody,
    DecodeError,
    /// The cache store failed to read or persist facts.
    Storage,
}

impl ErrorKind {
    /// The stable numeric code of the kind.
    pub fn code(&self) -> i32 {
        match self {
            ErrorKind::InvalidUrl => -1,
            ErrorKind::TransportError => -2,
            ErrorKind::InvalidStatusCode => -3,
            ErrorKind::EmptyBody => -4,
            ErrorKind::DecodeError => -5,
            ErrorKind::Storage => -10,
        }
    }
}

impl NetworkError {
    /// The kind this error is reported as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            NetworkError::InvalidUrl => ErrorKind::InvalidUrl,
            NetworkError::Transport(_) => ErrorKind::TransportError,
            NetworkError::InvalidStatusCode(_) => ErrorKind::InvalidStatusCode,
            NetworkError::EmptyBody => ErrorKind::EmptyBody,
            NetworkError::Decode(_) => ErrorKind::DecodeError,
        }
    }

    /// The stable negative code (-1 to -5).
    pub fn code(&self) -> i32 {
        self.kind().code()
    }

    /// Builds the record handed to callers, appending `details` to the description.
    pub fn record(&self, details: Option<&str>) -> ErrorRecord {
        let mut message = self.to_string();
        if let Some(details) = details {
            message.push(' ');
            message.push_str(details);
        }
        ErrorRecord {
            domain: NETWORK_DOMAIN.to_string(),
            kind: self.kind(),
            code: self.code(),
            message,
        }
    }
}

impl From<NetworkError> for ErrorRecord {
    fn from(error: NetworkError) -> Self {
        error.record(None)
    }
}

/// Structured failure passed across layer boundaries without re-classification.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{domain} ({code}): {message}")]
pub struct ErrorRecord {
    /// Which layer classified the failure.
    pub domain: String,
    /// The failure kind.
    pub kind: ErrorKind,
    /// Stable numeric code of `kind`.
    pub code: i32,
    /// Human readable description. Not meant to be matched on.
    pub message: String,
}

impl ErrorRecord {
    /// A record for a failing cache store.
    pub fn storage(message: impl Into<String>) -> Self {
        Self {
            domain: CACHE_DOMAIN.to_string(),
            kind: ErrorKind::Storage,
            code: ErrorKind::Storage.code(),
            message: message.into(),
        }
    }

    /// Whether the record is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// The record as structured log extras.
    pub fn as_log_extras(&self) -> serde_json::Value {
        serde_json::json!({
            "domain": self.domain,
            "kind": self.kind,
            "code": self.code,
        })
    }
}

//! Errors raised by the poll cycle.
//!
//! Every variant is recoverable at cycle granularity: the poller logs it,
//! forwards it to subscribers and waits for the next tick.

use std::time::Duration;

use thiserror::Error;

/// Retrieval of the upstream feed failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not complete within the configured fetch timeout.
    #[error("feed request timed out after {0:?}")]
    Timeout(Duration),

    /// The upstream answered with a non-success status.
    #[error("feed returned error status: {0}")]
    Status(u16),

    /// The connection failed or the body could not be read.
    #[error("feed transport error: {0}")]
    Transport(String),
}

/// The payload does not conform to the feed schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed protobuf payload: {0}")]
    Malformed(String),

    #[error("required field missing: {0}")]
    MissingRequired(&'static str),
}

impl From<prost::DecodeError> for DecodeError {
    fn from(err: prost::DecodeError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// An entity is structurally unusable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// Entity at this position in the feed has no identifier.
    #[error("entity #{0} has no identifier")]
    MissingId(usize),
}

/// Registry invariant violation. Not produced for well-formed input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("registry invariant violated: {0}")]
    Invariant(String),
}

/// Any failure of a single poll cycle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl PollError {
    /// Stage of the cycle the error came from, for log fields.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Decode(_) => "decode",
            Self::Normalize(_) => "normalize",
            Self::Reconcile(_) => "reconcile",
        }
    }
}

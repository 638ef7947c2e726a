//! Error taxonomy for feed acquisition.
//!
//! A load cycle can fail in exactly two ways: the bytes never arrived
//! ([`NetworkError`]) or they arrived but were not a feed at all
//! ([`ParseError`]).  Defects inside individual feed entries are not errors;
//! the parser skips those entries.
//!
//! Every error here is `Clone` so that a failed outcome can be retained by
//! the loader and handed out again on redelivery.

use thiserror::Error;

/// Failure to retrieve the raw feed bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The URL could not be parsed as an absolute URI.
    #[error("invalid feed URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Connection, TLS, redirect, or other transport-level failure.
    #[error("could not reach {url}: {reason}")]
    Transport { url: String, reason: String },

    /// The server answered with a non-success status code.
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response started but its body could not be read.
    #[error("failed to read response body from {url}: {reason}")]
    Body { url: String, reason: String },
}

/// Failure to recognise the fetched bytes as a feed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The bytes are not a JSON document.
    #[error("feed is not valid JSON: {0}")]
    Malformed(String),

    /// The document is JSON but not the expected container.
    #[error("unrecognised feed envelope: {0}")]
    Envelope(String),
}

/// Terminal failure of one load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

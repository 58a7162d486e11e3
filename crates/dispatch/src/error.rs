//! Error types raised while building routing tables or taking over a connection.
//!
//! Request-time failures are never surfaced as `Err` values: switches answer them by
//! writing a status (404, 405, ...) through the [`ResponseWriter`](crate::ResponseWriter).

use http::uri::{InvalidUri, InvalidUriParts};
use regex_automata::nfa::thompson::BuildError;
use thiserror::Error;

/// Errors produced by routing table construction and request path rewriting.
#[derive(Error, Debug)]
pub enum RouteError {
    /// A regex or placeholder rule did not compile.
    #[error("invalid path pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: BuildError,
    },

    /// A rewritten path could not be turned back into a valid uri.
    #[error("invalid rewritten uri: {0}")]
    InvalidUri(#[from] InvalidUri),

    #[error("invalid rewritten uri parts: {0}")]
    InvalidUriParts(#[from] InvalidUriParts),
}

/// Errors produced when taking over the underlying connection.
#[derive(Error, Debug)]
pub enum HijackError {
    #[error("the response writer does not support connection hijacking")]
    NotSupported,

    #[error("the connection has already been hijacked")]
    AlreadyHijacked,

    #[error("io error while hijacking: {0}")]
    Io(#[from] std::io::Error),
}

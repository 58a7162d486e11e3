//! Response sinks handlers write into.
//!
//! [`ResponseWriter`] is the minimal capability set a transport has to provide: a body sink
//! (via [`std::io::Write`]), a header map and a way to send the status. Writers may expose
//! extra capabilities by overriding the probing methods, which default to `None`:
//!
//! - [`ResponseWriter::vars`]: the per-request [`Vars`] bag
//! - [`ResponseWriter::was_written`]: whether a status has been written
//! - [`ResponseWriter::hijacker`]: taking over the raw connection
//!
//! Components never assume a concrete writer type; they only probe for capabilities.

mod recorder;
mod vars;
mod wrapped;

pub use recorder::ResponseRecorder;
pub use vars::{ORIG_PATH, Vars};
pub use wrapped::WrappedWriter;

use crate::error::HijackError;
use http::header::{CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use http::{HeaderMap, HeaderValue, StatusCode};
use std::io::{self, Write};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::warn;

pub trait ResponseWriter: io::Write + Send {
    /// Returns the response headers.
    fn headers(&self) -> &HeaderMap;

    /// Returns the response headers for modification. Changes made after the status
    /// has been written may not reach the client.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Sends the response status.
    fn write_status(&mut self, status: StatusCode);

    /// The per-request variable bag, if this writer carries one.
    fn vars(&self) -> Option<&Vars> {
        None
    }

    /// Whether a status has been written through this writer, if it keeps track of it.
    fn was_written(&self) -> Option<bool> {
        None
    }

    /// The connection takeover capability of the underlying transport, if any.
    fn hijacker(&mut self) -> Option<&mut dyn Hijacker> {
        None
    }
}

/// A raw, bidirectional connection handed out by a [`Hijacker`].
pub trait Io: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> Io for T {}

/// Lets a handler take over the underlying connection, e.g. for protocol upgrades.
///
/// After a successful hijack the transport must not write anything else on the connection.
#[cfg_attr(test, mockall::automock)]
pub trait Hijacker: Send {
    fn hijack(&mut self) -> Result<Box<dyn Io>, HijackError>;
}

/// Takes over the connection behind `writer`.
pub fn hijack(writer: &mut dyn ResponseWriter) -> Result<Box<dyn Io>, HijackError> {
    writer.hijacker().ok_or(HijackError::NotSupported)?.hijack()
}

/// Replies with a plain text error message and the given status.
///
/// The message is written as the body followed by a newline.
pub fn write_error(writer: &mut dyn ResponseWriter, status: StatusCode, message: &str) {
    let headers = writer.headers_mut();
    if let Ok(content_type) = HeaderValue::from_str(mime::TEXT_PLAIN_UTF_8.as_ref()) {
        headers.insert(CONTENT_TYPE, content_type);
    }
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    writer.write_status(status);
    if let Err(e) = writeln!(writer, "{message}") {
        warn!(cause = %e, status = %status, "failed to write error body");
    }
}

/// Replies with the canonical reason phrase of `status` as message.
pub(crate) fn write_status_error(writer: &mut dyn ResponseWriter, status: StatusCode) {
    write_error(writer, status, status.canonical_reason().unwrap_or("Error"));
}

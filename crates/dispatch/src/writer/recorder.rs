use crate::writer::ResponseWriter;
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, Response, StatusCode};
use std::borrow::Cow;
use std::io;
use tracing::warn;

/// An in-memory [`ResponseWriter`] which records everything written to it.
///
/// Only the first status is kept; a response which never had its status written reports
/// `200 OK`, like most transports would send.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: BytesMut,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Returns true if a status has been written explicitly.
    pub fn status_written(&self) -> bool {
        self.status.is_some()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Converts the recorded data into an [`http::Response`].
    pub fn into_response(self) -> Response<Bytes> {
        let status = self.status();
        let mut response = Response::new(self.body.freeze());
        *response.status_mut() = status;
        *response.headers_mut() = self.headers;
        response
    }
}

impl io::Write for ResponseRecorder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ResponseWriter for ResponseRecorder {
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_status(&mut self, status: StatusCode) {
        match self.status {
            Some(current) => warn!(%current, ignored = %status, "superfluous write_status call"),
            None => self.status = Some(status),
        }
    }
}

//! Small handlers and helpers shared by the unit tests.

use crate::handler::{Handler, Request, handler_fn};
use crate::writer::{ResponseRecorder, ResponseWriter, write_error};
use bytes::Bytes;
use http::{HeaderValue, StatusCode};

const HANDLER_HEADER: &str = "x-handler";

/// A handler appending `name` to the `x-handler` response header.
pub(crate) fn mark(name: &'static str) -> impl Handler {
    handler_fn(move |w, _req| {
        w.headers_mut().append(HANDLER_HEADER, HeaderValue::from_static(name));
    })
}

/// A handler replying with a 500.
pub(crate) fn fail() -> impl Handler {
    handler_fn(|w, _req| write_error(w, StatusCode::INTERNAL_SERVER_ERROR, "Error"))
}

/// A handler echoing the request path into the `x-path` response header.
pub(crate) fn echo_path() -> impl Handler {
    handler_fn(|w, req| {
        let path = HeaderValue::from_str(req.uri().path()).unwrap();
        w.headers_mut().insert("x-path", path);
    })
}

pub(crate) fn request(method: &str, uri: &str) -> Request {
    http::Request::builder().method(method).uri(uri).body(Bytes::new()).unwrap()
}

pub(crate) fn handler_names(recorder: &ResponseRecorder) -> Vec<String> {
    recorder.headers().get_all(HANDLER_HEADER).iter().map(|value| value.to_str().unwrap().to_owned()).collect()
}

pub(crate) fn header(recorder: &ResponseRecorder, name: &str) -> Option<String> {
    recorder.headers().get(name).map(|value| value.to_str().unwrap().to_owned())
}

use crate::handler::{Handler, Request};
use crate::writer::ResponseRecorder;
use bytes::Bytes;
use http::Response;
use tracing::debug;

/// Serves `req` with `handler` into a fresh [`ResponseRecorder`] and returns the recorded
/// response.
///
/// This is the seam for plugging a handler tree into a transport working with plain
/// [`http`] types. A handler which never writes a status yields `200 OK`.
pub async fn dispatch<H: Handler + ?Sized>(handler: &H, mut req: Request) -> Response<Bytes> {
    let mut recorder = ResponseRecorder::new();
    handler.serve(&mut recorder, &mut req).await;

    debug!(method = %req.method(), uri = %req.uri(), status = %recorder.status(), "request dispatched");
    recorder.into_response()
}

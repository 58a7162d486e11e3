use crate::writer::ResponseWriter;
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// The request type every handler receives.
pub type Request = http::Request<Bytes>;

/// A boxed, type erased handler as stored in lists and switches.
pub type BoxHandler = Box<dyn Handler>;

/// A unit of request handling logic.
///
/// Handlers do not return anything: they write headers, status and body through the
/// writer, and they may inspect or modify the request for handlers running after them.
/// Errors are reported by writing an error status.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn serve(&self, writer: &mut dyn ResponseWriter, req: &mut Request);
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Box<H> {
    async fn serve(&self, writer: &mut dyn ResponseWriter, req: &mut Request) {
        (**self).serve(writer, req).await;
    }
}

#[async_trait]
impl<H: Handler + ?Sized> Handler for Arc<H> {
    async fn serve(&self, writer: &mut dyn ResponseWriter, req: &mut Request) {
        (**self).serve(writer, req).await;
    }
}

/// An absent handler does nothing.
#[async_trait]
impl<H: Handler> Handler for Option<H> {
    async fn serve(&self, writer: &mut dyn ResponseWriter, req: &mut Request) {
        if let Some(handler) = self {
            handler.serve(writer, req).await;
        }
    }
}

/// A synchronous closure used as a [`Handler`].
pub struct FnHandler<F> {
    f: F,
}

/// Creates a [`Handler`] from a closure.
///
/// ```
/// use http::StatusCode;
/// use micro_dispatch::{handler_fn, ResponseWriter};
///
/// let teapot = handler_fn(|w: &mut dyn ResponseWriter, _req| w.write_status(StatusCode::IM_A_TEAPOT));
/// ```
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(&mut dyn ResponseWriter, &mut Request) + Send + Sync,
{
    FnHandler { f }
}

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut dyn ResponseWriter, &mut Request) + Send + Sync,
{
    async fn serve(&self, writer: &mut dyn ResponseWriter, req: &mut Request) {
        (self.f)(writer, req);
    }
}

impl<F> fmt::Debug for FnHandler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHandler").finish_non_exhaustive()
    }
}

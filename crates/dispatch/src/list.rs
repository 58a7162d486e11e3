//! Sequential handler chains.
//!
//! A [`List`] runs its handlers one after another against a single [`WrappedWriter`], so
//! every handler sees the same [`Vars`](crate::Vars) bag. Handlers added with
//! [`ListBuilder::silent`] are expected to produce no output; if one of them writes a
//! status anyway, that output is taken as an error reply and the rest of the list is
//! skipped.
//!
//! ```
//! use http::StatusCode;
//! use micro_dispatch::{handler_fn, write_error, List, ResponseWriter};
//!
//! let list = List::builder()
//!     .silent(handler_fn(|w: &mut dyn ResponseWriter, req| {
//!         if !req.headers().contains_key(http::header::AUTHORIZATION) {
//!             write_error(w, StatusCode::UNAUTHORIZED, "Unauthorized");
//!         }
//!     }))
//!     .handler(handler_fn(|w: &mut dyn ResponseWriter, _req| w.write_status(StatusCode::OK)))
//!     .build();
//! ```

use crate::handler::{BoxHandler, Handler, Request};
use crate::writer::{ResponseWriter, WrappedWriter};
use async_trait::async_trait;
use tracing::trace;

/// A handler inside a [`List`], tagged with how its output is treated.
pub enum Link {
    /// Always runs; its output never stops the list.
    Plain(BoxHandler),
    /// Runs and stops the list if it writes a status.
    Silent(BoxHandler),
}

impl Link {
    pub fn plain<H: Handler + 'static>(handler: H) -> Self {
        Self::Plain(Box::new(handler))
    }

    pub fn silent<H: Handler + 'static>(handler: H) -> Self {
        Self::Silent(Box::new(handler))
    }

    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Silent(_))
    }
}

/// Runs a sequence of handlers in order.
pub struct List {
    links: Vec<Link>,
}

impl List {
    pub fn builder() -> ListBuilder {
        ListBuilder::new()
    }

    pub fn new(links: Vec<Link>) -> Self {
        Self { links }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl Handler for List {
    async fn serve(&self, writer: &mut dyn ResponseWriter, req: &mut Request) {
        let mut writer = WrappedWriter::wrap(writer);

        for (index, link) in self.links.iter().enumerate() {
            match link {
                Link::Plain(handler) => handler.serve(&mut writer, req).await,
                Link::Silent(handler) => {
                    writer.reset();
                    handler.serve(&mut writer, req).await;
                    if writer.written() {
                        trace!(index, remaining = self.links.len() - index - 1, "silent handler produced output, list aborted");
                        break;
                    }
                }
            }
        }
    }
}

pub struct ListBuilder {
    links: Vec<Link>,
}

impl ListBuilder {
    fn new() -> Self {
        Self { links: vec![] }
    }

    /// Appends a handler whose output does not affect the rest of the list.
    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.links.push(Link::plain(handler));
        self
    }

    /// Appends a handler which aborts the list when it writes a status.
    pub fn silent<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.links.push(Link::silent(handler));
        self
    }

    pub fn link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }

    pub fn build(self) -> List {
        List { links: self.links }
    }
}

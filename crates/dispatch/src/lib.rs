//! Composable request dispatch for [`http`] services.
//!
//! Everything is a [`Handler`]: an async function receiving a [`ResponseWriter`] and the
//! request. Handlers are combined with
//!
//! - [`List`], running handlers in sequence with abort-on-output [`silent`](ListBuilder::silent)
//!   links,
//! - [`MethodSwitch`], [`HostnameSwitch`], [`Mounts`] and [`PathSwitch`], each picking one
//!   delegate per request.
//!
//! Combinators hand their delegates a [`WrappedWriter`], which carries the per-request
//! [`Vars`] bag: path submatches and the original path ([`ORIG_PATH`]) travel through it to
//! the handlers further down.
//!
//! ```
//! use http::StatusCode;
//! use micro_dispatch::{dispatch, handler_fn, List, Mounts, PathSwitch, ResponseWriter};
//! use std::io::Write;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let people = PathSwitch::builder()
//!     .placeholder("/{name}", handler_fn(|w: &mut dyn ResponseWriter, _req| {
//!         let name = w.vars().and_then(|vars| vars.submatch(1)).unwrap_or_default();
//!         let _ = write!(w, "hello {name}");
//!     }))
//!     .build()
//!     .unwrap();
//! let app = Mounts::builder().mount("/people", List::builder().handler(people).build()).build();
//!
//! let request = http::Request::get("/people/peter").body(bytes::Bytes::new()).unwrap();
//! let response = dispatch(&app, request).await;
//!
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.body().as_ref(), b"hello peter");
//! # });
//! ```

mod dispatch;
mod error;
mod handler;
mod list;
mod path;
pub mod switch;
pub mod writer;

#[cfg(test)]
mod testing;

pub use dispatch::dispatch;
pub use error::{HijackError, RouteError};
pub use handler::{BoxHandler, FnHandler, Handler, Request, handler_fn};
pub use list::{Link, List, ListBuilder};
pub use path::{DiscardPathElements, discard_path_elements};
pub use switch::{
    DEFAULT_HOST, HostnameSwitch, HostnameSwitchBuilder, MethodSwitch, MethodSwitchBuilder, Mounts, MountsBuilder, PathRule,
    PathSwitch, PathSwitchBuilder, PlaceholderRule, RegexRule,
};
pub use writer::{Hijacker, Io, ORIG_PATH, ResponseRecorder, ResponseWriter, Vars, WrappedWriter, hijack, write_error};

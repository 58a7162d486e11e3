//! Request path rewriting.

use crate::error::RouteError;
use crate::handler::{Handler, Request};
use crate::writer::{ORIG_PATH, ResponseWriter, write_status_error};
use async_trait::async_trait;
use http::StatusCode;
use http::Uri;
use http::uri::PathAndQuery;
use tracing::warn;

/// Returns a copy of `uri` with its path replaced, keeping the query.
pub(crate) fn replace_path(uri: &Uri, path: &str) -> Result<Uri, RouteError> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_owned(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}

/// Drops the first `count` elements of `path`.
///
/// A trailing slash survives; if nothing is left the result is `/`.
pub(crate) fn discard_elements(path: &str, count: usize) -> String {
    let relative = path.strip_prefix('/').unwrap_or(path);
    match relative.splitn(count.saturating_add(1), '/').nth(count) {
        Some(rest) => format!("/{rest}"),
        None => "/".to_owned(),
    }
}

/// A handler which removes leading elements from the request path.
///
/// Meant to be used in a [`List`](crate::List): the handlers after it see the shortened
/// path. The path before the first rewrite is kept in [`Vars`](crate::Vars) under
/// [`ORIG_PATH`] when the writer carries a bag.
#[derive(Debug, Clone, Copy)]
pub struct DiscardPathElements {
    count: usize,
}

pub fn discard_path_elements(count: usize) -> DiscardPathElements {
    DiscardPathElements { count }
}

#[async_trait]
impl Handler for DiscardPathElements {
    async fn serve(&self, writer: &mut dyn ResponseWriter, req: &mut Request) {
        let path = req.uri().path();
        if let Some(vars) = writer.vars() {
            vars.insert_if_absent(ORIG_PATH, path);
        }

        match replace_path(req.uri(), &discard_elements(path, self.count)) {
            Ok(uri) => *req.uri_mut() = uri,
            Err(e) => {
                warn!(cause = %e, path, "can't discard path elements");
                write_status_error(writer, StatusCode::BAD_REQUEST);
            }
        }
    }
}

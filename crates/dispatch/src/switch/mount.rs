use crate::handler::{BoxHandler, Handler, Request};
use crate::path::replace_path;
use crate::writer::{ORIG_PATH, ResponseWriter, WrappedWriter, write_status_error};
use async_trait::async_trait;
use http::{StatusCode, Uri};
use std::borrow::Cow;
use std::mem;
use std::ops::{Deref, DerefMut};
use tracing::debug;

/// Dispatches to handlers mounted at a path prefix, stripping the prefix from the
/// request path before delegating.
///
/// Prefixes are tried in registration order and trailing slashes of a prefix are
/// ignored. Matching is a plain string prefix test, so a mount at `/foo` also receives
/// `/foobar`, seen by the mounted handler as `/bar`; add a trailing separator to the
/// following path element when segment boundaries matter. The stripped path always starts
/// with `/`, a request for the prefix itself arrives as `/`.
///
/// The path as it was before the outermost mount stripped anything is recorded in the
/// [`Vars`](crate::Vars) under [`ORIG_PATH`]. The request's original uri is restored once
/// the mounted handler returns or its future is dropped.
pub struct Mounts {
    mounts: Vec<(String, BoxHandler)>,
}

impl Mounts {
    pub fn builder() -> MountsBuilder {
        MountsBuilder::new()
    }

    /// Returns the registered prefixes in matching order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.mounts.iter().map(|(prefix, _)| prefix.as_str())
    }
}

#[async_trait]
impl Handler for Mounts {
    async fn serve(&self, writer: &mut dyn ResponseWriter, req: &mut Request) {
        let mut writer = WrappedWriter::wrap(writer);
        let path = req.uri().path().to_owned();

        for (prefix, handler) in &self.mounts {
            let prefix = prefix.trim_end_matches('/');
            let Some(rest) = path.strip_prefix(prefix) else {
                continue;
            };

            // authority-form targets such as `CONNECT example.com:443` have no path to mount
            let uri = match replace_path(req.uri(), &mounted_path(rest)) {
                Ok(uri) => uri,
                Err(e) => {
                    debug!(cause = %e, %path, prefix, "request target can't be mounted");
                    break;
                }
            };

            debug!(prefix, %path, "mount matched");
            writer.vars().insert_if_absent(ORIG_PATH, path.as_str());

            let mut req = RestoreUri::new(req, uri);
            handler.serve(&mut writer, &mut req).await;
            return;
        }

        debug!(%path, "no mount matched");
        write_status_error(&mut writer, StatusCode::NOT_FOUND);
    }
}

/// The path a mounted handler sees once the prefix is gone.
fn mounted_path(rest: &str) -> Cow<'_, str> {
    if rest.starts_with('/') { Cow::Borrowed(rest) } else { Cow::Owned(format!("/{rest}")) }
}

/// Swaps in a rewritten uri and puts the original back on drop.
struct RestoreUri<'r> {
    req: &'r mut Request,
    orig: Option<Uri>,
}

impl<'r> RestoreUri<'r> {
    fn new(req: &'r mut Request, uri: Uri) -> Self {
        let orig = mem::replace(req.uri_mut(), uri);
        Self { req, orig: Some(orig) }
    }
}

impl Deref for RestoreUri<'_> {
    type Target = Request;

    fn deref(&self) -> &Request {
        self.req
    }
}

impl DerefMut for RestoreUri<'_> {
    fn deref_mut(&mut self) -> &mut Request {
        self.req
    }
}

impl Drop for RestoreUri<'_> {
    fn drop(&mut self) {
        if let Some(orig) = self.orig.take() {
            *self.req.uri_mut() = orig;
        }
    }
}

pub struct MountsBuilder {
    mounts: Vec<(String, BoxHandler)>,
}

impl MountsBuilder {
    fn new() -> Self {
        Self { mounts: vec![] }
    }

    pub fn mount<H: Handler + 'static>(mut self, prefix: impl Into<String>, handler: H) -> Self {
        self.mounts.push((prefix.into(), Box::new(handler)));
        self
    }

    pub fn build(self) -> Mounts {
        Mounts { mounts: self.mounts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::testing::{echo_path, handler_names, header, mark, request};
    use crate::writer::ResponseRecorder;
    use std::time::Duration;

    async fn run(mounts: &Mounts, uri: &str) -> ResponseRecorder {
        run_method(mounts, "GET", uri).await
    }

    async fn run_method(mounts: &Mounts, method: &str, uri: &str) -> ResponseRecorder {
        let mut recorder = ResponseRecorder::new();
        mounts.serve(&mut recorder, &mut request(method, uri)).await;
        recorder
    }

    #[tokio::test]
    async fn strips_prefix() {
        let mounts = Mounts::builder().mount("/first/handler", echo_path()).mount("/second/handler/", echo_path()).build();

        let recorder = run(&mounts, "/first/handler/and/a/path").await;
        assert_eq!(recorder.status(), StatusCode::OK);
        assert_eq!(header(&recorder, "x-path").as_deref(), Some("/and/a/path"));

        let recorder = run(&mounts, "/second/handler/and/a/path").await;
        assert_eq!(recorder.status(), StatusCode::OK);
        assert_eq!(header(&recorder, "x-path").as_deref(), Some("/and/a/path"));

        let recorder = run(&mounts, "/third/handler/and/a/path").await;
        assert_eq!(recorder.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn nested_mounts_keep_outermost_orig_path() {
        let cars = handler_fn(|w, req| {
            let orig = w.vars().and_then(|vars| vars.orig_path()).unwrap();
            w.headers_mut().insert("x-orig-path", orig.parse().unwrap());
            w.headers_mut().insert("x-path", req.uri().path().parse().unwrap());
        });
        let mounts = Mounts::builder()
            .mount("/api/", Mounts::builder().mount("/cars", cars).mount("/people", mark("people")).build())
            .build();

        let recorder = run(&mounts, "/api/cars/bentley").await;

        assert_eq!(header(&recorder, "x-path").as_deref(), Some("/bentley"));
        assert_eq!(header(&recorder, "x-orig-path").as_deref(), Some("/api/cars/bentley"));
    }

    #[tokio::test]
    async fn prefix_match_is_not_segment_aware() {
        let mounts = Mounts::builder().mount("/foo", echo_path()).build();

        let recorder = run(&mounts, "/foobar").await;

        assert_eq!(recorder.status(), StatusCode::OK);
        assert_eq!(header(&recorder, "x-path").as_deref(), Some("/bar"));
    }

    #[tokio::test]
    async fn exact_prefix_becomes_root() {
        let mounts = Mounts::builder().mount("/api", echo_path()).build();

        for uri in ["/api", "/api/", "http://a.com/api", "http://a.com/api?x=1"] {
            let recorder = run(&mounts, uri).await;

            assert_eq!(recorder.status(), StatusCode::OK, "{uri}");
            assert_eq!(header(&recorder, "x-path").as_deref(), Some("/"), "{uri}");
        }
    }

    #[tokio::test]
    async fn absolute_form_keeps_authority() {
        let mounts = Mounts::builder()
            .mount(
                "/foo",
                handler_fn(|w, req| {
                    w.headers_mut().insert("x-uri", req.uri().to_string().parse().unwrap());
                }),
            )
            .build();

        let recorder = run(&mounts, "http://a.com/foobar?x=1").await;

        assert_eq!(recorder.status(), StatusCode::OK);
        assert_eq!(header(&recorder, "x-uri").as_deref(), Some("http://a.com/bar?x=1"));
    }

    #[tokio::test]
    async fn authority_form_is_not_found() {
        let mounts = Mounts::builder().mount("/", mark("root")).build();

        let recorder = run_method(&mounts, "CONNECT", "example.com:443").await;

        assert_eq!(recorder.status(), StatusCode::NOT_FOUND);
        assert!(handler_names(&recorder).is_empty());
    }

    #[tokio::test]
    async fn uri_is_restored_when_serving_is_cancelled() {
        struct Stall;

        #[async_trait]
        impl Handler for Stall {
            async fn serve(&self, _writer: &mut dyn ResponseWriter, _req: &mut Request) {
                std::future::pending::<()>().await;
            }
        }

        let mounts = Mounts::builder().mount("/api", Stall).build();
        let mut recorder = ResponseRecorder::new();
        let mut req = request("GET", "/api/cars");

        let served = tokio::time::timeout(Duration::from_millis(10), mounts.serve(&mut recorder, &mut req)).await;

        assert!(matches!(served, Err(_)));
        assert_eq!(req.uri(), "/api/cars");
    }

    #[tokio::test]
    async fn first_registered_prefix_wins() {
        let mounts = Mounts::builder().mount("/api", mark("api")).mount("/api/v2", mark("v2")).build();

        let recorder = run(&mounts, "/api/v2/cars").await;

        assert_eq!(handler_names(&recorder), ["api"]);
        assert_eq!(mounts.prefixes().collect::<Vec<_>>(), ["/api", "/api/v2"]);
    }

    #[tokio::test]
    async fn query_survives_and_request_is_restored() {
        let mounts = Mounts::builder()
            .mount(
                "/api",
                handler_fn(|w, req| {
                    let query = req.uri().query().unwrap_or_default().to_owned();
                    w.headers_mut().insert("x-query", query.parse().unwrap());
                }),
            )
            .build();

        let mut recorder = ResponseRecorder::new();
        let mut req = request("GET", "/api/cars?color=red");
        mounts.serve(&mut recorder, &mut req).await;

        assert_eq!(header(&recorder, "x-query").as_deref(), Some("color=red"));
        assert_eq!(req.uri(), "/api/cars?color=red");
    }
}

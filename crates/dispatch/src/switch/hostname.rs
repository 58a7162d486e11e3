use crate::handler::{BoxHandler, Handler, Request};
use crate::writer::{ResponseWriter, write_status_error};
use async_trait::async_trait;
use http::StatusCode;
use http::header::HOST;
use std::collections::HashMap;
use tracing::debug;

/// Host key of the fallback entry of a [`HostnameSwitch`].
pub const DEFAULT_HOST: &str = "_";

/// Dispatches to a handler depending on the requested host.
///
/// The host is read from the request uri when it is in absolute form, otherwise from the
/// `Host` header; a trailing port is ignored. Hosts without an entry go to the
/// [`DEFAULT_HOST`] entry if there is one, or get a `404 Not Found`.
pub struct HostnameSwitch {
    hosts: HashMap<String, Option<BoxHandler>>,
}

impl HostnameSwitch {
    pub fn builder() -> HostnameSwitchBuilder {
        HostnameSwitchBuilder::new()
    }
}

#[async_trait]
impl Handler for HostnameSwitch {
    async fn serve(&self, writer: &mut dyn ResponseWriter, req: &mut Request) {
        let host = request_host(req).unwrap_or_default();
        let entry = self.hosts.get(host).or_else(|| self.hosts.get(DEFAULT_HOST));

        match entry {
            Some(Some(handler)) => handler.serve(writer, req).await,
            Some(None) => {}
            None => {
                debug!(host, "no handler for host");
                write_status_error(writer, StatusCode::NOT_FOUND);
            }
        }
    }
}

/// Returns the host a request is addressed to, without port.
pub(crate) fn request_host(req: &Request) -> Option<&str> {
    if let Some(host) = req.uri().host() {
        return Some(host);
    }

    let header = req.headers().get(HOST)?.to_str().ok()?;
    Some(strip_port(header))
}

fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

pub struct HostnameSwitchBuilder {
    hosts: HashMap<String, Option<BoxHandler>>,
}

impl HostnameSwitchBuilder {
    fn new() -> Self {
        Self { hosts: HashMap::new() }
    }

    pub fn host<H: Handler + 'static>(mut self, host: impl Into<String>, handler: H) -> Self {
        self.hosts.insert(host.into(), Some(Box::new(handler)));
        self
    }

    /// Accepts `host` without running anything for it.
    pub fn ignore(mut self, host: impl Into<String>) -> Self {
        self.hosts.insert(host.into(), None);
        self
    }

    /// Sets the handler for hosts without an entry of their own.
    pub fn fallback<H: Handler + 'static>(self, handler: H) -> Self {
        self.host(DEFAULT_HOST, handler)
    }

    pub fn build(self) -> HostnameSwitch {
        HostnameSwitch { hosts: self.hosts }
    }
}

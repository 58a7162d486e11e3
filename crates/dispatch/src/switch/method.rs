use crate::handler::{BoxHandler, Handler, Request};
use crate::writer::{ResponseWriter, write_status_error};
use async_trait::async_trait;
use http::header::ALLOW;
use http::{HeaderValue, Method, StatusCode};
use std::collections::HashMap;
use tracing::debug;

/// Dispatches to a handler depending on the request method.
///
/// Unknown methods are answered with `405 Method Not Allowed` and an `Allow` header listing
/// the registered methods.
pub struct MethodSwitch {
    routes: HashMap<Method, Option<BoxHandler>>,
}

impl MethodSwitch {
    pub fn builder() -> MethodSwitchBuilder {
        MethodSwitchBuilder::new()
    }

    fn allow_header(&self) -> Option<HeaderValue> {
        let mut methods = self.routes.keys().map(Method::as_str).collect::<Vec<_>>();
        methods.sort_unstable();
        HeaderValue::from_str(&methods.join(", ")).ok()
    }
}

#[async_trait]
impl Handler for MethodSwitch {
    async fn serve(&self, writer: &mut dyn ResponseWriter, req: &mut Request) {
        match self.routes.get(req.method()) {
            Some(Some(handler)) => handler.serve(writer, req).await,
            Some(None) => {}
            None => {
                debug!(method = %req.method(), "method not allowed");
                if let Some(allow) = self.allow_header() {
                    writer.headers_mut().insert(ALLOW, allow);
                }
                write_status_error(writer, StatusCode::METHOD_NOT_ALLOWED);
            }
        }
    }
}

pub struct MethodSwitchBuilder {
    routes: HashMap<Method, Option<BoxHandler>>,
}

impl MethodSwitchBuilder {
    fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    pub fn route<H: Handler + 'static>(mut self, method: Method, handler: H) -> Self {
        self.routes.insert(method, Some(Box::new(handler)));
        self
    }

    /// Accepts `method` without running anything for it.
    pub fn allow(mut self, method: Method) -> Self {
        self.routes.insert(method, None);
        self
    }

    pub fn build(self) -> MethodSwitch {
        MethodSwitch { routes: self.routes }
    }
}

macro_rules! method_route {
    ($method:ident, $upper_case_method:ident) => {
        #[doc = concat!("Routes HTTP ", stringify!($upper_case_method), " requests to `handler`.")]
        #[inline]
        pub fn $method<H: Handler + 'static>(self, handler: H) -> Self {
            self.route(Method::$upper_case_method, handler)
        }
    };
}

impl MethodSwitchBuilder {
    method_route!(get, GET);
    method_route!(post, POST);
    method_route!(put, PUT);
    method_route!(delete, DELETE);
    method_route!(head, HEAD);
    method_route!(options, OPTIONS);
    method_route!(patch, PATCH);
}

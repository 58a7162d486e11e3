use std::io::Write;

use bytes::Bytes;
use http::header::{AUTHORIZATION, HOST};
use http::{Request, StatusCode};
use micro_dispatch::{
    HostnameSwitch, List, MethodSwitch, Mounts, PathSwitch, ResponseWriter, discard_path_elements, dispatch, handler_fn,
    write_error,
};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

fn require_auth(w: &mut dyn ResponseWriter, req: &mut micro_dispatch::Request) {
    if !req.headers().contains_key(AUTHORIZATION) {
        write_error(w, StatusCode::UNAUTHORIZED, "Unauthorized");
    }
}

fn show_person(w: &mut dyn ResponseWriter, _req: &mut micro_dispatch::Request) {
    let name = w.vars().and_then(|vars| vars.submatch(1)).unwrap_or_default();
    if let Err(e) = writeln!(w, "person: {name}") {
        warn!(cause = %e, "failed to write body");
    }
}

fn show_photo(w: &mut dyn ResponseWriter, _req: &mut micro_dispatch::Request) {
    let (name, id) = w
        .vars()
        .map(|vars| (vars.submatch(1).unwrap_or_default(), vars.submatch(2).unwrap_or_default()))
        .unwrap_or_default();
    if let Err(e) = writeln!(w, "photo {id} of {name}") {
        warn!(cause = %e, "failed to write body");
    }
}

fn show_path(w: &mut dyn ResponseWriter, req: &mut micro_dispatch::Request) {
    let orig = w.vars().and_then(|vars| vars.orig_path()).unwrap_or_default();
    if let Err(e) = writeln!(w, "static file {} (requested as {orig})", req.uri().path()) {
        warn!(cause = %e, "failed to write body");
    }
}

fn request(method: &str, host: &str, uri: &str, authorized: bool) -> Request<Bytes> {
    let mut builder = Request::builder().method(method).uri(uri).header(HOST, host);
    if authorized {
        builder = builder.header(AUTHORIZATION, "Bearer secret");
    }
    match builder.body(Bytes::new()) {
        Ok(request) => request,
        Err(e) => panic!("invalid example request: {e}"),
    }
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let people = PathSwitch::builder()
        .placeholder("/{name}/photos/{id}", handler_fn(show_photo))
        .placeholder("/{name}", handler_fn(show_person))
        .build()
        .expect("valid path rules");

    let api = Mounts::builder()
        .mount("/people/", List::builder().silent(handler_fn(require_auth)).handler(people).build())
        .build();

    let app = HostnameSwitch::builder()
        .host("api.example.com", MethodSwitch::builder().get(api).build())
        .host("static.example.com", List::builder().silent(discard_path_elements(1)).handler(handler_fn(show_path)).build())
        .build();

    let requests = [
        request("GET", "api.example.com", "/people/peter", true),
        request("GET", "api.example.com:8080", "/people/peter/photos/42", true),
        request("GET", "api.example.com", "/people/peter", false),
        request("POST", "api.example.com", "/people/peter", true),
        request("GET", "static.example.com", "/v1/css/site.css", false),
        request("GET", "unknown.example.com", "/", false),
    ];

    for req in requests {
        let target = format!("{} {}{}", req.method(), req.headers()[HOST].to_str().unwrap_or_default(), req.uri());
        let response = dispatch(&app, req).await;
        let body = String::from_utf8_lossy(response.body());
        info!(%target, status = %response.status(), body = body.trim_end(), "dispatched");
    }
}

use crate::error::RouteError;
use crate::handler::{BoxHandler, Handler, Request};
use crate::switch::rule::{PathRule, PlaceholderRule, RegexRule};
use crate::writer::{ResponseWriter, WrappedWriter, write_status_error};
use async_trait::async_trait;
use http::StatusCode;
use std::cmp::Reverse;
use tracing::debug;

/// Dispatches to the handler of the first [`PathRule`] matching the request path.
///
/// The submatches of the matching rule are stored in the [`Vars`](crate::Vars) under
/// `"1"`, `"2"`, ... in capture order before its handler runs. Paths no rule matches get
/// a `404 Not Found`.
///
/// ```
/// use micro_dispatch::{handler_fn, PathSwitch, ResponseWriter};
///
/// let switch = PathSwitch::builder()
///     .placeholder("/people/{name}", handler_fn(|w: &mut dyn ResponseWriter, _req| {
///         let name = w.vars().and_then(|vars| vars.submatch(1));
///         println!("looking for {name:?}");
///     }))
///     .regex("/.+", handler_fn(|_w: &mut dyn ResponseWriter, _req| {}))
///     .build()
///     .unwrap();
/// ```
pub struct PathSwitch {
    rules: Vec<Box<dyn PathRule>>,
}

impl PathSwitch {
    pub fn builder() -> PathSwitchBuilder {
        PathSwitchBuilder::new()
    }

    /// Creates a switch trying `rules` in exactly the given order.
    pub fn from_rules(rules: Vec<Box<dyn PathRule>>) -> Self {
        Self { rules }
    }

    /// Returns the compiled pattern sources in matching order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.as_str())
    }
}

#[async_trait]
impl Handler for PathSwitch {
    async fn serve(&self, writer: &mut dyn ResponseWriter, req: &mut Request) {
        let mut writer = WrappedWriter::wrap(writer);

        let matched = self.rules.iter().find_map(|rule| rule.matches(req.uri().path()).map(|submatches| (rule, submatches)));

        let Some((rule, submatches)) = matched else {
            debug!(path = req.uri().path(), "no path rule matched");
            write_status_error(&mut writer, StatusCode::NOT_FOUND);
            return;
        };

        debug!(path = req.uri().path(), pattern = rule.as_str(), "path rule matched");
        let vars = writer.vars();
        for (index, submatch) in submatches.into_iter().enumerate() {
            vars.insert((index + 1).to_string(), submatch);
        }

        rule.handler().serve(&mut writer, req).await;
    }
}

enum PendingRule {
    Regex(String, BoxHandler),
    Placeholder(String, BoxHandler),
    Compiled(Box<dyn PathRule>),
}

impl PendingRule {
    fn compile(self) -> Result<Box<dyn PathRule>, RouteError> {
        Ok(match self {
            PendingRule::Regex(pattern, handler) => Box::new(RegexRule::new(&pattern, handler)?),
            PendingRule::Placeholder(rule, handler) => Box::new(PlaceholderRule::new(&rule, handler)?),
            PendingRule::Compiled(rule) => rule,
        })
    }
}

/// Collects rules for a [`PathSwitch`].
///
/// Rules are compiled by [`build`](Self::build) and ordered by the length of their compiled
/// pattern, longest first; rules of equal length keep their registration order.
pub struct PathSwitchBuilder {
    rules: Vec<PendingRule>,
}

impl PathSwitchBuilder {
    fn new() -> Self {
        Self { rules: vec![] }
    }

    /// Adds a [`RegexRule`].
    pub fn regex<H: Handler + 'static>(mut self, pattern: impl Into<String>, handler: H) -> Self {
        self.rules.push(PendingRule::Regex(pattern.into(), Box::new(handler)));
        self
    }

    /// Adds a [`PlaceholderRule`].
    pub fn placeholder<H: Handler + 'static>(mut self, rule: impl Into<String>, handler: H) -> Self {
        self.rules.push(PendingRule::Placeholder(rule.into(), Box::new(handler)));
        self
    }

    /// Adds an already built rule.
    pub fn rule<R: PathRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(PendingRule::Compiled(Box::new(rule)));
        self
    }

    /// Compiles all rules, failing on the first invalid pattern.
    pub fn build(self) -> Result<PathSwitch, RouteError> {
        let mut rules = self.rules.into_iter().map(PendingRule::compile).collect::<Result<Vec<_>, _>>()?;
        rules.sort_by_key(|rule| Reverse(rule.as_str().len()));
        Ok(PathSwitch { rules })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::List;
    use crate::handler::handler_fn;
    use crate::testing::{handler_names, header, mark, request};
    use crate::writer::ResponseRecorder;

    async fn run(switch: &PathSwitch, uri: &str) -> ResponseRecorder {
        let mut recorder = ResponseRecorder::new();
        switch.serve(&mut recorder, &mut request("GET", uri)).await;
        recorder
    }

    #[tokio::test]
    async fn longer_pattern_wins() {
        let switch = PathSwitch::builder().regex("/.+", mark("a")).regex("/some/.+", mark("b")).build().unwrap();

        assert_eq!(handler_names(&run(&switch, "/some/thing").await), ["b"]);
        assert_eq!(handler_names(&run(&switch, "/some/thing/bla").await), ["b"]);
        assert_eq!(handler_names(&run(&switch, "/other/thing").await), ["a"]);
    }

    #[tokio::test]
    async fn precedence_is_by_source_length_only() {
        let switch = PathSwitch::builder().regex("/[a-z]+/x", mark("specific")).regex("/aaaaaaaaaa", mark("long")).build().unwrap();

        assert_eq!(switch.patterns().collect::<Vec<_>>(), ["^/aaaaaaaaaa", "^/[a-z]+/x"]);
        assert_eq!(handler_names(&run(&switch, "/aaaaaaaaaa/x").await), ["long"]);
    }

    #[tokio::test]
    async fn equal_length_keeps_registration_order() {
        let switch = PathSwitch::builder().regex("/a.", mark("first")).regex("/.b", mark("second")).build().unwrap();

        assert_eq!(handler_names(&run(&switch, "/ab").await), ["first"]);
    }

    #[tokio::test]
    async fn placeholder_submatch_in_vars() {
        let switch = PathSwitch::builder()
            .placeholder(
                "/people/{name}",
                handler_fn(|w, _req| {
                    let name = w.vars().and_then(|vars| vars.submatch(1)).unwrap();
                    w.headers_mut().insert("x-name", name.parse().unwrap());
                }),
            )
            .build()
            .unwrap();

        let recorder = run(&switch, "/people/peter").await;

        assert_eq!(header(&recorder, "x-name").as_deref(), Some("peter"));
    }

    #[tokio::test]
    async fn regex_submatches_are_numbered() {
        let switch = PathSwitch::builder()
            .regex(
                "/people/([a-z]+)/photos/([0-9]+)",
                handler_fn(|w, _req| {
                    let vars = w.vars().unwrap().clone();
                    let joined = format!("{}-{}", vars.submatch(1).unwrap(), vars.submatch(2).unwrap());
                    w.headers_mut().insert("x-submatches", joined.parse().unwrap());
                }),
            )
            .build()
            .unwrap();

        let recorder = run(&switch, "/people/peter/photos/42").await;

        assert_eq!(header(&recorder, "x-submatches").as_deref(), Some("peter-42"));
    }

    #[tokio::test]
    async fn no_match_is_not_found() {
        let switch = PathSwitch::builder().placeholder("/people/{path}", mark("a")).build().unwrap();

        let recorder = run(&switch, "/!!!/").await;

        assert_eq!(recorder.status(), StatusCode::NOT_FOUND);
        assert!(handler_names(&recorder).is_empty());
    }

    #[test]
    fn invalid_pattern_fails_build() {
        let result = PathSwitch::builder().regex("/ok", mark("a")).regex("/(broken", mark("b")).build();

        assert!(matches!(result, Err(RouteError::InvalidPattern { .. })));
    }

    #[tokio::test]
    async fn from_rules_keeps_order() {
        let rules: Vec<Box<dyn PathRule>> =
            vec![Box::new(RegexRule::new("/", mark("short")).unwrap()), Box::new(RegexRule::new("/longer", mark("long")).unwrap())];
        let switch = PathSwitch::from_rules(rules);

        assert_eq!(handler_names(&run(&switch, "/longer").await), ["short"]);
    }

    #[tokio::test]
    async fn submatches_reach_later_list_handlers() {
        let list = List::builder()
            .handler(PathSwitch::builder().placeholder("/people/{name}", None::<BoxHandler>).build().unwrap())
            .handler(handler_fn(|w, _req| {
                let name = w.vars().and_then(|vars| vars.submatch(1)).unwrap();
                w.headers_mut().insert("x-name", name.parse().unwrap());
            }))
            .build();

        let mut recorder = ResponseRecorder::new();
        list.serve(&mut recorder, &mut request("GET", "/people/paul")).await;

        assert_eq!(header(&recorder, "x-name").as_deref(), Some("paul"));
    }

    #[tokio::test]
    async fn custom_rules_are_sorted_with_the_rest() {
        let custom = PlaceholderRule::new("/people/{name}/photos", mark("photos")).unwrap();
        let switch = PathSwitch::builder().placeholder("/people/{name}", mark("person")).rule(custom).build().unwrap();

        assert_eq!(handler_names(&run(&switch, "/people/peter/photos").await), ["photos"]);
        assert_eq!(handler_names(&run(&switch, "/people/peter").await), ["person"]);
    }
}

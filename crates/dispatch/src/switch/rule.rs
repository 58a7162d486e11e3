//! Path rules: a pattern matched against the request path plus the handler to run on a
//! match.
//!
//! Patterns follow POSIX matching rules: among all matches starting at the beginning of the
//! path the longest one is chosen, so `/(a|ab)` captures `ab` in `/ab`.

use crate::error::RouteError;
use crate::handler::{BoxHandler, Handler};
use regex_automata::{Anchored, Input, MatchKind};
use regex_automata::nfa::thompson::pikevm::PikeVM;

/// Text a placeholder is replaced with in the generated pattern.
const PLACEHOLDER_GROUP: &str = "([^/]+)";

/// A single rule of a [`PathSwitch`](crate::PathSwitch).
pub trait PathRule: Send + Sync {
    /// Matches `path`, returning the captured submatches (without the whole match) on
    /// success. Groups which did not participate in the match are returned as empty
    /// strings.
    fn matches(&self, path: &str) -> Option<Vec<String>>;

    /// The compiled pattern source, longer sources take precedence in a switch.
    fn as_str(&self) -> &str;

    fn handler(&self) -> &dyn Handler;
}

/// A compiled, start anchored pattern with leftmost-longest semantics.
struct Pattern {
    source: String,
    vm: PikeVM,
}

impl Pattern {
    fn compile(pattern: &str, source: String) -> Result<Self, RouteError> {
        let vm = PikeVM::builder()
            .configure(PikeVM::config().match_kind(MatchKind::All))
            .build(&source)
            .map_err(|e| RouteError::InvalidPattern { pattern: pattern.to_owned(), source: e })?;
        Ok(Self { source, vm })
    }

    // MatchKind::All keeps stepping past the first match, the last one reported is the longest
    fn captures(&self, path: &str) -> Option<Vec<String>> {
        let mut cache = self.vm.create_cache();
        let mut captures = self.vm.create_captures();
        self.vm.captures(&mut cache, Input::new(path).anchored(Anchored::Yes), &mut captures);
        if !captures.is_match() {
            return None;
        }

        let submatches = (1..captures.group_len())
            .map(|index| captures.get_group(index).map(|span| path[span.range()].to_owned()).unwrap_or_default())
            .collect();
        Some(submatches)
    }
}

/// A rule using a regular expression, anchored at the start of the path.
///
/// The expression only has to match a prefix of the path: `/people/([a-z]+)` matches
/// `/people/peter/photos`. Append `$` to require a full match.
pub struct RegexRule {
    pattern: Pattern,
    handler: BoxHandler,
}

impl RegexRule {
    pub fn new<H: Handler + 'static>(pattern: &str, handler: H) -> Result<Self, RouteError> {
        let pattern = Pattern::compile(pattern, format!("^{pattern}"))?;
        Ok(Self { pattern, handler: Box::new(handler) })
    }
}

impl PathRule for RegexRule {
    fn matches(&self, path: &str) -> Option<Vec<String>> {
        self.pattern.captures(path)
    }

    fn as_str(&self) -> &str {
        &self.pattern.source
    }

    fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

/// A rule using placeholder syntax such as `/people/{name}/photos`.
///
/// Each `{name}` matches one or more characters other than `/` and becomes a submatch;
/// all other text is matched literally. Like [`RegexRule`] it only has to match a prefix
/// of the path.
pub struct PlaceholderRule {
    rule: String,
    names: Vec<String>,
    pattern: Pattern,
    handler: BoxHandler,
}

impl PlaceholderRule {
    pub fn new<H: Handler + 'static>(rule: &str, handler: H) -> Result<Self, RouteError> {
        let (source, names) = placeholder_pattern(rule);
        let pattern = Pattern::compile(rule, source)?;
        Ok(Self { rule: rule.to_owned(), names, pattern, handler: Box::new(handler) })
    }

    /// The rule as written.
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Placeholder names in submatch order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl PathRule for PlaceholderRule {
    fn matches(&self, path: &str) -> Option<Vec<String>> {
        self.pattern.captures(path)
    }

    fn as_str(&self) -> &str {
        &self.pattern.source
    }

    fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

/// Translates a placeholder rule into an anchored regex source and the placeholder names.
///
/// A placeholder is `{`, at least one character other than `}`, then `}`; braces that do
/// not form one are literal text.
fn placeholder_pattern(rule: &str) -> (String, Vec<String>) {
    let mut source = String::with_capacity(rule.len() + 8);
    let mut names = vec![];
    source.push('^');

    let mut rest = rule;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if close > 0 => {
                source.push_str(&regex::escape(&rest[..open]));
                source.push_str(PLACEHOLDER_GROUP);
                names.push(after[..close].to_owned());
                rest = &after[close + 1..];
            }
            _ => {
                source.push_str(&regex::escape(&rest[..=open]));
                rest = after;
            }
        }
    }
    source.push_str(&regex::escape(rest));

    (source, names)
}

//! Declarative route table and path matching.
//!
//! DESIGN
//! ======
//! Routes are declared as a tree of [`RouteEntry`] values and compiled once
//! into an immutable [`RouteTable`]. Compilation enforces the table
//! invariants (unique patterns per level, one index per level, exactly one
//! catch-all declared last) so matching itself cannot fail: every path
//! resolves to some chain of routes, the catch-all being the last resort.
//!
//! Pattern grammar, per `/`-separated segment:
//! - `name`   static, matched ASCII case-insensitively
//! - `:name`  one non-empty segment captured as a parameter, percent-decoded
//! - `:name?` optional parameter, last segment only
//! - `*`      the rest of the path, catch-all entry only
//!
//! Child patterns are relative to their parent. Matching walks the top-level
//! routes in declaration order; a parent matches when one of its children
//! matches the remainder, or when nothing remains.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use percent_encoding::percent_decode_str;

use crate::error::RouteTableError;

const WILDCARD_PARAM: &str = "*";

// =============================================================================
// DECLARATION
// =============================================================================

/// One declared route: a pattern, the page it mounts, optional children.
#[derive(Debug, Clone)]
pub struct RouteEntry<P> {
    pattern: String,
    page: P,
    index: bool,
    children: Vec<RouteEntry<P>>,
}

impl<P> RouteEntry<P> {
    pub fn new(pattern: impl Into<String>, page: P) -> Self {
        Self { pattern: pattern.into(), page, index: false, children: Vec::new() }
    }

    /// The child that matches when the parent consumed the whole path.
    pub fn index(page: P) -> Self {
        Self { pattern: String::new(), page, index: true, children: Vec::new() }
    }

    /// The catch-all entry.
    pub fn fallback(page: P) -> Self {
        Self::new(WILDCARD_PARAM, page)
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<RouteEntry<P>>) -> Self {
        self.children = children;
        self
    }
}

/// Identity of a mounted route level: its full pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey(Arc<str>);

impl RouteKey {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
    OptionalParam(String),
    Wildcard,
}

#[derive(Debug, Clone)]
struct CompiledRoute<P> {
    key: RouteKey,
    segments: Vec<Segment>,
    page: P,
    index: bool,
    children: Vec<CompiledRoute<P>>,
}

impl<P: Clone> CompiledRoute<P> {
    fn matched(&self) -> MatchedRoute<P> {
        MatchedRoute { key: self.key.clone(), page: self.page.clone() }
    }
}

impl<P> CompiledRoute<P> {
    fn is_catch_all(&self) -> bool {
        self.segments == [Segment::Wildcard]
    }

    fn wildcard_count(&self) -> usize {
        let own = usize::from(self.segments.contains(&Segment::Wildcard));
        own + self.children.iter().map(CompiledRoute::wildcard_count).sum::<usize>()
    }

    fn collect_pages<'a>(&'a self, out: &mut Vec<&'a P>) {
        out.push(&self.page);
        for child in &self.children {
            child.collect_pages(out);
        }
    }
}

// =============================================================================
// MATCH RESULT
// =============================================================================

/// Parameters captured while matching, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// One level of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute<P> {
    pub key: RouteKey,
    pub page: P,
}

/// The chain of routes (root first) a path resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<P> {
    levels: Vec<MatchedRoute<P>>,
    params: Params,
    fallback: bool,
}

impl<P> RouteMatch<P> {
    /// Matched levels, outermost first. Never empty.
    #[must_use]
    pub fn levels(&self) -> &[MatchedRoute<P>] {
        &self.levels
    }

    /// The innermost matched level.
    #[must_use]
    pub fn leaf(&self) -> Option<&MatchedRoute<P>> {
        self.levels.last()
    }

    pub fn pages(&self) -> impl Iterator<Item = &P> {
        self.levels.iter().map(|level| &level.page)
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Whether only the catch-all matched.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

// =============================================================================
// TABLE
// =============================================================================

/// Compiled, immutable route table.
#[derive(Debug, Clone)]
pub struct RouteTable<P> {
    routes: Vec<CompiledRoute<P>>,
    fallback: CompiledRoute<P>,
}

impl<P: Clone> RouteTable<P> {
    /// Compile and validate a table.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteTableError`] when a pattern is malformed, a pattern or
    /// index repeats within one level, or the catch-all entry is missing,
    /// repeated, nested, or not declared last.
    pub fn new(entries: Vec<RouteEntry<P>>) -> Result<Self, RouteTableError> {
        let mut routes = compile_level(entries, None)?;

        let wildcards: usize = routes.iter().map(CompiledRoute::wildcard_count).sum();
        match wildcards {
            0 => return Err(RouteTableError::MissingFallback),
            1 => {}
            _ => return Err(RouteTableError::MultipleFallbacks),
        }

        let Some(fallback) = routes.pop() else {
            return Err(RouteTableError::MissingFallback);
        };
        if !fallback.is_catch_all() || !fallback.children.is_empty() {
            return Err(RouteTableError::FallbackNotLast);
        }

        Ok(Self { routes, fallback })
    }

    /// Resolve a normalized path to its route chain.
    #[must_use]
    pub fn resolve(&self, path: &str) -> RouteMatch<P> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        for route in &self.routes {
            if let Some((levels, params)) = match_route(route, &segments) {
                return RouteMatch { levels, params: Params(params), fallback: false };
            }
        }

        RouteMatch {
            levels: vec![self.fallback.matched()],
            params: Params(vec![(WILDCARD_PARAM.to_owned(), segments.join("/"))]),
            fallback: true,
        }
    }

    /// Every page referenced anywhere in the table, catch-all included.
    #[must_use]
    pub fn pages(&self) -> Vec<&P> {
        let mut out = Vec::new();
        for route in &self.routes {
            route.collect_pages(&mut out);
        }
        self.fallback.collect_pages(&mut out);
        out
    }
}

fn compile_level<P>(
    entries: Vec<RouteEntry<P>>,
    parent: Option<&RouteKey>,
) -> Result<Vec<CompiledRoute<P>>, RouteTableError> {
    let parent_name = parent.map_or("/", RouteKey::as_str).to_owned();
    let mut seen = HashSet::new();
    let mut has_index = false;
    let mut compiled = Vec::with_capacity(entries.len());

    for entry in entries {
        if entry.index {
            if has_index {
                return Err(RouteTableError::DuplicateIndex { parent: parent_name });
            }
            if !entry.children.is_empty() {
                return Err(RouteTableError::IndexWithChildren { parent: parent_name });
            }
            has_index = true;
            compiled.push(CompiledRoute {
                key: RouteKey(Arc::from(format!("{parent_name} (index)"))),
                segments: Vec::new(),
                page: entry.page,
                index: true,
                children: Vec::new(),
            });
            continue;
        }

        let segments = parse_pattern(&entry.pattern)?;
        // Catch-all entries are counted by the table, not compared here.
        if !segments.contains(&Segment::Wildcard) && !seen.insert(shape(&segments)) {
            return Err(RouteTableError::DuplicatePath { parent: parent_name, pattern: entry.pattern });
        }
        let key = child_key(parent, &entry.pattern);

        let key = RouteKey(Arc::from(key));
        let children = compile_level(entry.children, Some(&key))?;
        compiled.push(CompiledRoute { key, segments, page: entry.page, index: false, children });
    }

    Ok(compiled)
}

/// What a pattern matches, with parameter names erased: `/t/:a?` and
/// `/T/:b?` share a shape.
fn shape(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Static(name) => name.to_ascii_lowercase(),
            Segment::Param(_) => ":".to_owned(),
            Segment::OptionalParam(_) => ":?".to_owned(),
            Segment::Wildcard => WILDCARD_PARAM.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn child_key(parent: Option<&RouteKey>, pattern: &str) -> String {
    let own: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let base = parent.map_or("", |key| key.as_str().trim_end_matches('/'));
    if own.is_empty() {
        if base.is_empty() { "/".to_owned() } else { base.to_owned() }
    } else {
        format!("{base}/{}", own.join("/"))
    }
}

fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, RouteTableError> {
    let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let mut segments = Vec::with_capacity(parts.len());

    for (i, part) in parts.iter().enumerate() {
        let last = i + 1 == parts.len();
        let segment = if *part == WILDCARD_PARAM {
            if !last {
                return Err(invalid(pattern, "`*` must be the last segment"));
            }
            Segment::Wildcard
        } else if let Some(name) = part.strip_prefix(':') {
            if let Some(name) = name.strip_suffix('?') {
                if !last {
                    return Err(invalid(pattern, "optional parameter must be the last segment"));
                }
                Segment::OptionalParam(param_name(pattern, name)?)
            } else {
                Segment::Param(param_name(pattern, name)?)
            }
        } else {
            Segment::Static((*part).to_owned())
        };
        segments.push(segment);
    }

    Ok(segments)
}

fn param_name(pattern: &str, name: &str) -> Result<String, RouteTableError> {
    if name.is_empty() {
        return Err(invalid(pattern, "parameter needs a name"));
    }
    Ok(name.to_owned())
}

fn invalid(pattern: &str, reason: &'static str) -> RouteTableError {
    RouteTableError::InvalidPattern { pattern: pattern.to_owned(), reason }
}

// =============================================================================
// MATCHING
// =============================================================================

type Captured = Vec<(String, String)>;

fn match_route<P: Clone>(route: &CompiledRoute<P>, segments: &[&str]) -> Option<(Vec<MatchedRoute<P>>, Captured)> {
    if route.index {
        return segments.is_empty().then(|| (vec![route.matched()], Vec::new()));
    }

    let (consumed, mut params) = match_segments(&route.segments, segments)?;
    let rest = &segments[consumed..];

    for child in &route.children {
        if let Some((mut levels, child_params)) = match_route(child, rest) {
            levels.insert(0, route.matched());
            params.extend(child_params);
            return Some((levels, params));
        }
    }

    // EDGE: a parent with children but no index still mounts alone on an exact hit.
    rest.is_empty().then(|| (vec![route.matched()], params))
}

fn match_segments(pattern: &[Segment], segments: &[&str]) -> Option<(usize, Captured)> {
    let mut params = Vec::new();
    let mut consumed = 0;

    for segment in pattern {
        match segment {
            Segment::Static(name) => {
                let actual = segments.get(consumed)?;
                if !decode(actual).eq_ignore_ascii_case(name) {
                    return None;
                }
                consumed += 1;
            }
            Segment::Param(name) => {
                let actual = segments.get(consumed)?;
                params.push((name.clone(), decode(actual).into_owned()));
                consumed += 1;
            }
            Segment::OptionalParam(name) => {
                if let Some(actual) = segments.get(consumed) {
                    params.push((name.clone(), decode(actual).into_owned()));
                    consumed += 1;
                }
            }
            Segment::Wildcard => {
                params.push((WILDCARD_PARAM.to_owned(), segments[consumed..].join("/")));
                consumed = segments.len();
            }
        }
    }

    Some((consumed, params))
}

/// Percent-decode one path segment; invalid UTF-8 is replaced, not rejected.
fn decode(segment: &str) -> Cow<'_, str> {
    percent_decode_str(segment).decode_utf8_lossy()
}

#[cfg(test)]
#[path = "route_test.rs"]
mod tests;

//! Hash-fragment locations.
//!
//! The site is served from plain static hosting, so the route lives in the
//! fragment (`#/tournaments/42`) and the server never sees it. A [`Location`]
//! is the normalized form the route table matches against.

use std::fmt;

/// A normalized in-app location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    path: String,
    query: Option<String>,
}

impl Location {
    /// The site root, `/`.
    #[must_use]
    pub fn root() -> Self {
        Self { path: "/".to_owned(), query: None }
    }

    /// Parse the value of `window.location.hash` (with or without the `#`).
    #[must_use]
    pub fn from_hash(hash: &str) -> Self {
        let raw = hash.strip_prefix('#').unwrap_or(hash);
        Self::from_path(raw)
    }

    /// Parse an in-app path such as `/admin/players?sort=name`.
    ///
    /// Empty segments and trailing slashes are dropped; a nested `#` ends the
    /// path.
    #[must_use]
    pub fn from_path(raw: &str) -> Self {
        let raw = raw.split('#').next().unwrap_or_default();
        let (path_part, query) = match raw.split_once('?') {
            Some((path, query)) if !query.is_empty() => (path, Some(query.to_owned())),
            Some((path, _)) => (path, None),
            None => (raw, None),
        };

        let segments: Vec<&str> = path_part.split('/').filter(|s| !s.is_empty()).collect();
        let path = if segments.is_empty() {
            "/".to_owned()
        } else {
            format!("/{}", segments.join("/"))
        };

        Self { path, query }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Non-empty path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    /// The fragment to put in `window.location.hash`.
    #[must_use]
    pub fn to_hash(&self) -> String {
        match &self.query {
            Some(query) => format!("#{}?{query}", self.path),
            None => format!("#{}", self.path),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.query {
            Some(query) => write!(f, "{}?{query}", self.path),
            None => f.write_str(&self.path),
        }
    }
}

/// Link target for an in-app path: `href("/team")` is `#/team`.
#[must_use]
pub fn href(path: &str) -> String {
    Location::from_path(path).to_hash()
}

#[cfg(test)]
#[path = "location_test.rs"]
mod tests;

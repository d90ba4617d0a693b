//! Request paths as seen by the router.
//!
//! # Responsibilities
//! - Split a raw path or absolute URL into decoded segments
//! - Pair the segments with the request method, when known
//!
//! # Design Decisions
//! - Scheme and authority of absolute URLs are stripped
//! - Query string and fragment never take part in routing
//! - Empty segments are dropped, so `/a//b/` and `/a/b` route alike
//! - `.` and `..` segments are resolved for relative paths and absolute URLs
//!   alike, so `/static/../users/1` routes as `/users/1`
//! - A segment that does not decode to UTF-8 is kept verbatim

use axum::http::{Method, Request};
use url::Url;

/// The routing-relevant part of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRequest {
    segments: Vec<String>,
    method: Option<Method>,
}

impl PathRequest {
    /// Build from already decoded segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            method: None,
        }
    }

    /// Build from a path (`/users/42?x=1`) or an absolute URL
    /// (`https://example.com/users/42`).
    pub fn from_path(path: &str) -> Self {
        Self {
            segments: split_path(path),
            method: None,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }
}

impl<B> From<&Request<B>> for PathRequest {
    fn from(request: &Request<B>) -> Self {
        Self::from_path(request.uri().path()).with_method(request.method().clone())
    }
}

/// Split a path or absolute URL into percent-decoded segments.
pub fn split_path(input: &str) -> Vec<String> {
    let path = match Url::parse(input) {
        Ok(url) if !url.cannot_be_a_base() => url.path().to_string(),
        _ => strip_query(input).to_string(),
    };

    resolve_dots(&path)
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(decode_segment)
        .collect()
}

/// Remove `.` and `..` segments the way URL parsing does for absolute URLs.
fn resolve_dots(path: &str) -> Vec<&str> {
    let path = path.strip_prefix('/').unwrap_or(path);
    let mut out = Vec::new();
    for segment in path.split('/') {
        if is_single_dot(segment) {
            continue;
        }
        if is_double_dot(segment) {
            out.pop();
            continue;
        }
        out.push(segment);
    }
    out
}

fn is_single_dot(segment: &str) -> bool {
    segment == "." || segment.eq_ignore_ascii_case("%2e")
}

fn is_double_dot(segment: &str) -> bool {
    matches!(segment.to_ascii_lowercase().as_str(), ".." | ".%2e" | "%2e." | "%2e%2e")
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

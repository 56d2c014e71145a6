//! Path normalization
//!
//! Turns the caller's raw asset path into the canonical, `/`-prefixed and
//! percent-encoded path segment that is both displayed and signed.
//!
//! Two kinds of input are recognised:
//! - Relative asset paths (`/users/1.png`, `users/1.png`): the hierarchy is
//!   kept and only characters that are unsafe in a URI are escaped.
//! - Fully-qualified URLs (`http://avatars.com/a.png`): the whole string is
//!   escaped into a single opaque segment.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Characters left untouched when escaping a relative path.
///
/// Everything outside this list (space, quotes, `%`, `<`, `>`, non-ASCII
/// bytes, ...) is written as `%XX`. `?`, `#`, `:` and `+` are escaped too so a
/// path can never leak into the query or fragment.
const PATH_ESCAPE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static FULLY_QUALIFIED_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Scheme followed by `://`, e.g. `http://`, `s3://`, `git+ssh://`.
///
/// The pattern is a constant; a failure here is a developer error caught by
/// `test_fully_qualified_regex_is_valid`.
fn fully_qualified_pattern() -> &'static Regex {
    FULLY_QUALIFIED_PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("Invalid scheme regex")
    })
}

/// Kind of asset reference the raw path was classified as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// A path relative to the source host
    Relative,
    /// An absolute URL to an external resource
    FullyQualified,
}

/// Classify a raw path.
///
/// Detection is a best-effort pattern match. Anything that does not begin
/// with a well-formed scheme is treated as relative.
pub fn classify(path: &str) -> PathKind {
    if fully_qualified_pattern().is_match(path) {
        PathKind::FullyQualified
    } else {
        PathKind::Relative
    }
}

/// `/`-prefixed, percent-encoded path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    /// Wrap an already-canonical path, adding the leading `/` if missing.
    ///
    /// No escaping is applied.
    pub fn from_encoded(path: &str) -> Self {
        if path.starts_with('/') {
            CanonicalPath(path.to_string())
        } else {
            CanonicalPath(format!("/{}", path))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a raw asset path into its canonical form.
///
/// Never fails: any byte sequence is a valid opaque path. Whitespace is kept
/// verbatim and escaped, not trimmed.
pub fn normalize(path: &str) -> CanonicalPath {
    match classify(path) {
        PathKind::FullyQualified => {
            tracing::debug!("Normalizing fully-qualified path as a single segment");
            CanonicalPath(format!("/{}", urlencoding::encode(path)))
        }
        PathKind::Relative => {
            let escaped = utf8_percent_encode(path, PATH_ESCAPE_SET).to_string();
            CanonicalPath::from_encoded(&escaped)
        }
    }
}

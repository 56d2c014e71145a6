//! Final URL assembly

use std::fmt;

use super::normalize::CanonicalPath;
use super::params::QueryString;
use super::signing::SIGNATURE_PARAM;
use super::UrlSpec;

/// A finished URL, ready to hand to an HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignedUrl(String);

impl SignedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SignedUrl> for String {
    fn from(url: SignedUrl) -> Self {
        url.0
    }
}

impl PartialEq<str> for SignedUrl {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SignedUrl {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// `https` unless the spec opts out of TLS.
pub fn scheme(secure: bool) -> &'static str {
    if secure {
        "https"
    } else {
        "http"
    }
}

/// Join scheme, host, path and query.
///
/// The signature, when present, is always the last pair. With no other
/// parameters the query is just `s=<signature>`.
pub fn assemble(
    spec: &UrlSpec,
    canonical_path: &CanonicalPath,
    query: &QueryString,
    signature: Option<&str>,
) -> SignedUrl {
    let mut url = format!("{}://{}{}", scheme(spec.secure()), spec.host(), canonical_path);

    let mut pairs: Vec<&str> = Vec::with_capacity(2);
    if !query.is_empty() {
        pairs.push(query.as_str());
    }
    let signature_pair = signature.map(|sig| format!("{}={}", SIGNATURE_PARAM, sig));
    if let Some(pair) = signature_pair.as_deref() {
        pairs.push(pair);
    }

    if !pairs.is_empty() {
        url.push('?');
        url.push_str(&pairs.join("&"));
    }

    SignedUrl(url)
}

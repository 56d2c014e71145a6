//! Asset URL construction
//!
//! Builds deterministic, optionally signed URLs for assets served by an
//! image delivery host. The pipeline is linear and stateless:
//!
//! ```text
//! normalize(path) -> serialize(params) -> sign(token, path, query) -> assemble
//! ```
//!
//! # Example
//!
//! ```
//! use imgpath::url_builder::{ParameterMap, UrlSpec};
//!
//! let spec = UrlSpec::new("/users/1.png", "my-social-network.imgix.net")
//!     .unwrap()
//!     .with_token("FOO123bar");
//!
//! let url = spec.to_url(&ParameterMap::new().with("w", 400).with("h", 300));
//! assert_eq!(
//!     url.as_str(),
//!     "https://my-social-network.imgix.net/users/1.png?w=400&h=300&s=c7b86f666a832434dd38577e38cf86d1"
//! );
//! ```

pub mod assemble;
pub mod normalize;
pub mod params;
pub mod signing;

use std::fmt;

use crate::error::UrlError;

pub use assemble::{assemble, SignedUrl};
pub use normalize::{classify, normalize, CanonicalPath, PathKind};
pub use params::{is_base64_variant, serialize, ParamValue, ParameterMap, QueryString};
pub use signing::{sign, verify_signature, SIGNATURE_PARAM};

/// Immutable description of an asset on a source host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSpec {
    path: String,
    host: String,
    /// Shared signing secret; `None` produces unsigned URLs
    token: Option<String>,
    secure: bool,
    /// Pre-resolved canonical path used instead of normalizing `path`
    proxy_path: Option<String>,
}

impl UrlSpec {
    /// Create an unsigned, `https` spec.
    pub fn new(path: impl Into<String>, host: impl Into<String>) -> Result<Self, UrlError> {
        let host = host.into();
        if host.is_empty() {
            return Err(UrlError::EmptyHost);
        }

        Ok(Self {
            path: path.into(),
            host,
            token: None,
            secure: true,
            proxy_path: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Use an already-encoded path verbatim (a leading `/` is still ensured).
    pub fn with_proxy_path(mut self, proxy_path: impl Into<String>) -> Self {
        self.proxy_path = Some(proxy_path.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn proxy_path(&self) -> Option<&str> {
        self.proxy_path.as_deref()
    }

    /// Canonical path that is both emitted and signed.
    pub fn canonical_path(&self) -> CanonicalPath {
        match &self.proxy_path {
            Some(proxy_path) => CanonicalPath::from_encoded(proxy_path),
            None => normalize(&self.path),
        }
    }

    /// Build the URL with the given parameters.
    ///
    /// Each call produces a new value; the spec itself is never modified.
    pub fn to_url(&self, params: &ParameterMap) -> SignedUrl {
        let canonical_path = self.canonical_path();
        let query = serialize(params);
        let signature = sign(self.token(), &canonical_path, &query);

        tracing::debug!(
            host = %self.host,
            params = params.len(),
            signed = signature.is_some(),
            "Built asset URL"
        );

        assemble(self, &canonical_path, &query, signature.as_deref())
    }

    /// Build the URL from a JSON object of parameters.
    ///
    /// Fails with [`UrlError::InvalidParameterType`] if `params` is not an
    /// object or any value is not a scalar.
    pub fn to_url_from_json(&self, params: serde_json::Value) -> Result<SignedUrl, UrlError> {
        let object = match params {
            serde_json::Value::Object(object) => object,
            other => return Err(UrlError::invalid_type("<params>", json_kind(&other))),
        };
        let params = ParameterMap::from_json_object(object)?;
        Ok(self.to_url(&params))
    }
}

impl fmt::Display for UrlSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_url(&ParameterMap::new()))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

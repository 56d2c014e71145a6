//! URL signing
//!
//! The signature is computed as:
//! ```text
//! s = hex(md5(token + canonical_path + ["?" + query]))
//! ```
//!
//! The query part is the serialized parameters without the signature, in
//! insertion order. It is omitted (with its `?`) when there are no
//! parameters.
//!
//! # Limitations
//!
//! MD5 is fixed by the serving host's verification scheme and cannot be
//! changed here. It authenticates URLs generated by holders of the shared
//! token against casual tampering. It is not collision resistant and must not
//! be treated as a security boundary against a motivated attacker.

use md5::{Digest, Md5};

use super::normalize::CanonicalPath;
use super::params::QueryString;

/// Name of the reserved signature parameter
pub const SIGNATURE_PARAM: &str = "s";

/// Build the exact byte string that is digested.
fn signing_input(token: &str, canonical_path: &CanonicalPath, query: &QueryString) -> String {
    let capacity = token.len() + canonical_path.as_str().len() + query.as_str().len() + 1;
    let mut input = String::with_capacity(capacity);
    input.push_str(token);
    input.push_str(canonical_path.as_str());
    if !query.is_empty() {
        input.push('?');
        input.push_str(query.as_str());
    }
    input
}

fn md5_hex(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute the signature for a canonical path and query.
///
/// Returns `None` when no token is configured; an unsigned URL is a valid
/// result, not an error.
pub fn sign(
    token: Option<&str>,
    canonical_path: &CanonicalPath,
    query: &QueryString,
) -> Option<String> {
    let token = token?;
    let input = signing_input(token, canonical_path, query);
    tracing::trace!(input_len = input.len(), "Computing URL signature");
    Some(md5_hex(input.as_bytes()))
}

/// Check a signature received with a URL.
///
/// `query` must be the query string with the `s` pair removed. Always false
/// when no token is configured.
pub fn verify_signature(
    token: Option<&str>,
    canonical_path: &CanonicalPath,
    query: &QueryString,
    signature: &str,
) -> bool {
    match sign(token, canonical_path, query) {
        Some(expected) => constant_time_compare(signature, &expected),
        None => false,
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Canonical request encoding for OAuth 1.0a signatures
/// RFC 5849 Section 3.4.1: https://tools.ietf.org/html/rfc5849#section-3.4.1
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::BTreeMap;

/// Request parameters, one value per key, ordered byte-wise by key
pub type Params = BTreeMap<String, String>;

/// Unreserved characters: A-Z a-z 0-9 - . _ ~
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a string with uppercase hex escapes
///
/// # Examples
///
/// ```
/// use yahoo_oauth1::encode::percent_encode;
///
/// assert_eq!(percent_encode("a b&c"), "a%20b%26c");
/// assert_eq!(percent_encode("-._~"), "-._~");
/// ```
pub fn percent_encode(input: &str) -> String {
    utf8_percent_encode(input, OAUTH_ENCODE_SET).to_string()
}

/// Build the normalized parameter string
///
/// Pairs come out in ascending key order, each side percent-encoded and
/// joined with `&`. An empty set yields an empty string.
pub fn canonical_query(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the signature base string: `METHOD&url&parameters`
///
/// `url` must not carry a query string; its parameters belong in `params`.
///
/// # Examples
///
/// ```
/// use yahoo_oauth1::encode::{base_string, Params};
///
/// let mut params = Params::new();
/// params.insert("b".to_string(), "2".to_string());
/// params.insert("a".to_string(), "1".to_string());
///
/// assert_eq!(
///     base_string("GET", "http://x/y", &params),
///     "GET&http%3A%2F%2Fx%2Fy&a%3D1%26b%3D2"
/// );
/// ```
pub fn base_string(method: &str, url: &str, params: &Params) -> String {
    format!(
        "{}&{}&{}",
        percent_encode(&method.to_uppercase()),
        percent_encode(url),
        percent_encode(&canonical_query(params))
    )
}

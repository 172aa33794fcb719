//! Query string codec
//!
//! Merges a supplied query (raw string or typed map) into a path that may
//! already carry an embedded query, and extracts a typed map back out of a
//! URL. Extraction coerces values: integer/decimal tokens become numbers,
//! the literal tokens `true`/`false` become booleans, everything else stays
//! a string. The coercion is a deliberate convenience for callers reading
//! launch parameters and round-trips exactly with `merge_query`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl QueryValue {
    /// Coerce a raw (already percent-decoded) token into a typed value.
    pub fn coerce(token: &str) -> Self {
        match token {
            "true" => return QueryValue::Bool(true),
            "false" => return QueryValue::Bool(false),
            _ => {}
        }

        if is_numeric_token(token) {
            if let Ok(n) = token.parse::<f64>() {
                return QueryValue::Number(n);
            }
        }

        QueryValue::Text(token.to_string())
    }
}

impl std::fmt::Display for QueryValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryValue::Bool(b) => write!(f, "{}", b),
            QueryValue::Number(n) => write!(f, "{}", n),
            QueryValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Text(s)
    }
}

impl From<f64> for QueryValue {
    fn from(n: f64) -> Self {
        QueryValue::Number(n)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Number(n as f64)
    }
}

impl From<i32> for QueryValue {
    fn from(n: i32) -> Self {
        QueryValue::Number(n as f64)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Bool(b)
    }
}

/// Query parameters keyed by name. Keys are unique; ordering is
/// deterministic so serialized URLs are stable.
pub type QueryMap = BTreeMap<String, QueryValue>;

/// Query input accepted by `merge_query`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryInput {
    None,
    /// Appended verbatim (no encoding applied).
    Raw(String),
    /// Serialized as `key=encodedValue` pairs joined by `&`.
    Map(QueryMap),
}

impl From<QueryMap> for QueryInput {
    fn from(map: QueryMap) -> Self {
        QueryInput::Map(map)
    }
}

impl From<&str> for QueryInput {
    fn from(s: &str) -> Self {
        QueryInput::Raw(s.to_string())
    }
}

impl From<String> for QueryInput {
    fn from(s: String) -> Self {
        QueryInput::Raw(s)
    }
}

/// Merge a query into a path, producing one canonical path+query string.
///
/// The separator is `?` when the path carries no query yet, `&` otherwise.
/// An empty raw string or an empty map contributes nothing.
pub fn merge_query(path: &str, query: &QueryInput) -> String {
    let serialized = match query {
        QueryInput::None => String::new(),
        QueryInput::Raw(s) => s.clone(),
        QueryInput::Map(map) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, percent::encode(&v.to_string())))
            .collect::<Vec<_>>()
            .join("&"),
    };

    if serialized.is_empty() {
        return path.to_string();
    }

    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{}{}{}", path, separator, serialized)
}

/// Extract the query parameters embedded in a URL.
///
/// Everything after the first `?` (and before any `#` fragment) is scanned
/// as `&`-separated `key=value` pairs. Values are percent-decoded and then
/// coerced via [`QueryValue::coerce`]. A URL without a query yields an
/// empty map.
pub fn parse_query(url: &str) -> QueryMap {
    let mut map = QueryMap::new();

    let without_fragment = url.split('#').next().unwrap_or(url);
    let query = match without_fragment.split_once('?') {
        Some((_, q)) => q,
        None => return map,
    };

    for pair in query.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => continue,
        };
        if key.is_empty() {
            continue;
        }
        let decoded = percent::decode(value);
        map.insert(key.to_string(), QueryValue::coerce(&decoded));
    }

    map
}

/// True for tokens matching an integer or decimal pattern, with an
/// optional leading minus. Exponents and bare dots are not numbers.
fn is_numeric_token(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    if digits.is_empty() || digits.starts_with('.') || digits.ends_with('.') {
        return false;
    }

    let mut dots = 0;
    for ch in digits.chars() {
        match ch {
            '.' => {
                dots += 1;
                if dots > 1 {
                    return false;
                }
            }
            c if c.is_ascii_digit() => {}
            _ => return false,
        }
    }

    true
}

// Minimal percent codec for query values
mod percent {
    pub fn encode(input: &str) -> String {
        let mut result = String::with_capacity(input.len() * 3);
        for byte in input.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    result.push(byte as char);
                }
                _ => {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
        result
    }

    pub fn decode(input: &str) -> String {
        let bytes = input.as_bytes();
        let mut result = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'%' {
                if let (Some(hi), Some(lo)) = (hex(bytes.get(i + 1)), hex(bytes.get(i + 2))) {
                    result.push(hi * 16 + lo);
                    i += 3;
                    continue;
                }
            }
            result.push(bytes[i]);
            i += 1;
        }
        String::from_utf8_lossy(&result).into_owned()
    }

    fn hex(byte: Option<&u8>) -> Option<u8> {
        match byte {
            Some(b @ b'0'..=b'9') => Some(b - b'0'),
            Some(b @ b'a'..=b'f') => Some(b - b'a' + 10),
            Some(b @ b'A'..=b'F') => Some(b - b'A' + 10),
            _ => None,
        }
    }
}

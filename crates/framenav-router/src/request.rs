//! Raw navigation requests

use serde::{Deserialize, Serialize};

use framenav_routes::RouteLocation;

/// What a caller (or a redirecting guard) hands to the router.
///
/// Bare strings are classified by shape: anything containing a path
/// separator is a literal path, anything else is a symbolic route name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavigationRequest {
    /// A literal absolute path, possibly with an embedded query
    Path(String),
    /// A symbolic name to look up in the route manifest
    Name(String),
    /// A pop distance for back navigation
    Delta(usize),
    /// A structured request
    Location(RouteLocation),
}

impl From<&str> for NavigationRequest {
    fn from(raw: &str) -> Self {
        if raw.contains('/') {
            NavigationRequest::Path(raw.to_string())
        } else {
            NavigationRequest::Name(raw.to_string())
        }
    }
}

impl From<String> for NavigationRequest {
    fn from(raw: String) -> Self {
        NavigationRequest::from(raw.as_str())
    }
}

impl From<usize> for NavigationRequest {
    fn from(delta: usize) -> Self {
        NavigationRequest::Delta(delta)
    }
}

impl From<RouteLocation> for NavigationRequest {
    fn from(location: RouteLocation) -> Self {
        NavigationRequest::Location(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_with_separator_is_path() {
        assert_eq!(
            NavigationRequest::from("/pages/home/index"),
            NavigationRequest::Path("/pages/home/index".to_string())
        );
    }

    #[test]
    fn test_bare_string_is_name() {
        assert_eq!(
            NavigationRequest::from("home"),
            NavigationRequest::Name("home".to_string())
        );
    }
}

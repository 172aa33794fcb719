//! framenav route layer
//!
//! The static side of navigation: the route manifest (symbolic names,
//! valid paths, declared tabs), the core route types shared by the
//! history stack and the router, and the query string codec.

mod error;
mod manifest;
mod query;
mod route;

pub use error::RouteError;
pub use manifest::{PageEntry, PageManifest, RouteManifest, SubPackage};
pub use query::{merge_query, parse_query, QueryInput, QueryMap, QueryValue};
pub use route::{NavKind, Route, RouteLocation};

pub type Result<T> = std::result::Result<T, RouteError>;
